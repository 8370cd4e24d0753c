use crate::browser::{Browser, Page};
use crate::config::{Credentials, ScraperConfig};
use crate::error::{AuthError, ExtractionError, Result, ScraperError};
use crate::models::{DelayConfig, RoundPayload, RoundSummary};
use crate::parsers;
use rand::Rng;
use reqwest::Url;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};

/// An authenticated browser. Owns the browser so navigation stays sequential.
pub struct Session<B: Browser> {
    browser: B,
    config: ScraperConfig,
}

/// Logs into Golfshot and hands back the session for the rest of the run.
///
/// Waits at most `config.login_wait` for the sign-in form and again for the
/// response to the submitted credentials, then sleeps `config.settle`
/// before checking the result.
pub async fn authenticate<B: Browser>(
    mut browser: B,
    credentials: &Credentials,
    config: &ScraperConfig,
) -> std::result::Result<Session<B>, AuthError> {
    let signin_url = config.signin_url();
    info!("Signing in at {}", signin_url);

    let page = tokio::time::timeout(config.login_wait, browser.navigate(&signin_url))
        .await
        .map_err(|_| AuthError::LoginFormTimeout(config.login_wait))?
        .map_err(|e| AuthError::Navigation(Box::new(e)))?;

    let form = parsers::login::parse_login_form(&page.html, &page.url, credentials)?;
    debug!("Submitting sign-in form to {}", form.action);

    let response = tokio::time::timeout(
        config.login_wait,
        browser.submit_form(&form.action, &form.fields),
    )
    .await
    .map_err(|_| AuthError::SubmitTimeout(config.login_wait))?
    .map_err(|e| AuthError::Navigation(Box::new(e)))?;

    tokio::time::sleep(config.settle).await;

    if parsers::login::has_login_form(&response.html) {
        warn!("Sign-in form shown again after submitting credentials");
        return Err(AuthError::Rejected);
    }

    info!("Signed in");
    Ok(Session {
        browser,
        config: config.clone(),
    })
}

impl<B: Browser> Session<B> {
    /// Navigates with the human-like delay and the per-navigation timeout applied.
    ///
    /// Landing on the sign-in page means the session is gone; that is
    /// reported as [`ScraperError::SessionExpired`] and never retried here.
    pub async fn navigate(&mut self, url: &str) -> Result<Page> {
        random_delay(&self.config.delay).await;

        let after = self.config.navigation_timeout;
        let page = tokio::time::timeout(after, self.browser.navigate(url))
            .await
            .map_err(|_| ScraperError::Timeout {
                url: url.to_string(),
                after,
            })??;

        if self.is_signin_page(&page.url) {
            return Err(ScraperError::SessionExpired);
        }

        Ok(page)
    }

    fn is_signin_page(&self, url: &str) -> bool {
        let Ok(url) = Url::parse(url) else {
            return false;
        };
        let signin = self.config.signin_path.trim_end_matches('/');
        url.path().trim_end_matches('/').eq_ignore_ascii_case(signin)
    }

    /// Collects every round on the overview, following `rel=next` links up to `max_pages`.
    pub async fn list_rounds(&mut self) -> Result<Vec<RoundSummary>> {
        let mut url = self.config.rounds_url();
        let mut visited = HashSet::new();
        let mut seen = HashSet::new();
        let mut rounds = Vec::new();

        for page_no in 1..=self.config.max_pages {
            if !visited.insert(url.clone()) {
                debug!("Next page {} already visited, stopping", url);
                break;
            }

            let page = self.navigate(&url).await?;
            let parsed = parsers::rounds::parse_rounds_page(&page.html, &page.url)?;

            for err in &parsed.errors {
                warn!("Skipping listing row: {}", err);
            }
            let found = parsed.rounds.len();
            rounds.extend(
                parsed
                    .rounds
                    .into_iter()
                    .filter(|round| seen.insert(round.url.clone())),
            );
            info!("Listing page {}: {} rounds", page_no, found);

            match parsed.next_page {
                Some(next) if page_no < self.config.max_pages => url = next,
                Some(_) => {
                    warn!(
                        "Stopped after {} listing pages, later rounds were not listed",
                        self.config.max_pages
                    );
                    break;
                }
                None => break,
            }
        }

        Ok(rounds)
    }

    /// Loads a round page and returns the raw embedded payload text.
    pub async fn fetch_payload_json(&mut self, round: &RoundSummary) -> Result<String> {
        let page = match self.navigate(&round.url).await {
            Err(ScraperError::Timeout { after, .. }) => {
                return Err(ExtractionError::Timeout {
                    round: round.round_id.clone(),
                    after,
                }
                .into());
            }
            other => other?,
        };
        let json = parsers::scorecard::locate_payload(&page.html, &round.round_id)?;
        Ok(json.to_string())
    }

    /// Loads a round page and parses its embedded scorecard.
    pub async fn extract_payload(&mut self, round: &RoundSummary) -> Result<RoundPayload> {
        let json = self.fetch_payload_json(round).await?;
        Ok(parsers::scorecard::parse_payload(&json, &round.round_id)?)
    }
}

async fn random_delay(config: &DelayConfig) {
    if !config.enabled {
        return;
    }
    let ms = {
        let (lo, hi) = if config.min_delay_ms <= config.max_delay_ms {
            (config.min_delay_ms, config.max_delay_ms)
        } else {
            (config.max_delay_ms, config.min_delay_ms)
        };
        rand::rng().random_range(lo..=hi)
    };
    tokio::time::sleep(Duration::from_millis(ms)).await;
}
