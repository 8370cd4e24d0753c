//! One sequential scraping run: sign in, list, extract and normalize each
//! round in listing order, then export.

use crate::browser::Browser;
use crate::cache::CacheBackend;
use crate::config::{Credentials, ErrorPolicy, ScraperConfig};
use crate::error::{Result, ScraperError};
use crate::export::ExportSink;
use crate::models::{HoleRecord, PersistedArtifact, RoundSummary};
use crate::normalize::normalize_round;
use crate::parsers::scorecard::parse_payload;
use crate::session::{Session, authenticate};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// A round that produced no rows, with enough context to retry it by hand.
#[derive(Debug, Clone)]
pub struct SkippedRound {
    pub round_id: String,
    pub url: String,
    pub reason: String,
}

#[derive(Debug)]
pub struct RunReport {
    pub artifact: PersistedArtifact,
    pub rounds_listed: usize,
    pub rounds_ok: usize,
    pub skipped: Vec<SkippedRound>,
    /// Set when the run stopped early because of a cancel request.
    pub cancelled: bool,
    /// The error that ended the round loop early, if any. Rows gathered
    /// before it are still in the artifact.
    pub aborted: Option<ScraperError>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

pub struct Pipeline {
    config: ScraperConfig,
    cache: Option<Arc<dyn CacheBackend>>,
    cancel: CancellationToken,
}

impl Pipeline {
    pub fn new(config: ScraperConfig) -> Self {
        Self {
            config,
            cache: None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn set_cache(&mut self, cache: Arc<dyn CacheBackend>) {
        self.cache = Some(cache);
    }

    /// Token that stops the run before the next round when cancelled.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Runs the whole pipeline against `browser`, appending into `sink` and flushing it.
    ///
    /// Authentication and listing failures are returned as errors with
    /// nothing exported. Once rounds are being scraped, whatever was
    /// gathered is always flushed, even when the loop ends early.
    pub async fn run<B: Browser>(
        &self,
        browser: B,
        credentials: &Credentials,
        sink: &mut ExportSink,
    ) -> Result<RunReport> {
        let started_at = Utc::now();

        let mut session = authenticate(browser, credentials, &self.config).await?;
        let rounds = session.list_rounds().await?;
        info!("Found {} rounds", rounds.len());

        let mut rounds_ok = 0;
        let mut skipped = Vec::new();
        let mut cancelled = false;
        let mut aborted = None;

        for (i, round) in rounds.iter().enumerate() {
            if self.cancel.is_cancelled() {
                warn!("Run cancelled, {} rounds not scraped", rounds.len() - i);
                cancelled = true;
                break;
            }

            info!(
                "[{}/{}] Scraping round {} on {} at {}",
                i + 1,
                rounds.len(),
                round.round_id,
                round.date.as_deref().unwrap_or("unknown date"),
                round.course_name.as_deref().unwrap_or("unknown course"),
            );

            match self.scrape_round(&mut session, round).await {
                Ok(records) => {
                    debug!("Round {}: {} holes", round.round_id, records.len());
                    sink.append(records);
                    rounds_ok += 1;
                }
                Err(err) if err.is_fatal() => {
                    warn!("Round {}: {}, stopping run", round.round_id, err);
                    skipped.push(SkippedRound::new(round, &err));
                    aborted = Some(err);
                    break;
                }
                Err(err) => {
                    warn!("Round {}: {}, skipping", round.round_id, err);
                    skipped.push(SkippedRound::new(round, &err));
                    if self.config.error_policy == ErrorPolicy::AbortOnFirst {
                        aborted = Some(err);
                        break;
                    }
                }
            }
        }

        let artifact = sink.flush().await?;

        Ok(RunReport {
            artifact,
            rounds_listed: rounds.len(),
            rounds_ok,
            skipped,
            cancelled,
            aborted,
            started_at,
            finished_at: Utc::now(),
        })
    }

    /// Extracts and normalizes one round, retrying transient failures with backoff.
    pub async fn scrape_round<B: Browser>(
        &self,
        session: &mut Session<B>,
        round: &RoundSummary,
    ) -> Result<Vec<HoleRecord>> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.try_scrape_round(session, round).await {
                Ok(records) => return Ok(records),
                Err(err) if err.is_retryable() && attempt < max_attempts => {
                    let backoff = self.config.backoff_for(attempt);
                    warn!(
                        "Round {} attempt {}/{} failed: {}, retrying in {:?}",
                        round.round_id, attempt, max_attempts, err, backoff
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn try_scrape_round<B: Browser>(
        &self,
        session: &mut Session<B>,
        round: &RoundSummary,
    ) -> Result<Vec<HoleRecord>> {
        if let Some(cache) = &self.cache {
            if let Some(json) = cache.get(&round.round_id).await {
                match records_from_json(&json, round) {
                    Ok(records) => {
                        debug!("Round {}: using cached payload", round.round_id);
                        return Ok(records);
                    }
                    Err(e) => {
                        warn!("Discarding cached payload for round {}: {}", round.round_id, e);
                        if let Err(e) = cache.delete(&round.round_id).await {
                            warn!("Could not drop cached round {}: {}", round.round_id, e);
                        }
                    }
                }
            }
        }

        let json = session.fetch_payload_json(round).await?;
        let records = records_from_json(&json, round)?;

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.set(&round.round_id, &json, self.config.cache_ttl).await {
                warn!("Could not cache round {}: {}", round.round_id, e);
            }
        }

        Ok(records)
    }
}

fn records_from_json(json: &str, round: &RoundSummary) -> Result<Vec<HoleRecord>> {
    let payload = parse_payload(json, &round.round_id)?;
    Ok(normalize_round(&payload, round)?)
}

impl SkippedRound {
    fn new(round: &RoundSummary, err: &ScraperError) -> Self {
        Self {
            round_id: round.round_id.clone(),
            url: round.url.clone(),
            reason: err.to_string(),
        }
    }
}
