// tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use golfshot_scraper::parsers::scorecard::{CLOSING_MARKER, OPENING_MARKER};
use golfshot_scraper::{
    Browser, Credentials, DelayConfig, Page, Result, ScraperConfig, ScraperError,
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const BASE: &str = "https://golf.test";
pub const PROFILE: &str = "olOm3";

pub fn rounds_url() -> String {
    format!("{}/profiles/{}/rounds", BASE, PROFILE)
}

pub fn round_url(id: &str) -> String {
    format!("{}/profiles/{}/rounds/{}", BASE, PROFILE, id)
}

/// Fast config pointed at the fake site.
pub fn test_config() -> ScraperConfig {
    let mut config = ScraperConfig::new(PROFILE);
    config.base_url = BASE.to_string();
    config.login_wait = Duration::from_secs(1);
    config.settle = Duration::ZERO;
    config.navigation_timeout = Duration::from_secs(1);
    config.retry_backoff = Duration::from_millis(1);
    config.delay = DelayConfig::disabled();
    config
}

pub fn credentials() -> Credentials {
    Credentials::new("golfer@example.com", "hunter2")
}

#[derive(Clone)]
pub enum Response {
    Html(String),
    /// Ends up on a different URL, like a server redirect.
    Redirect { to: String, html: String },
    /// Transient failure, reported as a navigation timeout.
    Fail,
    /// Takes this long before answering.
    Slow(Duration, String),
}

#[derive(Default)]
struct State {
    routes: HashMap<String, Vec<Response>>,
    hits: HashMap<String, usize>,
    visits: Vec<String>,
    submissions: Vec<(String, Vec<(String, String)>)>,
    login_response: Option<Response>,
}

/// Scripted browser. Each URL answers with its responses in order and then
/// keeps repeating the last one. Clones share state.
#[derive(Clone, Default)]
pub struct FakeBrowser {
    state: Arc<Mutex<State>>,
}

impl FakeBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// A site with a working sign-in flow.
    pub fn with_login() -> Self {
        let browser = Self::new();
        browser.route(&format!("{}/signin", BASE), Response::Html(login_page()));
        browser.on_login(Response::Redirect {
            to: format!("{}/dashboard", BASE),
            html: "<html><body>Welcome back</body></html>".to_string(),
        });
        browser
    }

    pub fn route(&self, url: &str, response: Response) -> &Self {
        let mut state = self.state.lock().unwrap();
        state
            .routes
            .entry(url.to_string())
            .or_default()
            .push(response);
        drop(state);
        self
    }

    pub fn on_login(&self, response: Response) {
        self.state.lock().unwrap().login_response = Some(response);
    }

    pub fn visits(&self) -> Vec<String> {
        self.state.lock().unwrap().visits.clone()
    }

    pub fn visit_count(&self, url: &str) -> usize {
        self.visits().iter().filter(|v| v.as_str() == url).count()
    }

    pub fn submissions(&self) -> Vec<(String, Vec<(String, String)>)> {
        self.state.lock().unwrap().submissions.clone()
    }

    fn next_response(&self, url: &str) -> Option<Response> {
        let mut state = self.state.lock().unwrap();
        state.visits.push(url.to_string());
        let responses = state.routes.get(url)?.clone();
        let hit = state.hits.entry(url.to_string()).or_insert(0);
        let response = responses.get(*hit).or(responses.last()).cloned();
        *hit += 1;
        response
    }
}

async fn respond(url: &str, response: Option<Response>) -> Result<Page> {
    match response {
        Some(Response::Html(html)) => Ok(Page {
            url: url.to_string(),
            html,
        }),
        Some(Response::Redirect { to, html }) => Ok(Page { url: to, html }),
        Some(Response::Slow(delay, html)) => {
            tokio::time::sleep(delay).await;
            Ok(Page {
                url: url.to_string(),
                html,
            })
        }
        Some(Response::Fail) => Err(ScraperError::Timeout {
            url: url.to_string(),
            after: Duration::ZERO,
        }),
        None => Ok(Page {
            url: url.to_string(),
            html: "<html><body><h1>Not Found</h1></body></html>".to_string(),
        }),
    }
}

#[async_trait]
impl Browser for FakeBrowser {
    async fn navigate(&mut self, url: &str) -> Result<Page> {
        let response = self.next_response(url);
        respond(url, response).await
    }

    async fn submit_form(&mut self, action: &str, fields: &[(String, String)]) -> Result<Page> {
        let response = {
            let mut state = self.state.lock().unwrap();
            state
                .submissions
                .push((action.to_string(), fields.to_vec()));
            state.login_response.clone()
        };
        respond(action, response).await
    }
}

pub fn login_page() -> String {
    r#"<html><body>
        <form action="/signin?returnUrl=%2F" method="post">
          <input type="hidden" name="__RequestVerificationToken" value="tok-123" />
          <input id="Email" name="Email" type="email" />
          <input id="Password" name="Password" type="password" />
          <button id="signInButton" type="submit">Sign In</button>
        </form>
      </body></html>"#
        .to_string()
}

pub struct Row<'a> {
    pub href: Option<&'a str>,
    pub date: &'a str,
    pub course: &'a str,
    pub score: &'a str,
    pub fairway: Option<&'a str>,
    pub gir: Option<&'a str>,
    pub putts: Option<&'a str>,
}

impl<'a> Row<'a> {
    pub fn new(href: &'a str, date: &'a str, course: &'a str) -> Self {
        Self {
            href: Some(href),
            date,
            course,
            score: "82",
            fairway: Some("50%"),
            gir: Some("33%"),
            putts: Some("31"),
        }
    }
}

pub fn rounds_page(rows: &[Row<'_>], next: Option<&str>) -> String {
    let mut body = String::from("<html><body><table class=\"rounds\"><tbody>");
    for row in rows {
        match row.href {
            Some(href) => body.push_str(&format!("<tr data-href=\"{}\">", href)),
            None => body.push_str("<tr data-href=\"\">"),
        }
        body.push_str(&format!("<td class=\"date\"> {} </td>", row.date));
        body.push_str(&format!("<td class=\"course-name\">{}</td>", row.course));
        body.push_str(&format!("<td class=\"score\"><strong>{}</strong></td>", row.score));
        if let Some(f) = row.fairway {
            body.push_str(&format!(
                "<td class=\"fairway\"><span class=\"value\">{}</span></td>",
                f
            ));
        }
        if let Some(g) = row.gir {
            body.push_str(&format!("<td class=\"gir\"><span class=\"value\">{}</span></td>", g));
        }
        if let Some(p) = row.putts {
            body.push_str(&format!("<td class=\"putts\">{}</td>", p));
        }
        body.push_str("</tr>");
    }
    body.push_str("</tbody></table>");
    if let Some(next) = next {
        body.push_str(&format!("<nav><a rel=\"next\" href=\"{}\">Next</a></nav>", next));
    }
    body.push_str("</body></html>");
    body
}

/// Scorecard model for holes 1..=pars.len(), one score kind per hole.
pub fn scorecard_json(pars: &[u32], kinds: &[&str]) -> Value {
    let n = pars.len();
    let holes: Vec<u32> = (1..=n as u32).collect();
    let scores: Vec<Value> = kinds.iter().map(|k| json!({ "kind": k, "strokes": null })).collect();
    json!({
        "model": {
            "detail": {
                "courseName": "Payload Course",
                "formattedStartTime": "Saturday, June 1, 2024"
            },
            "header": { "holes": holes },
            "par": { "values": pars },
            "yardage": { "yardages": vec![400; n] },
            "handicap": { "values": (1..=n as u32).collect::<Vec<_>>() },
            "fairwayHit": { "shots": vec!["Hit"; n] },
            "greensHit": { "shots": vec!["MissedLeft"; n] },
            "putting": { "values": vec![2; n] },
            "club": { "values": vec!["Driver"; n] },
            "penalties": { "values": vec![0; n] },
            "sandShots": { "values": vec![Value::Null; n] },
            "game": { "teams": [ { "players": [ { "scores": scores } ] } ] }
        }
    })
}

pub fn scorecard_page(payload: &Value) -> String {
    format!(
        "<html><body><div id=\"scorecard\"></div><script>{}{}{}'scorecard'));</script></body></html>",
        OPENING_MARKER, payload, CLOSING_MARKER
    )
}

pub fn eighteen_hole_page() -> String {
    let pars = [4, 4, 3, 5, 4, 4, 3, 4, 5, 4, 4, 3, 5, 4, 4, 3, 4, 5];
    let kinds = ["Par"; 18];
    scorecard_page(&scorecard_json(&pars, &kinds))
}
