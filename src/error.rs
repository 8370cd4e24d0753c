use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::models::HoleRecord;

/// Which of the two scorecard markers could not be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Opening,
    Closing,
}

impl std::fmt::Display for Marker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Marker::Opening => write!(f, "opening"),
            Marker::Closing => write!(f, "closing"),
        }
    }
}

/// Login could not be completed. Fatal for the whole run.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("sign-in form did not appear within {0:?}")]
    LoginFormTimeout(Duration),

    #[error("sign-in page has no `{0}` element")]
    LoginFormMissing(String),

    #[error("no response to the sign-in submission within {0:?}")]
    SubmitTimeout(Duration),

    #[error("credentials were rejected, sign-in form shown again after submit")]
    Rejected,

    #[error("could not load the sign-in flow: {0}")]
    Navigation(#[source] Box<ScraperError>),
}

/// A single listing row could not be turned into a summary.
#[derive(Error, Debug)]
pub enum ListingParseError {
    #[error("row {row} has no navigation attribute")]
    MissingHref { row: usize },

    #[error("row {row} has an unusable navigation attribute `{href}`")]
    InvalidHref { row: usize, href: String },
}

/// The embedded scorecard payload could not be pulled out of a round page.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("round {round}: {marker} scorecard marker not found")]
    MarkerNotFound { round: String, marker: Marker },

    #[error("round {round}: embedded payload is not valid JSON: {source}")]
    InvalidPayload {
        round: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("round {round}: page did not load within {after:?}")]
    Timeout { round: String, after: Duration },
}

/// The payload parsed but its per-hole sequences disagree in length.
#[derive(Error, Debug)]
#[error("round {round}: `{field}` has {actual} entries, expected {expected}")]
pub struct MalformedPayloadError {
    pub round: String,
    pub field: &'static str,
    pub expected: usize,
    pub actual: usize,
}

/// Writing the output artifact failed. The accumulated records ride along
/// so the caller can still do something with them.
#[derive(Error, Debug)]
#[error("failed to write {path}: {source}")]
pub struct ExportError {
    pub path: PathBuf,
    pub fallback: Option<PathBuf>,
    pub records: Vec<HoleRecord>,
    #[source]
    pub source: std::io::Error,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("Request to Golfshot failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Could not parse rounds listing: {0}")]
    Listing(#[from] ListingParseError),

    #[error("Could not extract round payload: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Malformed round payload: {0}")]
    MalformedPayload(#[from] MalformedPayloadError),

    #[error("Export failed: {0}")]
    Export(Box<ExportError>),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Navigation to {url} timed out after {after:?}")]
    Timeout { url: String, after: Duration },

    #[error("The Golfshot session appears to have expired")]
    SessionExpired,

    #[error("Failed to parse HTML: {0}")]
    ParsingError(String),
}

impl From<ExportError> for ScraperError {
    fn from(err: ExportError) -> Self {
        ScraperError::Export(Box::new(err))
    }
}

impl ScraperError {
    /// Transient failures worth another navigation attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            ScraperError::RequestError(_) => true,
            ScraperError::Timeout { .. } => true,
            ScraperError::Extraction(ExtractionError::Timeout { .. }) => true,
            _ => false,
        }
    }

    /// Failures that end the run rather than just the current round.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ScraperError::Auth(_)
                | ScraperError::SessionExpired
                | ScraperError::Export(_)
                | ScraperError::Config(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ScraperError>;
