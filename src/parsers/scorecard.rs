//! Pulls the scorecard payload out of a round detail page.
//!
//! The page hydrates a client-side component with a JSON literal passed
//! inline to `React.createElement`. Everything between the two markers
//! below is that literal.

use crate::error::{ExtractionError, Marker};
use crate::models::RoundPayload;

pub const OPENING_MARKER: &str =
    "ReactDOM.hydrate(React.createElement(Golfshot.Applications.Scorecard, ";
pub const CLOSING_MARKER: &str = "), document.getElementById(";

/// Returns the raw JSON text between the markers.
///
/// Both markers are checked before anything is parsed, so a truncated page
/// reports a missing marker rather than a JSON error.
pub fn locate_payload<'a>(html: &'a str, round: &str) -> Result<&'a str, ExtractionError> {
    let start = html
        .find(OPENING_MARKER)
        .map(|i| i + OPENING_MARKER.len())
        .ok_or_else(|| ExtractionError::MarkerNotFound {
            round: round.to_string(),
            marker: Marker::Opening,
        })?;

    let len = html[start..]
        .find(CLOSING_MARKER)
        .ok_or_else(|| ExtractionError::MarkerNotFound {
            round: round.to_string(),
            marker: Marker::Closing,
        })?;

    Ok(html[start..start + len].trim())
}

pub fn parse_payload(json: &str, round: &str) -> Result<RoundPayload, ExtractionError> {
    serde_json::from_str(json).map_err(|source| ExtractionError::InvalidPayload {
        round: round.to_string(),
        source,
    })
}

pub fn extract_payload(html: &str, round: &str) -> Result<RoundPayload, ExtractionError> {
    let json = locate_payload(html, round)?;
    parse_payload(json, round)
}
