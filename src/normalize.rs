//! Turns a scorecard's parallel per-hole arrays into one [`HoleRecord`] per hole.

use crate::error::MalformedPayloadError;
use crate::models::{HoleRecord, HoleScore, RoundPayload, RoundSummary};
use serde_json::Value;

/// Fewest holes a played round can have.
pub const MIN_ROUND_HOLES: usize = 9;

/// Score relative to par, as the site labels it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreKind {
    Eagle,
    Birdie,
    Par,
    Bogey,
    DoubleBogey,
    TripleBogey,
    /// Anything outside the fixed vocabulary, kept verbatim.
    Other(String),
}

impl ScoreKind {
    /// Every known kind, best to worst.
    pub const KNOWN: [ScoreKind; 6] = [
        ScoreKind::Eagle,
        ScoreKind::Birdie,
        ScoreKind::Par,
        ScoreKind::Bogey,
        ScoreKind::DoubleBogey,
        ScoreKind::TripleBogey,
    ];

    pub fn from_descriptor(descriptor: &str) -> Self {
        match descriptor.trim() {
            "Eagle" => ScoreKind::Eagle,
            "Birdie" => ScoreKind::Birdie,
            "Par" => ScoreKind::Par,
            "Bogey" | "Bogie" => ScoreKind::Bogey,
            "DoubleBogey" | "DoubleBogie" => ScoreKind::DoubleBogey,
            "TripleBogey" | "TripleBogie" => ScoreKind::TripleBogey,
            other => ScoreKind::Other(other.to_string()),
        }
    }

    /// Strokes relative to par, `None` for unrecognized kinds.
    pub fn offset(&self) -> Option<i32> {
        match self {
            ScoreKind::Eagle => Some(-2),
            ScoreKind::Birdie => Some(-1),
            ScoreKind::Par => Some(0),
            ScoreKind::Bogey => Some(1),
            ScoreKind::DoubleBogey => Some(2),
            ScoreKind::TripleBogey => Some(3),
            ScoreKind::Other(_) => None,
        }
    }

    pub fn score_for(&self, par: Option<u32>) -> HoleScore {
        match (par, self.offset()) {
            (Some(par), Some(offset)) => HoleScore::Strokes(par as i32 + offset),
            _ => HoleScore::Unavailable,
        }
    }
}

impl std::fmt::Display for ScoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreKind::Eagle => write!(f, "Eagle"),
            ScoreKind::Birdie => write!(f, "Birdie"),
            ScoreKind::Par => write!(f, "Par"),
            ScoreKind::Bogey => write!(f, "Bogey"),
            ScoreKind::DoubleBogey => write!(f, "DoubleBogey"),
            ScoreKind::TripleBogey => write!(f, "TripleBogey"),
            ScoreKind::Other(s) => write!(f, "{}", s),
        }
    }
}

/// Flattens `payload` into hole records, taking date and course name from the payload itself.
pub fn normalize(
    payload: &RoundPayload,
    round_id: &str,
) -> Result<Vec<HoleRecord>, MalformedPayloadError> {
    let detail = &payload.model.detail;
    normalize_with(
        payload,
        round_id,
        detail.formatted_start_time.clone(),
        detail.course_name.clone(),
    )
}

/// Like [`normalize`], but prefers the listing row's date and course name.
pub fn normalize_round(
    payload: &RoundPayload,
    summary: &RoundSummary,
) -> Result<Vec<HoleRecord>, MalformedPayloadError> {
    let detail = &payload.model.detail;
    let date = summary
        .date
        .clone()
        .or_else(|| detail.formatted_start_time.clone());
    let course_name = summary
        .course_name
        .clone()
        .or_else(|| detail.course_name.clone());
    normalize_with(payload, &summary.round_id, date, course_name)
}

fn normalize_with(
    payload: &RoundPayload,
    round_id: &str,
    date: Option<String>,
    course_name: Option<String>,
) -> Result<Vec<HoleRecord>, MalformedPayloadError> {
    let model = &payload.model;
    let holes = &model.header.holes;
    let expected = holes.len();

    if expected == 0 {
        return Err(MalformedPayloadError {
            round: round_id.to_string(),
            field: "header.holes",
            expected: MIN_ROUND_HOLES,
            actual: 0,
        });
    }

    let lengths = [
        ("par.values", model.par.values.len()),
        ("yardage.yardages", model.yardage.yardages.len()),
        ("handicap.values", model.handicap.values.len()),
        ("fairwayHit.shots", model.fairway_hit.shots.len()),
        ("greensHit.shots", model.greens_hit.shots.len()),
        ("putting.values", model.putting.values.len()),
        ("club.values", model.club.values.len()),
        ("penalties.values", model.penalties.values.len()),
        ("sandShots.values", model.sand_shots.values.len()),
    ];
    if let Some((field, actual)) = lengths.into_iter().find(|(_, len)| *len != expected) {
        return Err(MalformedPayloadError {
            round: round_id.to_string(),
            field,
            expected,
            actual,
        });
    }

    // Nested per-player scores may run short; those holes just lack a score.
    let scores = model.owner_scores();

    let records = holes
        .iter()
        .enumerate()
        .map(|(i, &hole)| {
            let par = model.par.values[i];
            let score_detail = scores.get(i).and_then(|s| s.kind.clone());
            let score = score_detail
                .as_deref()
                .map(|kind| ScoreKind::from_descriptor(kind).score_for(par))
                .unwrap_or(HoleScore::Unavailable);

            HoleRecord {
                date: date.clone(),
                course_name: course_name.clone(),
                hole,
                par,
                yardage: model.yardage.yardages[i],
                handicap: model.handicap.values[i],
                tee_club: cell_text(&model.club.values[i]),
                fairway_hit: cell_text(&model.fairway_hit.shots[i]),
                green_status: cell_text(&model.greens_hit.shots[i]),
                putts: model.putting.values[i],
                bunker_shots: model.sand_shots.values[i],
                penalties: model.penalties.values[i],
                score,
                score_detail,
            }
        })
        .collect();

    Ok(records)
}

/// Text form of a loosely typed cell; null and blank strings become `None`.
fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}
