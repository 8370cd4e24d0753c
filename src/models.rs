use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::path::PathBuf;

/// One row of the rounds overview page.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundSummary {
    /// Identifier of the round, the last path segment of its detail URL.
    pub round_id: String,
    /// Round date as the site prints it (e.g. "Jun 14, 2024").
    pub date: Option<String>,
    /// Name of the course played.
    pub course_name: Option<String>,
    /// Final score for the round.
    pub score: Option<String>,
    /// Fairway-hit percentage, as displayed.
    pub fairway_pct: Option<String>,
    /// Greens-in-regulation percentage, as displayed.
    pub gir_pct: Option<String>,
    /// Total putts.
    pub putts: Option<String>,
    /// Absolute URL of the round's detail page.
    pub url: String,
}

/// The scorecard object embedded in a round detail page.
#[derive(Debug, Deserialize, Clone)]
pub struct RoundPayload {
    pub model: ScorecardModel,
}

/// Per-hole data, stored by the site as parallel arrays indexed by hole position.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ScorecardModel {
    #[serde(default)]
    pub detail: RoundDetail,
    #[serde(default)]
    pub header: HoleHeader,
    #[serde(default)]
    pub par: Values<Option<u32>>,
    #[serde(default)]
    pub yardage: Yardages,
    #[serde(default)]
    pub handicap: Values<Option<u32>>,
    #[serde(default)]
    pub fairway_hit: Shots,
    #[serde(default)]
    pub greens_hit: Shots,
    #[serde(default)]
    pub putting: Values<Option<u32>>,
    #[serde(default)]
    pub club: Values<Value>,
    #[serde(default)]
    pub penalties: Values<Option<u32>>,
    #[serde(default)]
    pub sand_shots: Values<Option<u32>>,
    #[serde(default)]
    pub game: Game,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RoundDetail {
    pub course_name: Option<String>,
    pub formatted_start_time: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct HoleHeader {
    #[serde(default)]
    pub holes: Vec<u32>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Values<T> {
    #[serde(default = "Vec::new")]
    pub values: Vec<T>,
}

impl<T> Default for Values<T> {
    fn default() -> Self {
        Self { values: Vec::new() }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Yardages {
    #[serde(default)]
    pub yardages: Vec<Option<u32>>,
}

/// Fairway and green outcomes. The site encodes them as strings, but numbers
/// and nulls show up on older rounds.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Shots {
    #[serde(default)]
    pub shots: Vec<Value>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Game {
    #[serde(default)]
    pub teams: Vec<Team>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Team {
    #[serde(default)]
    pub players: Vec<Player>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Player {
    #[serde(default)]
    pub scores: Vec<PlayerScore>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct PlayerScore {
    /// Symbolic score relative to par, e.g. "Birdie".
    pub kind: Option<String>,
}

impl ScorecardModel {
    /// Score descriptors of the first player on the first team, i.e. the profile owner.
    pub fn owner_scores(&self) -> &[PlayerScore] {
        self.game
            .teams
            .first()
            .and_then(|team| team.players.first())
            .map(|player| player.scores.as_slice())
            .unwrap_or(&[])
    }
}

/// Numeric score for one hole, derived from par and the score descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoleScore {
    Strokes(i32),
    Unavailable,
}

impl HoleScore {
    pub fn strokes(&self) -> Option<i32> {
        match self {
            HoleScore::Strokes(n) => Some(*n),
            HoleScore::Unavailable => None,
        }
    }
}

impl Serialize for HoleScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.strokes().serialize(serializer)
    }
}

/// One hole of one round, flattened from a scorecard payload.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct HoleRecord {
    #[serde(rename = "Date")]
    pub date: Option<String>,
    #[serde(rename = "Course Name")]
    pub course_name: Option<String>,
    #[serde(rename = "Hole")]
    pub hole: u32,
    #[serde(rename = "Par")]
    pub par: Option<u32>,
    #[serde(rename = "Yardage")]
    pub yardage: Option<u32>,
    #[serde(rename = "Handicap")]
    pub handicap: Option<u32>,
    #[serde(rename = "Tee Club")]
    pub tee_club: Option<String>,
    #[serde(rename = "Fairway Hit")]
    pub fairway_hit: Option<String>,
    #[serde(rename = "Green Status")]
    pub green_status: Option<String>,
    #[serde(rename = "Putts")]
    pub putts: Option<u32>,
    /// `None` means no value was recorded, which is not the same as zero.
    #[serde(rename = "Bunker Shots")]
    pub bunker_shots: Option<u32>,
    #[serde(rename = "Penalties")]
    pub penalties: Option<u32>,
    #[serde(rename = "Score")]
    pub score: HoleScore,
    /// The descriptor exactly as the site sent it.
    #[serde(rename = "Score Detail")]
    pub score_detail: Option<String>,
}

/// Output formats supported by the export sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

/// The file produced by a successful flush.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedArtifact {
    pub path: PathBuf,
    pub rows: usize,
    pub format: ExportFormat,
}

/// Configuration for simulating human browsing behavior via randomized delays.
#[derive(Debug, Clone)]
pub struct DelayConfig {
    /// Minimum sleep duration in milliseconds between requests.
    pub min_delay_ms: u64,
    /// Maximum sleep duration in milliseconds between requests.
    pub max_delay_ms: u64,
    /// Whether the randomized delay logic is active.
    pub enabled: bool,
}

impl Default for DelayConfig {
    /// Default configuration: 1000ms - 3000ms, enabled.
    fn default() -> Self {
        Self {
            min_delay_ms: 1000,
            max_delay_ms: 3000,
            enabled: true,
        }
    }
}

impl DelayConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }
}
