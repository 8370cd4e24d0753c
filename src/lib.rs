// Declare all our modules
pub mod browser;
pub mod cache;
pub mod config;
mod error;
pub mod export;
mod models;
pub mod normalize;
pub mod parsers;
pub mod pipeline;
pub mod session;

// Publicly export the parts of our library that users will need
pub use browser::{Browser, HttpBrowser, Page};
pub use cache::{CacheBackend, FileCache};
pub use config::{Credentials, ErrorPolicy, ScraperConfig};
pub use error::*;
pub use export::ExportSink;
pub use models::*; // RoundSummary, RoundPayload, HoleRecord, ...
pub use normalize::{ScoreKind, normalize, normalize_round};
pub use pipeline::{Pipeline, RunReport, SkippedRound};
pub use session::{Session, authenticate};
