//! Accumulates hole records for a run and writes them out in one go.

use crate::error::ExportError;
use crate::models::{ExportFormat, HoleRecord, HoleScore, PersistedArtifact};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

/// Output columns, in order.
pub const COLUMNS: [&str; 14] = [
    "Date",
    "Course Name",
    "Hole",
    "Par",
    "Yardage",
    "Handicap",
    "Tee Club",
    "Fairway Hit",
    "Green Status",
    "Putts",
    "Bunker Shots",
    "Penalties",
    "Score",
    "Score Detail",
];

/// Cell text for values that were not recorded or could not be derived.
pub const NOT_AVAILABLE: &str = "N/A";

pub struct ExportSink {
    path: PathBuf,
    format: ExportFormat,
    records: Vec<HoleRecord>,
}

impl ExportSink {
    pub fn new<P: AsRef<Path>>(path: P, format: ExportFormat) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            format,
            records: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&mut self, records: impl IntoIterator<Item = HoleRecord>) {
        self.records.extend(records);
    }

    pub fn records(&self) -> &[HoleRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Writes everything appended so far, replacing the file.
    ///
    /// If the target cannot be written the same content goes to a fallback
    /// file in the temp dir, and the error carries the records either way.
    pub async fn flush(&self) -> Result<PersistedArtifact, ExportError> {
        let body = self.render().map_err(|source| ExportError {
            path: self.path.clone(),
            fallback: None,
            records: self.records.clone(),
            source,
        })?;

        match write_atomic(&self.path, &body).await {
            Ok(()) => {
                info!("Exported {} rows to {}", self.records.len(), self.path.display());
                Ok(PersistedArtifact {
                    path: self.path.clone(),
                    rows: self.records.len(),
                    format: self.format,
                })
            }
            Err(source) => {
                let fallback_path = self.fallback_path();
                let fallback = match write_atomic(&fallback_path, &body).await {
                    Ok(()) => {
                        warn!(
                            "Could not write {} ({}), saved rows to {} instead",
                            self.path.display(),
                            source,
                            fallback_path.display()
                        );
                        Some(fallback_path)
                    }
                    Err(e) => {
                        warn!(
                            "Fallback export to {} failed too: {}",
                            fallback_path.display(),
                            e
                        );
                        None
                    }
                };
                Err(ExportError {
                    path: self.path.clone(),
                    fallback,
                    records: self.records.clone(),
                    source,
                })
            }
        }
    }

    fn fallback_path(&self) -> PathBuf {
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "golfshot_rounds".to_string());
        let ext = match self.format {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        };
        std::env::temp_dir().join(format!("{}.partial.{}", stem, ext))
    }

    fn render(&self) -> std::io::Result<Vec<u8>> {
        match self.format {
            ExportFormat::Csv => {
                let mut out = Vec::new();
                write_row(&mut out, &COLUMNS, ',')?;
                for record in &self.records {
                    write_row(&mut out, &record_cells(record), ',')?;
                }
                Ok(out)
            }
            ExportFormat::Json => Ok(serde_json::to_vec_pretty(&self.records)?),
        }
    }
}

async fn write_atomic(path: &Path, body: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, body).await?;
    fs::rename(&tmp, path).await
}

fn cell<T: Display>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// One output row, in [`COLUMNS`] order.
pub fn record_cells(record: &HoleRecord) -> [String; 14] {
    let score = match record.score {
        HoleScore::Strokes(n) => n.to_string(),
        HoleScore::Unavailable => NOT_AVAILABLE.to_string(),
    };
    [
        cell(&record.date),
        cell(&record.course_name),
        record.hole.to_string(),
        cell(&record.par),
        cell(&record.yardage),
        cell(&record.handicap),
        cell(&record.tee_club),
        cell(&record.fairway_hit),
        cell(&record.green_status),
        cell(&record.putts),
        cell(&record.bunker_shots),
        cell(&record.penalties),
        score,
        cell(&record.score_detail),
    ]
}

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn write_row<W: std::io::Write, S: AsRef<str>>(
    w: &mut W,
    row: &[S],
    sep: char,
) -> std::io::Result<()> {
    for (i, field) in row.iter().enumerate() {
        if i > 0 {
            write!(w, "{}", sep)?;
        }
        let field = field.as_ref();
        if needs_quotes(field, sep) {
            write!(w, "\"{}\"", field.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", field)?;
        }
    }
    writeln!(w)
}
