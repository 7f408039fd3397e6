use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::pricing::{EstimateResult, InputSummary, LineItem};


/// JSON document written when an estimate is exported
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportDocument {
    pub generated_at: String,
    pub subtotal_breakdown: Vec<LineItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub inputs: InputSummary,
}

impl ExportDocument {
    pub fn new(result: &EstimateResult, generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            subtotal_breakdown: result.lines.clone(),
            total: result.total,
            inputs: result.summary.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize estimate")
    }
}

/// Somewhere an export artifact can be saved
pub trait ExportSink {
    /// Store `contents` under `file_name`, returning where it ended up
    fn persist(&self, file_name: &str, contents: &[u8]) -> Result<PathBuf>;
}

/// Saves exports into a directory, replacing any previous file atomically
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

impl ExportSink for DirectorySink {
    fn persist(&self, file_name: &str, contents: &[u8]) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create directory: {}", self.dir.display()))?;

        let target = self.dir.join(file_name);
        debug!("Writing {} bytes to {}", contents.len(), target.display());

        let mut file = NamedTempFile::new_in(&self.dir)
            .with_context(|| format!("Failed to create file in {}", self.dir.display()))?;
        file.write_all(contents)
            .context("Failed to write estimate export")?;
        file.persist(&target)
            .with_context(|| format!("Failed to save {}", target.display()))?;

        info!("Saved estimate to {}", target.display());
        Ok(target)
    }
}
