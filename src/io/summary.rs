//! Read/write summary JSON files.
//!
//! A summary file is the portable record of a `season fit` run:
//! - the fitted coefficients per group
//! - the recovered seasonal summaries and BIC evidence
//! - the simulation truth, when the data were simulated
//!
//! The schema is defined by `domain::SummaryFile`.

use std::fs::File;
use std::path::Path;

use tracing::info;

use crate::domain::SummaryFile;
use crate::error::AppError;

/// Write a summary JSON file.
pub fn write_summary_json(path: &Path, summary: &SummaryFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create summary JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, summary)
        .map_err(|e| AppError::new(2, format!("Failed to write summary JSON: {e}")))?;

    info!(path = %path.display(), fits = summary.fits.len(), "wrote summary JSON");
    Ok(())
}

/// Read a summary JSON file.
pub fn read_summary_json(path: &Path) -> Result<SummaryFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open summary JSON '{}': {e}", path.display())))?;
    let summary: SummaryFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid summary JSON: {e}")))?;

    if summary.fits.len() != summary.summaries.len() || summary.fits.len() != summary.evidence.len() {
        return Err(AppError::new(
            2,
            "Invalid summary JSON: fits, summaries and evidence differ in length.",
        ));
    }
    Ok(summary)
}
