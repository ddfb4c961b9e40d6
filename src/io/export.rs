//! Export observations to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts, and it is the same schema `io::ingest` reads back.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::domain::Observation;
use crate::error::AppError;

pub const OBSERVATION_HEADER: &str = "date,day_of_year,year_index,region,count";

/// Write observations to a CSV file.
pub fn write_observations_csv(path: &Path, observations: &[Observation]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut file = BufWriter::new(file);

    writeln!(file, "{OBSERVATION_HEADER}")
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for o in observations {
        writeln!(
            file,
            "{},{},{:.10},{},{}",
            o.date, o.day_of_year, o.year_index, o.region, o.count
        )
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    file.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;

    info!(path = %path.display(), rows = observations.len(), "wrote observations CSV");
    Ok(())
}
