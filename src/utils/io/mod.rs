//! File input and output
//!
//! Reading of patient bundles and the scoring policy, and writing of
//! flattened analytics rows as JSON or Parquet.

pub mod parquet;

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;
use std::time::Instant;

use itertools::Itertools;

use crate::error::{OpioidRiskError, Result};
use crate::flatten::FlattenedRow;
use crate::models::bundle::PatientRecords;
use crate::utils::logging::{log_operation_complete, log_operation_start};

pub use self::parquet::{read_parquet, write_parquet};

/// Read a whole text file, naming its purpose when it is missing
///
/// # Arguments
/// * `path` - File to read
/// * `purpose` - What the file is needed for, used in the error message
pub fn read_to_string(path: &Path, purpose: &str) -> Result<String> {
    if !path.is_file() {
        return Err(OpioidRiskError::io_at(
            std::io::Error::new(ErrorKind::NotFound, format!("no {purpose} file")),
            path,
        ));
    }
    fs::read_to_string(path).map_err(|e| OpioidRiskError::io_at(e, path))
}

/// Read a JSON array of patient bundles
///
/// Each patient may appear in only one bundle; a repeated `patient_id` is a
/// validation error.
pub fn read_patient_records(path: &Path) -> Result<Vec<PatientRecords>> {
    let start = Instant::now();
    log_operation_start("Reading patient bundles from", path);

    let file = File::open(path).map_err(|e| OpioidRiskError::io_at(e, path))?;
    let records: Vec<PatientRecords> = serde_json::from_reader(BufReader::new(file))?;

    let duplicates: Vec<u64> = records
        .iter()
        .map(|bundle| bundle.patient_id)
        .duplicates()
        .collect();
    if !duplicates.is_empty() {
        return Err(OpioidRiskError::validation(format!(
            "patient ids appear in more than one bundle in {}: {}",
            path.display(),
            duplicates.iter().join(", ")
        )));
    }

    log_operation_complete("read", path, records.len(), Some(start.elapsed()));
    Ok(records)
}

/// Write rows as a JSON array of flat objects
pub fn write_json(path: &Path, rows: &[FlattenedRow]) -> Result<()> {
    let start = Instant::now();
    log_operation_start("Writing JSON rows to", path);

    let file = File::create(path).map_err(|e| OpioidRiskError::io_at(e, path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, rows)?;
    writer.flush().map_err(|e| OpioidRiskError::io_at(e, path))?;

    log_operation_complete("wrote", path, rows.len(), Some(start.elapsed()));
    Ok(())
}
