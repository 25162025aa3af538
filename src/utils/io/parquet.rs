//! Parquet output of flattened rows
//!
//! Rows are widened to the shared tabular layout and written as a single
//! Arrow record batch.

use std::fs::File;
use std::path::Path;
use std::time::Instant;

use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::error::{OpioidRiskError, Result};
use crate::flatten::{FlattenedRow, to_record_batch};
use crate::utils::logging::{log_operation_complete, log_operation_start, log_warning};

/// Write rows to a Parquet file
///
/// # Errors
/// Returns an error if the rows cannot be converted to Arrow or the file
/// cannot be written
pub fn write_parquet(path: &Path, rows: &[FlattenedRow]) -> Result<()> {
    let start = Instant::now();
    log_operation_start("Writing parquet rows to", path);
    if rows.is_empty() {
        log_warning("Writing a parquet file without rows", Some(path));
    }

    let batch = to_record_batch(rows)?;
    let file = File::create(path).map_err(|e| OpioidRiskError::io_at(e, path))?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();

    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;

    log_operation_complete("wrote", path, rows.len(), Some(start.elapsed()));
    Ok(())
}

/// Read a Parquet file back into record batches
///
/// # Errors
/// Returns an error if the file cannot be opened or is not valid Parquet
pub fn read_parquet(path: &Path) -> Result<Vec<RecordBatch>> {
    let start = Instant::now();
    log_operation_start("Reading parquet file", path);

    let file = File::open(path).map_err(|e| OpioidRiskError::io_at(e, path))?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;
    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;

    log_operation_complete("read", path, batches.len(), Some(start.elapsed()));
    Ok(batches)
}
