//! Shared helpers: NULL coalescing, timestamps, file IO and logging

pub mod coalesce;
pub mod dates;
pub mod io;
pub mod logging;

pub use coalesce::{CoalesceText, NOT_AVAILABLE, UNKNOWN, count_or_zero};
pub use dates::{ISO_FORMAT, days_between, days_elapsed, to_iso, to_iso_opt};
pub use io::{read_parquet, read_patient_records, read_to_string, write_json, write_parquet};
