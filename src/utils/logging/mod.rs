//! Logging and progress reporting
//!
//! Consistent operation logs for file IO and a progress bar for cohort runs.

pub mod log;
pub mod progress;

pub use self::log::{log_operation_complete, log_operation_start, log_quality_report, log_warning};
pub use progress::{create_cohort_progress_bar, finish_progress_bar};
