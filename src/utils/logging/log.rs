//! Standardized log lines for operations and data-quality findings

use std::path::Path;
use std::time::Duration;

use crate::quality::DataQualityReport;

/// Log the start of an operation on a file
///
/// # Arguments
/// * `operation` - Description of the operation
/// * `path` - File being operated on
pub fn log_operation_start(operation: &str, path: &Path) {
    log::info!("{} {}", operation, path.display());
}

/// Log the completion of an operation on a file
///
/// # Arguments
/// * `operation` - Past-tense verb for the operation
/// * `path` - File that was operated on
/// * `items` - Number of records or rows processed
/// * `elapsed` - Optional elapsed time
pub fn log_operation_complete(operation: &str, path: &Path, items: usize, elapsed: Option<Duration>) {
    match elapsed {
        Some(duration) => log::info!(
            "Successfully {} {} items at {} in {:?}",
            operation,
            items,
            path.display(),
            duration
        ),
        None => log::info!("Successfully {} {} items at {}", operation, items, path.display()),
    }
}

/// Log a warning, optionally tied to a file
pub fn log_warning(message: &str, path: Option<&Path>) {
    if let Some(path) = path {
        log::warn!("{}: {}", message, path.display());
    } else {
        log::warn!("{message}");
    }
}

/// Log the findings of a data-quality report
///
/// Recommendations are warnings; a clean report is only logged at debug.
pub fn log_quality_report(report: &DataQualityReport) {
    if report.is_clean() {
        log::debug!(
            "Patient {}: {} encounters, {} medications ({} opioid), {} diagnoses",
            report.patient_id,
            report.record_counts.encounters,
            report.record_counts.medications,
            report.opioid_medications_found(),
            report.record_counts.diagnoses
        );
        return;
    }

    for recommendation in &report.recommendations {
        log::warn!("Patient {}: {}", report.patient_id, recommendation);
    }
    if !report.non_opioid_medications.is_empty() {
        log::debug!(
            "Patient {} non-opioid medication names: {:?}",
            report.patient_id,
            report.non_opioid_medications
        );
    }
}
