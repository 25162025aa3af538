//! Progress reporting for cohort runs, using indicatif

use indicatif::{ProgressBar, ProgressStyle};

/// Style of the cohort progress bar
pub const COHORT_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} patients ({per_sec}) {msg}";

/// Create a progress bar over `length` patients
///
/// Falls back to the default bar style if the template is rejected.
#[must_use]
pub fn create_cohort_progress_bar(length: u64, description: Option<&str>) -> ProgressBar {
    let pb = ProgressBar::new(length);
    let style = ProgressStyle::default_bar()
        .template(COHORT_TEMPLATE)
        .unwrap_or_else(|e| {
            log::debug!("Invalid progress template, using default style: {e}");
            ProgressStyle::default_bar()
        })
        .progress_chars("#>-");
    pb.set_style(style);

    if let Some(desc) = description {
        pb.set_message(desc.to_string());
    }

    pb
}

/// Finish a progress bar with an optional completion message
pub fn finish_progress_bar(pb: &ProgressBar, message: Option<&str>) {
    match message {
        Some(msg) => pb.finish_with_message(msg.to_string()),
        None => pb.finish(),
    }
}
