//! Clinical analytics algorithms
//!
//! This module contains the dose-equivalence calculation, the rule-based
//! medication and diagnosis classifiers, the risk scorer, summary derivation
//! and the per-patient analysis pipeline that ties them together.

pub mod analysis;
pub mod classify;
pub mod mme;
pub mod risk;
pub mod summary;

pub use analysis::{
    analyze, annotate_medication, process_cohort, process_cohort_with_progress, process_patient,
};
pub use classify::diagnosis::{annotate_diagnosis, classify_diagnosis};
pub use classify::medication::{MedicationClass, classify_medication};
pub use mme::{compute_daily_mme, conversion_factor, daily_mme, is_opioid};
pub use risk::score_risk;
