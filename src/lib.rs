//! Opioid exposure analytics: daily morphine milligram equivalents, rule-based
//! drug and diagnosis classification, additive risk scoring and flattening of
//! per-patient results into analytics-ready rows.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod flatten;
pub mod models;
pub mod quality;
pub mod utils;

// Core types
pub use config::AnalyticsConfig;
pub use error::{OpioidRiskError, Result};
pub use models::{PatientAnalysis, PatientRecords, RiskAssessment, RiskLevel};

// Pipeline
pub use algorithm::{
    analyze, classify_diagnosis, classify_medication, compute_daily_mme, process_cohort,
    process_cohort_with_progress, process_patient, score_risk,
};
pub use flatten::{FlattenedRow, RowKind, TabularRow, flatten, to_record_batch};
pub use quality::{DataQualityReport, assess_quality};

// Arrow types
pub use arrow::record_batch::RecordBatch;
