//! Domain models for opioid exposure analytics
//!
//! Input records arrive from the data-access layer with their source NULLs
//! intact (`Option` fields). Derived annotations, summaries and the risk
//! assessment are built once and never mutated afterwards.

pub mod bundle;
pub mod diagnosis;
pub mod encounter;
pub mod medication;
pub mod patient;
pub mod risk;
pub mod summary;

// Re-export commonly used types
pub use bundle::{PatientAnalysis, PatientRecords};
pub use diagnosis::{AnnotatedDiagnosis, DiagnosisAnnotation, DiagnosisCategory, DiagnosisRecord};
pub use encounter::EncounterRecord;
pub use medication::{
    AnnotatedMedication, DurationCategory, MedicationAnnotation, MedicationOrder, MmeCategory,
    PotencyTier,
};
pub use patient::PatientDemographics;
pub use risk::{RiskAssessment, RiskFactor, RiskLevel};
pub use summary::{DiagnosisSummaryCounts, EncounterSummaryCounts, OpioidSummaryCounts};
