//! Diagnosis classification by ICD code prefix

use crate::config::DiagnosisRule;
use crate::models::diagnosis::{DiagnosisAnnotation, DiagnosisCategory, DiagnosisRecord};

/// Prefix of ICD-10 chapter V, mental and behavioural disorders
const MENTAL_HEALTH_PREFIX: &str = "F";

/// Prefix of the substance-related block F10-F19
const SUBSTANCE_ABUSE_PREFIX: &str = "F1";

fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Categorize a diagnosis code using the ordered prefix rules
///
/// Codes matching no rule, including the `"Unknown"` placeholder, are `Other`.
#[must_use]
pub fn classify_diagnosis(code: &str, rules: &[DiagnosisRule]) -> DiagnosisCategory {
    let clean_code = normalize_code(code);
    if clean_code.is_empty() {
        return DiagnosisCategory::Other;
    }

    rules
        .iter()
        .find(|rule| clean_code.starts_with(&rule.prefix.to_uppercase()))
        .map_or(DiagnosisCategory::Other, |rule| rule.category)
}

/// Whether the code is a mental-health code
#[must_use]
pub fn is_mental_health_code(code: &str) -> bool {
    normalize_code(code).starts_with(MENTAL_HEALTH_PREFIX)
}

/// Whether the code is a substance-related code
#[must_use]
pub fn is_substance_abuse_code(code: &str) -> bool {
    normalize_code(code).starts_with(SUBSTANCE_ABUSE_PREFIX)
}

/// Classify a diagnosis record and compute its flags
#[must_use]
pub fn annotate_diagnosis(record: &DiagnosisRecord, rules: &[DiagnosisRule]) -> DiagnosisAnnotation {
    let Some(code) = record.code.as_deref() else {
        return DiagnosisAnnotation {
            category: DiagnosisCategory::Other,
            mental_health: false,
            substance_abuse: false,
        };
    };

    DiagnosisAnnotation {
        category: classify_diagnosis(code, rules),
        mental_health: is_mental_health_code(code),
        substance_abuse: is_substance_abuse_code(code),
    }
}
