//! Diagnosis records and their classification
//!
//! Diagnoses carry ICD-10 style codes. The category assigned to a code comes
//! from the ordered prefix rules of the analytics policy; the mental-health
//! and substance-abuse flags are fixed chapter tests.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::utils::coalesce::UNKNOWN;

/// Representation of a recorded diagnosis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisRecord {
    pub diagnosis_id: u64,
    pub encounter_id: u64,
    /// ICD-10 diagnosis code
    pub code: Option<String>,
    pub description: Option<String>,
    pub priority: Option<i32>,
    /// Source label such as "Final" or "Admitting"
    pub diagnosis_type: Option<String>,
    /// Admission date of the owning encounter
    pub diagnosed_at: Option<NaiveDateTime>,
}

impl DiagnosisRecord {
    /// Create a diagnosis with only the identifying fields set
    #[must_use]
    pub fn new(diagnosis_id: u64, encounter_id: u64, code: Option<&str>) -> Self {
        Self {
            diagnosis_id,
            encounter_id,
            code: code.map(str::to_string),
            description: None,
            priority: None,
            diagnosis_type: None,
            diagnosed_at: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    #[must_use]
    pub fn with_type(mut self, diagnosis_type: &str) -> Self {
        self.diagnosis_type = Some(diagnosis_type.to_string());
        self
    }

    #[must_use]
    pub fn with_diagnosed_at(mut self, diagnosed_at: NaiveDateTime) -> Self {
        self.diagnosed_at = Some(diagnosed_at);
        self
    }

    /// The code, or `"Unknown"` when absent
    #[must_use]
    pub fn code_or_unknown(&self) -> &str {
        self.code.as_deref().unwrap_or(UNKNOWN)
    }

    /// Check if this diagnosis matches a specific code or pattern
    ///
    /// A trailing `*` makes the pattern a prefix match.
    #[must_use]
    pub fn matches_code(&self, pattern: &str) -> bool {
        let Some(code) = self.code.as_deref() else {
            return false;
        };
        let code = code.trim().to_uppercase();
        let pattern = pattern.trim().to_uppercase();
        match pattern.strip_suffix('*') {
            Some(prefix) => code.starts_with(prefix),
            None => code == pattern,
        }
    }
}

/// Diagnosis categories relevant to opioid risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosisCategory {
    #[serde(rename = "Opioid Use")]
    OpioidUse,
    #[serde(rename = "Opioid Poisoning")]
    OpioidPoisoning,
    #[serde(rename = "Substance Use")]
    SubstanceUse,
    Pain,
    Other,
}

impl DiagnosisCategory {
    /// Get the display name for this category
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::OpioidUse => "Opioid Use",
            Self::OpioidPoisoning => "Opioid Poisoning",
            Self::SubstanceUse => "Substance Use",
            Self::Pain => "Pain",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for DiagnosisCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Values derived for one diagnosis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiagnosisAnnotation {
    pub category: DiagnosisCategory,
    /// Code in ICD-10 chapter V (`F` prefix)
    pub mental_health: bool,
    /// Code in the `F1` substance-related block
    pub substance_abuse: bool,
}

/// A diagnosis together with its annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotatedDiagnosis {
    pub record: DiagnosisRecord,
    pub annotation: DiagnosisAnnotation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_code() {
        let diagnosis = DiagnosisRecord::new(1, 10, Some("F11.20"));
        assert!(diagnosis.matches_code("F11*"));
        assert!(diagnosis.matches_code("f1*"));
        assert!(diagnosis.matches_code("F11.20"));
        assert!(!diagnosis.matches_code("F11"));
        assert!(!diagnosis.matches_code("T40*"));
    }

    #[test]
    fn test_absent_code() {
        let diagnosis = DiagnosisRecord::new(1, 10, None);
        assert_eq!(diagnosis.code_or_unknown(), "Unknown");
        assert!(!diagnosis.matches_code("*"));
    }
}
