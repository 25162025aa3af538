//! Per-patient aggregate counts
//!
//! Each count deserializes `null` or a missing key as zero, matching the
//! `COALESCE(..., 0)` of the source aggregates.

use serde::{Deserialize, Serialize};

use crate::utils::coalesce::null_as_default;

/// Encounter aggregates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EncounterSummaryCounts {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_encounters: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ed_visits: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub inpatient_stays: u32,
    /// Average length of stay in days
    #[serde(default, deserialize_with = "null_as_default")]
    pub avg_length_of_stay: f64,
}

/// Opioid prescription aggregates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpioidSummaryCounts {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_prescriptions: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub unique_opioid_types: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rx_last_30_days: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rx_last_90_days: u32,
}

/// Diagnosis aggregates; the three category counts may overlap
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisSummaryCounts {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_diagnoses: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub opioid_dx: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub substance_dx: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pain_dx: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_summary_deserializes_with_zeroes() {
        let summary: OpioidSummaryCounts =
            serde_json::from_str(r#"{"total_prescriptions": 12, "rx_last_30_days": null}"#).unwrap();
        assert_eq!(summary.total_prescriptions, 12);
        assert_eq!(summary.rx_last_30_days, 0);
        assert_eq!(summary.rx_last_90_days, 0);
    }

    #[test]
    fn test_encounter_summary_defaults() {
        let summary: EncounterSummaryCounts = serde_json::from_str("{}").unwrap();
        assert_eq!(summary, EncounterSummaryCounts::default());
    }
}
