//! Per-patient input bundle and analysis result

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::algorithm::summary::{summarize_diagnoses, summarize_encounters, summarize_opioids};
use crate::config::AnalyticsConfig;
use crate::models::diagnosis::{AnnotatedDiagnosis, DiagnosisRecord};
use crate::models::encounter::EncounterRecord;
use crate::models::medication::{AnnotatedMedication, MedicationOrder};
use crate::models::patient::PatientDemographics;
use crate::models::risk::RiskAssessment;
use crate::models::summary::{DiagnosisSummaryCounts, EncounterSummaryCounts, OpioidSummaryCounts};

/// Record collections handed over by the data-access layer for one patient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecords {
    pub patient_id: u64,
    #[serde(default)]
    pub demographics: Option<PatientDemographics>,
    #[serde(default)]
    pub medications: Vec<MedicationOrder>,
    #[serde(default)]
    pub diagnoses: Vec<DiagnosisRecord>,
    #[serde(default)]
    pub encounters: Vec<EncounterRecord>,
    #[serde(default)]
    pub opioid_summary: Option<OpioidSummaryCounts>,
    #[serde(default)]
    pub diagnosis_summary: Option<DiagnosisSummaryCounts>,
    #[serde(default)]
    pub encounter_summary: Option<EncounterSummaryCounts>,
}

impl PatientRecords {
    /// An empty bundle for a patient
    #[must_use]
    pub fn new(patient_id: u64) -> Self {
        Self {
            patient_id,
            demographics: None,
            medications: Vec::new(),
            diagnoses: Vec::new(),
            encounters: Vec::new(),
            opioid_summary: None,
            diagnosis_summary: None,
            encounter_summary: None,
        }
    }

    #[must_use]
    pub fn with_demographics(mut self, demographics: PatientDemographics) -> Self {
        self.demographics = Some(demographics);
        self
    }

    #[must_use]
    pub fn with_medications(mut self, medications: Vec<MedicationOrder>) -> Self {
        self.medications = medications;
        self
    }

    #[must_use]
    pub fn with_diagnoses(mut self, diagnoses: Vec<DiagnosisRecord>) -> Self {
        self.diagnoses = diagnoses;
        self
    }

    #[must_use]
    pub fn with_encounters(mut self, encounters: Vec<EncounterRecord>) -> Self {
        self.encounters = encounters;
        self
    }

    #[must_use]
    pub fn with_opioid_summary(mut self, summary: OpioidSummaryCounts) -> Self {
        self.opioid_summary = Some(summary);
        self
    }

    #[must_use]
    pub fn with_diagnosis_summary(mut self, summary: DiagnosisSummaryCounts) -> Self {
        self.diagnosis_summary = Some(summary);
        self
    }

    #[must_use]
    pub fn with_encounter_summary(mut self, summary: EncounterSummaryCounts) -> Self {
        self.encounter_summary = Some(summary);
        self
    }

    /// Fill each absent summary from the detail records
    ///
    /// Supplied summaries are kept as they are.
    #[must_use]
    pub fn with_derived_summaries(mut self, as_of: &NaiveDateTime, config: &AnalyticsConfig) -> Self {
        if self.opioid_summary.is_none() {
            self.opioid_summary = Some(summarize_opioids(&self.medications, as_of, config));
        }
        if self.diagnosis_summary.is_none() {
            self.diagnosis_summary = Some(summarize_diagnoses(&self.diagnoses));
        }
        if self.encounter_summary.is_none() {
            self.encounter_summary = Some(summarize_encounters(&self.encounters));
        }
        self
    }
}

/// Nested per-patient result consumed by the flattener
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientAnalysis {
    pub patient_id: u64,
    pub demographics: PatientDemographics,
    pub medications: Vec<AnnotatedMedication>,
    pub diagnoses: Vec<AnnotatedDiagnosis>,
    pub encounters: Vec<EncounterRecord>,
    /// Absent when the source had no opioid aggregate for the patient
    pub opioid_summary: Option<OpioidSummaryCounts>,
    pub diagnosis_summary: DiagnosisSummaryCounts,
    pub encounter_summary: EncounterSummaryCounts,
    pub risk: RiskAssessment,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn as_of() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_minimal_json_bundle() {
        let records: PatientRecords = serde_json::from_str(r#"{"patient_id": 5}"#).unwrap();
        assert_eq!(records, PatientRecords::new(5));
    }

    #[test]
    fn test_derived_summaries_keep_supplied_values() {
        let supplied = OpioidSummaryCounts {
            total_prescriptions: 9,
            ..OpioidSummaryCounts::default()
        };
        let records = PatientRecords::new(5)
            .with_opioid_summary(supplied)
            .with_encounters(vec![EncounterRecord::new(1).with_type("Emergency")])
            .with_derived_summaries(&as_of(), &AnalyticsConfig::default());

        assert_eq!(records.opioid_summary, Some(supplied));
        let encounters = records.encounter_summary.unwrap();
        assert_eq!(encounters.total_encounters, 1);
        assert_eq!(encounters.ed_visits, 1);
        assert_eq!(records.diagnosis_summary, Some(DiagnosisSummaryCounts::default()));
    }
}
