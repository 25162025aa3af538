//! Data-quality report for one patient's input bundle
//!
//! Surfaces why a patient's analytics output might look thin: sample records
//! with missing fields, medication names that do not match any opioid, and
//! entirely empty record groups.

use itertools::Itertools;
use serde::Serialize;

use crate::algorithm::mme::is_opioid;
use crate::config::AnalyticsConfig;
use crate::models::bundle::PatientRecords;
use crate::models::diagnosis::DiagnosisRecord;
use crate::models::encounter::EncounterRecord;
use crate::models::medication::MedicationOrder;

/// Number of distinct medication names listed in the report
pub const MEDICATION_NAME_LIMIT: usize = 20;

/// Number of non-opioid names listed in the report
pub const NON_OPIOID_NAME_LIMIT: usize = 10;

/// Record counts per group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecordCounts {
    pub encounters: usize,
    pub medications: usize,
    pub diagnoses: usize,
}

/// Findings for one patient
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DataQualityReport {
    pub patient_id: u64,
    /// Absent fields of the first encounter, `None` when there are no encounters
    pub encounter_null_fields: Option<Vec<&'static str>>,
    pub medication_null_fields: Option<Vec<&'static str>>,
    pub diagnosis_null_fields: Option<Vec<&'static str>>,
    /// Distinct medication names in input order
    pub medication_names: Vec<String>,
    pub opioid_medications: Vec<String>,
    pub non_opioid_medications: Vec<String>,
    pub record_counts: RecordCounts,
    pub recommendations: Vec<String>,
}

impl DataQualityReport {
    #[must_use]
    pub fn opioid_medications_found(&self) -> usize {
        self.opioid_medications.len()
    }

    /// True when nothing needs attention
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.recommendations.is_empty()
    }
}

fn absent<'a>(fields: &[(&'a str, bool)]) -> Vec<&'a str> {
    fields
        .iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| *name)
        .collect()
}

fn encounter_null_fields(enc: &EncounterRecord) -> Vec<&'static str> {
    absent(&[
        ("admitted_at", enc.admitted_at.is_some()),
        ("discharged_at", enc.discharged_at.is_some()),
        ("encounter_type", enc.encounter_type.is_some()),
        ("discharge_disposition", enc.discharge_disposition.is_some()),
        ("care_setting", enc.care_setting.is_some()),
        ("payer", enc.payer.is_some()),
    ])
}

fn medication_null_fields(order: &MedicationOrder) -> Vec<&'static str> {
    absent(&[
        ("generic_name", order.generic_name.is_some()),
        ("strength", order.strength.is_some()),
        ("frequency", order.frequency.is_some()),
        ("stopped_at", order.stopped_at.is_some()),
        ("duration_minutes", order.duration_minutes.is_some()),
        ("stored_mme", order.stored_mme.is_some()),
    ])
}

fn diagnosis_null_fields(record: &DiagnosisRecord) -> Vec<&'static str> {
    absent(&[
        ("code", record.code.is_some()),
        ("description", record.description.is_some()),
        ("priority", record.priority.is_some()),
        ("diagnosis_type", record.diagnosis_type.is_some()),
        ("diagnosed_at", record.diagnosed_at.is_some()),
    ])
}

/// Assess the input bundle of one patient
#[must_use]
pub fn assess_quality(records: &PatientRecords, config: &AnalyticsConfig) -> DataQualityReport {
    let mut recommendations = Vec::new();

    if records.encounters.is_empty() {
        recommendations.push("No encounters found for this patient".to_string());
    }
    if records.medications.is_empty() {
        recommendations.push("No medications found for this patient".to_string());
    }
    if records.diagnoses.is_empty() {
        recommendations.push("No diagnoses found for this patient".to_string());
    }

    let medication_names: Vec<String> = records
        .medications
        .iter()
        .filter_map(|order| order.generic_name.as_deref())
        .filter(|name| !name.is_empty())
        .unique()
        .take(MEDICATION_NAME_LIMIT)
        .map(str::to_string)
        .collect();

    let (opioid_medications, non_opioid): (Vec<String>, Vec<String>) = medication_names
        .iter()
        .cloned()
        .partition(|name| is_opioid(Some(name.as_str()), &config.conversion_factors));

    if opioid_medications.is_empty() {
        recommendations.push(
            "No opioid medications found - medication names may not match the conversion table"
                .to_string(),
        );
    }

    DataQualityReport {
        patient_id: records.patient_id,
        encounter_null_fields: records.encounters.first().map(encounter_null_fields),
        medication_null_fields: records.medications.first().map(medication_null_fields),
        diagnosis_null_fields: records.diagnoses.first().map(diagnosis_null_fields),
        medication_names,
        opioid_medications,
        non_opioid_medications: non_opioid.into_iter().take(NON_OPIOID_NAME_LIMIT).collect(),
        record_counts: RecordCounts {
            encounters: records.encounters.len(),
            medications: records.medications.len(),
            diagnoses: records.diagnoses.len(),
        },
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn start() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_empty_bundle_recommendations() {
        let report = assess_quality(&PatientRecords::new(1), &AnalyticsConfig::default());
        assert_eq!(report.recommendations.len(), 4);
        assert_eq!(report.encounter_null_fields, None);
        assert_eq!(report.record_counts, RecordCounts::default());
        assert!(!report.is_clean());
    }

    #[test]
    fn test_medication_name_matching() {
        let meds = vec![
            MedicationOrder::new(1, 1, Some("Oxycodone"), start()).with_strength("5MG"),
            MedicationOrder::new(2, 1, Some("Ibuprofen"), start()),
            MedicationOrder::new(3, 1, Some("Oxycodone"), start()),
            MedicationOrder::new(4, 1, None, start()),
        ];
        let records = PatientRecords::new(1)
            .with_medications(meds)
            .with_encounters(vec![EncounterRecord::new(1).with_type("Inpatient")])
            .with_diagnoses(vec![DiagnosisRecord::new(1, 1, Some("F11.20"))]);
        let report = assess_quality(&records, &AnalyticsConfig::default());

        assert_eq!(report.medication_names, vec!["Oxycodone", "Ibuprofen"]);
        assert_eq!(report.opioid_medications, vec!["Oxycodone"]);
        assert_eq!(report.non_opioid_medications, vec!["Ibuprofen"]);
        assert_eq!(report.opioid_medications_found(), 1);
        assert!(report.is_clean());

        let med_nulls = report.medication_null_fields.unwrap();
        assert!(med_nulls.contains(&"frequency"));
        assert!(!med_nulls.contains(&"strength"));
        let enc_nulls = report.encounter_null_fields.unwrap();
        assert!(enc_nulls.contains(&"payer"));
        assert!(!enc_nulls.contains(&"encounter_type"));
    }
}
