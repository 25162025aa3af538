//! Tabular flattening of per-patient analyses
//!
//! A nested [`PatientAnalysis`] becomes a list of independent rows. Each row
//! is a copy of the shared patient-level fields plus a `data_type`
//! discriminator and the fields of one fact: a medication, a diagnosis, an
//! encounter or the opioid summary. A patient with no facts still yields one
//! `Demographics` row.
//!
//! Rows serialize to flat objects of scalars. Absent timestamps serialize as
//! `null`; every other field carries its documented default.

pub mod tabular;

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{OpioidRiskError, Result};
use crate::models::bundle::PatientAnalysis;
use crate::models::diagnosis::AnnotatedDiagnosis;
use crate::models::encounter::EncounterRecord;
use crate::models::medication::AnnotatedMedication;
use crate::models::summary::OpioidSummaryCounts;
use crate::utils::coalesce::{CoalesceText, count_or_zero};
use crate::utils::dates::{to_iso, to_iso_opt};

pub use tabular::{TabularRow, to_record_batch};

/// Fields shared by every row of a patient
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaseFields {
    pub patient_id: u64,
    pub age: u32,
    pub gender: String,
    pub race: String,
    pub marital_status: String,
    pub total_encounters: u32,
    pub risk_score: u32,
    pub risk_level: String,
    /// Contributing factor labels joined with ", "
    pub risk_factors: String,
}

impl BaseFields {
    #[must_use]
    pub fn from_analysis(analysis: &PatientAnalysis) -> Self {
        let demo = &analysis.demographics;
        Self {
            patient_id: analysis.patient_id,
            age: demo.age(),
            gender: demo.gender(),
            race: demo.race(),
            marital_status: demo.marital_status(),
            total_encounters: demo.total_encounters(),
            risk_score: analysis.risk.score,
            risk_level: analysis.risk.level.label().to_string(),
            risk_factors: analysis.risk.factor_labels(),
        }
    }
}

/// Fields of a medication row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedicationFields {
    pub medication_id: u64,
    pub encounter_id: u64,
    pub medication_name: String,
    pub strength: String,
    pub frequency: String,
    pub start_date: String,
    pub stop_date: Option<String>,
    pub duration_minutes: u32,
    pub duration_category: String,
    pub days_since_prescribed: u32,
    pub medication_class: String,
    pub potency: String,
    pub potency_level: u8,
    pub daily_mme: f64,
    pub mme_category: String,
    pub mme_risk_level: u8,
    pub high_mme_flag: u8,
    pub moderate_mme_flag: u8,
}

impl From<&AnnotatedMedication> for MedicationFields {
    fn from(med: &AnnotatedMedication) -> Self {
        let order = &med.order;
        let note = &med.annotation;
        Self {
            medication_id: order.medication_id,
            encounter_id: order.encounter_id,
            medication_name: (&order.generic_name).or_unknown(),
            strength: (&order.strength).or_not_available(),
            frequency: (&order.frequency).or_not_available(),
            start_date: to_iso(&order.started_at),
            stop_date: to_iso_opt(order.stopped_at.as_ref()),
            duration_minutes: count_or_zero(order.duration_minutes),
            duration_category: note.duration_category.label().to_string(),
            days_since_prescribed: note.days_since_prescribed,
            medication_class: note.drug_class.clone(),
            potency: note.potency.label().to_string(),
            potency_level: note.potency_level(),
            daily_mme: note.daily_mme,
            mme_category: note.mme_category.label().to_string(),
            mme_risk_level: note.mme_risk_level(),
            high_mme_flag: u8::from(note.is_high_mme()),
            moderate_mme_flag: u8::from(note.is_moderate_mme()),
        }
    }
}

/// Fields of a diagnosis row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosisFields {
    pub diagnosis_id: u64,
    pub encounter_id: u64,
    pub diagnosis_code: String,
    pub diagnosis_description: String,
    pub diagnosis_priority: i32,
    pub diagnosis_type: String,
    pub diagnosis_category: String,
    pub diagnosis_date: Option<String>,
    pub mental_health_dx: u8,
    pub substance_abuse_dx: u8,
}

impl From<&AnnotatedDiagnosis> for DiagnosisFields {
    fn from(diag: &AnnotatedDiagnosis) -> Self {
        let record = &diag.record;
        let note = &diag.annotation;
        Self {
            diagnosis_id: record.diagnosis_id,
            encounter_id: record.encounter_id,
            diagnosis_code: record.code_or_unknown().to_string(),
            diagnosis_description: (&record.description).or_unknown(),
            diagnosis_priority: count_or_zero(record.priority),
            diagnosis_type: (&record.diagnosis_type).or_unknown(),
            diagnosis_category: note.category.display_name().to_string(),
            diagnosis_date: to_iso_opt(record.diagnosed_at.as_ref()),
            mental_health_dx: u8::from(note.mental_health),
            substance_abuse_dx: u8::from(note.substance_abuse),
        }
    }
}

/// Fields of an encounter row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncounterFields {
    pub encounter_id: u64,
    pub admission_date: Option<String>,
    pub discharge_date: Option<String>,
    pub length_of_stay_days: u32,
    pub encounter_type: String,
    /// Same value as `encounter_type`, kept for dashboards keyed on it
    pub patient_type: String,
    pub discharge_disposition: String,
    pub care_setting: String,
    pub payer: String,
}

impl From<&EncounterRecord> for EncounterFields {
    fn from(enc: &EncounterRecord) -> Self {
        let encounter_type = (&enc.encounter_type).or_unknown();
        Self {
            encounter_id: enc.encounter_id,
            admission_date: to_iso_opt(enc.admitted_at.as_ref()),
            discharge_date: to_iso_opt(enc.discharged_at.as_ref()),
            length_of_stay_days: enc.length_of_stay_days(),
            patient_type: encounter_type.clone(),
            encounter_type,
            discharge_disposition: (&enc.discharge_disposition).or_unknown(),
            care_setting: (&enc.care_setting).or_unknown(),
            payer: (&enc.payer).or_unknown(),
        }
    }
}

/// Fields of the opioid summary row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryFields {
    pub total_prescriptions: u32,
    pub unique_opioid_types: u32,
    pub rx_last_30_days: u32,
    pub rx_last_90_days: u32,
}

impl From<&OpioidSummaryCounts> for SummaryFields {
    fn from(summary: &OpioidSummaryCounts) -> Self {
        Self {
            total_prescriptions: summary.total_prescriptions,
            unique_opioid_types: summary.unique_opioid_types,
            rx_last_30_days: summary.rx_last_30_days,
            rx_last_90_days: summary.rx_last_90_days,
        }
    }
}

/// Type-specific part of a row, tagged by `data_type`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "data_type")]
pub enum RowDetail {
    Medication(MedicationFields),
    Diagnosis(DiagnosisFields),
    Encounter(EncounterFields),
    Summary(SummaryFields),
    Demographics,
}

/// Discriminator of a flattened row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKind {
    Medication,
    Diagnosis,
    Encounter,
    Summary,
    Demographics,
}

impl RowKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Medication => "Medication",
            Self::Diagnosis => "Diagnosis",
            Self::Encounter => "Encounter",
            Self::Summary => "Summary",
            Self::Demographics => "Demographics",
        }
    }
}

impl fmt::Display for RowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl RowDetail {
    #[must_use]
    pub const fn kind(&self) -> RowKind {
        match self {
            Self::Medication(_) => RowKind::Medication,
            Self::Diagnosis(_) => RowKind::Diagnosis,
            Self::Encounter(_) => RowKind::Encounter,
            Self::Summary(_) => RowKind::Summary,
            Self::Demographics => RowKind::Demographics,
        }
    }
}

/// One analytics-ready row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlattenedRow {
    #[serde(flatten)]
    pub base: BaseFields,
    #[serde(flatten)]
    pub detail: RowDetail,
}

impl FlattenedRow {
    #[must_use]
    pub const fn data_type(&self) -> RowKind {
        self.detail.kind()
    }

    /// The row as a flat field-name to scalar mapping
    pub fn to_map(&self) -> Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(OpioidRiskError::validation(format!(
                "row for patient {} serialized to a non-object value: {other}",
                self.base.patient_id
            ))),
        }
    }
}

/// Flatten one patient into rows
///
/// Order: medications, diagnoses, encounters, then one summary row when the
/// opioid summary reports at least one prescription. An otherwise empty
/// result becomes a single `Demographics` row.
#[must_use]
pub fn flatten(analysis: &PatientAnalysis) -> Vec<FlattenedRow> {
    let base = BaseFields::from_analysis(analysis);
    let row = |detail: RowDetail| FlattenedRow {
        base: base.clone(),
        detail,
    };

    let summary = analysis
        .opioid_summary
        .as_ref()
        .filter(|summary| summary.total_prescriptions > 0);

    let mut rows: Vec<FlattenedRow> = analysis
        .medications
        .iter()
        .map(|med| row(RowDetail::Medication(med.into())))
        .chain(
            analysis
                .diagnoses
                .iter()
                .map(|diag| row(RowDetail::Diagnosis(diag.into()))),
        )
        .chain(
            analysis
                .encounters
                .iter()
                .map(|enc| row(RowDetail::Encounter(enc.into()))),
        )
        .chain(summary.map(|summary| row(RowDetail::Summary(summary.into()))))
        .collect();

    if rows.is_empty() {
        log::debug!(
            "Patient {} has no detail rows, emitting demographics row",
            analysis.patient_id
        );
        rows.push(row(RowDetail::Demographics));
    }

    rows
}
