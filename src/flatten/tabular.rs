//! Wide columnar form of flattened rows
//!
//! Analytics tools want one schema for the whole extract, so every row is
//! widened to the union of all columns. Columns that do not apply to a row's
//! `data_type` are null.

use arrow::datatypes::FieldRef;
use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};
use serde_arrow::schema::{SchemaLike, TracingOptions};

use crate::error::Result;
use crate::flatten::{FlattenedRow, RowDetail};

/// One row with every column of every row type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabularRow {
    pub patient_id: u64,
    pub age: u32,
    pub gender: String,
    pub race: String,
    pub marital_status: String,
    pub total_encounters: u32,
    pub risk_score: u32,
    pub risk_level: String,
    pub risk_factors: String,
    pub data_type: String,

    pub encounter_id: Option<u64>,

    pub medication_id: Option<u64>,
    pub medication_name: Option<String>,
    pub strength: Option<String>,
    pub frequency: Option<String>,
    pub start_date: Option<String>,
    pub stop_date: Option<String>,
    pub duration_minutes: Option<u32>,
    pub duration_category: Option<String>,
    pub days_since_prescribed: Option<u32>,
    pub medication_class: Option<String>,
    pub potency: Option<String>,
    pub potency_level: Option<u8>,
    pub daily_mme: Option<f64>,
    pub mme_category: Option<String>,
    pub mme_risk_level: Option<u8>,
    pub high_mme_flag: Option<u8>,
    pub moderate_mme_flag: Option<u8>,

    pub diagnosis_id: Option<u64>,
    pub diagnosis_code: Option<String>,
    pub diagnosis_description: Option<String>,
    pub diagnosis_priority: Option<i32>,
    pub diagnosis_type: Option<String>,
    pub diagnosis_category: Option<String>,
    pub diagnosis_date: Option<String>,
    pub mental_health_dx: Option<u8>,
    pub substance_abuse_dx: Option<u8>,

    pub admission_date: Option<String>,
    pub discharge_date: Option<String>,
    pub length_of_stay_days: Option<u32>,
    pub encounter_type: Option<String>,
    pub patient_type: Option<String>,
    pub discharge_disposition: Option<String>,
    pub care_setting: Option<String>,
    pub payer: Option<String>,

    pub total_prescriptions: Option<u32>,
    pub unique_opioid_types: Option<u32>,
    pub rx_last_30_days: Option<u32>,
    pub rx_last_90_days: Option<u32>,
}

impl From<&FlattenedRow> for TabularRow {
    fn from(row: &FlattenedRow) -> Self {
        let base = &row.base;
        let wide = Self {
            patient_id: base.patient_id,
            age: base.age,
            gender: base.gender.clone(),
            race: base.race.clone(),
            marital_status: base.marital_status.clone(),
            total_encounters: base.total_encounters,
            risk_score: base.risk_score,
            risk_level: base.risk_level.clone(),
            risk_factors: base.risk_factors.clone(),
            data_type: row.data_type().as_str().to_string(),
            ..Self::default()
        };

        match &row.detail {
            RowDetail::Medication(med) => Self {
                encounter_id: Some(med.encounter_id),
                medication_id: Some(med.medication_id),
                medication_name: Some(med.medication_name.clone()),
                strength: Some(med.strength.clone()),
                frequency: Some(med.frequency.clone()),
                start_date: Some(med.start_date.clone()),
                stop_date: med.stop_date.clone(),
                duration_minutes: Some(med.duration_minutes),
                duration_category: Some(med.duration_category.clone()),
                days_since_prescribed: Some(med.days_since_prescribed),
                medication_class: Some(med.medication_class.clone()),
                potency: Some(med.potency.clone()),
                potency_level: Some(med.potency_level),
                daily_mme: Some(med.daily_mme),
                mme_category: Some(med.mme_category.clone()),
                mme_risk_level: Some(med.mme_risk_level),
                high_mme_flag: Some(med.high_mme_flag),
                moderate_mme_flag: Some(med.moderate_mme_flag),
                ..wide
            },
            RowDetail::Diagnosis(diag) => Self {
                encounter_id: Some(diag.encounter_id),
                diagnosis_id: Some(diag.diagnosis_id),
                diagnosis_code: Some(diag.diagnosis_code.clone()),
                diagnosis_description: Some(diag.diagnosis_description.clone()),
                diagnosis_priority: Some(diag.diagnosis_priority),
                diagnosis_type: Some(diag.diagnosis_type.clone()),
                diagnosis_category: Some(diag.diagnosis_category.clone()),
                diagnosis_date: diag.diagnosis_date.clone(),
                mental_health_dx: Some(diag.mental_health_dx),
                substance_abuse_dx: Some(diag.substance_abuse_dx),
                ..wide
            },
            RowDetail::Encounter(enc) => Self {
                encounter_id: Some(enc.encounter_id),
                admission_date: enc.admission_date.clone(),
                discharge_date: enc.discharge_date.clone(),
                length_of_stay_days: Some(enc.length_of_stay_days),
                encounter_type: Some(enc.encounter_type.clone()),
                patient_type: Some(enc.patient_type.clone()),
                discharge_disposition: Some(enc.discharge_disposition.clone()),
                care_setting: Some(enc.care_setting.clone()),
                payer: Some(enc.payer.clone()),
                ..wide
            },
            RowDetail::Summary(summary) => Self {
                total_prescriptions: Some(summary.total_prescriptions),
                unique_opioid_types: Some(summary.unique_opioid_types),
                rx_last_30_days: Some(summary.rx_last_30_days),
                rx_last_90_days: Some(summary.rx_last_90_days),
                ..wide
            },
            RowDetail::Demographics => wide,
        }
    }
}

/// Arrow fields of the wide row layout
pub fn tabular_fields() -> Result<Vec<FieldRef>> {
    Ok(Vec::<FieldRef>::from_type::<TabularRow>(
        TracingOptions::default(),
    )?)
}

/// Convert flattened rows into a single Arrow `RecordBatch`
pub fn to_record_batch(rows: &[FlattenedRow]) -> Result<RecordBatch> {
    let fields = tabular_fields()?;
    let wide: Vec<TabularRow> = rows.iter().map(TabularRow::from).collect();
    Ok(serde_arrow::to_record_batch(&fields, &wide)?)
}
