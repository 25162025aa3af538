use chrono::{NaiveDate, NaiveDateTime};
use opioid_risk::flatten::{FlattenedRow, RowDetail, RowKind, flatten};
use opioid_risk::models::{
    DiagnosisRecord, EncounterRecord, MedicationOrder, OpioidSummaryCounts, PatientDemographics,
    PatientRecords,
};
use opioid_risk::{AnalyticsConfig, analyze, to_record_batch};

const BASE_KEYS: [&str; 10] = [
    "patient_id",
    "age",
    "gender",
    "race",
    "marital_status",
    "total_encounters",
    "risk_score",
    "risk_level",
    "risk_factors",
    "data_type",
];

fn at(m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, m, d)
        .unwrap()
        .and_hms_opt(9, 15, 0)
        .unwrap()
}

fn full_bundle() -> PatientRecords {
    PatientRecords::new(42)
        .with_demographics(
            PatientDemographics::unknown(42)
                .with_age(57)
                .with_gender("F")
                .with_total_encounters(2),
        )
        .with_medications(vec![
            MedicationOrder::new(1, 100, Some("OXYCODONE"), at(6, 1))
                .with_strength("10-325MG")
                .with_frequency("Q6H")
                .with_duration_minutes(4320),
            MedicationOrder::new(2, 100, None, at(6, 2)),
        ])
        .with_diagnoses(vec![
            DiagnosisRecord::new(7, 100, Some("F11.20")).with_description("Opioid dependence"),
        ])
        .with_encounters(vec![
            EncounterRecord::new(100)
                .with_stay(at(6, 1), Some(at(6, 4)))
                .with_type("Inpatient"),
        ])
}

fn rows_for(records: &PatientRecords) -> Vec<FlattenedRow> {
    flatten(&analyze(records, &AnalyticsConfig::default(), &at(6, 20)))
}

#[test]
fn test_row_order_and_summary_row() {
    let rows = rows_for(&full_bundle());
    let kinds: Vec<RowKind> = rows.iter().map(FlattenedRow::data_type).collect();
    assert_eq!(
        kinds,
        vec![
            RowKind::Medication,
            RowKind::Medication,
            RowKind::Diagnosis,
            RowKind::Encounter,
            RowKind::Summary,
        ]
    );

    let RowDetail::Summary(summary) = &rows[4].detail else {
        panic!("last row should be the summary");
    };
    assert_eq!(summary.total_prescriptions, 1);
}

#[test]
fn test_every_row_has_complete_base() {
    let bundles = [full_bundle(), PatientRecords::new(9)];
    for records in &bundles {
        let rows = rows_for(records);
        assert!(!rows.is_empty());
        for row in rows {
            let map = row.to_map().unwrap();
            for key in BASE_KEYS {
                assert!(map.contains_key(key), "missing {key}");
                assert!(!map[key].is_null(), "null {key}");
            }
            assert!(map.values().all(|v| !v.is_object() && !v.is_array()));
        }
    }
}

#[test]
fn test_empty_patient_yields_demographics_row() {
    let rows = rows_for(&PatientRecords::new(9));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].data_type(), RowKind::Demographics);

    let map = rows[0].to_map().unwrap();
    assert_eq!(map["data_type"], "Demographics");
    assert_eq!(map["age"], 0);
    assert_eq!(map["gender"], "Unknown");
    assert_eq!(map["risk_level"], "LOW");
    assert_eq!(map["risk_factors"], "");
}

#[test]
fn test_zero_prescription_summary_is_not_emitted() {
    let records = PatientRecords::new(3)
        .with_encounters(vec![EncounterRecord::new(1)])
        .with_opioid_summary(OpioidSummaryCounts::default());
    let rows = rows_for(&records);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].data_type(), RowKind::Encounter);
}

#[test]
fn test_medication_row_fields() {
    let rows = rows_for(&full_bundle());
    let map = rows[0].to_map().unwrap();
    assert_eq!(map["medication_name"], "OXYCODONE");
    assert_eq!(map["daily_mme"], 60.0);
    assert_eq!(map["mme_category"], "High (50-89)");
    assert_eq!(map["mme_risk_level"], 3);
    assert_eq!(map["high_mme_flag"], 0);
    assert_eq!(map["moderate_mme_flag"], 1);
    assert_eq!(map["duration_category"], "Medium (1-7 days)");
    assert_eq!(map["days_since_prescribed"], 19);
    assert_eq!(map["start_date"], "2024-06-01T09:15:00");
    assert!(map["stop_date"].is_null());

    let blank = rows[1].to_map().unwrap();
    assert_eq!(blank["medication_name"], "Unknown");
    assert_eq!(blank["strength"], "N/A");
    assert_eq!(blank["frequency"], "N/A");
    assert_eq!(blank["medication_class"], "Other Opioid");
    assert_eq!(blank["daily_mme"], 0.0);
    assert_eq!(blank["duration_minutes"], 0);
}

#[test]
fn test_diagnosis_and_encounter_rows() {
    let rows = rows_for(&full_bundle());
    let diag = rows[2].to_map().unwrap();
    assert_eq!(diag["diagnosis_category"], "Opioid Use");
    assert_eq!(diag["mental_health_dx"], 1);
    assert_eq!(diag["substance_abuse_dx"], 1);
    assert_eq!(diag["diagnosis_type"], "Unknown");
    assert_eq!(diag["diagnosis_priority"], 0);

    let enc = rows[3].to_map().unwrap();
    assert_eq!(enc["length_of_stay_days"], 3);
    assert_eq!(enc["encounter_type"], "Inpatient");
    assert_eq!(enc["patient_type"], "Inpatient");
    assert_eq!(enc["payer"], "Unknown");
}

#[test]
fn test_base_fields_shared_by_all_rows() {
    let rows = rows_for(&full_bundle());
    let first = &rows[0].base;
    assert!(rows.iter().all(|row| &row.base == first));
    // F11 counts as both opioid (30) and substance (15); one prescription earns nothing
    assert_eq!(first.risk_score, 45);
    assert_eq!(first.risk_level, "HIGH");
    assert_eq!(first.risk_factors, "Opioid Use Disorder, Substance Use History");
}

#[test]
fn test_record_batch_has_one_row_per_flattened_row() {
    let rows = rows_for(&full_bundle());
    let batch = to_record_batch(&rows).unwrap();
    assert_eq!(batch.num_rows(), rows.len());

    let schema = batch.schema();
    for key in BASE_KEYS {
        assert!(schema.field_with_name(key).is_ok(), "missing column {key}");
    }
    assert!(schema.field_with_name("daily_mme").unwrap().is_nullable());
}
