//! Per-patient analysis pipeline
//!
//! Annotates every medication and diagnosis, scores the patient from the
//! aggregate records, and hands the nested result to the flattener. Patients
//! are independent, so a cohort is processed in parallel.

use chrono::NaiveDateTime;
use indicatif::{ParallelProgressIterator, ProgressBar};
use rayon::prelude::*;

use crate::algorithm::classify::diagnosis::annotate_diagnosis;
use crate::algorithm::classify::medication::classify_medication;
use crate::algorithm::mme::daily_mme;
use crate::algorithm::risk::score_risk;
use crate::config::AnalyticsConfig;
use crate::flatten::{FlattenedRow, flatten};
use crate::models::bundle::{PatientAnalysis, PatientRecords};
use crate::models::diagnosis::AnnotatedDiagnosis;
use crate::models::medication::{
    AnnotatedMedication, DurationCategory, MedicationAnnotation, MedicationOrder, MmeCategory,
};
use crate::models::patient::PatientDemographics;
use crate::utils::coalesce::count_or_zero;
use crate::utils::dates::days_elapsed;

/// Derive the annotation of one medication order
#[must_use]
pub fn annotate_medication(
    order: &MedicationOrder,
    config: &AnalyticsConfig,
    as_of: &NaiveDateTime,
) -> MedicationAnnotation {
    let daily_mme = daily_mme(order, &config.conversion_factors);
    let class = classify_medication(order.generic_name.as_deref(), &config.medication_rules);

    MedicationAnnotation {
        daily_mme,
        mme_category: MmeCategory::from_daily_mme(daily_mme, &config.mme_thresholds),
        drug_class: class.drug_class,
        potency: class.potency,
        duration_category: DurationCategory::from_minutes(
            count_or_zero(order.duration_minutes),
            &config.duration_thresholds,
        ),
        days_since_prescribed: days_elapsed(&order.started_at, as_of),
    }
}

/// Build the nested analysis for one patient
///
/// `as_of` is the reference time for days-since-prescribed and the recent
/// prescription windows.
#[must_use]
pub fn analyze(records: &PatientRecords, config: &AnalyticsConfig, as_of: &NaiveDateTime) -> PatientAnalysis {
    let records = if config.derive_missing_summaries {
        records.clone().with_derived_summaries(as_of, config)
    } else {
        records.clone()
    };

    let demographics = records.demographics.unwrap_or_else(|| {
        log::debug!("No demographics for patient {}, using defaults", records.patient_id);
        PatientDemographics::unknown(records.patient_id)
    });

    let medications: Vec<AnnotatedMedication> = records
        .medications
        .into_iter()
        .map(|order| {
            let annotation = annotate_medication(&order, config, as_of);
            AnnotatedMedication { order, annotation }
        })
        .collect();

    let diagnoses: Vec<AnnotatedDiagnosis> = records
        .diagnoses
        .into_iter()
        .map(|record| {
            let annotation = annotate_diagnosis(&record, &config.diagnosis_rules);
            AnnotatedDiagnosis { record, annotation }
        })
        .collect();

    let diagnosis_summary = records.diagnosis_summary.unwrap_or_default();
    let encounter_summary = records.encounter_summary.unwrap_or_default();
    let risk = score_risk(
        &records.opioid_summary.unwrap_or_default(),
        &diagnosis_summary,
        &encounter_summary,
        &config.risk,
    );

    log::debug!(
        "Patient {}: {} medications, {} diagnoses, {} encounters, risk {} ({})",
        records.patient_id,
        medications.len(),
        diagnoses.len(),
        records.encounters.len(),
        risk.score,
        risk.level
    );

    PatientAnalysis {
        patient_id: records.patient_id,
        demographics,
        medications,
        diagnoses,
        encounters: records.encounters,
        opioid_summary: records.opioid_summary,
        diagnosis_summary,
        encounter_summary,
        risk,
    }
}

/// Analyze and flatten one patient
#[must_use]
pub fn process_patient(
    records: &PatientRecords,
    config: &AnalyticsConfig,
    as_of: &NaiveDateTime,
) -> Vec<FlattenedRow> {
    flatten(&analyze(records, config, as_of))
}

/// Analyze and flatten a cohort in parallel
///
/// Rows of each patient keep their flattening order, and patients keep
/// their input order.
#[must_use]
pub fn process_cohort(
    cohort: &[PatientRecords],
    config: &AnalyticsConfig,
    as_of: &NaiveDateTime,
) -> Vec<FlattenedRow> {
    cohort
        .par_iter()
        .map(|records| process_patient(records, config, as_of))
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect()
}

/// Same as [`process_cohort`], advancing `progress` once per patient
#[must_use]
pub fn process_cohort_with_progress(
    cohort: &[PatientRecords],
    config: &AnalyticsConfig,
    as_of: &NaiveDateTime,
    progress: &ProgressBar,
) -> Vec<FlattenedRow> {
    cohort
        .par_iter()
        .progress_with(progress.clone())
        .map(|records| process_patient(records, config, as_of))
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::medication::PotencyTier;
    use chrono::NaiveDate;

    fn at(m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, m, d)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_annotate_oxycodone_order() {
        let order = MedicationOrder::new(1, 10, Some("OXYCODONE"), at(6, 1))
            .with_strength("10-325MG")
            .with_frequency("Q6H")
            .with_duration_minutes(4320);
        let annotation = annotate_medication(&order, &AnalyticsConfig::default(), &at(6, 11));

        assert_eq!(annotation.daily_mme, 60.0);
        assert_eq!(annotation.mme_category, MmeCategory::High);
        assert_eq!(annotation.mme_risk_level(), 3);
        assert_eq!(annotation.drug_class, "Oxycodone");
        assert_eq!(annotation.potency, PotencyTier::High);
        assert_eq!(annotation.duration_category, DurationCategory::Medium);
        assert_eq!(annotation.days_since_prescribed, 10);
        assert!(annotation.is_moderate_mme());
        assert!(!annotation.is_high_mme());
    }

    #[test]
    fn test_future_start_date_is_zero_days() {
        let order = MedicationOrder::new(1, 10, Some("MORPHINE"), at(7, 1));
        let annotation = annotate_medication(&order, &AnalyticsConfig::default(), &at(6, 1));
        assert_eq!(annotation.days_since_prescribed, 0);
        assert_eq!(annotation.duration_category, DurationCategory::Short);
    }

    #[test]
    fn test_analyze_without_derivation_keeps_summaries_absent() {
        let records = PatientRecords::new(3).with_medications(vec![
            MedicationOrder::new(1, 10, Some("OXYCODONE"), at(6, 1)),
        ]);
        let config = AnalyticsConfig::default().with_derived_summaries(false);
        let analysis = analyze(&records, &config, &at(6, 2));

        assert_eq!(analysis.opioid_summary, None);
        assert_eq!(analysis.risk.score, 0);
        assert_eq!(analysis.demographics, PatientDemographics::unknown(3));
        assert_eq!(analysis.medications.len(), 1);
    }

    #[test]
    fn test_analyze_with_derivation_scores_from_details() {
        let meds = (1..=10)
            .map(|id| MedicationOrder::new(id, 10, Some("Hydrocodone"), at(6, 1)))
            .collect();
        let records = PatientRecords::new(4).with_medications(meds);
        let analysis = analyze(&records, &AnalyticsConfig::default(), &at(6, 5));

        let summary = analysis.opioid_summary.unwrap();
        assert_eq!(summary.total_prescriptions, 10);
        assert_eq!(summary.rx_last_30_days, 10);
        // high count (20) + recent (15)
        assert_eq!(analysis.risk.score, 35);
    }

    #[test]
    fn test_cohort_progress_counts_patients() {
        let cohort: Vec<PatientRecords> = (1..=3).map(PatientRecords::new).collect();
        let progress = ProgressBar::hidden();
        let rows = process_cohort_with_progress(&cohort, &AnalyticsConfig::default(), &at(6, 1), &progress);

        assert_eq!(progress.position(), 3);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].base.patient_id, 3);
    }
}
