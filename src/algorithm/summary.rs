//! Summary derivation from detail records
//!
//! Used when the data-access layer hands over detail records without the
//! aggregate rows. The counts follow the source aggregates: distinct record
//! ids, overlapping diagnosis prefix families and windowed prescription counts.

use chrono::{NaiveDateTime, TimeDelta};
use rustc_hash::FxHashSet;

use crate::algorithm::mme::is_opioid;
use crate::config::AnalyticsConfig;
use crate::models::diagnosis::DiagnosisRecord;
use crate::models::encounter::EncounterRecord;
use crate::models::medication::MedicationOrder;
use crate::models::summary::{DiagnosisSummaryCounts, EncounterSummaryCounts, OpioidSummaryCounts};

const OPIOID_DX_PATTERNS: &[&str] = &["F11*", "T40*"];
const SUBSTANCE_DX_PATTERNS: &[&str] = &["F1*"];
const PAIN_DX_PATTERNS: &[&str] = &["M*", "G89*"];

/// Start of a look-back window; a window reaching past the calendar covers everything
fn window_start(as_of: &NaiveDateTime, days: i64) -> NaiveDateTime {
    TimeDelta::try_days(days)
        .and_then(|window| as_of.checked_sub_signed(window))
        .unwrap_or_else(|| {
            log::debug!("Window of {days} days before {as_of} is out of range, counting all orders");
            NaiveDateTime::MIN
        })
}

fn count_u32(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Aggregate the opioid orders of a patient
///
/// Orders whose drug name has no conversion factor are not opioids and are
/// ignored.
#[must_use]
pub fn summarize_opioids(
    medications: &[MedicationOrder],
    as_of: &NaiveDateTime,
    config: &AnalyticsConfig,
) -> OpioidSummaryCounts {
    let opioids: Vec<&MedicationOrder> = medications
        .iter()
        .filter(|order| is_opioid(order.generic_name.as_deref(), &config.conversion_factors))
        .collect();

    let order_ids: FxHashSet<u64> = opioids.iter().map(|order| order.medication_id).collect();
    let drug_names: FxHashSet<String> = opioids
        .iter()
        .filter_map(|order| order.generic_name.as_deref())
        .map(str::to_uppercase)
        .collect();

    let short_cutoff = window_start(as_of, config.recent_windows.short_days);
    let long_cutoff = window_start(as_of, config.recent_windows.long_days);

    OpioidSummaryCounts {
        total_prescriptions: count_u32(order_ids.len()),
        unique_opioid_types: count_u32(drug_names.len()),
        rx_last_30_days: count_u32(opioids.iter().filter(|o| o.started_at >= short_cutoff).count()),
        rx_last_90_days: count_u32(opioids.iter().filter(|o| o.started_at >= long_cutoff).count()),
    }
}

fn matches_any(record: &DiagnosisRecord, patterns: &[&str]) -> bool {
    patterns.iter().any(|pattern| record.matches_code(pattern))
}

/// Aggregate the diagnoses of a patient
#[must_use]
pub fn summarize_diagnoses(diagnoses: &[DiagnosisRecord]) -> DiagnosisSummaryCounts {
    let ids: FxHashSet<u64> = diagnoses.iter().map(|d| d.diagnosis_id).collect();
    let count = |patterns: &[&str]| count_u32(diagnoses.iter().filter(|d| matches_any(d, patterns)).count());

    DiagnosisSummaryCounts {
        total_diagnoses: count_u32(ids.len()),
        opioid_dx: count(OPIOID_DX_PATTERNS),
        substance_dx: count(SUBSTANCE_DX_PATTERNS),
        pain_dx: count(PAIN_DX_PATTERNS),
    }
}

/// Aggregate the encounters of a patient
#[must_use]
pub fn summarize_encounters(encounters: &[EncounterRecord]) -> EncounterSummaryCounts {
    let ids: FxHashSet<u64> = encounters.iter().map(|e| e.encounter_id).collect();
    let stays: Vec<u32> = encounters
        .iter()
        .filter_map(EncounterRecord::recorded_stay_days)
        .collect();

    let avg_length_of_stay = if stays.is_empty() {
        0.0
    } else {
        stays.iter().map(|&days| f64::from(days)).sum::<f64>() / stays.len() as f64
    };

    EncounterSummaryCounts {
        total_encounters: count_u32(ids.len()),
        ed_visits: count_u32(encounters.iter().filter(|e| e.type_contains("emergency")).count()),
        inpatient_stays: count_u32(encounters.iter().filter(|e| e.type_contains("inpatient")).count()),
        avg_length_of_stay,
    }
}
