//! Morphine milligram equivalent (MME) calculation
//!
//! Daily MME = dose (mg) × conversion factor × doses per day, rounded to two
//! decimals. A positive MME already stored by the clinical system takes
//! precedence over the estimate.

pub mod dose;
pub mod frequency;

use crate::config::ConversionFactor;
use crate::models::medication::MedicationOrder;

pub use dose::normalize_dose;
pub use frequency::{DEFAULT_DOSES_PER_DAY, doses_per_day};

/// Look up the MME conversion factor for a generic drug name
///
/// The first table key contained in the upper-cased name wins, so
/// combination products such as "Hydrocodone-Acetaminophen" still match.
/// Unknown or absent names yield 0.0.
#[must_use]
pub fn conversion_factor(generic_name: Option<&str>, factors: &[ConversionFactor]) -> f64 {
    find_factor(generic_name, factors).map_or(0.0, |entry| entry.factor)
}

/// Whether the drug name matches any key of the conversion table
#[must_use]
pub fn is_opioid(generic_name: Option<&str>, factors: &[ConversionFactor]) -> bool {
    find_factor(generic_name, factors).is_some()
}

fn find_factor<'a>(
    generic_name: Option<&str>,
    factors: &'a [ConversionFactor],
) -> Option<&'a ConversionFactor> {
    let name = generic_name?.to_uppercase();
    factors
        .iter()
        .find(|entry| name.contains(&entry.key.to_uppercase()))
}

/// Estimate daily MME from the free-text order fields
///
/// Returns 0.0 when the strength cannot be parsed or the drug is not in the
/// conversion table.
#[must_use]
pub fn compute_daily_mme(
    strength: Option<&str>,
    frequency: Option<&str>,
    generic_name: Option<&str>,
    factors: &[ConversionFactor],
) -> f64 {
    let Some(dose_mg) = normalize_dose(strength) else {
        return 0.0;
    };

    let factor = conversion_factor(generic_name, factors);
    if factor == 0.0 {
        log::debug!("No MME conversion factor for {generic_name:?}");
        return 0.0;
    }

    let doses = doses_per_day(frequency);
    let mme = round_to_cents(dose_mg * factor * f64::from(doses));
    if !mme.is_finite() {
        log::debug!("Daily MME for {generic_name:?} at {dose_mg} mg is out of range");
        return 0.0;
    }
    mme
}

/// Daily MME for an order, preferring a positive finite stored value
#[must_use]
pub fn daily_mme(order: &MedicationOrder, factors: &[ConversionFactor]) -> f64 {
    match order.stored_mme {
        Some(stored) if stored > 0.0 && stored.is_finite() => stored,
        _ => compute_daily_mme(
            order.strength.as_deref(),
            order.frequency.as_deref(),
            order.generic_name.as_deref(),
            factors,
        ),
    }
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
