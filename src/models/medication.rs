//! Medication orders and their derived MME annotation

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::config::{DurationThresholds, MmeThresholds};

/// A single medication order as recorded by the source system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationOrder {
    pub medication_id: u64,
    pub encounter_id: u64,
    /// Generic drug name, e.g. "Hydrocodone-Acetaminophen"
    pub generic_name: Option<String>,
    /// Free-text strength, e.g. "10-325MG"
    pub strength: Option<String>,
    /// Free-text administration frequency, e.g. "Q6H PRN"
    pub frequency: Option<String>,
    pub started_at: NaiveDateTime,
    /// Not checked against `started_at`; passed through as recorded
    pub stopped_at: Option<NaiveDateTime>,
    pub duration_minutes: Option<u32>,
    /// MME previously stored by the clinical system
    pub stored_mme: Option<f64>,
}

impl MedicationOrder {
    /// Create an order with only the identifying fields set
    #[must_use]
    pub fn new(
        medication_id: u64,
        encounter_id: u64,
        generic_name: Option<&str>,
        started_at: NaiveDateTime,
    ) -> Self {
        Self {
            medication_id,
            encounter_id,
            generic_name: generic_name.map(str::to_string),
            strength: None,
            frequency: None,
            started_at,
            stopped_at: None,
            duration_minutes: None,
            stored_mme: None,
        }
    }

    #[must_use]
    pub fn with_strength(mut self, strength: &str) -> Self {
        self.strength = Some(strength.to_string());
        self
    }

    #[must_use]
    pub fn with_frequency(mut self, frequency: &str) -> Self {
        self.frequency = Some(frequency.to_string());
        self
    }

    #[must_use]
    pub fn with_stopped_at(mut self, stopped_at: NaiveDateTime) -> Self {
        self.stopped_at = Some(stopped_at);
        self
    }

    #[must_use]
    pub fn with_duration_minutes(mut self, minutes: u32) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    #[must_use]
    pub fn with_stored_mme(mut self, mme: f64) -> Self {
        self.stored_mme = Some(mme);
        self
    }
}

/// Daily MME bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MmeCategory {
    #[serde(rename = "Low (<30)")]
    Low = 1,
    #[serde(rename = "Moderate (30-49)")]
    Moderate = 2,
    #[serde(rename = "High (50-89)")]
    High = 3,
    #[serde(rename = "Critical (≥90)")]
    Critical = 4,
}

impl MmeCategory {
    /// Bucket a daily MME value
    #[must_use]
    pub fn from_daily_mme(daily_mme: f64, thresholds: &MmeThresholds) -> Self {
        if daily_mme >= thresholds.critical {
            Self::Critical
        } else if daily_mme >= thresholds.high {
            Self::High
        } else if daily_mme >= thresholds.moderate {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    /// Ordinal risk level, 1 (low) to 4 (critical)
    #[must_use]
    pub const fn risk_level(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low (<30)",
            Self::Moderate => "Moderate (30-49)",
            Self::High => "High (50-89)",
            Self::Critical => "Critical (≥90)",
        }
    }
}

impl fmt::Display for MmeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Relative potency of an opioid
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PotencyTier {
    Low = 1,
    Moderate = 2,
    High = 3,
    #[serde(rename = "Very High")]
    VeryHigh = 4,
}

impl PotencyTier {
    /// Numeric potency level, 1 to 4
    #[must_use]
    pub const fn level(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }
}

impl fmt::Display for PotencyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Length of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DurationCategory {
    #[serde(rename = "Short (<1 day)")]
    Short,
    #[serde(rename = "Medium (1-7 days)")]
    Medium,
    #[serde(rename = "Long (>7 days)")]
    Long,
}

impl DurationCategory {
    /// Bucket an order duration; an absent duration counts as zero minutes
    #[must_use]
    pub fn from_minutes(minutes: u32, thresholds: &DurationThresholds) -> Self {
        if minutes < thresholds.medium_minutes {
            Self::Short
        } else if minutes < thresholds.long_minutes {
            Self::Medium
        } else {
            Self::Long
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Short => "Short (<1 day)",
            Self::Medium => "Medium (1-7 days)",
            Self::Long => "Long (>7 days)",
        }
    }
}

impl fmt::Display for DurationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Values derived for one medication order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedicationAnnotation {
    pub daily_mme: f64,
    pub mme_category: MmeCategory,
    pub drug_class: String,
    pub potency: PotencyTier,
    pub duration_category: DurationCategory,
    /// Whole days from the start date to the analysis date, never negative
    pub days_since_prescribed: u32,
}

impl MedicationAnnotation {
    #[must_use]
    pub const fn mme_risk_level(&self) -> u8 {
        self.mme_category.risk_level()
    }

    #[must_use]
    pub const fn potency_level(&self) -> u8 {
        self.potency.level()
    }

    /// Daily MME at or above the critical threshold
    #[must_use]
    pub fn is_high_mme(&self) -> bool {
        self.mme_category == MmeCategory::Critical
    }

    /// Daily MME at or above the high threshold
    #[must_use]
    pub fn is_moderate_mme(&self) -> bool {
        self.mme_category >= MmeCategory::High
    }
}

/// A medication order together with its annotation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedMedication {
    pub order: MedicationOrder,
    pub annotation: MedicationAnnotation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mme_category_boundaries() {
        let t = MmeThresholds::default();
        assert_eq!(MmeCategory::from_daily_mme(0.0, &t), MmeCategory::Low);
        assert_eq!(MmeCategory::from_daily_mme(29.99, &t), MmeCategory::Low);
        assert_eq!(MmeCategory::from_daily_mme(30.0, &t), MmeCategory::Moderate);
        assert_eq!(MmeCategory::from_daily_mme(50.0, &t), MmeCategory::High);
        assert_eq!(MmeCategory::from_daily_mme(89.99, &t), MmeCategory::High);
        assert_eq!(MmeCategory::from_daily_mme(90.0, &t), MmeCategory::Critical);
        assert_eq!(MmeCategory::Critical.risk_level(), 4);
    }

    #[test]
    fn test_duration_boundaries() {
        let t = DurationThresholds::default();
        assert_eq!(DurationCategory::from_minutes(0, &t), DurationCategory::Short);
        assert_eq!(DurationCategory::from_minutes(1439, &t), DurationCategory::Short);
        assert_eq!(DurationCategory::from_minutes(1440, &t), DurationCategory::Medium);
        assert_eq!(DurationCategory::from_minutes(10079, &t), DurationCategory::Medium);
        assert_eq!(DurationCategory::from_minutes(10080, &t), DurationCategory::Long);
    }

    #[test]
    fn test_potency_levels() {
        assert_eq!(PotencyTier::Low.level(), 1);
        assert_eq!(PotencyTier::VeryHigh.level(), 4);
        assert_eq!(PotencyTier::VeryHigh.to_string(), "Very High");
    }
}
