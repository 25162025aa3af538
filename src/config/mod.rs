//! Scoring policy configuration
//!
//! Every table and threshold the clinical core consults lives here as data,
//! so the policy can be overridden from a JSON file without touching the
//! calculators. Rule lists are ordered: the first matching entry wins.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{OpioidRiskError, Result};
use crate::models::diagnosis::DiagnosisCategory;
use crate::models::medication::PotencyTier;
use crate::utils::io::read_to_string;

/// Drug key to morphine-milligram-equivalent multiplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionFactor {
    /// Uppercase token matched as a substring of the generic name
    pub key: String,
    /// Multiplier converting one milligram of the drug into MME
    pub factor: f64,
}

impl ConversionFactor {
    #[must_use]
    pub fn new(key: &str, factor: f64) -> Self {
        Self {
            key: key.to_uppercase(),
            factor,
        }
    }
}

/// One entry of the ordered medication classification list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationRule {
    /// Token matched case-insensitively as a substring of the generic name
    pub token: String,
    /// Drug class label assigned on match
    pub drug_class: String,
    /// Potency tier assigned on match
    pub potency: PotencyTier,
}

impl MedicationRule {
    #[must_use]
    pub fn new(token: &str, drug_class: &str, potency: PotencyTier) -> Self {
        Self {
            token: token.to_uppercase(),
            drug_class: drug_class.to_string(),
            potency,
        }
    }
}

/// One entry of the ordered diagnosis classification list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisRule {
    /// ICD code prefix
    pub prefix: String,
    /// Category assigned on match
    pub category: DiagnosisCategory,
}

impl DiagnosisRule {
    #[must_use]
    pub fn new(prefix: &str, category: DiagnosisCategory) -> Self {
        Self {
            prefix: prefix.to_uppercase(),
            category,
        }
    }
}

/// Point weights and cut-offs for the risk score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskPolicy {
    /// Total prescriptions at or above which the high-count points apply
    pub high_prescription_count: u32,
    pub high_prescription_points: u32,
    /// Total prescriptions at or above which the lower-tier points apply
    pub moderate_prescription_count: u32,
    pub moderate_prescription_points: u32,
    /// Prescriptions in the last 30 days at or above which recency points apply
    pub recent_prescription_count: u32,
    pub recent_prescription_points: u32,
    pub opioid_diagnosis_points: u32,
    pub substance_diagnosis_points: u32,
    /// Emergency visits at or above which the ED points apply
    pub ed_visit_count: u32,
    pub ed_visit_points: u32,
    /// Ceiling applied to the summed score
    pub max_score: u32,
    /// Inclusive lower bounds of the qualitative levels
    pub critical_level: u32,
    pub high_level: u32,
    pub moderate_level: u32,
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            high_prescription_count: 10,
            high_prescription_points: 20,
            moderate_prescription_count: 5,
            moderate_prescription_points: 10,
            recent_prescription_count: 2,
            recent_prescription_points: 15,
            opioid_diagnosis_points: 30,
            substance_diagnosis_points: 15,
            ed_visit_count: 3,
            ed_visit_points: 10,
            max_score: 100,
            critical_level: 60,
            high_level: 40,
            moderate_level: 20,
        }
    }
}

/// Daily MME cut-offs (inclusive lower bounds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MmeThresholds {
    pub critical: f64,
    pub high: f64,
    pub moderate: f64,
}

impl Default for MmeThresholds {
    fn default() -> Self {
        Self {
            critical: 90.0,
            high: 50.0,
            moderate: 30.0,
        }
    }
}

/// Order duration cut-offs in minutes (inclusive lower bounds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DurationThresholds {
    pub medium_minutes: u32,
    pub long_minutes: u32,
}

impl Default for DurationThresholds {
    fn default() -> Self {
        Self {
            medium_minutes: 1440,
            long_minutes: 10080,
        }
    }
}

/// Longest accepted look-back window, one century
pub const MAX_WINDOW_DAYS: i64 = 36_500;

/// Look-back windows for recent prescription counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecentWindows {
    pub short_days: i64,
    pub long_days: i64,
}

impl Default for RecentWindows {
    fn default() -> Self {
        Self {
            short_days: 30,
            long_days: 90,
        }
    }
}

/// Complete analytics policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Ordered drug to MME factor table
    pub conversion_factors: Vec<ConversionFactor>,
    /// Ordered medication classification rules
    pub medication_rules: Vec<MedicationRule>,
    /// Ordered diagnosis classification rules
    pub diagnosis_rules: Vec<DiagnosisRule>,
    pub risk: RiskPolicy,
    pub mme_thresholds: MmeThresholds,
    pub duration_thresholds: DurationThresholds,
    pub recent_windows: RecentWindows,
    /// Derive absent summary records from detail records
    pub derive_missing_summaries: bool,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            conversion_factors: default_conversion_factors(),
            medication_rules: default_medication_rules(),
            diagnosis_rules: default_diagnosis_rules(),
            risk: RiskPolicy::default(),
            mme_thresholds: MmeThresholds::default(),
            duration_thresholds: DurationThresholds::default(),
            recent_windows: RecentWindows::default(),
            derive_missing_summaries: true,
        }
    }
}

/// The standard opioid conversion table, in lookup order
#[must_use]
pub fn default_conversion_factors() -> Vec<ConversionFactor> {
    [
        ("TRAMADOL", 0.1),
        ("CODEINE", 0.15),
        ("HYDROCODONE", 1.0),
        ("OXYCODONE", 1.5),
        ("MORPHINE", 1.0),
        ("HYDROMORPHONE", 4.0),
        ("OXYMORPHONE", 3.0),
        ("FENTANYL", 2.4),
        ("METHADONE", 8.0),
        ("BUPRENORPHINE", 30.0),
        ("TAPENTADOL", 0.4),
    ]
    .into_iter()
    .map(|(key, factor)| ConversionFactor::new(key, factor))
    .collect()
}

/// Medication classes in evaluation order
#[must_use]
pub fn default_medication_rules() -> Vec<MedicationRule> {
    vec![
        MedicationRule::new("TRAMADOL", "Tramadol", PotencyTier::Low),
        MedicationRule::new("CODEINE", "Codeine", PotencyTier::Low),
        MedicationRule::new("HYDROCODONE", "Hydrocodone", PotencyTier::Moderate),
        MedicationRule::new("OXYCODONE", "Oxycodone", PotencyTier::High),
        MedicationRule::new("MORPHINE", "Morphine", PotencyTier::High),
        MedicationRule::new("FENTANYL", "Fentanyl", PotencyTier::VeryHigh),
        MedicationRule::new("METHADONE", "Methadone", PotencyTier::VeryHigh),
    ]
}

/// Diagnosis prefixes in evaluation order; `F11` must precede `F1`
#[must_use]
pub fn default_diagnosis_rules() -> Vec<DiagnosisRule> {
    vec![
        DiagnosisRule::new("F11", DiagnosisCategory::OpioidUse),
        DiagnosisRule::new("T40", DiagnosisCategory::OpioidPoisoning),
        DiagnosisRule::new("F1", DiagnosisCategory::SubstanceUse),
        DiagnosisRule::new("M", DiagnosisCategory::Pain),
    ]
}

impl AnalyticsConfig {
    /// Create a configuration with the standard policy
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a policy from a JSON file; absent keys keep their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = read_to_string(path, "analytics policy")?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        log::debug!("Loaded analytics policy from {}", path.display());
        Ok(config)
    }

    /// Replace the conversion table
    #[must_use]
    pub fn with_conversion_factors(mut self, factors: Vec<ConversionFactor>) -> Self {
        self.conversion_factors = factors;
        self
    }

    /// Replace the medication classification rules
    #[must_use]
    pub fn with_medication_rules(mut self, rules: Vec<MedicationRule>) -> Self {
        self.medication_rules = rules;
        self
    }

    /// Replace the diagnosis classification rules
    #[must_use]
    pub fn with_diagnosis_rules(mut self, rules: Vec<DiagnosisRule>) -> Self {
        self.diagnosis_rules = rules;
        self
    }

    /// Replace the risk policy
    #[must_use]
    pub fn with_risk_policy(mut self, risk: RiskPolicy) -> Self {
        self.risk = risk;
        self
    }

    /// Control whether absent summaries are derived from detail records
    #[must_use]
    pub fn with_derived_summaries(mut self, derive: bool) -> Self {
        self.derive_missing_summaries = derive;
        self
    }

    /// Check the policy for internal consistency
    ///
    /// The conversion table must be collision-free: with substring lookup,
    /// a key contained in another key would make the result depend on table
    /// order.
    pub fn validate(&self) -> Result<()> {
        for (i, entry) in self.conversion_factors.iter().enumerate() {
            if entry.key.trim().is_empty() {
                return Err(OpioidRiskError::config(format!(
                    "conversion factor #{} has an empty drug key",
                    i + 1
                )));
            }
            if !entry.factor.is_finite() || entry.factor < 0.0 {
                return Err(OpioidRiskError::config(format!(
                    "conversion factor for {} must be a non-negative number, got {}",
                    entry.key, entry.factor
                )));
            }
            let key = entry.key.to_uppercase();
            for other in self.conversion_factors.iter().skip(i + 1) {
                let other_key = other.key.to_uppercase();
                if key.contains(&other_key) || other_key.contains(&key) {
                    return Err(OpioidRiskError::config(format!(
                        "conversion keys {} and {} overlap; lookup would depend on table order",
                        entry.key, other.key
                    )));
                }
            }
        }

        if let Some(rule) = self
            .medication_rules
            .iter()
            .find(|rule| rule.token.trim().is_empty())
        {
            return Err(OpioidRiskError::config(format!(
                "medication rule for class {} has an empty token",
                rule.drug_class
            )));
        }

        if self
            .diagnosis_rules
            .iter()
            .any(|rule| rule.prefix.trim().is_empty())
        {
            return Err(OpioidRiskError::config(
                "diagnosis rules must not contain an empty prefix",
            ));
        }

        let risk = &self.risk;
        if !(risk.moderate_level < risk.high_level && risk.high_level < risk.critical_level) {
            return Err(OpioidRiskError::config(format!(
                "risk level cut-offs must be strictly increasing, got {}/{}/{}",
                risk.moderate_level, risk.high_level, risk.critical_level
            )));
        }
        if risk.max_score == 0 {
            return Err(OpioidRiskError::config("risk score ceiling must be positive"));
        }

        let mme = &self.mme_thresholds;
        if !(mme.moderate < mme.high && mme.high < mme.critical) {
            return Err(OpioidRiskError::config(format!(
                "MME thresholds must be strictly increasing, got {}/{}/{}",
                mme.moderate, mme.high, mme.critical
            )));
        }

        let duration = &self.duration_thresholds;
        if duration.medium_minutes >= duration.long_minutes {
            return Err(OpioidRiskError::config(
                "medium duration threshold must be below the long duration threshold",
            ));
        }

        let windows = &self.recent_windows;
        if !(0 < windows.short_days
            && windows.short_days <= windows.long_days
            && windows.long_days <= MAX_WINDOW_DAYS)
        {
            return Err(OpioidRiskError::config(format!(
                "recent windows must satisfy 0 < short <= long <= {MAX_WINDOW_DAYS} days, got {}/{}",
                windows.short_days, windows.long_days
            )));
        }

        Ok(())
    }
}

impl fmt::Display for AnalyticsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Analytics Policy:")?;
        writeln!(f, "  Conversion Factors: {}", self.conversion_factors.len())?;
        writeln!(f, "  Medication Rules: {}", self.medication_rules.len())?;
        writeln!(f, "  Diagnosis Rules: {}", self.diagnosis_rules.len())?;
        writeln!(
            f,
            "  Risk Levels: MODERATE >= {}, HIGH >= {}, CRITICAL >= {} (max {})",
            self.risk.moderate_level,
            self.risk.high_level,
            self.risk.critical_level,
            self.risk.max_score
        )?;
        writeln!(
            f,
            "  MME Thresholds: {}/{}/{}",
            self.mme_thresholds.moderate, self.mme_thresholds.high, self.mme_thresholds.critical
        )?;
        writeln!(f, "  Derive Missing Summaries: {}", self.derive_missing_summaries)?;
        Ok(())
    }
}
