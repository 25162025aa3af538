//! Risk assessment result

use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::config::RiskPolicy;

/// Qualitative risk bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    #[default]
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    /// Bucket a score using the inclusive lower bounds of the policy
    #[must_use]
    pub const fn from_score(score: u32, policy: &RiskPolicy) -> Self {
        if score >= policy.critical_level {
            Self::Critical
        } else if score >= policy.high_level {
            Self::High
        } else if score >= policy.moderate_level {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Moderate => "MODERATE",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A rule that contributed points to the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskFactor {
    #[serde(rename = "High Prescription Count")]
    HighPrescriptionCount,
    #[serde(rename = "Recent Prescriptions")]
    RecentPrescriptions,
    #[serde(rename = "Opioid Use Disorder")]
    OpioidUseDisorder,
    #[serde(rename = "Substance Use History")]
    SubstanceUseHistory,
    #[serde(rename = "Frequent ED Visits")]
    FrequentEdVisits,
}

impl RiskFactor {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::HighPrescriptionCount => "High Prescription Count",
            Self::RecentPrescriptions => "Recent Prescriptions",
            Self::OpioidUseDisorder => "Opioid Use Disorder",
            Self::SubstanceUseHistory => "Substance Use History",
            Self::FrequentEdVisits => "Frequent ED Visits",
        }
    }
}

impl fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Factors in the order their rules were evaluated; at most one per rule
pub type RiskFactors = SmallVec<[RiskFactor; 5]>;

/// Score, level and contributing factors for one patient
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Score in `[0, max_score]`
    pub score: u32,
    pub level: RiskLevel,
    pub factors: RiskFactors,
}

impl RiskAssessment {
    /// Factor labels joined for a single text column
    #[must_use]
    pub fn factor_labels(&self) -> String {
        self.factors.iter().map(|f| f.label()).join(", ")
    }

    #[must_use]
    pub fn has_factor(&self, factor: RiskFactor) -> bool {
        self.factors.contains(&factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn test_level_boundaries() {
        let policy = RiskPolicy::default();
        assert_eq!(RiskLevel::from_score(0, &policy), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(19, &policy), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(20, &policy), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(40, &policy), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(59, &policy), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(60, &policy), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_score(100, &policy), RiskLevel::Critical);
    }

    #[test]
    fn test_factor_labels_joined_in_order() {
        let risk = RiskAssessment {
            score: 45,
            level: RiskLevel::High,
            factors: smallvec![RiskFactor::RecentPrescriptions, RiskFactor::OpioidUseDisorder],
        };
        assert_eq!(risk.factor_labels(), "Recent Prescriptions, Opioid Use Disorder");
        assert!(risk.has_factor(RiskFactor::OpioidUseDisorder));
        assert_eq!(RiskAssessment::default().factor_labels(), "");
    }

    #[test]
    fn test_serializes_with_labels() {
        let risk = RiskAssessment {
            score: 30,
            level: RiskLevel::Moderate,
            factors: smallvec![RiskFactor::OpioidUseDisorder],
        };
        let json = serde_json::to_value(&risk).unwrap();
        assert_eq!(json["level"], "MODERATE");
        assert_eq!(json["factors"][0], "Opioid Use Disorder");
    }
}
