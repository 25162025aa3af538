//! Rule-based opioid risk scoring
//!
//! Points from independent rules are summed and capped at the policy
//! ceiling. Each rule adds at most once; there are no interaction terms.

use smallvec::SmallVec;

use crate::config::RiskPolicy;
use crate::models::risk::{RiskAssessment, RiskFactor, RiskLevel};
use crate::models::summary::{DiagnosisSummaryCounts, EncounterSummaryCounts, OpioidSummaryCounts};

/// Points from the prescription-volume rule
///
/// The lower tier adds points without a factor label.
#[must_use]
pub const fn prescription_points(total_prescriptions: u32, policy: &RiskPolicy) -> (u32, Option<RiskFactor>) {
    if total_prescriptions >= policy.high_prescription_count {
        (policy.high_prescription_points, Some(RiskFactor::HighPrescriptionCount))
    } else if total_prescriptions >= policy.moderate_prescription_count {
        (policy.moderate_prescription_points, None)
    } else {
        (0, None)
    }
}

/// Score a patient from the three aggregate records
#[must_use]
pub fn score_risk(
    opioid: &OpioidSummaryCounts,
    diagnosis: &DiagnosisSummaryCounts,
    encounter: &EncounterSummaryCounts,
    policy: &RiskPolicy,
) -> RiskAssessment {
    let mut score: u32 = 0;
    let mut factors: SmallVec<[RiskFactor; 5]> = SmallVec::new();

    let (points, factor) = prescription_points(opioid.total_prescriptions, policy);
    score = score.saturating_add(points);
    factors.extend(factor);

    let rules = [
        (
            opioid.rx_last_30_days >= policy.recent_prescription_count,
            policy.recent_prescription_points,
            RiskFactor::RecentPrescriptions,
        ),
        (
            diagnosis.opioid_dx > 0,
            policy.opioid_diagnosis_points,
            RiskFactor::OpioidUseDisorder,
        ),
        (
            diagnosis.substance_dx > 0,
            policy.substance_diagnosis_points,
            RiskFactor::SubstanceUseHistory,
        ),
        (
            encounter.ed_visits >= policy.ed_visit_count,
            policy.ed_visit_points,
            RiskFactor::FrequentEdVisits,
        ),
    ];

    for (applies, points, factor) in rules {
        if applies {
            score = score.saturating_add(points);
            factors.push(factor);
        }
    }

    let score = score.min(policy.max_score);
    RiskAssessment {
        score,
        level: RiskLevel::from_score(score, policy),
        factors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opioid(total: u32, recent: u32) -> OpioidSummaryCounts {
        OpioidSummaryCounts {
            total_prescriptions: total,
            rx_last_30_days: recent,
            ..OpioidSummaryCounts::default()
        }
    }

    fn diagnosis(opioid_dx: u32, substance_dx: u32) -> DiagnosisSummaryCounts {
        DiagnosisSummaryCounts {
            opioid_dx,
            substance_dx,
            ..DiagnosisSummaryCounts::default()
        }
    }

    fn encounter(ed_visits: u32) -> EncounterSummaryCounts {
        EncounterSummaryCounts {
            ed_visits,
            ..EncounterSummaryCounts::default()
        }
    }

    #[test]
    fn test_all_zero_is_low() {
        let risk = score_risk(
            &OpioidSummaryCounts::default(),
            &DiagnosisSummaryCounts::default(),
            &EncounterSummaryCounts::default(),
            &RiskPolicy::default(),
        );
        assert_eq!(risk.score, 0);
        assert_eq!(risk.level, RiskLevel::Low);
        assert!(risk.factors.is_empty());
    }

    #[test]
    fn test_lower_prescription_tier_has_no_label() {
        let risk = score_risk(&opioid(5, 0), &diagnosis(0, 0), &encounter(0), &RiskPolicy::default());
        assert_eq!(risk.score, 10);
        assert!(risk.factors.is_empty());

        let risk = score_risk(&opioid(4, 0), &diagnosis(0, 0), &encounter(0), &RiskPolicy::default());
        assert_eq!(risk.score, 0);
    }

    #[test]
    fn test_every_rule_fires_and_caps() {
        let risk = score_risk(&opioid(15, 4), &diagnosis(2, 3), &encounter(5), &RiskPolicy::default());
        // 20 + 15 + 30 + 15 + 10 = 90
        assert_eq!(risk.score, 90);
        assert_eq!(risk.level, RiskLevel::Critical);
        assert_eq!(
            risk.factors.as_slice(),
            &[
                RiskFactor::HighPrescriptionCount,
                RiskFactor::RecentPrescriptions,
                RiskFactor::OpioidUseDisorder,
                RiskFactor::SubstanceUseHistory,
                RiskFactor::FrequentEdVisits,
            ]
        );

        let heavy = RiskPolicy {
            opioid_diagnosis_points: 80,
            ..RiskPolicy::default()
        };
        let capped = score_risk(&opioid(15, 4), &diagnosis(2, 3), &encounter(5), &heavy);
        assert_eq!(capped.score, 100);
    }
}
