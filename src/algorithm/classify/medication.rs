//! Medication classification by generic name

use crate::config::MedicationRule;
use crate::models::medication::PotencyTier;

/// Class assigned to names that match no rule
pub const OTHER_OPIOID: &str = "Other Opioid";

/// Potency assigned to names that match no rule
pub const DEFAULT_POTENCY: PotencyTier = PotencyTier::High;

/// Drug class and potency of a medication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedicationClass {
    pub drug_class: String,
    pub potency: PotencyTier,
}

impl MedicationClass {
    /// Numeric potency level, 1 to 4
    #[must_use]
    pub const fn potency_level(&self) -> u8 {
        self.potency.level()
    }
}

/// Classify a medication by its generic name
///
/// The first rule whose token is contained in the upper-cased name wins.
/// Absent names and names matching no rule fall into `Other Opioid`/`High`.
#[must_use]
pub fn classify_medication(generic_name: Option<&str>, rules: &[MedicationRule]) -> MedicationClass {
    let name = generic_name.unwrap_or_default().to_uppercase();

    rules
        .iter()
        .find(|rule| name.contains(&rule.token.to_uppercase()))
        .map_or_else(
            || MedicationClass {
                drug_class: OTHER_OPIOID.to_string(),
                potency: DEFAULT_POTENCY,
            },
            |rule| MedicationClass {
                drug_class: rule.drug_class.clone(),
                potency: rule.potency,
            },
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_medication_rules;

    fn classify(name: &str) -> (String, PotencyTier, u8) {
        let class = classify_medication(Some(name), &default_medication_rules());
        let level = class.potency_level();
        (class.drug_class, class.potency, level)
    }

    #[test]
    fn test_each_rule() {
        assert_eq!(classify("Tramadol"), ("Tramadol".into(), PotencyTier::Low, 1));
        assert_eq!(classify("CODEINE SULFATE"), ("Codeine".into(), PotencyTier::Low, 1));
        assert_eq!(
            classify("Hydrocodone-Acetaminophen"),
            ("Hydrocodone".into(), PotencyTier::Moderate, 2)
        );
        assert_eq!(classify("oxycodone"), ("Oxycodone".into(), PotencyTier::High, 3));
        assert_eq!(classify("Morphine Sulfate ER"), ("Morphine".into(), PotencyTier::High, 3));
        assert_eq!(classify("FENTANYL"), ("Fentanyl".into(), PotencyTier::VeryHigh, 4));
        assert_eq!(classify("Methadone HCl"), ("Methadone".into(), PotencyTier::VeryHigh, 4));
    }

    #[test]
    fn test_first_rule_wins() {
        // contains both CODEINE and MORPHINE; CODEINE is evaluated first
        assert_eq!(classify("Codeine/Morphine"), ("Codeine".into(), PotencyTier::Low, 1));
        assert_eq!(classify("Tramadol-Fentanyl"), ("Tramadol".into(), PotencyTier::Low, 1));
    }

    #[test]
    fn test_default_branch() {
        assert_eq!(classify("Hydromorphone"), ("Other Opioid".into(), PotencyTier::High, 3));
        let absent = classify_medication(None, &default_medication_rules());
        assert_eq!(absent.drug_class, OTHER_OPIOID);
        assert_eq!(absent.potency_level(), 3);
    }
}
