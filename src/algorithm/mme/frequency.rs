//! Administration frequency resolution

/// Doses per day assumed when the frequency is absent or unrecognized
pub const DEFAULT_DOSES_PER_DAY: u32 = 3;

/// Frequency tokens in priority order; the first rule with a matching token wins
///
/// As-needed orders assume four doses a day as a conservative upper bound.
const FREQUENCY_RULES: &[(&[&str], u32)] = &[
    (&["Q6H", "QID"], 4),
    (&["Q8H", "TID"], 3),
    (&["Q12H", "BID"], 2),
    (&["Q24H", "QD", "DAILY"], 1),
    (&["PRN"], 4),
];

/// Map a free-text frequency description to a doses-per-day count
///
/// Matching is a case-insensitive substring test. Never fails.
#[must_use]
pub fn doses_per_day(frequency: Option<&str>) -> u32 {
    let Some(text) = frequency else {
        return DEFAULT_DOSES_PER_DAY;
    };
    let upper = text.to_uppercase();

    FREQUENCY_RULES
        .iter()
        .find(|(tokens, _)| tokens.iter().any(|token| upper.contains(token)))
        .map_or_else(
            || {
                log::debug!("Unrecognized frequency {text:?}, assuming {DEFAULT_DOSES_PER_DAY} doses/day");
                DEFAULT_DOSES_PER_DAY
            },
            |(_, doses)| *doses,
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tokens() {
        assert_eq!(doses_per_day(Some("Q6H")), 4);
        assert_eq!(doses_per_day(Some("qid")), 4);
        assert_eq!(doses_per_day(Some("Q8H")), 3);
        assert_eq!(doses_per_day(Some("TID with meals")), 3);
        assert_eq!(doses_per_day(Some("Q12H")), 2);
        assert_eq!(doses_per_day(Some("bid")), 2);
        assert_eq!(doses_per_day(Some("Q24H")), 1);
        assert_eq!(doses_per_day(Some("Daily")), 1);
        assert_eq!(doses_per_day(Some("QD")), 1);
        assert_eq!(doses_per_day(Some("PRN")), 4);
    }

    #[test]
    fn test_priority_order() {
        // scheduled tokens outrank the as-needed token
        assert_eq!(doses_per_day(Some("Q12H PRN")), 2);
        assert_eq!(doses_per_day(Some("Daily PRN")), 1);
    }

    #[test]
    fn test_default() {
        assert_eq!(doses_per_day(None), DEFAULT_DOSES_PER_DAY);
        assert_eq!(doses_per_day(Some("once")), DEFAULT_DOSES_PER_DAY);
        assert_eq!(doses_per_day(Some("")), DEFAULT_DOSES_PER_DAY);
    }
}
