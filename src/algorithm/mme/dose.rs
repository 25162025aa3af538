//! Dose normalization
//!
//! Turns a free-text strength such as `"10-325MG"` or `"5 mg"` into a
//! milligram quantity.

/// Separator between the parts of a combination strength
const COMPONENT_SEPARATOR: char = '-';

/// Unit marker stripped from the end of a strength
const UNIT_MARKER: &str = "MG";

/// Parse a strength text into milligrams
///
/// For a combination strength only the first component is used, which is the
/// opioid part in the source data (`"10-325MG"` is 10 mg oxycodone with
/// 325 mg acetaminophen). Returns `None` when the value is absent or does
/// not parse to a finite, non-negative number; callers treat that as zero
/// MME contribution.
#[must_use]
pub fn normalize_dose(strength: Option<&str>) -> Option<f64> {
    let text = strength?.trim();
    let first = text
        .split(COMPONENT_SEPARATOR)
        .next()
        .unwrap_or(text)
        .trim();

    let numeric = strip_unit(first).trim();
    match numeric.parse::<f64>() {
        Ok(mg) if mg.is_finite() && mg >= 0.0 => Some(mg),
        _ => {
            log::debug!("Strength {text:?} is not a parseable milligram dose");
            None
        }
    }
}

fn strip_unit(text: &str) -> &str {
    let upper = text.to_ascii_uppercase();
    if upper.ends_with(UNIT_MARKER) {
        &text[..text.len() - UNIT_MARKER.len()]
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_strengths() {
        assert_eq!(normalize_dose(Some("5MG")), Some(5.0));
        assert_eq!(normalize_dose(Some("7.5 mg")), Some(7.5));
        assert_eq!(normalize_dose(Some("  30 ")), Some(30.0));
    }

    #[test]
    fn test_combination_strength_uses_first_component() {
        assert_eq!(normalize_dose(Some("10-325MG")), Some(10.0));
        assert_eq!(normalize_dose(Some("5 - 325 MG")), Some(5.0));
    }

    #[test]
    fn test_unparseable_strengths() {
        assert_eq!(normalize_dose(None), None);
        assert_eq!(normalize_dose(Some("")), None);
        assert_eq!(normalize_dose(Some("N/A")), None);
        assert_eq!(normalize_dose(Some("0.5MG/ML")), None);
        assert_eq!(normalize_dose(Some("NaN")), None);
        assert_eq!(normalize_dose(Some("inf")), None);
    }
}
