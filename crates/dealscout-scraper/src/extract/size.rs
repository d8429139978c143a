//! Size derivation from product names.

use regex::Regex;

/// Finds a quantity-unit pattern in a product name, e.g. `"32 oz"` in
/// `"Chobani Yogurt 32 oz"`.
///
/// Matches a number followed by a unit token (oz, lb, g, ml, L, count,
/// pack, each, ct) or the literal tokens `"Each"` / `"Half Gallon"`,
/// case-insensitively. Returns `None` when the name carries no size.
pub(super) fn derive_size(name: &str) -> Option<String> {
    let re = Regex::new(r"(?i)(\d[\d.]*\s*(oz|lb|g|ml|L|count|pack|each|ct)|Each|Half Gallon)")
        .expect("valid regex");
    re.captures(name).map(|caps| caps[1].to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_with_spaced_unit() {
        assert_eq!(derive_size("Chobani Yogurt 32 oz").as_deref(), Some("32 oz"));
    }

    #[test]
    fn number_with_attached_unit() {
        assert_eq!(derive_size("Coke 2L Bottle").as_deref(), Some("2L"));
    }

    #[test]
    fn decimal_quantity() {
        assert_eq!(derive_size("Tide 1.5 L detergent").as_deref(), Some("1.5 L"));
    }

    #[test]
    fn count_units() {
        assert_eq!(derive_size("Eggs 12 ct").as_deref(), Some("12 ct"));
        assert_eq!(derive_size("Water 24 pack").as_deref(), Some("24 pack"));
    }

    #[test]
    fn literal_half_gallon() {
        assert_eq!(
            derive_size("Simple Truth Milk Half Gallon").as_deref(),
            Some("Half Gallon")
        );
    }

    #[test]
    fn literal_each() {
        assert_eq!(derive_size("Avocado Each").as_deref(), Some("Each"));
    }

    #[test]
    fn name_without_size_yields_none() {
        assert_eq!(derive_size("Frozen Pizza"), None);
    }
}
