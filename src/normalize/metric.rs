//! Imperial weight to metric conversion for ingredient lines.
//!
//! Only pounds and ounces are converted. Volume units (cups, spoons, fluid
//! ounces, pints) are left exactly as written.

use super::text::vulgar_fraction;
use regex::{Captures, Regex};
use std::sync::LazyLock;

const GRAMS_PER_OUNCE: f64 = 28.349_523_1;
const KILOGRAMS_PER_POUND: f64 = 0.453_592_37;

const NUMBER: &str = r"(?:\d+\s+\d+/\d+|\d+/\d+|\d+\s*[½⅓⅔¼¾⅛⅜⅝⅞]|\d+(?:\.\d+)?|[½⅓⅔¼¾⅛⅜⅝⅞])";

static WEIGHT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)(^|[^A-Za-z0-9/.])({NUMBER})(?:(?:\s*[-–—]\s*|\s+to\s+)({NUMBER}))?\s*-?\s*(pounds?|lbs?|ounces?|oz)\b\.?"
    ))
    .unwrap()
});

/// `1 lb 8 oz`, `2 pounds and 4 ounces`: one weight written as two units.
static POUNDS_AND_OUNCES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)(^|[^A-Za-z0-9/.])({NUMBER})\s*(?:pounds?|lbs?)\b\.?,?\s+(?:and\s+)?({NUMBER})\s*(?:ounces?|oz)\b\.?"
    ))
    .unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq)]
enum WeightUnit {
    Pound,
    Ounce,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MetricUnit {
    Gram,
    Kilogram,
}

impl MetricUnit {
    fn symbol(&self) -> &'static str {
        match self {
            MetricUnit::Gram => "g",
            MetricUnit::Kilogram => "kg",
        }
    }
}

/// Rewrite every pound/ounce amount in `line` to grams or kilograms.
///
/// `"1 lb ground beef"` becomes `"454 g ground beef"`. Text that has no
/// imperial weight (including already-metric text) is returned unchanged.
/// A pound amount directly followed by an ounce amount is summed into one
/// weight: `"1 lb 8 oz beef"` becomes `"680 g beef"`.
pub fn convert_ingredient_measurement_to_metric(line: &str) -> String {
    let combined = POUNDS_AND_OUNCES.replace_all(line, |caps: &Captures| {
        match (parse_number(&caps[2]), parse_number(&caps[3])) {
            (Some(pounds), Some(ounces)) => {
                let grams = pounds * KILOGRAMS_PER_POUND * 1000.0 + ounces * GRAMS_PER_OUNCE;
                let (amount, metric) = grams_to_metric(grams);
                format!("{}{} {}", &caps[1], format_amount(amount, metric), metric.symbol())
            }
            _ => caps[0].to_string(),
        }
    });

    WEIGHT
        .replace_all(&combined, |caps: &Captures| {
            let original = caps[0].to_string();
            let prefix = &caps[1];
            let unit = if caps[4].to_ascii_lowercase().starts_with('o') {
                WeightUnit::Ounce
            } else {
                WeightUnit::Pound
            };

            match caps.get(3) {
                None => match parse_number(&caps[2]) {
                    Some(value) => {
                        let (amount, metric) = to_metric(value, unit);
                        format!("{prefix}{} {}", format_amount(amount, metric), metric.symbol())
                    }
                    None => original,
                },
                Some(high) => match convert_range(&caps[2], high.as_str(), unit) {
                    Some(converted) => format!("{prefix}{converted}"),
                    None => original,
                },
            }
        })
        .into_owned()
}

fn convert_range(low_raw: &str, high_raw: &str, unit: WeightUnit) -> Option<String> {
    let high = parse_number(high_raw)?;
    let mut low = parse_number(low_raw)?;
    if low > high {
        low = reinterpret_mixed_fraction(low_raw, high)?;
    }

    let (low_amount, low_unit) = to_metric(low, unit);
    let (high_amount, high_unit) = to_metric(high, unit);
    if low_unit != high_unit {
        return None;
    }
    Some(format!(
        "{}-{} {}",
        format_amount(low_amount, low_unit),
        format_amount(high_amount, high_unit),
        low_unit.symbol()
    ))
}

/// `31/2` read naively is 15.5; when that exceeds the upper bound of the range
/// try splitting the numerator into a whole part (`3 1/2`).
fn reinterpret_mixed_fraction(raw: &str, upper: f64) -> Option<f64> {
    let (numerator, denominator) = raw.trim().split_once('/')?;
    let denominator: f64 = denominator.trim().parse().ok()?;
    if denominator == 0.0 || !numerator.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    (1..numerator.len()).find_map(|split| {
        let (whole, part) = numerator.split_at(split);
        if part.starts_with('0') {
            return None;
        }
        let whole: f64 = whole.parse().ok()?;
        let part: f64 = part.parse().ok()?;
        if part >= denominator {
            return None;
        }
        let value = whole + part / denominator;
        (value < upper).then_some(value)
    })
}

/// Parse integers, decimals, `a/b`, `a b/c`, vulgar glyphs and `3½`.
pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let mut chars = raw.chars();
    if let Some(last) = chars.next_back() {
        if let Some(ascii) = vulgar_fraction(last) {
            let whole = chars.as_str().trim();
            let fraction = parse_simple_fraction(ascii)?;
            return if whole.is_empty() {
                Some(fraction)
            } else {
                Some(whole.parse::<f64>().ok()? + fraction)
            };
        }
    }

    if let Some((whole, fraction)) = raw.split_once(char::is_whitespace) {
        let whole: f64 = whole.trim().parse().ok()?;
        return Some(whole + parse_simple_fraction(fraction.trim())?);
    }

    if raw.contains('/') {
        return parse_simple_fraction(raw);
    }

    raw.parse().ok()
}

fn parse_simple_fraction(raw: &str) -> Option<f64> {
    let (numerator, denominator) = raw.split_once('/')?;
    let numerator: f64 = numerator.trim().parse().ok()?;
    let denominator: f64 = denominator.trim().parse().ok()?;
    if denominator == 0.0 {
        return None;
    }
    Some(numerator / denominator)
}

fn grams_to_metric(grams: f64) -> (f64, MetricUnit) {
    if grams >= 1000.0 {
        (grams / 1000.0, MetricUnit::Kilogram)
    } else {
        (grams.round(), MetricUnit::Gram)
    }
}

fn to_metric(value: f64, unit: WeightUnit) -> (f64, MetricUnit) {
    match unit {
        WeightUnit::Pound => {
            let kilograms = value * KILOGRAMS_PER_POUND;
            if kilograms >= 1.0 {
                (kilograms, MetricUnit::Kilogram)
            } else {
                ((kilograms * 1000.0).round(), MetricUnit::Gram)
            }
        }
        WeightUnit::Ounce => ((value * GRAMS_PER_OUNCE).round(), MetricUnit::Gram),
    }
}

fn format_amount(amount: f64, unit: MetricUnit) -> String {
    match unit {
        MetricUnit::Gram => format!("{}", amount.round() as i64),
        MetricUnit::Kilogram => {
            let formatted = format!("{:.1}", amount);
            formatted
                .strip_suffix(".0")
                .map(str::to_string)
                .unwrap_or(formatted)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pound_to_grams() {
        assert_eq!(
            convert_ingredient_measurement_to_metric("1 lb ground beef"),
            "454 g ground beef"
        );
        assert_eq!(
            convert_ingredient_measurement_to_metric("1/2 pound bacon"),
            "227 g bacon"
        );
    }

    #[test]
    fn test_pound_to_kilograms() {
        assert_eq!(
            convert_ingredient_measurement_to_metric("3 lbs potatoes"),
            "1.4 kg potatoes"
        );
        assert_eq!(
            convert_ingredient_measurement_to_metric("2.25 lb flour"),
            "1 kg flour"
        );
    }

    #[test]
    fn test_ounces() {
        assert_eq!(
            convert_ingredient_measurement_to_metric("8 oz. cream cheese"),
            "227 g cream cheese"
        );
        assert_eq!(
            convert_ingredient_measurement_to_metric("1 (14-ounce) can coconut milk"),
            "1 (397 g) can coconut milk"
        );
    }

    #[test]
    fn test_pounds_and_ounces_are_summed() {
        assert_eq!(
            convert_ingredient_measurement_to_metric("1 lb 8 oz beef mince"),
            "680 g beef mince"
        );
        assert_eq!(
            convert_ingredient_measurement_to_metric("2 pounds and 4 ounces pork belly"),
            "1 kg pork belly"
        );
        assert_eq!(
            convert_ingredient_measurement_to_metric("1 lb 4 fl oz stock"),
            "454 g 4 fl oz stock"
        );
    }

    #[test]
    fn test_range_with_glyph_and_en_dash() {
        assert_eq!(
            convert_ingredient_measurement_to_metric("3½–4-lb. chicken"),
            "1.6-1.8 kg chicken"
        );
        assert_eq!(
            convert_ingredient_measurement_to_metric("6 to 8 oz pasta"),
            "170-227 g pasta"
        );
    }

    #[test]
    fn test_range_across_units_left_untouched() {
        assert_eq!(
            convert_ingredient_measurement_to_metric("2-3 lb pork shoulder"),
            "2-3 lb pork shoulder"
        );
    }

    #[test]
    fn test_inverted_range_is_read_as_mixed_fraction() {
        assert_eq!(
            convert_ingredient_measurement_to_metric("31/2-4 lb chicken"),
            "1.6-1.8 kg chicken"
        );
    }

    #[test]
    fn test_volume_units_are_not_converted() {
        assert_eq!(
            convert_ingredient_measurement_to_metric("2 cups stock"),
            "2 cups stock"
        );
        assert_eq!(
            convert_ingredient_measurement_to_metric("4 fl oz cream"),
            "4 fl oz cream"
        );
        assert_eq!(
            convert_ingredient_measurement_to_metric("1 tbsp oil"),
            "1 tbsp oil"
        );
    }

    #[test]
    fn test_idempotent_on_metric_text() {
        let once = convert_ingredient_measurement_to_metric("1 lb ground beef");
        assert_eq!(convert_ingredient_measurement_to_metric(&once), once);
        assert_eq!(
            convert_ingredient_measurement_to_metric("500 g flour, 1.2 kg pork"),
            "500 g flour, 1.2 kg pork"
        );
    }

    #[test]
    fn test_no_mid_token_match() {
        assert_eq!(
            convert_ingredient_measurement_to_metric("x2lb bag"),
            "x2lb bag"
        );
        assert_eq!(
            convert_ingredient_measurement_to_metric("1/2lbs"),
            "227 g"
        );
    }

    #[test]
    fn test_parse_number_forms() {
        assert_eq!(parse_number("3"), Some(3.0));
        assert_eq!(parse_number("1.5"), Some(1.5));
        assert_eq!(parse_number("3/4"), Some(0.75));
        assert_eq!(parse_number("1 1/2"), Some(1.5));
        assert_eq!(parse_number("½"), Some(0.5));
        assert_eq!(parse_number("2½"), Some(2.5));
        assert_eq!(parse_number("1/0"), None);
    }
}
