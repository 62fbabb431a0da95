//! Leading-quantity parsing and per-unit summation for shopping lines.

use crate::normalize::{parse_number, translate_fractions};
use regex::Regex;
use std::sync::LazyLock;

static QUANTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+\s+\d+/\d+|\d+/\d+|\d+(?:\.\d+)?)\s*([A-Za-z]+\.?)?").unwrap()
});
static MULTIPLIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\d+)\s*[x×]\s*").unwrap());
static RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^((?:\d+\s+)?[\d/.]+\s*(?:[-–—]|to|or)\s*(?:\d+\s+)?[\d/.]+)\s*([a-z]+\.?)?",
    )
    .unwrap()
});
static VAGUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^((?:a|an)\s+(?:few|couple(?:\s+of)?|pinch|dash|handful|splash|drizzle|knob|little|bit|sprinkle)|some|several|pinch|dash|handful)\b",
    )
    .unwrap()
});

/// Canonical unit symbol for a raw unit token, lowercase and without a
/// trailing dot.
fn canonical_unit(token: &str) -> Option<&'static str> {
    let unit = match token {
        "g" | "gr" | "gram" | "grams" | "gramme" | "grammes" => "g",
        "kg" | "kgs" | "kilo" | "kilos" | "kilogram" | "kilograms" => "kg",
        "mg" | "milligram" | "milligrams" => "mg",
        "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => "ml",
        "l" | "liter" | "liters" | "litre" | "litres" => "l",
        "cup" | "cups" | "c" => "cup",
        "tbsp" | "tbsps" | "tbs" | "tbl" | "tablespoon" | "tablespoons" => "tbsp",
        "tsp" | "tsps" | "teaspoon" | "teaspoons" => "tsp",
        "oz" | "ounce" | "ounces" => "oz",
        "lb" | "lbs" | "pound" | "pounds" => "lb",
        "clove" | "cloves" => "clove",
        "can" | "cans" | "tin" | "tins" => "can",
        "pinch" | "pinches" => "pinch",
        "dash" | "dashes" => "dash",
        "bunch" | "bunches" => "bunch",
        "sprig" | "sprigs" => "sprig",
        "slice" | "slices" => "slice",
        "stick" | "sticks" => "stick",
        "piece" | "pieces" => "piece",
        "package" | "packages" | "pkg" | "packet" | "packets" => "package",
        "jar" | "jars" => "jar",
        "handful" | "handfuls" => "handful",
        "pint" | "pints" | "pt" => "pint",
        "quart" | "quarts" | "qt" => "quart",
        _ => return None,
    };
    Some(unit)
}

/// The quantity a shopping line starts with.
#[derive(Debug, Clone, PartialEq)]
pub enum Amount {
    Quantity {
        value: f64,
        unit: Option<&'static str>,
    },
    /// A leading amount that cannot be summed, kept as written.
    Verbatim(String),
}

/// Parse the leading amounts of `line`: one range or vague fragment, or a run
/// of consecutive quantities such as `1 lb 8 oz`. A count multiplier as in
/// `2 x 400g` scales the quantity after it. Empty when the line has no amount.
pub fn parse_amounts(line: &str) -> Vec<Amount> {
    let text = translate_fractions(line);
    let text = text.trim();

    if let Some(caps) = RANGE.captures(text) {
        let range = caps[1].trim();
        let fragment = match caps.get(2).map(|u| u.as_str()) {
            Some(unit) if canonical_unit(&unit.trim_end_matches('.').to_lowercase()).is_some() => {
                format!("{range} {unit}")
            }
            _ => range.to_string(),
        };
        return vec![Amount::Verbatim(fragment)];
    }

    let mut amounts = Vec::new();
    let mut rest = text;
    loop {
        let Some((value, unit, remainder)) = leading_quantity(rest) else {
            break;
        };
        // Only a unit-bearing quantity can be followed by another one.
        let chained = !amounts.is_empty();
        if chained && unit.is_none() {
            break;
        }
        amounts.push(Amount::Quantity { value, unit });
        if unit.is_none() {
            break;
        }
        rest = remainder.trim_start();
    }
    if !amounts.is_empty() {
        return amounts;
    }
    VAGUE
        .captures(text)
        .map(|caps| Amount::Verbatim(caps[1].to_lowercase()))
        .into_iter()
        .collect()
}

/// One quantity at the start of `text`, with its unit and the unparsed rest.
fn leading_quantity(text: &str) -> Option<(f64, Option<&'static str>, &str)> {
    if let Some(caps) = MULTIPLIER.captures(text) {
        let whole = caps.get(0)?;
        if let Some((value, unit @ Some(_), rest)) = leading_quantity(&text[whole.end()..]) {
            let count = parse_number(&caps[1])?;
            return Some((count * value, unit, rest));
        }
    }
    let caps = QUANTITY.captures(text)?;
    let value = parse_number(&caps[1])?;
    let unit = caps
        .get(2)
        .and_then(|u| canonical_unit(&u.as_str().trim_end_matches('.').to_lowercase()));
    let end = match (unit, caps.get(2)) {
        (Some(_), Some(token)) => token.end(),
        _ => caps.get(1)?.end(),
    };
    Some((value, unit, &text[end..]))
}

/// Running totals for one shopping item: numeric sums per unit in first-seen
/// order, then the distinct verbatim fragments.
#[derive(Debug, Clone, Default)]
pub struct AmountTotals {
    sums: Vec<(Option<&'static str>, f64)>,
    verbatim: Vec<String>,
}

impl AmountTotals {
    pub fn add(&mut self, amount: Amount) {
        match amount {
            Amount::Quantity { value, unit } => {
                match self.sums.iter_mut().find(|(u, _)| *u == unit) {
                    Some((_, total)) => *total += value,
                    None => self.sums.push((unit, value)),
                }
            }
            Amount::Verbatim(fragment) => {
                if !self.verbatim.contains(&fragment) {
                    self.verbatim.push(fragment);
                }
            }
        }
    }

    /// `"600 g + 2 cup + a pinch"`, or `None` when nothing was added.
    pub fn summary(&self) -> Option<String> {
        let parts: Vec<String> = self
            .sums
            .iter()
            .map(|(unit, value)| match unit {
                Some(unit) => format!("{} {}", format_quantity(*value), unit),
                None => format_quantity(*value),
            })
            .chain(self.verbatim.iter().cloned())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" + "))
        }
    }
}

/// Two decimals at most, no trailing zeros.
pub fn format_quantity(value: f64) -> String {
    let rounded = format!("{:.2}", value);
    rounded
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_and_spaced_units() {
        assert_eq!(
            parse_amounts("200g mushrooms"),
            vec![Amount::Quantity {
                value: 200.0,
                unit: Some("g")
            }]
        );
        assert_eq!(
            parse_amounts("2 Tablespoons olive oil"),
            vec![Amount::Quantity {
                value: 2.0,
                unit: Some("tbsp")
            }]
        );
        assert_eq!(
            parse_amounts("1½ cups milk"),
            vec![Amount::Quantity {
                value: 1.5,
                unit: Some("cup")
            }]
        );
        assert_eq!(
            parse_amounts("3 eggs"),
            vec![Amount::Quantity {
                value: 3.0,
                unit: None
            }]
        );
    }

    #[test]
    fn test_consecutive_quantities() {
        assert_eq!(
            parse_amounts("1 lb 8 oz beef mince"),
            vec![
                Amount::Quantity {
                    value: 1.0,
                    unit: Some("lb")
                },
                Amount::Quantity {
                    value: 8.0,
                    unit: Some("oz")
                },
            ]
        );
        assert_eq!(
            parse_amounts("1 x 400g tin chopped tomatoes"),
            vec![Amount::Quantity {
                value: 400.0,
                unit: Some("g")
            }]
        );
        assert_eq!(
            parse_amounts("2x 400g tins chickpeas"),
            vec![Amount::Quantity {
                value: 800.0,
                unit: Some("g")
            }]
        );
        // A bare count ends the run.
        assert_eq!(
            parse_amounts("2 cups 3 eggs"),
            vec![Amount::Quantity {
                value: 2.0,
                unit: Some("cup")
            }]
        );
    }

    #[test]
    fn test_ranges_and_vague_amounts_are_verbatim() {
        assert_eq!(
            parse_amounts("2-3 cloves garlic"),
            vec![Amount::Verbatim("2-3 cloves".into())]
        );
        assert_eq!(
            parse_amounts("a pinch of salt"),
            vec![Amount::Verbatim("a pinch".into())]
        );
        assert!(parse_amounts("salt to taste").is_empty());
    }

    #[test]
    fn test_summary_formatting() {
        let mut totals = AmountTotals::default();
        totals.add(Amount::Quantity {
            value: 0.5,
            unit: Some("cup"),
        });
        totals.add(Amount::Verbatim("a pinch".into()));
        totals.add(Amount::Quantity {
            value: 1.0,
            unit: Some("cup"),
        });
        totals.add(Amount::Quantity {
            value: 3.0,
            unit: None,
        });
        totals.add(Amount::Verbatim("a pinch".into()));
        assert_eq!(totals.summary().as_deref(), Some("1.5 cup + 3 + a pinch"));
        assert_eq!(AmountTotals::default().summary(), None);
        assert_eq!(format_quantity(600.0), "600");
        assert_eq!(format_quantity(0.333333), "0.33");
    }
}
