use super::singular::singularize;
use crate::normalize::{decode_entities, translate_fractions};
use regex::Regex;
use std::sync::LazyLock;

static PARENTHETICAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\([^)]*\)?").unwrap());

/// Units and size words that may lead an ingredient line (singular forms).
const MEASURE_WORDS: &[&str] = &[
    "g", "gram", "gr", "kg", "kilogram", "mg", "ml", "milliliter", "millilitre", "l", "liter",
    "litre", "dl", "cl", "cup", "c", "tbsp", "tbs", "tbl", "tablespoon", "tsp", "teaspoon", "t",
    "oz", "ounce", "lb", "pound", "pinch", "dash", "handful", "bunch", "sprig", "clove", "can",
    "tin", "jar", "package", "packet", "pkg", "pack", "bag", "box", "bottle", "stick", "slice",
    "piece", "head", "stalk", "rib", "quart", "qt", "pint", "pt", "gallon", "fl", "fluid",
    "inch", "cm", "mm", "dozen", "x", "large", "small", "medium", "big", "heaping", "heaped",
    "level", "generous", "scant", "about", "approx", "approximately", "a", "an", "of", "few",
    "some", "couple", "knob", "splash", "drizzle", "cube", "sheet", "block", "container",
    "carton", "each", "whole",
];

/// Words that never identify an ingredient on their own.
const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "of", "and", "or", "to", "for", "with", "in", "into", "at", "on", "plus",
    "about", "approx", "approximately", "each", "some", "few", "optional", "taste", "needed",
    "serving", "garnish", "fresh", "freshly", "large", "small", "medium", "big", "extra",
    "heaping", "heaped", "level", "good", "quality", "best", "ripe", "finely", "roughly",
    "coarsely", "thinly", "thickly", "lightly", "chopped", "diced", "sliced", "minced",
    "grated", "peeled", "crushed", "shredded", "cubed", "halved", "quartered", "trimmed",
    "washed", "rinsed", "drained", "softened", "melted", "beaten", "divided", "packed",
    "sifted", "toasted", "julienned", "zested", "juiced", "room", "temperature", "cold",
    "warm", "hot", "boneless", "skinless", "lean", "organic", "raw", "cooked", "uncooked",
    "ground", "whole", "more", "if", "like", "such", "as", "your", "favorite", "favourite",
    "canned", "tinned", "jarred", "dried", "frozen", "dehydrated", "thawed", "can", "tin",
    "jar", "cut", "piece", "into", "inch", "cm", "bite", "sized", "size", "plain", "very",
    "well", "preferably", "store", "bought", "homemade", "thick", "thin", "separated",
];

pub(crate) fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(&token)
}

pub(crate) fn is_measure_token(token: &str) -> bool {
    token.chars().any(|c| c.is_ascii_digit()) || MEASURE_WORDS.contains(&token)
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        other => other,
    }
}

/// Lowercase, fold accents, drop parentheticals, turn punctuation into spaces.
/// Commas survive as segment delimiters.
pub(crate) fn normalize_for_matching(line: &str) -> String {
    let decoded = translate_fractions(&decode_entities(line)).to_lowercase();
    let without_parens = PARENTHETICAL.replace_all(&decoded, " ");
    without_parens
        .chars()
        .filter(|c| !matches!(c, '\'' | '’' | '‘'))
        .map(|c| {
            let c = fold_accent(c);
            if c.is_alphanumeric() || c == ',' {
                c
            } else {
                ' '
            }
        })
        .collect()
}

/// Singularized tokens of one comma segment.
pub(crate) fn segment_tokens(segment: &str) -> Vec<String> {
    segment.split_whitespace().map(singularize).collect()
}

/// Comma segments of a normalized line, each as singularized tokens.
/// Empty segments are skipped.
pub(crate) fn segments(normalized: &str) -> Vec<Vec<String>> {
    normalized
        .split(',')
        .map(segment_tokens)
        .filter(|tokens| !tokens.is_empty())
        .collect()
}

/// Phrase key for taxonomy terms: same pipeline as ingredient lines, commas ignored.
pub(crate) fn phrase_key(term: &str) -> String {
    normalize_for_matching(term)
        .replace(',', " ")
        .split_whitespace()
        .map(singularize)
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn strip_leading_measures(tokens: &[String]) -> &[String] {
    let start = tokens
        .iter()
        .position(|t| !is_measure_token(t))
        .unwrap_or(tokens.len());
    &tokens[start..]
}
