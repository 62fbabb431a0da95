//! Cleanup of raw OCR text into a recipe draft.
//!
//! Each line gets a quality score from cheap lexical signals; low scorers are
//! dropped. When at least two anchor lines exist, everything before the first
//! anchor and after the last one is treated as header/footer noise.

use crate::model::{IngredientSection, RecipeDraft};
use crate::normalize::{clean_line, collapse_whitespace};
use crate::sections::{heading_kind, split_plain_text, SplitSections};
use regex::Regex;
use std::sync::LazyLock;

const ANCHOR_SCORE: f64 = 2.5;
const MIN_ANCHORS: usize = 2;
const MAX_TITLE_WORDS: usize = 8;

static MEASUREMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\d\s*(?:cups?|c\.|tbsps?|tablespoons?|tsps?|teaspoons?|g|grams?|kg|kilograms?|mg|ml|millilit(?:er|re)s?|l|lit(?:er|re)s?|oz|ounces?|lbs?|pounds?|pinch(?:es)?|cloves?|cans?|sticks?|quarts?|pints?|dash(?:es)?)\b",
    )
    .unwrap()
});
static SERVINGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:serves|servings|yield|makes)\b\s*:?\s*(\d+(?:\s*(?:-|–|to)\s*\d+)?(?:\s+(?:people|persons|servings|portions|pieces|cookies|muffins|loaves|loaf))?)",
    )
    .unwrap()
});
static PREP_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\bprep(?:aration)?(?:\s+time)?\s*:?\s*(\d+(?:\.\d+)?\s*(?:hours?|hrs?|h|minutes?|mins?|m)\b(?:\s*(?:and\s*)?\d+\s*(?:minutes?|mins?|m)\b)?)",
    )
    .unwrap()
});
// `Bake 20 minutes until golden` is an instruction, so cook/bake need
// "time" or a colon.
static COOK_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:cook(?:ing)?|bak(?:e|ing))(?:\s+time\s*:?|\s*:)\s*(\d+(?:\.\d+)?\s*(?:hours?|hrs?|h|minutes?|mins?|m)\b(?:\s*(?:and\s*)?\d+\s*(?:minutes?|mins?|m)\b)?)",
    )
    .unwrap()
});

const ACTION_VERBS: &[&str] = &[
    "add", "arrange", "bake", "beat", "blend", "boil", "braise", "bring", "broil", "brown",
    "chill", "chop", "combine", "cook", "cool", "cover", "cream", "cut", "dice", "drain",
    "drizzle", "fold", "fry", "garnish", "grate", "grease", "grill", "heat", "knead", "layer",
    "let", "marinate", "mash", "melt", "mince", "mix", "peel", "place", "pour", "preheat",
    "reduce", "refrigerate", "remove", "rinse", "roast", "roll", "saute", "sauté", "season",
    "serve", "shred", "simmer", "slice", "spread", "sprinkle", "stir", "strain", "toss",
    "transfer", "whisk",
];

/// Result of OCR cleanup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OcrParse {
    pub draft: RecipeDraft,
    /// Lines that survived scoring and windowing, cleaned.
    pub kept_lines: Vec<String>,
    /// Lines discarded as noise, cleaned.
    pub dropped_lines: Vec<String>,
    /// Lines consumed as servings or time metadata.
    pub metadata_lines: Vec<String>,
}

fn words(line: &str) -> impl Iterator<Item = &str> {
    line.split_whitespace()
}

fn alphabetic_words(line: &str) -> usize {
    words(line)
        .filter(|w| {
            let w = w.trim_matches(|c: char| !c.is_alphanumeric());
            !w.is_empty() && w.chars().all(char::is_alphabetic)
        })
        .count()
}

fn is_heading_line(line: &str) -> bool {
    heading_kind(line).is_some() && words(line).count() <= 4 && !line.trim_end().ends_with('.')
}

fn has_action_verb(line: &str) -> bool {
    words(line).any(|w| {
        let w = w
            .trim_matches(|c: char| !c.is_alphabetic())
            .to_lowercase();
        ACTION_VERBS.contains(&w.as_str())
    })
}

/// Lexical quality score of a single cleaned OCR line.
pub fn score_line(line: &str) -> f64 {
    let mut score = 0.0;
    if MEASUREMENT.is_match(line) {
        score += 2.0;
    }
    if has_action_verb(line) {
        score += 1.5;
    }
    if is_heading_line(line) {
        score += 2.0;
    }
    if alphabetic_words(line) >= 3 {
        score += 1.0;
    }

    let letters = line.chars().filter(|c| c.is_alphabetic()).count();
    let digits = line.chars().filter(|c| c.is_ascii_digit()).count();
    let visible = line.chars().filter(|c| !c.is_whitespace()).count();
    let symbols = line
        .chars()
        .filter(|c| !c.is_alphanumeric() && !c.is_whitespace())
        .count();

    if letters == 0 {
        score -= 2.0;
    } else if digits as f64 / letters as f64 > 1.5 {
        score -= 1.0;
    }
    if visible > 0 && symbols as f64 / visible as f64 > 0.3 {
        score -= 2.0;
    }
    let tokens: Vec<&str> = words(line).collect();
    if tokens.len() >= 2 {
        let short = tokens.iter().filter(|t| t.chars().count() <= 2).count();
        if short as f64 / tokens.len() as f64 > 0.6 {
            score -= 1.5;
        }
    }
    score
}

fn is_anchor(line: &str, score: f64) -> bool {
    score >= ANCHOR_SCORE || is_heading_line(line)
}

#[derive(Default)]
struct TimeFields {
    servings: Option<String>,
    prep_time: Option<String>,
    cook_time: Option<String>,
}

/// Pull servings and times out of `line`. Returns true when little else is
/// left on the line, i.e. it should not be treated as recipe content.
fn extract_metadata(line: &str, fields: &mut TimeFields) -> bool {
    let mut matched = false;
    let mut rest = line.to_string();
    for (regex, slot) in [
        (&*SERVINGS, &mut fields.servings),
        (&*PREP_TIME, &mut fields.prep_time),
        (&*COOK_TIME, &mut fields.cook_time),
    ] {
        if let Some(caps) = regex.captures(line) {
            matched = true;
            if slot.is_none() {
                *slot = Some(collapse_whitespace(&caps[1]));
            }
            rest = regex.replace_all(&rest, " ").into_owned();
        }
    }
    matched && alphabetic_words(&rest) < 3
}

fn is_title_like(line: &str) -> bool {
    let count = words(line).count();
    (1..=MAX_TITLE_WORDS).contains(&count)
        && line.chars().any(char::is_alphabetic)
        && !line.chars().any(|c| c.is_ascii_digit())
        && heading_kind(line).is_none()
}

/// Clean raw OCR text into a draft.
pub fn parse_ocr_text(text: &str) -> OcrParse {
    let mut out = OcrParse::default();
    let mut fields = TimeFields::default();

    let mut scored: Vec<(String, f64)> = Vec::new();
    for raw in text.lines() {
        let line = clean_line(raw);
        if line.is_empty() {
            continue;
        }
        if extract_metadata(&line, &mut fields) {
            out.metadata_lines.push(line);
            continue;
        }
        let score = score_line(&line);
        scored.push((line, score));
    }

    let anchors: Vec<usize> = scored
        .iter()
        .enumerate()
        .filter(|(_, (line, score))| is_anchor(line, *score))
        .map(|(i, _)| i)
        .collect();
    let window = match (anchors.first(), anchors.last()) {
        (Some(&first), Some(&last)) if anchors.len() >= MIN_ANCHORS => first..=last,
        _ => 0..=scored.len().saturating_sub(1),
    };

    // The title usually sits just above the first anchor, outside the window.
    let title = scored[..*window.start()]
        .iter()
        .rev()
        .find(|(line, score)| *score >= 0.0 && is_title_like(line))
        .map(|(line, _)| line.clone());

    for (index, (line, score)) in scored.into_iter().enumerate() {
        if score >= 0.0 && window.contains(&index) {
            out.kept_lines.push(line);
        } else {
            out.dropped_lines.push(line);
        }
    }

    let mut sections = split_plain_text(&out.kept_lines);
    if !sections.has_recipe_sections() {
        sections = classify_without_headings(&out.kept_lines);
    }
    let title = title.or_else(|| {
        let index = sections.preamble.iter().position(|l| is_title_like(l))?;
        Some(sections.preamble.remove(index))
    });
    if let Some(title) = &title {
        sections.preamble.retain(|l| l != title);
    }
    sections.title = title;

    let mut draft = sections.into_draft();
    draft.servings = fields.servings;
    draft.prep_time = fields.prep_time;
    draft.cook_time = fields.cook_time;
    out.draft = draft;
    out
}

/// Fallback for scans without section headings: measured lines are
/// ingredients, verb-led or long lines are instructions.
fn classify_without_headings(lines: &[String]) -> SplitSections {
    let mut sections = SplitSections::default();
    let mut ingredients = Vec::new();
    for line in lines {
        let starts_with_verb = words(line).next().is_some_and(has_action_verb);
        if MEASUREMENT.is_match(line) && !starts_with_verb {
            ingredients.push(line.clone());
        } else if starts_with_verb || words(line).count() >= 6 {
            sections.instructions.push(line.clone());
        } else {
            sections.preamble.push(line.clone());
        }
    }
    if !ingredients.is_empty() {
        sections.ingredient_sections.push(IngredientSection {
            title: None,
            items: ingredients,
        });
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCAN: &str = "SCANNED BY KITCHEN CAM 3000
## ~~ ##
Grandma's Apple Crumble
Serves 6 | Prep 15 min | Cook: 40 min
Ingredients
4 apples, peeled and sliced
1/2 cup brown sugar
1 cup oats
Method
Preheat the oven to 180C.
Toss the apples with sugar and spread in a dish.
Sprinkle the oats over and bake until golden.
Page 12 of 200 ||| %%
";

    #[test]
    fn test_line_scores() {
        assert_eq!(score_line("1/2 cup brown sugar"), 3.0);
        assert_eq!(score_line("Preheat the oven to 180C."), 2.5);
        assert_eq!(score_line("Ingredients"), 2.0);
        assert!(score_line("~~ ## ~~") < 0.0);
        assert!(score_line("Page 12 of 200 ||| %%") < 0.0);
    }

    #[test]
    fn test_parse_scan() {
        let parsed = parse_ocr_text(SCAN);
        let draft = &parsed.draft;
        assert_eq!(draft.title.as_deref(), Some("Grandma's Apple Crumble"));
        assert_eq!(
            draft.ingredients,
            vec!["4 apples, peeled and sliced", "1/2 cup brown sugar", "1 cup oats"]
        );
        assert_eq!(draft.instructions.len(), 3);
        assert_eq!(draft.instructions[0], "Preheat the oven to 180C.");
        assert_eq!(draft.servings.as_deref(), Some("6"));
        assert_eq!(draft.prep_time.as_deref(), Some("15 min"));
        assert_eq!(draft.cook_time.as_deref(), Some("40 min"));

        assert!(parsed
            .dropped_lines
            .contains(&"SCANNED BY KITCHEN CAM 3000".to_string()));
        assert!(parsed.dropped_lines.contains(&"## ~~ ##".to_string()));
        assert_eq!(parsed.metadata_lines.len(), 1);
    }

    #[test]
    fn test_instruction_with_bake_time_stays_content() {
        let parsed =
            parse_ocr_text("Ingredients\n2 cups flour\nMethod\nBake 20 minutes until golden.\n");
        assert_eq!(parsed.draft.instructions, vec!["Bake 20 minutes until golden."]);
        assert!(parsed.draft.cook_time.is_none());
    }

    #[test]
    fn test_scan_without_headings() {
        let parsed = parse_ocr_text(
            "Quick Oats\n1 cup oats\n2 cups milk\nSimmer the oats in the milk for five minutes.\n",
        );
        assert_eq!(parsed.draft.title.as_deref(), Some("Quick Oats"));
        assert_eq!(parsed.draft.ingredients, vec!["1 cup oats", "2 cups milk"]);
        assert_eq!(parsed.draft.instructions.len(), 1);
    }

    #[test]
    fn test_empty_text() {
        let parsed = parse_ocr_text("   \n\n");
        assert!(!parsed.draft.has_content());
        assert!(parsed.kept_lines.is_empty());
    }
}
