use super::text::{clean_line, collapse_whitespace};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static NOTE_PAREN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\(\s*\*?\s*([^()]*?\bnotes?\b[^()]*?)\s*\)").unwrap());
static SPACE_BEFORE_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+([,;.])").unwrap());
static STEP_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:step\s*\d+\s*[:.)\-–]?\s*|\d{1,2}\s*[.)]\s+)").unwrap()
});
static METADATA_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:course|cuisine|keywords?|servings?|serves|yield|prep(?:aration)?\s+time|cook(?:ing)?\s+time|total\s+time|calories|author|difficulty)\b",
    )
    .unwrap()
});
static NOTES_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^notes?\b\s*[:\-–]?\s*(.*)$").unwrap());

/// A cleaned line plus the note annotations pulled out of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanedLine {
    pub text: String,
    pub notes: Vec<String>,
}

/// A batch of cleaned lines with the notes routed out of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanedLines {
    pub lines: Vec<String>,
    pub notes: Vec<String>,
}

/// `clean_line`, then move `(see note)`-style parentheticals into notes.
pub fn clean_ingredient_line(raw: &str) -> CleanedLine {
    let cleaned = clean_line(raw);
    let mut notes = Vec::new();
    for caps in NOTE_PAREN.captures_iter(&cleaned) {
        let note = collapse_whitespace(&caps[1]);
        if !note.is_empty() {
            notes.push(note);
        }
    }
    if notes.is_empty() {
        return CleanedLine {
            text: cleaned,
            notes,
        };
    }

    let without = NOTE_PAREN.replace_all(&cleaned, " ");
    let without = collapse_whitespace(&without);
    let text = SPACE_BEFORE_PUNCT
        .replace_all(&without, "$1")
        .trim_end_matches([',', ';'])
        .trim()
        .to_string();
    CleanedLine { text, notes }
}

pub fn clean_ingredient_lines<S: AsRef<str>>(lines: &[S]) -> CleanedLines {
    let mut out = CleanedLines::default();
    for line in lines {
        let cleaned = clean_ingredient_line(line.as_ref());
        if !cleaned.text.is_empty() {
            out.lines.push(cleaned.text);
        }
        out.notes.extend(cleaned.notes);
    }
    out
}

/// Clean instruction lines: strip step numbering, drop recipe-card metadata
/// lines and route note lines into the notes stream.
///
/// A bare `Notes` heading sends every following line to notes.
pub fn clean_instruction_lines<S: AsRef<str>>(lines: &[S]) -> CleanedLines {
    let mut out = CleanedLines::default();
    let mut in_notes = false;

    for raw in lines {
        let cleaned = clean_line(raw.as_ref());
        let line = STEP_PREFIX.replace(&cleaned, "").trim().to_string();
        if line.is_empty() {
            continue;
        }

        if let Some(caps) = NOTES_LINE.captures(&line) {
            let rest = caps[1].trim();
            if rest.is_empty() {
                in_notes = true;
            } else {
                out.notes.push(rest.to_string());
            }
            continue;
        }

        if in_notes {
            out.notes.push(line);
            continue;
        }

        if is_metadata_line(&line) {
            continue;
        }

        out.lines.push(line);
    }
    out
}

fn is_metadata_line(line: &str) -> bool {
    METADATA_LINE.is_match(line) && (line.contains(':') || line.chars().count() <= 40)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_note_parenthetical() {
        let cleaned = clean_ingredient_line("2 cups flour (see note), sifted");
        assert_eq!(cleaned.text, "2 cups flour, sifted");
        assert_eq!(cleaned.notes, vec!["see note".to_string()]);

        let cleaned = clean_ingredient_line("1 tsp salt (*see notes below)");
        assert_eq!(cleaned.text, "1 tsp salt");
        assert_eq!(cleaned.notes, vec!["see notes below".to_string()]);
    }

    #[test]
    fn test_keeps_ordinary_parenthetical() {
        let cleaned = clean_ingredient_line("1 can (400g) chickpeas");
        assert_eq!(cleaned.text, "1 can (400g) chickpeas");
        assert!(cleaned.notes.is_empty());
    }

    #[test]
    fn test_clean_ingredient_lines_drops_empty() {
        let cleaned = clean_ingredient_lines(&["• ", "1 egg", "&nbsp;"]);
        assert_eq!(cleaned.lines, vec!["1 egg".to_string()]);
    }

    #[test]
    fn test_instruction_cleanup() {
        let cleaned = clean_instruction_lines(&[
            "1. Preheat the oven to 200C.",
            "Step 2: Mix the flour and butter.",
            "Course: Dessert",
            "Prep Time 10 minutes",
            "Notes: Keeps for 3 days.",
            "3) Bake for 20 minutes.",
        ]);
        assert_eq!(
            cleaned.lines,
            vec![
                "Preheat the oven to 200C.".to_string(),
                "Mix the flour and butter.".to_string(),
                "Bake for 20 minutes.".to_string(),
            ]
        );
        assert_eq!(cleaned.notes, vec!["Keeps for 3 days.".to_string()]);
    }

    #[test]
    fn test_bare_notes_heading_is_sticky() {
        let cleaned = clean_instruction_lines(&[
            "Serve warm.",
            "Notes",
            "Use any berries you like.",
            "Freezes well.",
        ]);
        assert_eq!(cleaned.lines, vec!["Serve warm.".to_string()]);
        assert_eq!(cleaned.notes.len(), 2);
    }

    #[test]
    fn test_long_instruction_starting_with_keyword_is_kept() {
        let cleaned = clean_instruction_lines(&[
            "Serves as a great base for soups when thinned with a little extra stock",
        ]);
        assert_eq!(cleaned.lines.len(), 1);
    }
}
