use html_escape::decode_html_entities;
use regex::Regex;
use std::sync::LazyLock;

/// Unicode vulgar fractions and their ASCII spelling.
pub(crate) const VULGAR_FRACTIONS: &[(char, &str)] = &[
    ('½', "1/2"),
    ('⅓', "1/3"),
    ('⅔', "2/3"),
    ('¼', "1/4"),
    ('¾', "3/4"),
    ('⅕', "1/5"),
    ('⅖', "2/5"),
    ('⅗', "3/5"),
    ('⅘', "4/5"),
    ('⅙', "1/6"),
    ('⅚', "5/6"),
    ('⅐', "1/7"),
    ('⅛', "1/8"),
    ('⅜', "3/8"),
    ('⅝', "5/8"),
    ('⅞', "7/8"),
    ('⅑', "1/9"),
    ('⅒', "1/10"),
];

static DOUBLE_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(\s*\(").unwrap());
static DOUBLE_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\)\s*\)").unwrap());
static EMPTY_PARENS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(\s*\)").unwrap());
static PAREN_INNER_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(\s+").unwrap());
static PAREN_INNER_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+\)").unwrap());
static CHECKBOX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[\s*[xX✓✔]?\s*\]\s*").unwrap());

pub fn vulgar_fraction(c: char) -> Option<&'static str> {
    VULGAR_FRACTIONS
        .iter()
        .find(|(glyph, _)| *glyph == c)
        .map(|(_, ascii)| *ascii)
}

/// Decode named, decimal and hex HTML entities.
///
/// Decoded twice: a lot of recipe plugins double-escape (`&amp;frac12;`).
pub fn decode_entities(text: &str) -> String {
    decode_html_entities(&decode_html_entities(text))
        .chars()
        .filter(|c| !matches!(c, '\u{200b}' | '\u{200c}' | '\u{200d}' | '\u{feff}' | '\u{ad}'))
        .collect()
}

/// `½` -> `1/2`, `3½` -> `3 1/2`, fraction slash -> `/`.
pub fn translate_fractions(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        if c == '⁄' {
            out.push('/');
            continue;
        }
        match vulgar_fraction(c) {
            Some(ascii) => {
                if out.chars().last().is_some_and(|prev| prev.is_ascii_digit()) {
                    out.push(' ');
                }
                out.push_str(ascii);
            }
            None => out.push(c),
        }
    }
    out
}

fn is_leading_glyph(c: char) -> bool {
    matches!(
        c,
        '•' | '·'
            | '▪'
            | '▫'
            | '◦'
            | '‣'
            | '∙'
            | '●'
            | '○'
            | '◆'
            | '◇'
            | '►'
            | '▸'
            | '▶'
            | '➤'
            | '→'
            | '*'
            | '-'
            | '–'
            | '—'
            | '+'
            | '~'
            | '>'
            | '▢'
            | '☐'
            | '☑'
            | '☒'
            | '□'
            | '■'
            | '✓'
            | '✔'
            | '✗'
            | '✘'
    ) || ('\u{2500}'..='\u{259F}').contains(&c)
}

/// Remove bullets, checkboxes and box-drawing characters from the start of a line.
pub fn strip_leading_glyphs(text: &str) -> &str {
    let mut rest = text.trim_start();
    loop {
        let before = rest.len();
        rest = rest.trim_start_matches(|c: char| is_leading_glyph(c) || c.is_whitespace());
        if let Some(m) = CHECKBOX.find(rest) {
            rest = &rest[m.end()..];
        }
        if rest.len() == before {
            return rest;
        }
    }
}

/// Collapse duplicated and empty parentheses, then balance what is left.
///
/// A dangling `(` at the end of the line is removed and excess trailing `)`
/// are trimmed. Excess opens are never trimmed: an unmatched `(` that has
/// text after it gets its `)` appended at the end of the line.
pub fn balance_parens(text: &str) -> String {
    let mut s = text.to_string();
    loop {
        let next = DOUBLE_OPEN.replace_all(&s, "(");
        let next = DOUBLE_CLOSE.replace_all(&next, ")");
        let next = EMPTY_PARENS.replace_all(&next, "").into_owned();
        if next == s {
            break;
        }
        s = next;
    }

    let mut s = s.trim_end().to_string();
    while s.ends_with('(') {
        s.pop();
        s.truncate(s.trim_end().len());
    }

    let opens = s.chars().filter(|&c| c == '(').count();
    let mut closes = s.chars().filter(|&c| c == ')').count();
    while closes > opens && s.ends_with(')') {
        s.pop();
        s.truncate(s.trim_end().len());
        closes -= 1;
    }

    let mut depth: usize = 0;
    for c in s.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    for _ in 0..depth {
        s.push(')');
    }

    let s = PAREN_INNER_OPEN.replace_all(&s, "(");
    PAREN_INNER_CLOSE.replace_all(&s, ")").into_owned()
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Full cleanup of one raw line, in fixed order: entities and fraction glyphs,
/// leading glyphs, parentheses, whitespace.
pub fn clean_line(raw: &str) -> String {
    let decoded = translate_fractions(&decode_entities(raw));
    let collapsed = collapse_whitespace(&decoded);
    let stripped = strip_leading_glyphs(&collapsed);
    collapse_whitespace(&balance_parens(stripped))
}
