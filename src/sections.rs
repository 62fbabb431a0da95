//! Heading-keyword section splitting for markdown and plain text.
//!
//! Markdown headings (`## Ingredients`), bold lines (`**Method**`) and bare
//! keyword lines (`Directions:`) all switch the active section. A deeper
//! non-keyword heading continues the active section; inside the ingredients
//! section it opens a titled group.

use crate::model::{IngredientSection, RecipeDraft};
use crate::normalize::{
    clean_ingredient_lines, clean_instruction_lines, clean_line, collapse_whitespace,
    strip_leading_glyphs,
};
use log::debug;
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use serde::{Deserialize, Deserializer};
use serde_yaml::Value as YamlValue;

const MAX_HEADING_WORDS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Ingredients,
    Instructions,
    Notes,
    Tags,
}

/// Section named by a heading, if its text is a known keyword heading.
///
/// Accepts `Ingredients`, `Ingredients for the cake`, `Cooking Instructions:`
/// and similar; anything longer than a short phrase is treated as prose.
pub fn heading_kind(text: &str) -> Option<SectionKind> {
    let lowered = text
        .trim()
        .trim_matches(|c: char| c == ':' || c == '*' || c == '#' || c.is_whitespace())
        .to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    if words.is_empty() || words.len() > MAX_HEADING_WORDS {
        return None;
    }
    if words.iter().any(|w| w.chars().any(|c| c.is_ascii_digit())) {
        return None;
    }

    let kind_of = |word: &str| match word {
        "ingredients" | "ingredient" => Some(SectionKind::Ingredients),
        "directions" | "method" | "instructions" | "steps" | "preparation" => {
            Some(SectionKind::Instructions)
        }
        "notes" | "note" | "tips" => Some(SectionKind::Notes),
        "tags" => Some(SectionKind::Tags),
        _ => None,
    };
    kind_of(words[0]).or_else(|| words.last().and_then(|w| kind_of(w)))
}

/// Keys read from a leading `---` frontmatter block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Frontmatter {
    #[serde(deserialize_with = "yaml_text")]
    pub title: Option<String>,
    /// A YAML list or a comma separated string.
    #[serde(alias = "keywords", deserialize_with = "yaml_tags")]
    pub tags: Vec<String>,
    #[serde(alias = "serves", alias = "yield", deserialize_with = "yaml_text")]
    pub servings: Option<String>,
}

fn scalar_text(value: &YamlValue) -> Option<String> {
    let text = match value {
        YamlValue::String(s) => s.trim().to_string(),
        YamlValue::Number(n) => n.to_string(),
        YamlValue::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn yaml_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(scalar_text(&YamlValue::deserialize(deserializer)?))
}

fn yaml_tags<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let mut tags = Vec::new();
    match YamlValue::deserialize(deserializer)? {
        YamlValue::String(s) => s.split(',').for_each(|tag| push_tag(&mut tags, tag)),
        YamlValue::Sequence(items) => items
            .iter()
            .filter_map(scalar_text)
            .for_each(|tag| push_tag(&mut tags, &tag)),
        _ => {}
    }
    Ok(tags)
}

/// Split a leading frontmatter block off `content`.
///
/// Returns the parsed keys and the remaining body. Content without a closed
/// block is returned whole; a block that is not valid YAML is dropped.
pub fn strip_frontmatter(content: &str) -> (Frontmatter, &str) {
    let trimmed = content.trim_start_matches(['\u{feff}', '\n', '\r', ' ']);
    let Some(after_open) = trimmed
        .strip_prefix("---\n")
        .or_else(|| trimmed.strip_prefix("---\r\n"))
    else {
        return (Frontmatter::default(), content);
    };

    let mut offset = 0;
    let mut block_end = None;
    for line in after_open.split_inclusive('\n') {
        if line.trim_end() == "---" {
            block_end = Some((offset, offset + line.len()));
            break;
        }
        offset += line.len();
    }
    let Some((end, body_start)) = block_end else {
        return (Frontmatter::default(), content);
    };

    (parse_frontmatter(&after_open[..end]), &after_open[body_start..])
}

fn parse_frontmatter(block: &str) -> Frontmatter {
    if block.trim().is_empty() {
        return Frontmatter::default();
    }
    serde_yaml::from_str(block).unwrap_or_else(|e| {
        debug!("Ignoring unparseable frontmatter: {}", e);
        Frontmatter::default()
    })
}

fn push_tag(tags: &mut Vec<String>, raw: &str) {
    let tag = collapse_whitespace(raw.trim().trim_start_matches('#'));
    if !tag.is_empty() && !tags.iter().any(|t| t.eq_ignore_ascii_case(&tag)) {
        tags.push(tag);
    }
}

/// Raw section contents as found in the document, before normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitSections {
    pub title: Option<String>,
    pub preamble: Vec<String>,
    pub ingredient_sections: Vec<IngredientSection>,
    pub instructions: Vec<String>,
    pub notes: Vec<String>,
    pub tags: Vec<String>,
}

impl SplitSections {
    pub fn has_recipe_sections(&self) -> bool {
        self.ingredient_sections.iter().any(|s| !s.items.is_empty())
            || !self.instructions.is_empty()
    }

    /// Normalize every section into a draft.
    ///
    /// The first preamble paragraph becomes the description.
    pub fn into_draft(self) -> RecipeDraft {
        let mut notes = Vec::new();
        let mut ingredients = Vec::new();
        let mut ingredient_sections = Vec::new();
        for section in self.ingredient_sections {
            let cleaned = clean_ingredient_lines(&section.items);
            notes.extend(cleaned.notes);
            ingredients.extend(cleaned.lines.iter().cloned());
            ingredient_sections.push(IngredientSection {
                title: section.title.map(|t| clean_line(&t)).filter(|t| !t.is_empty()),
                items: cleaned.lines,
            });
        }
        ingredient_sections.retain(|s| !s.items.is_empty());

        let cleaned = clean_instruction_lines(&self.instructions);
        notes.extend(cleaned.notes);
        notes.extend(
            self.notes
                .iter()
                .map(|n| clean_line(n))
                .filter(|n| !n.is_empty()),
        );

        let description = self
            .preamble
            .iter()
            .map(|p| clean_line(p))
            .find(|p| p.split_whitespace().count() >= 4);

        RecipeDraft {
            title: self.title.map(|t| clean_line(&t)).filter(|t| !t.is_empty()),
            description,
            ingredients,
            instructions: cleaned.lines,
            notes,
            tags: self.tags,
            ingredient_sections,
            ..Default::default()
        }
    }
}

#[derive(Debug)]
enum Block {
    Heading { level: u8, text: String },
    Text(String),
}

/// One output line being assembled from inline markdown events.
#[derive(Default)]
struct PendingLine {
    text: String,
    bold: bool,
    plain: bool,
}

impl PendingLine {
    fn push(&mut self, piece: &str, strong: bool) {
        let visible = piece.trim();
        if strong && !visible.is_empty() {
            self.bold = true;
        } else if !visible.is_empty() && !visible.chars().all(|c| c == ':') {
            self.plain = true;
        }
        self.text.push_str(piece);
    }

    /// Emit the line. A line that is bold throughout (`**Method:**`) counts
    /// as a heading below every markdown heading level.
    fn flush(&mut self, blocks: &mut Vec<Block>, heading: Option<u8>) {
        let line = std::mem::take(self);
        let text = collapse_whitespace(&line.text);
        if text.is_empty() {
            return;
        }
        blocks.push(match heading {
            Some(level) => Block::Heading { level, text },
            None if line.bold && !line.plain => Block::Heading {
                level: 7,
                text: text.trim_end_matches(':').trim().to_string(),
            },
            None => Block::Text(text),
        });
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Headings and text lines of a markdown body. Soft breaks end a line, so
/// unmarked ingredient lines stay separate.
fn markdown_blocks(body: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut line = PendingLine::default();
    let mut heading: Option<u8> = None;
    let mut strong = 0usize;
    let mut image = 0usize;

    let options = Options::ENABLE_TASKLISTS | Options::ENABLE_STRIKETHROUGH;
    for event in Parser::new_ext(body, options) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                line.flush(&mut blocks, None);
                heading = Some(heading_level(level));
            }
            Event::End(TagEnd::Heading(_)) => line.flush(&mut blocks, heading.take()),
            Event::Start(Tag::Strong) => strong += 1,
            Event::End(TagEnd::Strong) => strong = strong.saturating_sub(1),
            Event::Start(Tag::Image { .. }) => image += 1,
            Event::End(TagEnd::Image) => image = image.saturating_sub(1),
            Event::Start(Tag::Paragraph | Tag::Item) => line.flush(&mut blocks, None),
            Event::Text(text) | Event::Code(text) if image == 0 => {
                let mut pieces = text.split('\n');
                if let Some(first) = pieces.next() {
                    line.push(first, strong > 0);
                }
                for piece in pieces {
                    line.flush(&mut blocks, heading);
                    line.push(piece, strong > 0);
                }
            }
            Event::SoftBreak | Event::HardBreak => line.flush(&mut blocks, heading),
            Event::End(TagEnd::Emphasis | TagEnd::Link | TagEnd::Strikethrough) => {}
            Event::End(_) => line.flush(&mut blocks, None),
            _ => {}
        }
    }
    line.flush(&mut blocks, None);
    blocks
}

/// Split markdown (frontmatter already removed) into sections.
pub fn split_markdown(body: &str) -> SplitSections {
    fold_blocks(markdown_blocks(body).into_iter(), true)
}

/// Split plain text lines into sections. Keyword lines act as headings.
pub fn split_plain_text<S: AsRef<str>>(lines: &[S]) -> SplitSections {
    let blocks = lines.iter().filter_map(|raw| {
        let line = strip_leading_glyphs(raw.as_ref().trim()).trim();
        if line.is_empty() {
            return None;
        }
        Some(Block::Text(line.to_string()))
    });
    fold_blocks(blocks, false)
}

/// `For the sauce:` style group labels inside an ingredient list.
fn is_group_label(line: &str) -> bool {
    let Some(label) = line.strip_suffix(':') else {
        return false;
    };
    let words = label.split_whitespace().count();
    words > 0 && words <= MAX_HEADING_WORDS && !label.chars().any(|c| c.is_ascii_digit())
}

fn fold_blocks(blocks: impl Iterator<Item = Block>, markdown: bool) -> SplitSections {
    let mut out = SplitSections::default();
    let mut active: Option<(SectionKind, u8)> = None;

    for block in blocks {
        match block {
            Block::Heading { level, text } => {
                if let Some(kind) = heading_kind(&text) {
                    active = Some((kind, level));
                    if kind == SectionKind::Ingredients {
                        out.ingredient_sections.push(IngredientSection::default());
                    }
                    continue;
                }
                match active {
                    Some((kind, active_level)) if level > active_level || level == 7 => {
                        if kind == SectionKind::Ingredients {
                            out.ingredient_sections.push(IngredientSection {
                                title: Some(text),
                                items: Vec::new(),
                            });
                        }
                    }
                    _ => {
                        if level == 1 && out.title.is_none() {
                            out.title = Some(text);
                        }
                        active = None;
                    }
                }
            }
            Block::Text(line) => {
                // Plain keyword lines switch sections in both modes.
                if let Some(kind) = heading_kind(&line).filter(|_| looks_like_heading(&line)) {
                    active = Some((kind, if markdown { 7 } else { 0 }));
                    if kind == SectionKind::Ingredients {
                        out.ingredient_sections.push(IngredientSection::default());
                    }
                    continue;
                }
                match active {
                    None => out.preamble.push(line),
                    Some((SectionKind::Ingredients, _)) => {
                        if is_group_label(&line) {
                            out.ingredient_sections.push(IngredientSection {
                                title: Some(line.trim_end_matches(':').trim().to_string()),
                                items: Vec::new(),
                            });
                        } else {
                            match out.ingredient_sections.last_mut() {
                                Some(section) => section.items.push(line),
                                None => out.ingredient_sections.push(IngredientSection {
                                    title: None,
                                    items: vec![line],
                                }),
                            }
                        }
                    }
                    Some((SectionKind::Instructions, _)) => out.instructions.push(line),
                    Some((SectionKind::Notes, _)) => out.notes.push(line),
                    Some((SectionKind::Tags, _)) => {
                        for tag in line.split(',') {
                            push_tag(&mut out.tags, tag);
                        }
                    }
                }
            }
        }
    }

    out.ingredient_sections
        .retain(|s| !s.items.is_empty() || s.title.is_some());
    out
}

/// Bare keyword lines are headings only when short and free of sentence
/// punctuation (`Method:` yes, `Method is simple.` no).
fn looks_like_heading(line: &str) -> bool {
    let trimmed = line.trim_end_matches(':').trim();
    !trimmed.ends_with('.') && trimmed.split_whitespace().count() <= 4
}
