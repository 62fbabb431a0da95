use crate::model::RecipeDraft;
use crate::sections::{split_markdown, strip_frontmatter};
use log::debug;

/// Parse service markdown into a recipe draft.
///
/// Title precedence is frontmatter, then the first H1, then the title the
/// service reported. Returns `None` when no ingredient or instruction section
/// was found.
pub fn parse_markdown_recipe(content: &str, service_title: Option<&str>) -> Option<RecipeDraft> {
    let (frontmatter, body) = strip_frontmatter(content);
    let mut sections = split_markdown(body);
    if !sections.has_recipe_sections() {
        debug!("Markdown has no ingredient or instruction section");
        return None;
    }

    let title = frontmatter
        .title
        .clone()
        .or_else(|| sections.title.take())
        .or_else(|| service_title.map(str::to_string));
    sections.title = title;

    let mut tags = frontmatter.tags;
    for tag in std::mem::take(&mut sections.tags) {
        if !tags.iter().any(|t| t.eq_ignore_ascii_case(&tag)) {
            tags.push(tag);
        }
    }
    sections.tags = tags;

    let mut draft = sections.into_draft();
    draft.servings = frontmatter.servings;
    Some(draft)
}
