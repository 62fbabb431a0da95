use crate::error::ImportError;
use crate::model::RecipeDraft;
use crate::sections::split_plain_text;
use crate::store::NormalizedRecipe;
use crate::url_to_text::markdown::parse_markdown_recipe;
use log::debug;

/// Parse a pasted recipe. Markdown (headings or frontmatter) goes through the
/// markdown splitter, anything else through the plain text splitter.
pub fn process(text: &str) -> Result<NormalizedRecipe, ImportError> {
    if text.trim().is_empty() {
        return Err(ImportError::ParseError(
            "Recipe text cannot be empty".to_string(),
        ));
    }

    let draft = parse_text(text)
        .filter(RecipeDraft::has_content)
        .ok_or_else(|| {
            ImportError::ParseError("No ingredients or instructions found in text".to_string())
        })?;
    Ok(NormalizedRecipe::from_draft(None, &draft))
}

fn looks_like_markdown(text: &str) -> bool {
    text.trim_start().starts_with("---")
        || text.lines().any(|line| line.trim_start().starts_with('#'))
}

fn parse_text(text: &str) -> Option<RecipeDraft> {
    if looks_like_markdown(text) {
        if let Some(draft) = parse_markdown_recipe(text, None) {
            return Some(draft);
        }
        debug!("Markdown parse found no sections, falling back to plain text");
    }
    let lines: Vec<&str> = text.lines().collect();
    let mut sections = split_plain_text(&lines);
    if !sections.has_recipe_sections() {
        return None;
    }
    // A short first line before any section is the title.
    if sections.title.is_none()
        && sections
            .preamble
            .first()
            .is_some_and(|line| line.split_whitespace().count() <= 8)
    {
        sections.title = Some(sections.preamble.remove(0));
    }
    Some(sections.into_draft())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_recipe() {
        let text = "Pancakes\n\nIngredients\n1 cup flour\n1 egg\n\n\
                    Method\nWhisk everything.\nFry in a pan.";
        let recipe = process(text).unwrap();
        assert_eq!(recipe.title, "Pancakes");
        assert_eq!(recipe.ingredients, vec!["1 cup flour", "1 egg"]);
        assert_eq!(recipe.instructions.len(), 2);
    }

    #[test]
    fn test_markdown_recipe() {
        let text = "# Toast\n\n## Ingredients\n- 1 slice bread\n\n## Steps\n1. Toast the bread.";
        let recipe = process(text).unwrap();
        assert_eq!(recipe.title, "Toast");
        assert_eq!(recipe.instructions, vec!["Toast the bread."]);
    }

    #[test]
    fn test_empty_text_is_rejected() {
        assert!(matches!(process("  \n"), Err(ImportError::ParseError(_))));
        assert!(matches!(
            process("just some words"),
            Err(ImportError::ParseError(_))
        ));
    }
}
