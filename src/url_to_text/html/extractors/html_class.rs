use super::{element_text, Extractor, ParsingContext};
use crate::error::ImportError;
use crate::model::{IngredientSection, RecipeDraft};
use crate::normalize::{clean_ingredient_lines, clean_instruction_lines, collapse_whitespace};
use log::debug;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

/// Field -> class names used by popular recipe-card plugins.
struct ClassMatchers {
    title: &'static [&'static str],
    description: &'static [&'static str],
    ingredients: &'static [&'static str],
    ingredient_group: &'static [&'static str],
    instructions: &'static [&'static str],
    prep_time: &'static [&'static str],
    cook_time: &'static [&'static str],
    servings: &'static [&'static str],
    notes: &'static [&'static str],
}

const MATCHERS: ClassMatchers = ClassMatchers {
    title: &[
        "wprm-recipe-name",
        "tasty-recipes-title",
        "mv-create-title",
        "recipe-card-title",
        "wpzoom-recipe-card-title",
        "recipe-title",
        "recipe-name",
    ],
    description: &[
        "wprm-recipe-summary",
        "tasty-recipes-description",
        "mv-create-description",
        "recipe-summary",
        "recipe-description",
    ],
    ingredients: &[
        "wprm-recipe-ingredients-container",
        "tasty-recipes-ingredients",
        "mv-create-ingredients",
        "wpzoom-recipe-ingredients",
        "structured-ingredients",
        "recipe-ingredients",
        "ingredients-list",
        "recipe-card-ingredients",
    ],
    ingredient_group: &["wprm-recipe-ingredient-group", "ingredient-group"],
    instructions: &[
        "wprm-recipe-instructions-container",
        "tasty-recipes-instructions",
        "mv-create-instructions",
        "wpzoom-recipe-instructions",
        "structured-instructions",
        "recipe-instructions",
        "recipe-directions",
        "recipe-method",
        "recipe-card-instructions",
    ],
    prep_time: &[
        "wprm-recipe-prep_time-container",
        "wprm-recipe-prep-time",
        "tasty-recipes-prep-time",
        "mv-create-time-prep",
        "recipe-prep-time",
        "prep-time",
    ],
    cook_time: &[
        "wprm-recipe-cook_time-container",
        "wprm-recipe-cook-time",
        "tasty-recipes-cook-time",
        "mv-create-time-active",
        "recipe-cook-time",
        "cook-time",
    ],
    servings: &[
        "wprm-recipe-servings",
        "tasty-recipes-yield",
        "mv-create-yield",
        "recipe-servings",
        "recipe-yield",
    ],
    notes: &[
        "wprm-recipe-notes",
        "tasty-recipes-notes",
        "mv-create-notes",
        "recipe-notes",
        "recipe-tips",
    ],
};

static LIST_ITEM: LazyLock<Selector> = LazyLock::new(|| Selector::parse("li").unwrap());
static BLOCK_ITEM: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p, div").unwrap());
static GROUP_NAME: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h3, h4, .wprm-recipe-group-name, .ingredient-group-name").unwrap()
});
static HEADING: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").unwrap());

pub struct HtmlClassExtractor;

fn class_selector(class_name: &str) -> Option<Selector> {
    Selector::parse(&format!(".{class_name}")).ok()
}

fn find_element<'a>(document: &'a Html, classes: &[&str]) -> Option<ElementRef<'a>> {
    classes.iter().find_map(|class_name| {
        let selector = class_selector(class_name)?;
        document
            .select(&selector)
            .find(|el| !element_text(*el).is_empty())
    })
}

fn find_text(document: &Html, classes: &[&str]) -> Option<String> {
    find_element(document, classes).map(element_text)
}

/// List items inside a container; falls back to short paragraphs or divs.
fn list_items(container: ElementRef) -> Vec<String> {
    let items: Vec<String> = container
        .select(&LIST_ITEM)
        .map(element_text)
        .filter(|t| !t.is_empty())
        .collect();
    if !items.is_empty() {
        return items;
    }
    container
        .select(&BLOCK_ITEM)
        .filter(|el| el.select(&BLOCK_ITEM).next().is_none())
        .map(element_text)
        .filter(|t| t.len() > 2 && t.len() < 500)
        .collect()
}

fn ingredient_sections(container: ElementRef) -> Vec<IngredientSection> {
    let groups: Vec<ElementRef> = MATCHERS
        .ingredient_group
        .iter()
        .filter_map(|c| class_selector(c))
        .flat_map(|selector| container.select(&selector).collect::<Vec<_>>())
        .collect();
    if groups.is_empty() {
        return vec![IngredientSection {
            title: None,
            items: list_items(container),
        }];
    }
    groups
        .into_iter()
        .map(|group| IngredientSection {
            title: group
                .select(&GROUP_NAME)
                .next()
                .map(element_text)
                .filter(|t| !t.is_empty()),
            items: list_items(group),
        })
        .collect()
}

/// Strip labels such as `Prep Time: 10 mins` down to the value.
fn label_value(text: String) -> Option<String> {
    let value = match text.split_once(':') {
        Some((_, value)) => value.trim().to_string(),
        None => text,
    };
    let value = collapse_whitespace(&value);
    (!value.is_empty()).then_some(value)
}

impl Extractor for HtmlClassExtractor {
    fn name(&self) -> &'static str {
        "HtmlClassExtractor"
    }

    fn parse(&self, context: &ParsingContext) -> Result<RecipeDraft, ImportError> {
        debug!("Attempting to extract recipe using HTML class matchers");
        let document = &context.document;

        let sections = find_element(document, MATCHERS.ingredients)
            .map(ingredient_sections)
            .unwrap_or_default();
        let instructions = find_element(document, MATCHERS.instructions)
            .map(list_items)
            .unwrap_or_default();
        if sections.iter().all(|s| s.items.is_empty()) && instructions.is_empty() {
            return Err(ImportError::ParseError(
                "Could not extract recipe content from HTML".into(),
            ));
        }

        let mut notes = Vec::new();
        let mut ingredients = Vec::new();
        let mut cleaned_sections = Vec::new();
        for section in sections {
            let cleaned = clean_ingredient_lines(&section.items);
            notes.extend(cleaned.notes);
            ingredients.extend(cleaned.lines.iter().cloned());
            cleaned_sections.push(IngredientSection {
                title: section.title,
                items: cleaned.lines,
            });
        }
        // A single untitled group carries no grouping information.
        if cleaned_sections.len() == 1 && cleaned_sections[0].title.is_none() {
            cleaned_sections.clear();
        }

        let instructions = clean_instruction_lines(&instructions);
        notes.extend(instructions.notes);
        if let Some(container) = find_element(document, MATCHERS.notes) {
            notes.extend(list_items(container));
        }

        let title = find_text(document, MATCHERS.title)
            .or_else(|| document.select(&HEADING).next().map(element_text))
            .filter(|t| !t.is_empty());

        Ok(RecipeDraft {
            title,
            description: find_text(document, MATCHERS.description),
            ingredients,
            instructions: instructions.lines,
            notes,
            servings: find_text(document, MATCHERS.servings).and_then(label_value),
            prep_time: find_text(document, MATCHERS.prep_time).and_then(label_value),
            cook_time: find_text(document, MATCHERS.cook_time).and_then(label_value),
            ingredient_sections: cleaned_sections,
            ..Default::default()
        })
    }
}
