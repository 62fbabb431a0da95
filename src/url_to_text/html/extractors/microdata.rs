use super::{convert_duration, element_text, Extractor, ParsingContext};
use crate::error::ImportError;
use crate::model::RecipeDraft;
use crate::normalize::{clean_ingredient_lines, clean_instruction_lines};
use log::debug;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static ITEMSCOPE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("[itemscope]").unwrap());

pub struct MicroDataExtractor;

impl MicroDataExtractor {
    fn find_recipe_container<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        document.select(&ITEMSCOPE).find(|element| {
            element.value().attr("itemtype").is_some_and(|itemtype| {
                itemtype.contains("schema.org/Recipe")
                    || itemtype.contains("data-vocabulary.org/Recipe")
            })
        })
    }

    fn prop_selector(prop: &str) -> Result<Selector, ImportError> {
        Selector::parse(&format!("[itemprop='{prop}']"))
            .map_err(|e| ImportError::ParseError(format!("bad itemprop selector: {e}")))
    }

    /// `content` attribute wins over text (`<meta itemprop="prepTime" content="PT5M">`).
    fn get_itemprop(&self, root: ElementRef, prop: &str) -> Result<Option<String>, ImportError> {
        let selector = Self::prop_selector(prop)?;
        Ok(root
            .select(&selector)
            .next()
            .map(|el| {
                el.value()
                    .attr("content")
                    .map(|c| c.trim().to_string())
                    .unwrap_or_else(|| element_text(el))
            })
            .filter(|text| !text.is_empty()))
    }

    fn get_itemprop_list(&self, root: ElementRef, prop: &str) -> Result<Vec<String>, ImportError> {
        let selector = Self::prop_selector(prop)?;
        Ok(root
            .select(&selector)
            .map(element_text)
            .filter(|text| !text.is_empty())
            .collect())
    }

    fn image(&self, root: ElementRef) -> Result<Option<String>, ImportError> {
        let selector = Self::prop_selector("image")?;
        Ok(root.select(&selector).next().and_then(|img| {
            img.value()
                .attr("src")
                .or_else(|| img.value().attr("content"))
                .or_else(|| img.value().attr("href"))
                .map(str::to_string)
                .or_else(|| Some(element_text(img)).filter(|t| !t.is_empty()))
        }))
    }
}

impl Extractor for MicroDataExtractor {
    fn name(&self) -> &'static str {
        "MicroDataExtractor"
    }

    fn parse(&self, context: &ParsingContext) -> Result<RecipeDraft, ImportError> {
        debug!("Attempting to extract recipe using MicroData extractor");

        // Only scoped lookups: page-wide itemprops pick up site chrome.
        let container = self
            .find_recipe_container(&context.document)
            .ok_or_else(|| ImportError::ParseError("No MicroData Recipe container found".into()))?;

        let mut ingredients = self.get_itemprop_list(container, "recipeIngredient")?;
        if ingredients.is_empty() {
            ingredients = self.get_itemprop_list(container, "ingredients")?;
        }
        let mut instructions = self.get_itemprop_list(container, "recipeInstructions")?;
        if instructions.is_empty() {
            instructions = self.get_itemprop_list(container, "instructions")?;
        }
        if ingredients.is_empty() && instructions.is_empty() {
            return Err(ImportError::ParseError(
                "Could not extract recipe content".into(),
            ));
        }

        let ingredients = clean_ingredient_lines(&ingredients);
        let instructions = clean_instruction_lines(&instructions);
        let mut notes = ingredients.notes;
        notes.extend(instructions.notes);

        let tags = self
            .get_itemprop(container, "keywords")?
            .map(|k| {
                k.split(',')
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(RecipeDraft {
            title: self.get_itemprop(container, "name")?,
            description: self.get_itemprop(container, "description")?,
            ingredients: ingredients.lines,
            instructions: instructions.lines,
            notes,
            tags,
            image_url: self.image(container)?,
            video_url: None,
            servings: self.get_itemprop(container, "recipeYield")?,
            prep_time: self
                .get_itemprop(container, "prepTime")?
                .map(|t| convert_duration(&t)),
            cook_time: self
                .get_itemprop(container, "cookTime")?
                .map(|t| convert_duration(&t)),
            ingredient_sections: Vec::new(),
        })
    }
}
