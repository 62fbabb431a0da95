//! The persistence boundary: the final recipe record, re-import metadata
//! patching and the storage trait implemented by the host application.

use crate::error::ImportError;
use crate::model::{IngredientSection, PrepGroup, RecipeDraft, RecipeIngestionCandidate};
use crate::normalize::{
    clean_ingredient_lines, clean_instruction_lines, convert_ingredient_measurement_to_metric,
};
use crate::prep_groups::build_prep_groups;
use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

const UNTITLED: &str = "Untitled recipe";

/// A recipe as it is persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecipe {
    pub source_url: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub notes: Vec<String>,
    pub prep_groups: Vec<PrepGroup>,
    pub servings: Option<String>,
    pub prep_time: Option<String>,
    pub cook_time: Option<String>,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
}

fn metric_lines(lines: &[String]) -> Vec<String> {
    let cleaned = clean_ingredient_lines(lines);
    cleaned
        .lines
        .iter()
        .map(|line| convert_ingredient_measurement_to_metric(line))
        .collect()
}

impl NormalizedRecipe {
    /// Re-clean a draft, convert imperial weights to metric and derive prep
    /// groups.
    pub fn from_draft(source_url: Option<String>, draft: &RecipeDraft) -> Self {
        let ingredients = clean_ingredient_lines(&draft.ingredients);
        let instructions = clean_instruction_lines(&draft.instructions);

        let mut notes = draft.notes.clone();
        for note in ingredients.notes.iter().chain(&instructions.notes) {
            if !notes.contains(note) {
                notes.push(note.clone());
            }
        }

        let sections: Vec<IngredientSection> = draft
            .ingredient_sections
            .iter()
            .map(|section| IngredientSection {
                title: section.title.clone(),
                items: metric_lines(&section.items),
            })
            .collect();
        let ingredients: Vec<String> = ingredients
            .lines
            .iter()
            .map(|line| convert_ingredient_measurement_to_metric(line))
            .collect();
        let prep_groups = if sections.is_empty() {
            let single = IngredientSection {
                title: None,
                items: ingredients.clone(),
            };
            build_prep_groups(std::slice::from_ref(&single), &instructions.lines)
        } else {
            build_prep_groups(&sections, &instructions.lines)
        };

        let title = draft
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(UNTITLED)
            .to_string();

        Self {
            source_url,
            title,
            description: draft.description.clone(),
            ingredients,
            instructions: instructions.lines,
            notes,
            prep_groups,
            servings: draft.servings.clone(),
            prep_time: draft.prep_time.clone(),
            cook_time: draft.cook_time.clone(),
            tags: draft.tags.clone(),
            image_url: draft.image_url.clone(),
            video_url: draft.video_url.clone(),
        }
    }

    pub fn from_candidate(
        source_url: impl Into<String>,
        candidate: &RecipeIngestionCandidate,
    ) -> Self {
        Self::from_draft(Some(source_url.into()), &candidate.draft)
    }

    pub fn metadata(&self) -> RecipeMetadata {
        RecipeMetadata {
            image_url: self.image_url.clone(),
            video_url: self.video_url.clone(),
            servings: self.servings.clone(),
            prep_time: self.prep_time.clone(),
            cook_time: self.cook_time.clone(),
            tags: self.tags.clone(),
        }
    }
}

/// The fields a re-import may backfill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeMetadata {
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub servings: Option<String>,
    pub prep_time: Option<String>,
    pub cook_time: Option<String>,
    pub tags: Vec<String>,
}

/// Fields to set on an existing record. `None` leaves the field alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataPatch {
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub servings: Option<String>,
    pub prep_time: Option<String>,
    pub cook_time: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl MetadataPatch {
    pub fn is_empty(&self) -> bool {
        self.image_url.is_none()
            && self.video_url.is_none()
            && self.servings.is_none()
            && self.prep_time.is_none()
            && self.cook_time.is_none()
            && self.tags.is_none()
    }

    pub fn apply_to(&self, recipe: &mut NormalizedRecipe) {
        set(&mut recipe.image_url, &self.image_url);
        set(&mut recipe.video_url, &self.video_url);
        set(&mut recipe.servings, &self.servings);
        set(&mut recipe.prep_time, &self.prep_time);
        set(&mut recipe.cook_time, &self.cook_time);
        if let Some(tags) = &self.tags {
            recipe.tags = tags.clone();
        }
    }
}

fn set(target: &mut Option<String>, value: &Option<String>) {
    if let Some(value) = value {
        *target = Some(value.clone());
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

fn backfill(existing: &Option<String>, incoming: &Option<String>) -> Option<String> {
    if is_blank(existing) && !is_blank(incoming) {
        incoming.clone()
    } else {
        None
    }
}

/// Patch that fills only the fields `existing` lacks. Populated fields are
/// never overwritten.
pub fn compute_metadata_patch(
    existing: &RecipeMetadata,
    incoming: &RecipeMetadata,
) -> MetadataPatch {
    MetadataPatch {
        image_url: backfill(&existing.image_url, &incoming.image_url),
        video_url: backfill(&existing.video_url, &incoming.video_url),
        servings: backfill(&existing.servings, &incoming.servings),
        prep_time: backfill(&existing.prep_time, &incoming.prep_time),
        cook_time: backfill(&existing.cook_time, &incoming.cook_time),
        tags: (existing.tags.is_empty() && !incoming.tags.is_empty())
            .then(|| incoming.tags.clone()),
    }
}

/// A recipe already in the store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecipe {
    pub id: String,
    pub metadata: RecipeMetadata,
}

/// Storage owned by the host application.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    async fn find_by_source_url(
        &self,
        source_url: &str,
    ) -> Result<Option<StoredRecipe>, ImportError>;

    /// Insert a new record and return its id.
    async fn insert(&self, recipe: &NormalizedRecipe) -> Result<String, ImportError>;

    async fn apply_patch(&self, id: &str, patch: &MetadataPatch) -> Result<(), ImportError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Inserted(String),
    Patched { id: String, patch: MetadataPatch },
    Unchanged(String),
}

/// Insert a recipe, or on re-import of a known source URL backfill the
/// metadata the stored copy is missing.
pub async fn save_recipe(
    store: &dyn RecipeStore,
    recipe: &NormalizedRecipe,
) -> Result<SaveOutcome, ImportError> {
    let Some(source_url) = recipe.source_url.as_deref() else {
        let id = store.insert(recipe).await?;
        return Ok(SaveOutcome::Inserted(id));
    };

    match store.find_by_source_url(source_url).await? {
        None => {
            let id = store.insert(recipe).await?;
            info!("Stored new recipe {} from {}", id, source_url);
            Ok(SaveOutcome::Inserted(id))
        }
        Some(existing) => {
            let patch = compute_metadata_patch(&existing.metadata, &recipe.metadata());
            if patch.is_empty() {
                debug!("Re-import of {} changed no metadata", source_url);
                return Ok(SaveOutcome::Unchanged(existing.id));
            }
            store.apply_patch(&existing.id, &patch).await?;
            info!("Backfilled metadata on recipe {}", existing.id);
            Ok(SaveOutcome::Patched {
                id: existing.id,
                patch,
            })
        }
    }
}

/// Process-local store, used by the CLI and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    recipes: Mutex<Vec<(String, NormalizedRecipe)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, id: &str) -> Option<NormalizedRecipe> {
        let recipes = self.recipes.lock().await;
        recipes.iter().find(|(i, _)| i == id).map(|(_, r)| r.clone())
    }

    pub async fn len(&self) -> usize {
        self.recipes.lock().await.len()
    }
}

#[async_trait]
impl RecipeStore for MemoryStore {
    async fn find_by_source_url(
        &self,
        source_url: &str,
    ) -> Result<Option<StoredRecipe>, ImportError> {
        let recipes = self.recipes.lock().await;
        Ok(recipes
            .iter()
            .find(|(_, r)| r.source_url.as_deref() == Some(source_url))
            .map(|(id, r)| StoredRecipe {
                id: id.clone(),
                metadata: r.metadata(),
            }))
    }

    async fn insert(&self, recipe: &NormalizedRecipe) -> Result<String, ImportError> {
        let mut recipes = self.recipes.lock().await;
        let id = format!("recipe-{}", recipes.len() + 1);
        recipes.push((id.clone(), recipe.clone()));
        Ok(id)
    }

    async fn apply_patch(&self, id: &str, patch: &MetadataPatch) -> Result<(), ImportError> {
        let mut recipes = self.recipes.lock().await;
        let (_, recipe) = recipes
            .iter_mut()
            .find(|(i, _)| i == id)
            .ok_or_else(|| ImportError::StoreError(format!("no recipe with id {id}")))?;
        patch.apply_to(recipe);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(image: Option<&str>, servings: Option<&str>, tags: &[&str]) -> RecipeMetadata {
        RecipeMetadata {
            image_url: image.map(String::from),
            servings: servings.map(String::from),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_patch_backfills_only_missing_fields() {
        let existing = metadata(Some("https://a/old.jpg"), None, &[]);
        let incoming = metadata(Some("https://a/new.jpg"), Some("4"), &["dinner"]);
        let patch = compute_metadata_patch(&existing, &incoming);
        assert_eq!(patch.image_url, None);
        assert_eq!(patch.servings.as_deref(), Some("4"));
        assert_eq!(patch.tags, Some(vec!["dinner".to_string()]));
    }

    #[test]
    fn test_blank_existing_value_counts_as_missing() {
        let existing = metadata(Some("  "), None, &[]);
        let incoming = metadata(Some("https://a/new.jpg"), None, &[]);
        let patch = compute_metadata_patch(&existing, &incoming);
        assert_eq!(patch.image_url.as_deref(), Some("https://a/new.jpg"));
        assert!(compute_metadata_patch(&incoming, &existing).is_empty());
    }

    #[test]
    fn test_from_draft_converts_weights_and_groups() {
        let draft = RecipeDraft {
            title: Some("  Chili ".into()),
            ingredients: vec!["1 lb ground beef".into(), "1 onion, diced".into()],
            instructions: vec!["1. Brown the beef.".into(), "2. Add the diced onion.".into()],
            ..Default::default()
        };
        let recipe = NormalizedRecipe::from_draft(Some("https://example.com/chili".into()), &draft);
        assert_eq!(recipe.title, "Chili");
        assert_eq!(recipe.ingredients[0], "454 g ground beef");
        assert_eq!(recipe.instructions[0], "Brown the beef.");
        assert_eq!(recipe.prep_groups.len(), 1);
        assert_eq!(recipe.prep_groups[0].title, "Dice");
        assert_eq!(recipe.prep_groups[0].step_index, Some(1));
    }

    #[test]
    fn test_untitled_fallback() {
        let recipe = NormalizedRecipe::from_draft(None, &RecipeDraft::default());
        assert_eq!(recipe.title, UNTITLED);
    }

    #[tokio::test]
    async fn test_save_inserts_then_patches() {
        let store = MemoryStore::new();
        let mut recipe = NormalizedRecipe {
            source_url: Some("https://example.com/soup".into()),
            title: "Soup".into(),
            image_url: Some("https://example.com/soup.jpg".into()),
            ..Default::default()
        };
        let first = save_recipe(&store, &recipe).await.unwrap();
        let id = match first {
            SaveOutcome::Inserted(id) => id,
            other => panic!("expected insert, got {other:?}"),
        };

        recipe.image_url = Some("https://example.com/other.jpg".into());
        recipe.servings = Some("6".into());
        let second = save_recipe(&store, &recipe).await.unwrap();
        assert!(matches!(second, SaveOutcome::Patched { .. }));

        let stored = store.get(&id).await.unwrap();
        assert_eq!(stored.image_url.as_deref(), Some("https://example.com/soup.jpg"));
        assert_eq!(stored.servings.as_deref(), Some("6"));
        assert_eq!(store.len().await, 1);

        let third = save_recipe(&store, &recipe).await.unwrap();
        assert_eq!(third, SaveOutcome::Unchanged(id));
    }
}
