use crate::error::IngestionErrorCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One extraction strategy, attempted in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestionStage {
    Markdown,
    HttpHtml,
    RenderedHtml,
    Readability,
}

impl IngestionStage {
    /// All stages, highest priority first.
    pub const ORDER: [IngestionStage; 4] = [
        IngestionStage::Markdown,
        IngestionStage::HttpHtml,
        IngestionStage::RenderedHtml,
        IngestionStage::Readability,
    ];

    /// Trust priority, only ever used to break score ties.
    pub fn priority(&self) -> u8 {
        match self {
            IngestionStage::Markdown => 4,
            IngestionStage::HttpHtml => 3,
            IngestionStage::RenderedHtml => 2,
            IngestionStage::Readability => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IngestionStage::Markdown => "markdown",
            IngestionStage::HttpHtml => "http_html",
            IngestionStage::RenderedHtml => "rendered_html",
            IngestionStage::Readability => "readability",
        }
    }
}

impl fmt::Display for IngestionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A group of ingredient lines under an optional source heading
/// (e.g. "For the sauce").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientSection {
    pub title: Option<String>,
    pub items: Vec<String>,
}

/// Stage-independent parsed recipe content.
///
/// Every extractor and the OCR parser produce one of these.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub notes: Vec<String>,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub servings: Option<String>,
    pub prep_time: Option<String>,
    pub cook_time: Option<String>,
    pub ingredient_sections: Vec<IngredientSection>,
}

impl RecipeDraft {
    pub fn has_content(&self) -> bool {
        !self.ingredients.is_empty() || !self.instructions.is_empty()
    }

    /// Fill empty metadata fields from `other`. Populated fields are never replaced.
    pub fn backfill_metadata(&mut self, other: &RecipeDraft) {
        fill(&mut self.description, &other.description);
        fill(&mut self.image_url, &other.image_url);
        fill(&mut self.video_url, &other.video_url);
        fill(&mut self.servings, &other.servings);
        fill(&mut self.prep_time, &other.prep_time);
        fill(&mut self.cook_time, &other.cook_time);
        if self.tags.is_empty() && !other.tags.is_empty() {
            self.tags = other.tags.clone();
        }
    }
}

fn fill(target: &mut Option<String>, source: &Option<String>) {
    let empty = target.as_deref().map_or(true, |v| v.trim().is_empty());
    if empty {
        if let Some(value) = source.as_deref().filter(|v| !v.trim().is_empty()) {
            *target = Some(value.to_string());
        }
    }
}

/// One stage's raw output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestionAttemptResult {
    stage: IngestionStage,
    success: bool,
    title: Option<String>,
    ingredients: Vec<String>,
    instructions: Vec<String>,
    notes: Vec<String>,
    error: Option<IngestionErrorCode>,
    latency_ms: u64,
}

impl IngestionAttemptResult {
    pub fn failed(stage: IngestionStage, error: IngestionErrorCode, latency_ms: u64) -> Self {
        Self {
            stage,
            success: false,
            title: None,
            ingredients: Vec::new(),
            instructions: Vec::new(),
            notes: Vec::new(),
            error: Some(error),
            latency_ms,
        }
    }

    pub fn stage(&self) -> IngestionStage {
        self.stage
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn ingredients(&self) -> &[String] {
        &self.ingredients
    }

    pub fn instructions(&self) -> &[String] {
        &self.instructions
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn error(&self) -> Option<IngestionErrorCode> {
        self.error
    }

    pub fn latency_ms(&self) -> u64 {
        self.latency_ms
    }
}

/// One stage's fully parsed guess at the recipe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeIngestionCandidate {
    pub stage: IngestionStage,
    pub success: bool,
    pub error: Option<IngestionErrorCode>,
    pub latency_ms: u64,
    pub draft: RecipeDraft,
    /// The HTML the stage parsed, when it parsed any.
    #[serde(skip)]
    pub raw_html: Option<String>,
}

impl RecipeIngestionCandidate {
    /// Wrap a draft. Empty and whitespace-only lines are dropped here so no
    /// candidate ever carries them.
    pub fn new(stage: IngestionStage, mut draft: RecipeDraft, latency_ms: u64) -> Self {
        draft.ingredients.retain(|line| !line.trim().is_empty());
        draft.instructions.retain(|line| !line.trim().is_empty());
        draft.notes.retain(|line| !line.trim().is_empty());
        for section in &mut draft.ingredient_sections {
            section.items.retain(|line| !line.trim().is_empty());
        }
        draft.ingredient_sections.retain(|s| !s.items.is_empty());
        Self {
            stage,
            success: draft.has_content(),
            error: None,
            latency_ms,
            draft,
            raw_html: None,
        }
    }

    pub fn with_raw_html(mut self, html: Option<String>) -> Self {
        self.raw_html = html;
        self
    }

    /// Attach the error of a stage that produced this draft on a degraded path.
    pub fn with_error(mut self, error: Option<IngestionErrorCode>) -> Self {
        self.error = error;
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.draft.title.as_deref()
    }

    pub fn ingredients(&self) -> &[String] {
        &self.draft.ingredients
    }

    pub fn instructions(&self) -> &[String] {
        &self.draft.instructions
    }

    /// Project back onto the immutable attempt record.
    pub fn attempt(&self) -> IngestionAttemptResult {
        IngestionAttemptResult {
            stage: self.stage,
            success: self.success,
            title: self.draft.title.clone(),
            ingredients: self.draft.ingredients.clone(),
            instructions: self.draft.instructions.clone(),
            notes: self.draft.notes.clone(),
            error: self.error,
            latency_ms: self.latency_ms,
        }
    }
}

/// A cluster of ingredient lines sharing a preparation verb or a source heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepGroup {
    pub title: String,
    pub items: Vec<String>,
    pub step_index: Option<usize>,
}
