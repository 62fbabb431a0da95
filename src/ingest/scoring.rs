//! Candidate quality scoring and winner selection.

use crate::error::IngestionErrorCode;
use crate::model::{IngestionAttemptResult, RecipeIngestionCandidate};
use std::cmp::Ordering;

const INGREDIENT_CAP: usize = 25;
const INGREDIENT_WEIGHT: f64 = 2.0;
const INSTRUCTION_CAP: usize = 15;
const INSTRUCTION_WEIGHT: f64 = 4.0;
const TITLE_BONUS: f64 = 5.0;
const DESCRIPTION_BONUS: f64 = 3.0;
const INGREDIENT_LENGTH_DIVISOR: f64 = 8.0;
const INGREDIENT_LENGTH_CAP: f64 = 5.0;
const INSTRUCTION_LENGTH_DIVISOR: f64 = 20.0;
const INSTRUCTION_LENGTH_CAP: f64 = 8.0;
const LOPSIDED_PENALTY: f64 = 75.0;
const STAGE_ERROR_PENALTY: f64 = 20.0;

fn average_chars(lines: &[String]) -> f64 {
    if lines.is_empty() {
        return 0.0;
    }
    let total: usize = lines.iter().map(|l| l.chars().count()).sum();
    total as f64 / lines.len() as f64
}

fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Non-negative quality score of a candidate.
///
/// Rewards list sizes (capped), a title, a description and substantive line
/// lengths. A candidate with exactly one of the two lists empty is penalized
/// hard, as is one that carries a stage error.
pub fn score_candidate(candidate: &RecipeIngestionCandidate) -> f64 {
    let ingredients = candidate.ingredients();
    let instructions = candidate.instructions();

    let mut score = ingredients.len().min(INGREDIENT_CAP) as f64 * INGREDIENT_WEIGHT
        + instructions.len().min(INSTRUCTION_CAP) as f64 * INSTRUCTION_WEIGHT;
    if is_present(candidate.title()) {
        score += TITLE_BONUS;
    }
    if is_present(candidate.draft.description.as_deref()) {
        score += DESCRIPTION_BONUS;
    }
    score += (average_chars(ingredients) / INGREDIENT_LENGTH_DIVISOR).min(INGREDIENT_LENGTH_CAP);
    score +=
        (average_chars(instructions) / INSTRUCTION_LENGTH_DIVISOR).min(INSTRUCTION_LENGTH_CAP);
    if ingredients.is_empty() != instructions.is_empty() {
        score -= LOPSIDED_PENALTY;
    }
    if candidate.error.is_some() {
        score -= STAGE_ERROR_PENALTY;
    }
    score.max(0.0)
}

/// A candidate paired with its score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub candidate: RecipeIngestionCandidate,
    pub score: f64,
}

impl ScoredCandidate {
    pub fn new(candidate: RecipeIngestionCandidate) -> Self {
        let score = score_candidate(&candidate);
        Self { candidate, score }
    }
}

/// Rank order: higher score first, then higher stage priority.
pub fn rank(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| {
            b.candidate
                .stage
                .priority()
                .cmp(&a.candidate.stage.priority())
        })
}

/// Index of the best successful candidate. Priority only breaks score ties.
pub fn select_best(candidates: &[ScoredCandidate]) -> Option<usize> {
    candidates
        .iter()
        .enumerate()
        .filter(|(_, c)| c.candidate.success)
        .min_by(|(_, a), (_, b)| rank(a, b))
        .map(|(index, _)| index)
}

/// Why a run produced no acceptable recipe.
///
/// Ingredients without instructions beat every fetch signal; then a block
/// anywhere, then a timeout anywhere.
pub fn failure_reason(
    best: Option<&RecipeIngestionCandidate>,
    attempts: &[IngestionAttemptResult],
) -> IngestionErrorCode {
    if best.is_some_and(|c| !c.ingredients().is_empty() && c.instructions().is_empty()) {
        return IngestionErrorCode::InsufficientSteps;
    }
    let saw = |code: IngestionErrorCode| attempts.iter().any(|a| a.error() == Some(code));
    if saw(IngestionErrorCode::Blocked) {
        IngestionErrorCode::Blocked
    } else if saw(IngestionErrorCode::Timeout) {
        IngestionErrorCode::FetchFailed
    } else {
        IngestionErrorCode::NoRecipeData
    }
}
