//! Shopping list aggregation over stored ingredient lines.

mod amount;

pub use amount::{format_quantity, parse_amounts, Amount, AmountTotals};

use crate::classify::{classify, IngredientCategory};
use crate::normalize::clean_line;
use crate::store::NormalizedRecipe;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// One ingredient line and the recipe it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingEntry {
    pub line: String,
    pub recipe_title: String,
}

impl ShoppingEntry {
    pub fn new(line: impl Into<String>, recipe_title: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            recipe_title: recipe_title.into(),
        }
    }

    /// Every ingredient line of a recipe.
    pub fn from_recipe(recipe: &NormalizedRecipe) -> Vec<ShoppingEntry> {
        recipe
            .ingredients
            .iter()
            .map(|line| ShoppingEntry::new(line.clone(), recipe.title.clone()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShoppingItem {
    pub display: String,
    pub count: usize,
    pub amount: Option<String>,
    pub recipes: Vec<String>,
    pub location: &'static str,
    pub canonical_key: String,
    pub category: IngredientCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShoppingCategory {
    pub category: IngredientCategory,
    pub items: Vec<ShoppingItem>,
}

#[derive(Debug, Default)]
struct Accumulator {
    count: usize,
    totals: AmountTotals,
    recipes: BTreeSet<String>,
    category: Option<IngredientCategory>,
}

/// Merge lines that share a canonical ingredient into one shopping item per
/// ingredient, grouped by category in display order.
pub fn aggregate(entries: &[ShoppingEntry]) -> Vec<ShoppingCategory> {
    let mut by_key: HashMap<String, Accumulator> = HashMap::new();

    for entry in entries {
        let line = clean_line(&entry.line);
        if line.is_empty() {
            continue;
        }
        let classification = classify(&line);
        let key = if classification.canonical_name.trim().is_empty() {
            line.to_lowercase()
        } else {
            classification.canonical_name
        };

        let acc = by_key.entry(key).or_default();
        acc.count += 1;
        for amount in parse_amounts(&line) {
            acc.totals.add(amount);
        }
        let title = entry.recipe_title.trim();
        if !title.is_empty() {
            acc.recipes.insert(title.to_string());
        }
        acc.category = match acc.category {
            None | Some(IngredientCategory::Other) => Some(classification.category),
            concrete => concrete,
        };
    }

    let mut grouped: BTreeMap<IngredientCategory, Vec<ShoppingItem>> = BTreeMap::new();
    for (key, acc) in by_key {
        let category = acc.category.unwrap_or(IngredientCategory::Other);
        grouped.entry(category).or_default().push(ShoppingItem {
            display: title_case(&key),
            count: acc.count,
            amount: acc.totals.summary(),
            recipes: acc.recipes.into_iter().collect(),
            location: category.location(),
            canonical_key: key,
            category,
        });
    }

    grouped
        .into_iter()
        .map(|(category, mut items)| {
            items.sort_by(|a, b| a.display.cmp(&b.display));
            ShoppingCategory { category, items }
        })
        .collect()
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
