use serde::{Deserialize, Serialize};
use std::fmt;

/// Shopping/display category of an ingredient. Declaration order is the
/// display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngredientCategory {
    Produce,
    Meat,
    Seafood,
    Dairy,
    Bakery,
    Frozen,
    CannedJarred,
    DryGoods,
    Pantry,
    Spices,
    Other,
}

impl IngredientCategory {
    pub const ALL: [IngredientCategory; 11] = [
        IngredientCategory::Produce,
        IngredientCategory::Meat,
        IngredientCategory::Seafood,
        IngredientCategory::Dairy,
        IngredientCategory::Bakery,
        IngredientCategory::Frozen,
        IngredientCategory::CannedJarred,
        IngredientCategory::DryGoods,
        IngredientCategory::Pantry,
        IngredientCategory::Spices,
        IngredientCategory::Other,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            IngredientCategory::Produce => "Produce",
            IngredientCategory::Meat => "Meat",
            IngredientCategory::Seafood => "Seafood",
            IngredientCategory::Dairy => "Dairy",
            IngredientCategory::Bakery => "Bakery",
            IngredientCategory::Frozen => "Frozen",
            IngredientCategory::CannedJarred => "Canned & Jarred",
            IngredientCategory::DryGoods => "Dry Goods",
            IngredientCategory::Pantry => "Pantry",
            IngredientCategory::Spices => "Spices & Seasonings",
            IngredientCategory::Other => "Other",
        }
    }

    /// Where in a kitchen or store the item usually lives.
    pub fn location(&self) -> &'static str {
        match self {
            IngredientCategory::Produce => "produce",
            IngredientCategory::Meat | IngredientCategory::Seafood | IngredientCategory::Dairy => {
                "fridge"
            }
            IngredientCategory::Frozen => "freezer",
            IngredientCategory::Bakery => "bakery",
            IngredientCategory::CannedJarred
            | IngredientCategory::DryGoods
            | IngredientCategory::Pantry
            | IngredientCategory::Spices => "pantry",
            IngredientCategory::Other => "other",
        }
    }
}

impl fmt::Display for IngredientCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// How a classification was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    Alias,
    Canonical,
    Override,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientClassification {
    pub category: IngredientCategory,
    pub canonical_name: String,
    pub source: MatchSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_order_matches_declaration() {
        let mut sorted = IngredientCategory::ALL;
        sorted.sort();
        assert_eq!(sorted, IngredientCategory::ALL);
        assert_eq!(IngredientCategory::CannedJarred.to_string(), "Canned & Jarred");
    }

    #[test]
    fn test_location_tags() {
        assert_eq!(IngredientCategory::Dairy.location(), "fridge");
        assert_eq!(IngredientCategory::Frozen.location(), "freezer");
        assert_eq!(IngredientCategory::Spices.location(), "pantry");
        assert_eq!(
            serde_json::to_string(&IngredientCategory::DryGoods).unwrap(),
            "\"dry_goods\""
        );
    }
}
