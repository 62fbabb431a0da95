use recipe_ingest::pipelines;
use recipe_ingest::store::{save_recipe, MemoryStore, SaveOutcome};
use recipe_ingest::{aggregate, IngredientCategory, NormalizedRecipe, ShoppingEntry};

const RISOTTO: &str = "Mushroom Risotto

Ingredients
200g mushrooms
1 cup arborio rice
2 tbsp butter

Method
Fry the mushrooms in butter.
Stir in the rice and cook until creamy.
";

const TOAST: &str = "Mushroom Toast

Ingredients
400g mushroom
2 slices sourdough bread
1 tbsp butter

Method
Toast the bread.
Pile the fried mushrooms on top.
";

fn imported(text: &str) -> NormalizedRecipe {
    pipelines::text::process(text).unwrap()
}

#[test]
fn test_shopping_list_across_recipes() {
    let risotto = imported(RISOTTO);
    let toast = imported(TOAST);
    assert_eq!(risotto.title, "Mushroom Risotto");
    assert_eq!(toast.ingredients.len(), 3);

    let mut entries = ShoppingEntry::from_recipe(&risotto);
    entries.extend(ShoppingEntry::from_recipe(&toast));
    let categories = aggregate(&entries);

    let order: Vec<IngredientCategory> = categories.iter().map(|c| c.category).collect();
    assert_eq!(
        order,
        vec![
            IngredientCategory::Produce,
            IngredientCategory::Dairy,
            IngredientCategory::Bakery,
            IngredientCategory::DryGoods,
        ]
    );

    let mushroom = &categories[0].items[0];
    assert_eq!(mushroom.display, "Mushroom");
    assert_eq!(mushroom.count, 2);
    assert_eq!(mushroom.amount.as_deref(), Some("600 g"));
    assert_eq!(mushroom.recipes, vec!["Mushroom Risotto", "Mushroom Toast"]);

    let butter = &categories[1].items[0];
    assert_eq!(butter.display, "Butter");
    assert_eq!(butter.amount.as_deref(), Some("3 tbsp"));
    assert_eq!(butter.count, 2);
}

#[tokio::test]
async fn test_reimport_backfills_missing_metadata() {
    let store = MemoryStore::new();
    let mut recipe = imported(RISOTTO);
    recipe.source_url = Some("https://example.com/risotto".into());

    let id = match save_recipe(&store, &recipe).await.unwrap() {
        SaveOutcome::Inserted(id) => id,
        other => panic!("expected insert, got {other:?}"),
    };

    let mut reimport = recipe.clone();
    reimport.image_url = Some("https://example.com/risotto.jpg".into());
    reimport.tags = vec!["dinner".into(), "vegetarian".into()];
    reimport.title = "Renamed Risotto".into();
    match save_recipe(&store, &reimport).await.unwrap() {
        SaveOutcome::Patched { id: patched, patch } => {
            assert_eq!(patched, id);
            assert_eq!(patch.image_url.as_deref(), Some("https://example.com/risotto.jpg"));
            assert!(patch.servings.is_none());
        }
        other => panic!("expected patch, got {other:?}"),
    }

    let stored = store.get(&id).await.unwrap();
    assert_eq!(stored.title, "Mushroom Risotto");
    assert_eq!(stored.tags, vec!["dinner", "vegetarian"]);

    // A later import with a different image does not overwrite it.
    reimport.image_url = Some("https://example.com/other.jpg".into());
    assert_eq!(
        save_recipe(&store, &reimport).await.unwrap(),
        SaveOutcome::Unchanged(id.clone())
    );
    let stored = store.get(&id).await.unwrap();
    assert_eq!(stored.image_url.as_deref(), Some("https://example.com/risotto.jpg"));
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_recipes_without_source_are_always_inserted() {
    let store = MemoryStore::new();
    let recipe = imported(TOAST);
    assert!(recipe.source_url.is_none());

    let first = save_recipe(&store, &recipe).await.unwrap();
    let second = save_recipe(&store, &recipe).await.unwrap();
    assert_eq!(first, SaveOutcome::Inserted("recipe-1".into()));
    assert_eq!(second, SaveOutcome::Inserted("recipe-2".into()));
    assert_eq!(store.len().await, 2);
}
