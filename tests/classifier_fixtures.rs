use recipe_ingest::classify::{canonical_key, classify, IngredientCategory, MatchSource};

use IngredientCategory::*;

const FIXTURES: &[(&str, IngredientCategory)] = &[
    // Produce
    ("2 large tomatoes, diced", Produce),
    ("1 yellow onion, finely chopped", Produce),
    ("3 shallots, sliced", Produce),
    ("2 eshallots, finely diced", Produce),
    ("4 green onions, thinly sliced", Produce),
    ("4 cloves garlic, minced", Produce),
    ("1 tbsp grated fresh ginger", Produce),
    ("250g cremini mushrooms", Produce),
    ("500g mushrooms, sliced", Produce),
    ("2 carrots, peeled and diced", Produce),
    ("2 celery stalks, chopped", Produce),
    ("1 kg potatoes", Produce),
    ("1 medium sweet potato", Produce),
    ("1 red bell pepper, seeded", Produce),
    ("1 zucchini, grated", Produce),
    ("1 eggplant", Produce),
    ("1 cucumber", Produce),
    ("2 cups baby spinach", Produce),
    ("1 bunch kale", Produce),
    ("1 head broccoli, cut into florets", Produce),
    ("1 ripe avocado", Produce),
    ("juice of 1 lemon", Produce),
    ("2 limes", Produce),
    ("3 apples, peeled and sliced", Produce),
    ("2 ripe bananas", Produce),
    ("1 cup blueberries", Produce),
    ("1 leek", Produce),
    ("1 bunch asparagus", Produce),
    ("1/2 cup chopped fresh cilantro", Produce),
    ("1/4 cup fresh basil leaves", Produce),
    ("2 sprigs rosemary", Produce),
    ("1 tsp fresh thyme leaves", Produce),
    ("1 lemongrass stalk", Produce),
    // Meat
    ("1 lb ground beef", Meat),
    ("2 boneless skinless chicken breasts", Meat),
    ("6 chicken thighs", Meat),
    ("4 slices bacon", Meat),
    ("200g pancetta, diced", Meat),
    ("1 kg pork shoulder", Meat),
    ("500g lamb mince", Meat),
    ("4 Italian sausages", Meat),
    ("2 steaks", Meat),
    ("100g prosciutto", Meat),
    // Seafood
    ("2 salmon fillets", Seafood),
    ("500g raw shrimp, peeled", Seafood),
    ("1 lb mussels", Seafood),
    ("400g cod fillets", Seafood),
    ("8 scallops", Seafood),
    ("200g squid rings", Seafood),
    // Dairy
    ("1 cup milk", Dairy),
    ("2 tbsp unsalted butter", Dairy),
    ("1 cup heavy cream", Dairy),
    ("1/2 cup sour cream", Dairy),
    ("4 oz cream cheese, softened", Dairy),
    ("1 cup grated cheddar cheese", Dairy),
    ("1/2 cup grated parmesan", Dairy),
    ("200g fresh mozzarella", Dairy),
    ("100g feta, crumbled", Dairy),
    ("1 cup ricotta", Dairy),
    ("1 cup Greek yogurt", Dairy),
    ("1 cup buttermilk", Dairy),
    ("3 large eggs", Dairy),
    ("2 egg yolks", Dairy),
    // Bakery
    ("4 slices sourdough bread", Bakery),
    ("1 baguette", Bakery),
    ("8 flour tortillas", Bakery),
    ("4 pita breads", Bakery),
    ("4 burger buns", Bakery),
    // Frozen
    ("1 sheet puff pastry", Frozen),
    ("2 scoops vanilla ice cream", Frozen),
    ("1 cup frozen peas", Frozen),
    // Canned & Jarred
    ("1 (14 oz) can diced tomatoes", CannedJarred),
    ("canned tomatoes", CannedJarred),
    ("2 tbsp tomato paste", CannedJarred),
    ("1 can coconut milk", CannedJarred),
    ("1 can (400g) chickpeas, drained", CannedJarred),
    ("1 can black beans, rinsed", CannedJarred),
    ("1 can kidney beans", CannedJarred),
    ("4 anchovy fillets", CannedJarred),
    ("1/2 cup kalamata olives", CannedJarred),
    ("1 tbsp capers", CannedJarred),
    ("2 cups passata", CannedJarred),
    // Dry goods
    ("2 cups all-purpose flour", DryGoods),
    ("1 cup bread flour", DryGoods),
    ("2 tbsp cornstarch", DryGoods),
    ("1 cup basmati rice", DryGoods),
    ("400g spaghetti", DryGoods),
    ("1 cup rolled oats", DryGoods),
    ("1 cup quinoa", DryGoods),
    ("1 cup red lentils", DryGoods),
    ("1/2 cup panko breadcrumbs", DryGoods),
    ("1 cup sugar", DryGoods),
    ("1/2 cup packed brown sugar", DryGoods),
    ("1 tsp baking powder", DryGoods),
    ("1/2 tsp baking soda", DryGoods),
    ("2 1/4 tsp active dry yeast", DryGoods),
    ("1/2 cup cocoa powder", DryGoods),
    ("1 cup chopped walnuts", DryGoods),
    ("1/4 cup pine nuts", DryGoods),
    ("1 tbsp sesame seeds", DryGoods),
    ("1 tsp dried thyme", DryGoods),
    // Pantry
    ("2 tbsp olive oil", Pantry),
    ("1 tbsp vegetable oil", Pantry),
    ("1 tsp sesame oil", Pantry),
    ("2 tbsp balsamic vinegar", Pantry),
    ("3 tbsp soy sauce", Pantry),
    ("1 tbsp fish sauce", Pantry),
    ("1 tbsp Worcestershire sauce", Pantry),
    ("1/4 cup mayonnaise", Pantry),
    ("1 tbsp Dijon mustard", Pantry),
    ("2 tbsp honey", Pantry),
    ("2 tbsp maple syrup", Pantry),
    ("1 tsp vanilla extract", Pantry),
    ("4 cups chicken stock", Pantry),
    ("2 tbsp peanut butter", Pantry),
    ("1/2 cup dry white wine", Pantry),
    // Spices & Seasonings
    ("1 tsp salt", Spices),
    ("1/2 tsp black pepper", Spices),
    ("1 tsp smoked paprika", Spices),
    ("1 tsp ground cumin", Spices),
    ("1/2 tsp turmeric", Spices),
    ("1 tsp chili powder", Spices),
    ("1/4 tsp red pepper flakes", Spices),
    ("pinch of cayenne pepper", Spices),
    ("1 tsp ground cinnamon", Spices),
    ("1 tsp dried oregano", Spices),
    ("2 bay leaves", Spices),
    ("1 tsp garam masala", Spices),
    ("1 tsp garlic powder", Spices),
    // Other
    ("1 cup water", Other),
    ("1 cup ice cubes", Other),
];

#[test]
fn test_labeled_fixture_accuracy() {
    let misses: Vec<String> = FIXTURES
        .iter()
        .filter_map(|(line, expected)| {
            let got = classify(line).category;
            (got != *expected).then(|| format!("{line:?}: expected {expected}, got {got}"))
        })
        .collect();

    let accuracy = 1.0 - misses.len() as f64 / FIXTURES.len() as f64;
    assert!(
        accuracy >= 0.99,
        "accuracy {:.3} below 0.99, misses: {:#?}",
        accuracy,
        misses
    );
}

#[test]
fn test_mushroom_and_eshallot_are_produce() {
    for line in ["mushroom", "mushrooms", "eshallot"] {
        assert_eq!(classify(line).category, Produce, "{line}");
    }
}

#[test]
fn test_plural_pairs_share_canonical_key() {
    let pairs = [
        ("tomato", "tomatoes"),
        ("mushroom", "mushrooms"),
        ("berry", "berries"),
        ("potato", "potatoes"),
        ("1 peach", "2 peaches"),
        ("1 egg", "3 eggs"),
    ];
    for (singular, plural) in pairs {
        assert_eq!(canonical_key(singular), canonical_key(plural), "{singular} / {plural}");
    }
}

#[test]
fn test_canned_tomatoes_override() {
    let c = classify("canned tomatoes");
    assert_eq!(c.category, CannedJarred);
    assert_eq!(c.source, MatchSource::Override);
    // Non-produce items keep their own category.
    assert_eq!(classify("1 can tuna in water").category, CannedJarred);
    assert_eq!(classify("frozen shrimp").category, Seafood);
}

#[test]
fn test_storage_form_inside_parenthetical() {
    let c = classify("1 cup tomatoes (canned)");
    assert_eq!(c.category, CannedJarred);
    assert_eq!(c.source, MatchSource::Override);
    assert_eq!(classify("1 cup mango (dried)").category, DryGoods);
    assert_eq!(classify("2 cups peas (frozen)").category, Frozen);
}
