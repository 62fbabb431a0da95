use recipe_ingest::url_to_text::html::extractors::{
    extract_structured, Extractor, HtmlClassExtractor, MicroDataExtractor, ParsingContext,
};

#[test]
fn test_microdata_extraction() {
    let html = r#"
    <html>
    <body>
    <div id="easyrecipe-557-0" class="easyrecipe" itemscope itemtype="http://schema.org/Recipe">
        <div itemprop="name" class="ERSName">Mom's Famous Banana Bread</div>
        <div itemprop="description" class="ERSSummary">Mom was kind enough to share her famous banana bread recipe with us!</div>
        <img itemprop="image" src="https://example.com/banana-bread.jpg" />
        <div itemprop="author" itemscope itemtype="http://schema.org/Person">
            <span itemprop="name">Cooking Divine</span>
        </div>
        <div itemprop="keywords">banana, bread, sweet</div>

        <div class="ERSTimes">
            <time itemprop="prepTime" datetime="PT10M">10 mins</time>
            <meta itemprop="cookTime" content="PT1H">
        </div>

        <div class="ERSServes">Serves: <span itemprop="recipeYield">12 servings</span></div>

        <div class="ERSIngredients">
            <ul>
                <li class="ingredient" itemprop="ingredients">5 Tablespoons Butter (room temperature)</li>
                <li class="ingredient" itemprop="ingredients">1 Cup White Sugar</li>
                <li class="ingredient" itemprop="ingredients">1 Large Egg</li>
            </ul>
        </div>

        <div class="ERSInstructions">
            <ol>
                <li class="instruction" itemprop="recipeInstructions">Preheat oven to 350 degrees and heavily grease a 9 inch bread pan.</li>
                <li class="instruction" itemprop="recipeInstructions">Beat butter and sugar until light, fluffy and well blended.</li>
            </ol>
        </div>
    </div>
    </body>
    </html>
    "#;

    let context = ParsingContext::new("https://www.cookingdivine.com/recipes/banana-bread/", html);
    let draft = MicroDataExtractor.parse(&context).unwrap();

    assert_eq!(draft.title.as_deref(), Some("Mom's Famous Banana Bread"));
    assert_eq!(
        draft.description.as_deref(),
        Some("Mom was kind enough to share her famous banana bread recipe with us!")
    );
    assert_eq!(draft.ingredients.len(), 3);
    assert!(draft.ingredients[0].starts_with("5 Tablespoons Butter"));
    assert!(draft.instructions[0].starts_with("Preheat oven to 350 degrees"));
    assert_eq!(draft.prep_time.as_deref(), Some("10 mins"));
    assert_eq!(draft.cook_time.as_deref(), Some("1 hour"));
    assert_eq!(draft.servings.as_deref(), Some("12 servings"));
    assert_eq!(
        draft.image_url.as_deref(),
        Some("https://example.com/banana-bread.jpg")
    );
    assert_eq!(draft.tags, vec!["banana", "bread", "sweet"]);
}

#[test]
fn test_wprm_recipe_extraction() {
    let html = r#"
    <html>
        <body>
            <h1 class="wprm-recipe-name">Chocolate Chip Cookies</h1>
            <div class="wprm-recipe-summary">Delicious homemade chocolate chip cookies</div>

            <div class="wprm-recipe-ingredients-container">
                <ul>
                    <li>2 cups all-purpose flour</li>
                    <li>1 cup butter, softened</li>
                    <li>1 cup sugar</li>
                    <li>2 eggs</li>
                    <li>1 tsp vanilla extract</li>
                    <li>2 cups chocolate chips</li>
                </ul>
            </div>

            <div class="wprm-recipe-instructions-container">
                <ul>
                    <li>Preheat oven to 350°F</li>
                    <li>Mix butter and sugar until fluffy</li>
                    <li>Add eggs and vanilla</li>
                    <li>Gradually add flour</li>
                    <li>Fold in chocolate chips</li>
                    <li>Bake for 10-12 minutes</li>
                </ul>
            </div>

            <span class="wprm-recipe-prep-time">15 minutes</span>
            <span class="wprm-recipe-cook-time">12 minutes</span>
            <span class="wprm-recipe-servings">24 cookies</span>
        </body>
    </html>
    "#;

    let context = ParsingContext::new("https://example.com/recipe", html);
    let draft = HtmlClassExtractor.parse(&context).unwrap();

    assert_eq!(draft.title.as_deref(), Some("Chocolate Chip Cookies"));
    assert_eq!(
        draft.description.as_deref(),
        Some("Delicious homemade chocolate chip cookies")
    );
    assert_eq!(draft.ingredients.len(), 6);
    assert!(draft.ingredients.contains(&"1 cup butter, softened".to_string()));
    assert_eq!(draft.instructions.len(), 6);
    assert_eq!(draft.instructions[5], "Bake for 10-12 minutes");
    assert_eq!(draft.prep_time.as_deref(), Some("15 minutes"));
    assert_eq!(draft.cook_time.as_deref(), Some("12 minutes"));
    assert_eq!(draft.servings.as_deref(), Some("24 cookies"));
    // One untitled group is not kept as a section.
    assert!(draft.ingredient_sections.is_empty());
}

#[test]
fn test_tasty_recipes_extraction() {
    let html = r#"
    <html>
        <body>
            <h2 class="tasty-recipes-title">Banana Bread</h2>
            <div class="tasty-recipes-description">Moist and delicious banana bread</div>

            <div class="tasty-recipes-ingredients">
                <li>3 ripe bananas</li>
                <li>2 cups flour</li>
                <li>1 cup sugar</li>
                <li>1/2 cup butter</li>
                <li>2 eggs</li>
            </div>

            <div class="tasty-recipes-instructions">
                <li>Mash bananas</li>
                <li>Mix wet ingredients</li>
                <li>Add dry ingredients</li>
                <li>Pour into loaf pan</li>
                <li>Bake at 350°F for 60 minutes</li>
            </div>

            <span class="tasty-recipes-yield">1 loaf</span>
        </body>
    </html>
    "#;

    let context = ParsingContext::new("https://example.com/banana-bread", html);
    let draft = HtmlClassExtractor.parse(&context).unwrap();

    assert_eq!(draft.title.as_deref(), Some("Banana Bread"));
    assert_eq!(draft.ingredients[0], "3 ripe bananas");
    assert_eq!(draft.instructions[0], "Mash bananas");
    assert_eq!(draft.servings.as_deref(), Some("1 loaf"));
}

#[test]
fn test_generic_recipe_classes() {
    let html = r#"
    <html>
        <body>
            <h1 class="recipe-title">Pasta Carbonara</h1>
            <p class="recipe-description">Classic Italian pasta dish</p>

            <div class="recipe-ingredients">
                <ul>
                    <li>400g spaghetti</li>
                    <li>200g pancetta</li>
                    <li>4 eggs</li>
                    <li>100g Parmesan cheese</li>
                </ul>
            </div>

            <div class="recipe-instructions">
                <p>Cook pasta according to package</p>
                <p>Fry pancetta until crispy</p>
                <p>Mix eggs and cheese</p>
                <p>Combine everything off heat</p>
            </div>

            <div class="recipe-prep-time">10 minutes</div>
            <div class="recipe-cook-time">20 minutes</div>
        </body>
    </html>
    "#;

    let context = ParsingContext::new("https://example.com/carbonara", html);
    let draft = HtmlClassExtractor.parse(&context).unwrap();

    assert_eq!(draft.title.as_deref(), Some("Pasta Carbonara"));
    assert_eq!(draft.ingredients.len(), 4);
    assert_eq!(
        draft.instructions,
        vec![
            "Cook pasta according to package",
            "Fry pancetta until crispy",
            "Mix eggs and cheese",
            "Combine everything off heat",
        ]
    );
    assert_eq!(draft.prep_time.as_deref(), Some("10 minutes"));
}

#[test]
fn test_json_ld_wins_over_recipe_card() {
    let html = r#"
    <html>
    <head>
        <script type="application/ld+json">
        {
            "@context": "https://schema.org",
            "@graph": [
                {"@type": "WebPage", "name": "Blog"},
                {
                    "@type": ["Recipe", "NewsArticle"],
                    "name": "Structured Soup",
                    "recipeIngredient": ["1 leek", "2 potatoes"],
                    "recipeInstructions": "Chop everything.\nSimmer for 20 minutes."
                }
            ]
        }
        </script>
    </head>
    <body>
        <h2 class="wprm-recipe-name">Card Soup</h2>
        <div class="wprm-recipe-ingredients-container"><ul><li>1 onion</li></ul></div>
    </body>
    </html>
    "#;

    let context = ParsingContext::new("https://example.com/soup", html);
    let draft = extract_structured(&context).unwrap();
    assert_eq!(draft.title.as_deref(), Some("Structured Soup"));
    assert_eq!(draft.ingredients, vec!["1 leek", "2 potatoes"]);
    assert_eq!(
        draft.instructions,
        vec!["Chop everything.", "Simmer for 20 minutes."]
    );
}

#[test]
fn test_no_structured_data() {
    let context = ParsingContext::new(
        "https://example.com",
        "<html><body><h1>About us</h1><p>We love food.</p></body></html>",
    );
    assert!(extract_structured(&context).is_none());
}
