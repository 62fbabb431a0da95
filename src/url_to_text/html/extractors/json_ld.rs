use super::{Extractor, ParsingContext};
use crate::error::ImportError;
use crate::model::RecipeDraft;
use crate::normalize::{
    clean_ingredient_lines, clean_instruction_lines, collapse_whitespace, decode_entities,
};
use log::debug;
use regex::Regex;
use scraper::{Html, Selector};
use serde::Deserialize;
use serde_json::Value;
use std::sync::LazyLock;

static LD_JSON: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script[type='application/ld+json']").unwrap());
static ISO_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+(?:-\d+)?)M)?(?:(\d+(?:\.\d+)?)S)?)?$")
        .unwrap()
});

/// Guard against pathological nesting in hostile markup.
const MAX_DEPTH: usize = 12;

pub struct JsonLdExtractor;

impl JsonLdExtractor {
    /// Find and convert a Recipe among already-parsed JSON-LD payloads.
    pub fn parse_values(&self, values: &[Value]) -> Option<RecipeDraft> {
        values.iter().find_map(|value| {
            let recipe = find_recipe_value(value)?;
            match serde_json::from_value::<JsonLdRecipe>(recipe.clone()) {
                Ok(parsed) => Some(convert_to_draft(parsed)),
                Err(e) => {
                    debug!("JsonLdExtractor: Failed to convert to JsonLdRecipe: {}", e);
                    None
                }
            }
        })
    }

    /// Raw JSON-LD payloads in a document, sanitized and parsed.
    pub fn script_values(&self, document: &Html) -> Vec<Value> {
        document
            .select(&LD_JSON)
            .enumerate()
            .filter_map(|(index, script)| {
                let raw_json = script.inner_html();
                match serde_json::from_str::<Value>(&sanitize_json(&raw_json)) {
                    Ok(value) => Some(value),
                    Err(e) => {
                        debug!("JsonLdExtractor: Failed to parse JSON-LD {}: {}", index, e);
                        None
                    }
                }
            })
            .collect()
    }
}

impl Extractor for JsonLdExtractor {
    fn name(&self) -> &'static str {
        "JsonLdExtractor"
    }

    fn parse(&self, context: &ParsingContext) -> Result<RecipeDraft, ImportError> {
        debug!("JsonLdExtractor: Starting parse for URL: {}", context.url);
        let values = self.script_values(&context.document);
        debug!("JsonLdExtractor: Found {} JSON-LD payloads", values.len());
        self.parse_values(&values).ok_or_else(|| {
            ImportError::ParseError("No valid recipe found in any JSON-LD script".to_string())
        })
    }
}

fn is_recipe_type(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(t)) => is_recipe_name(t),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .any(is_recipe_name),
        _ => false,
    }
}

fn is_recipe_name(type_name: &str) -> bool {
    let short = type_name.rsplit('/').next().unwrap_or(type_name);
    short.eq_ignore_ascii_case("recipe")
}

/// Locate the first Recipe-typed object in a JSON-LD payload.
///
/// Walks top-level arrays, `@graph` and `mainEntity`.
pub fn find_recipe_value(value: &Value) -> Option<&Value> {
    find_recipe_at(value, 0)
}

fn find_recipe_at(value: &Value, depth: usize) -> Option<&Value> {
    if depth > MAX_DEPTH {
        return None;
    }
    match value {
        Value::Array(items) => items.iter().find_map(|item| find_recipe_at(item, depth + 1)),
        Value::Object(map) => {
            if is_recipe_type(value) {
                return Some(value);
            }
            ["@graph", "mainEntity", "mainEntityOfPage"]
                .iter()
                .filter_map(|key| map.get(*key))
                .find_map(|nested| find_recipe_at(nested, depth + 1))
        }
        _ => None,
    }
}

/// One node of a recipe's instruction tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstructionNode {
    Step(String),
    Section {
        name: Option<String>,
        steps: Vec<InstructionNode>,
    },
}

/// Parse `recipeInstructions` into a closed tree of steps and sections.
///
/// Accepts a plain string (split on newlines), arrays of strings,
/// `HowToStep` objects, `HowToSection`/`ItemList` objects with
/// `itemListElement`, and any nesting of those.
pub fn parse_instructions(value: &Value) -> Vec<InstructionNode> {
    let mut nodes = Vec::new();
    descend(value, 0, &mut nodes);
    nodes
}

fn descend(value: &Value, depth: usize, out: &mut Vec<InstructionNode>) {
    if depth > MAX_DEPTH {
        return;
    }
    match value {
        Value::String(text) => {
            out.extend(split_step_text(text).into_iter().map(InstructionNode::Step));
        }
        Value::Array(items) => {
            for item in items {
                descend(item, depth + 1, out);
            }
        }
        Value::Object(map) => {
            if let Some(children) = map.get("itemListElement") {
                let mut steps = Vec::new();
                descend(children, depth + 1, &mut steps);
                let name = map
                    .get("name")
                    .and_then(Value::as_str)
                    .map(|n| collapse_whitespace(&decode_entities(n)))
                    .filter(|n| !n.is_empty());
                if has_type(value, "HowToStep") && steps.is_empty() {
                    if let Some(text) = step_text(map) {
                        out.extend(split_step_text(&text).into_iter().map(InstructionNode::Step));
                    }
                } else if !steps.is_empty() {
                    out.push(InstructionNode::Section { name, steps });
                }
            } else if let Some(text) = step_text(map) {
                out.extend(split_step_text(&text).into_iter().map(InstructionNode::Step));
            }
        }
        _ => {}
    }
}

fn has_type(value: &Value, wanted: &str) -> bool {
    match value.get("@type") {
        Some(Value::String(t)) => t.eq_ignore_ascii_case(wanted),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .any(|t| t.eq_ignore_ascii_case(wanted)),
        _ => false,
    }
}

/// Prefer `text` over `name`, as recipe plugins often repeat a truncated
/// `name`.
fn step_text(map: &serde_json::Map<String, Value>) -> Option<String> {
    ["text", "name", "description"]
        .iter()
        .filter_map(|key| map.get(*key).and_then(Value::as_str))
        .find(|s| !s.trim().is_empty())
        .map(str::to_string)
}

fn split_step_text(text: &str) -> Vec<String> {
    let decoded = decode_html_symbols(text);
    let plain = if decoded.contains('<') {
        strip_tags(&decoded)
    } else {
        decoded
    };
    plain
        .lines()
        .map(collapse_whitespace)
        .filter(|line| !line.is_empty())
        .collect()
}

fn strip_tags(fragment: &str) -> String {
    let html = fragment
        .replace("<br>", "\n")
        .replace("<br/>", "\n")
        .replace("<br />", "\n")
        .replace("</p>", "</p>\n")
        .replace("</li>", "</li>\n");
    Html::parse_fragment(&html)
        .root_element()
        .text()
        .collect::<String>()
}

/// Flatten a tree in document order, sections in sequence and steps in
/// order within each section.
pub fn flatten_instructions(nodes: &[InstructionNode]) -> Vec<String> {
    let mut out = Vec::new();
    for node in nodes {
        match node {
            InstructionNode::Step(text) => out.push(text.clone()),
            InstructionNode::Section { steps, .. } => out.extend(flatten_instructions(steps)),
        }
    }
    out
}

#[derive(Debug, Deserialize)]
struct JsonLdRecipe {
    name: Option<String>,
    description: Option<DescriptionType>,
    image: Option<ImageType>,
    video: Option<Value>,
    #[serde(rename = "recipeIngredient", alias = "ingredients")]
    recipe_ingredient: Option<RecipeIngredients>,
    #[serde(rename = "recipeInstructions")]
    recipe_instructions: Option<Value>,
    #[serde(rename = "recipeYield")]
    recipe_yield: Option<RecipeYield>,
    #[serde(rename = "prepTime")]
    prep_time: Option<String>,
    #[serde(rename = "cookTime")]
    cook_time: Option<String>,
    keywords: Option<Keywords>,
}

#[derive(Debug, Deserialize)]
struct ImageObject {
    url: Option<String>,
    #[serde(rename = "contentUrl")]
    content_url: Option<String>,
}

impl ImageObject {
    fn into_url(self) -> Option<String> {
        self.url.or(self.content_url)
    }
}

#[derive(Debug, Deserialize)]
struct TextObject {
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DescriptionType {
    String(String),
    Object(TextObject),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImageType {
    String(String),
    MultipleStrings(Vec<String>),
    MultipleObjects(Vec<ImageObject>),
    Object(ImageObject),
    Other(Value),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecipeIngredients {
    Strings(Vec<String>),
    Objects(Vec<IngredientObject>),
    String(String),
}

#[derive(Debug, Deserialize)]
struct IngredientObject {
    name: String,
    amount: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecipeYield {
    String(String),
    Number(f64),
    Array(Vec<Value>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Keywords {
    String(String),
    Multiple(Vec<String>),
}

fn convert_to_draft(recipe: JsonLdRecipe) -> RecipeDraft {
    let raw_ingredients: Vec<String> = match recipe.recipe_ingredient {
        Some(RecipeIngredients::Strings(items)) => items,
        Some(RecipeIngredients::Objects(items)) => items
            .into_iter()
            .map(|ing| match ing.amount.as_deref().map(str::trim) {
                Some(amount) if !amount.is_empty() => format!("{amount} {}", ing.name),
                _ => ing.name,
            })
            .collect(),
        Some(RecipeIngredients::String(text)) => text.lines().map(str::to_string).collect(),
        None => Vec::new(),
    };
    let ingredients = clean_ingredient_lines(&raw_ingredients);

    let nodes = recipe
        .recipe_instructions
        .as_ref()
        .map(parse_instructions)
        .unwrap_or_default();
    let instructions = clean_instruction_lines(&flatten_instructions(&nodes));

    let mut notes = ingredients.notes;
    notes.extend(instructions.notes);

    RecipeDraft {
        title: recipe
            .name
            .map(|n| collapse_whitespace(&decode_html_symbols(&n)))
            .filter(|n| !n.is_empty()),
        description: recipe
            .description
            .map(|desc| match desc {
                DescriptionType::String(d) => d,
                DescriptionType::Object(d) => d.text,
            })
            .map(|d| collapse_whitespace(&decode_html_symbols(&d)))
            .filter(|d| !d.is_empty()),
        ingredients: ingredients.lines,
        instructions: instructions.lines,
        notes,
        tags: recipe.keywords.map(keyword_tags).unwrap_or_default(),
        image_url: recipe.image.and_then(first_image),
        video_url: recipe.video.as_ref().and_then(video_url),
        servings: recipe.recipe_yield.and_then(yield_text),
        prep_time: recipe
            .prep_time
            .filter(|t| !t.trim().is_empty())
            .map(|t| convert_duration(t.trim())),
        cook_time: recipe
            .cook_time
            .filter(|t| !t.trim().is_empty())
            .map(|t| convert_duration(t.trim())),
        ingredient_sections: Vec::new(),
    }
}

fn first_image(image: ImageType) -> Option<String> {
    let url = match image {
        ImageType::String(i) => Some(i),
        ImageType::MultipleStrings(imgs) => imgs.into_iter().next(),
        ImageType::Object(i) => i.into_url(),
        ImageType::MultipleObjects(imgs) => imgs.into_iter().find_map(ImageObject::into_url),
        ImageType::Other(value) => {
            debug!("JsonLdExtractor: unsupported image value {}", value);
            None
        }
    }?;
    let url = decode_html_symbols(url.trim());
    (!url.is_empty()).then_some(url)
}

/// `VideoObject` (or an array of them): `contentUrl`, then `embedUrl`, then `url`.
pub(crate) fn video_url(value: &Value) -> Option<String> {
    match value {
        Value::String(url) => Some(url.clone()).filter(|u| !u.trim().is_empty()),
        Value::Array(items) => items.iter().find_map(video_url),
        Value::Object(map) => ["contentUrl", "embedUrl", "url"]
            .iter()
            .filter_map(|key| map.get(*key).and_then(Value::as_str))
            .find(|u| !u.trim().is_empty())
            .map(str::to_string),
        _ => None,
    }
}

fn yield_text(recipe_yield: RecipeYield) -> Option<String> {
    let text = match recipe_yield {
        RecipeYield::String(s) => s,
        RecipeYield::Number(n) => format_number(n),
        // Prefer the descriptive entry ("4 servings") over a bare number.
        RecipeYield::Array(items) => {
            let texts: Vec<String> = items
                .iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => n.as_f64().map(format_number),
                    _ => None,
                })
                .collect();
            texts
                .iter()
                .find(|s| s.contains(char::is_alphabetic))
                .or_else(|| texts.first())
                .cloned()
                .unwrap_or_default()
        }
    };
    let text = collapse_whitespace(&decode_html_symbols(&text));
    (!text.is_empty()).then_some(text)
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

fn keyword_tags(keywords: Keywords) -> Vec<String> {
    let raw: Vec<String> = match keywords {
        Keywords::String(s) => s.split(',').map(str::to_string).collect(),
        Keywords::Multiple(v) => v,
    };
    let mut tags: Vec<String> = Vec::new();
    for tag in raw {
        let tag = collapse_whitespace(&decode_html_symbols(&tag));
        if !tag.is_empty() && !tags.iter().any(|t| t.eq_ignore_ascii_case(&tag)) {
            tags.push(tag);
        }
    }
    tags
}

fn decode_html_symbols(text: &str) -> String {
    decode_entities(text)
}

/// Convert an ISO 8601 duration to human-readable text.
///
/// `PT30M` -> `30 minutes`, `PT1H30M` -> `1 hour 30 minutes`, ranges like
/// `PT15-20M` and seconds like `PT5400.0S` are handled too. Anything else,
/// including out-of-order designators, is returned as-is.
pub fn convert_duration(duration: &str) -> String {
    let Some(caps) = ISO_DURATION.captures(duration.trim()) else {
        return duration.to_string();
    };
    let number = |i: usize| {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .unwrap_or(0)
    };
    let hours = number(1) * 24 + number(2);

    if let Some(range) = caps.get(3).filter(|m| m.as_str().contains('-')) {
        let prefix = hours_minutes(hours, 0);
        return if prefix.is_empty() {
            format!("{} minutes", range.as_str())
        } else {
            format!("{prefix} {} minutes", range.as_str())
        };
    }

    let seconds = caps
        .get(4)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0);
    let total_minutes = hours * 60 + number(3) + (seconds / 60.0).round() as u32;
    let text = hours_minutes(total_minutes / 60, total_minutes % 60);
    if text.is_empty() {
        duration.to_string()
    } else {
        text
    }
}

fn hours_minutes(hours: u32, minutes: u32) -> String {
    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(format!("{} hour{}", hours, if hours == 1 { "" } else { "s" }));
    }
    if minutes > 0 {
        parts.push(format!(
            "{} minute{}",
            minutes,
            if minutes == 1 { "" } else { "s" }
        ));
    }
    parts.join(" ")
}

/// Repair the malformed JSON some recipe plugins emit: missing commas
/// between values, duplicated commas, trailing commas, raw newlines in
/// strings.
fn sanitize_json(json_str: &str) -> String {
    let mut minified = String::with_capacity(json_str.len());
    let mut in_string = false;
    let mut prev_char = None;
    let mut depth = 0i32;
    let chars: Vec<char> = json_str.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        match c {
            '"' if prev_char != Some('\\') => {
                in_string = !in_string;
                if !in_string {
                    let rest_chars = chars.get(i + 1..).unwrap_or(&[]);
                    let next_char = rest_chars.iter().find(|c| !c.is_whitespace());
                    if matches!(next_char, Some('"' | '[' | '{')) {
                        minified.push('"');
                        minified.push(',');
                        prev_char = Some(',');
                        continue;
                    }
                }
                minified.push(c);
            }
            '\n' | '\r' | '\t' if in_string => minified.push(' '),
            '[' | '{' if !in_string => {
                depth += 1;
                minified.push(c);
            }
            ']' | '}' if !in_string => {
                depth -= 1;
                minified.push(c);
                let rest_chars = chars.get(i + 1..).unwrap_or(&[]);
                let next_char = rest_chars.iter().find(|c| !c.is_whitespace());
                if depth > 0 && matches!(next_char, Some('"' | '{' | '[')) {
                    minified.push(',');
                    prev_char = Some(',');
                    continue;
                }
            }
            ',' if !in_string => {
                if prev_char != Some(',') {
                    minified.push(c);
                }
            }
            _ => {
                if in_string || !c.is_whitespace() {
                    minified.push(c);
                }
            }
        }
        prev_char = Some(c);
    }

    minified
        .replace(",]", "]")
        .replace(",}", "}")
        .replace(",:", ":")
        .replace(":,", ":")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context_with(json_ld: &str) -> ParsingContext {
        let html = format!(
            r#"<!DOCTYPE html><html><head>
            <script type="application/ld+json">{json_ld}</script>
            </head><body></body></html>"#
        );
        ParsingContext::new("http://example.com", &html)
    }

    #[test]
    fn test_parse_basic_recipe() {
        let context = context_with(
            r#"{
            "@context": "https://schema.org/",
            "@type": "Recipe",
            "name": "Chocolate Chip Cookies",
            "description": "Delicious homemade cookies",
            "image": "https://example.com/cookie.jpg",
            "recipeIngredient": ["2 cups flour", "1 cup sugar", "", "1 cup chocolate chips"],
            "recipeInstructions": "Mix ingredients.\nBake at 350F for 10 minutes.",
            "prepTime": "PT15M",
            "cookTime": "PT10M",
            "recipeYield": "24 cookies",
            "keywords": "chocolate, cookies, baking"
        }"#,
        );
        let draft = JsonLdExtractor.parse(&context).unwrap();
        assert_eq!(draft.title.as_deref(), Some("Chocolate Chip Cookies"));
        assert_eq!(draft.ingredients.len(), 3);
        assert_eq!(
            draft.instructions,
            vec![
                "Mix ingredients.".to_string(),
                "Bake at 350F for 10 minutes.".to_string()
            ]
        );
        assert_eq!(draft.prep_time.as_deref(), Some("15 minutes"));
        assert_eq!(draft.servings.as_deref(), Some("24 cookies"));
        assert_eq!(draft.tags, vec!["chocolate", "cookies", "baking"]);
        assert_eq!(draft.image_url.as_deref(), Some("https://example.com/cookie.jpg"));
    }

    #[test]
    fn test_no_recipe_is_error() {
        let context = ParsingContext::new("http://example.com", "<html><body>Test</body></html>");
        assert!(JsonLdExtractor.parse(&context).is_err());
    }

    #[test]
    fn test_graph_and_type_array() {
        let context = context_with(
            r#"{"@context":"https://schema.org","@graph":[
                {"@type":"WebPage","name":"Page"},
                {"@type":["Recipe","NewsArticle"],"name":"Soup",
                 "recipeIngredient":["1 onion"],
                 "recipeInstructions":[{"@type":"HowToStep","text":"Chop the onion."}],
                 "recipeYield":[4,"4 servings"],
                 "video":{"@type":"VideoObject","contentUrl":"https://v.example/soup.mp4"}}
            ]}"#,
        );
        let draft = JsonLdExtractor.parse(&context).unwrap();
        assert_eq!(draft.title.as_deref(), Some("Soup"));
        assert_eq!(draft.servings.as_deref(), Some("4 servings"));
        assert_eq!(draft.video_url.as_deref(), Some("https://v.example/soup.mp4"));
    }

    #[test]
    fn test_lowercase_recipe_type() {
        let context = context_with(
            r#"[{"@type":"WebSite"},{"@type":"recipe","name":"Toast","recipeIngredient":["bread"],"recipeYield":2}]"#,
        );
        let draft = JsonLdExtractor.parse(&context).unwrap();
        assert_eq!(draft.servings.as_deref(), Some("2"));
    }

    #[test]
    fn test_nested_sections_flatten_in_document_order() {
        let value = json!([
            {"@type": "HowToSection", "name": "Dough", "itemListElement": [
                {"@type": "HowToStep", "text": "Mix flour and water."},
                {"@type": "HowToStep", "text": "Knead for 10 minutes."}
            ]},
            {"@type": "HowToStep", "text": "Preheat the oven."},
            {"@type": "HowToSection", "name": "Topping", "itemListElement": [
                {"@type": "HowToStep", "name": "Spread", "text": "Spread the sauce."},
                {"@type": "HowToSection", "name": "Cheese", "itemListElement": [
                    "Scatter the cheese."
                ]}
            ]}
        ]);
        let nodes = parse_instructions(&value);
        assert_eq!(nodes.len(), 3);
        assert!(matches!(
            &nodes[0],
            InstructionNode::Section { name: Some(n), steps } if n == "Dough" && steps.len() == 2
        ));
        assert_eq!(
            flatten_instructions(&nodes),
            vec![
                "Mix flour and water.",
                "Knead for 10 minutes.",
                "Preheat the oven.",
                "Spread the sauce.",
                "Scatter the cheese.",
            ]
        );
    }

    #[test]
    fn test_plain_string_array_and_html_text() {
        let value = json!(["<p>Boil water.</p><p>Add pasta.</p>", "Drain &amp; serve."]);
        assert_eq!(
            flatten_instructions(&parse_instructions(&value)),
            vec!["Boil water.", "Add pasta.", "Drain & serve."]
        );
    }

    #[test]
    fn test_duration_conversion() {
        assert_eq!(convert_duration("PT30M"), "30 minutes");
        assert_eq!(convert_duration("PT1H"), "1 hour");
        assert_eq!(convert_duration("PT1H30M"), "1 hour 30 minutes");
        assert_eq!(convert_duration("PT90M"), "1 hour 30 minutes");
        assert_eq!(convert_duration("PT2H15M"), "2 hours 15 minutes");
        assert_eq!(convert_duration("invalid"), "invalid");
        assert_eq!(convert_duration("PT15-20M"), "15-20 minutes");
        assert_eq!(convert_duration("PT5400S"), "1 hour 30 minutes");
        assert_eq!(convert_duration("PT5400.0S"), "1 hour 30 minutes");
        assert_eq!(convert_duration("PT300S"), "5 minutes");
        assert_eq!(convert_duration("PT180M"), "3 hours");
        assert_eq!(convert_duration("P0DT1H5M"), "1 hour 5 minutes");
        assert_eq!(convert_duration("PT1H15-20M"), "1 hour 15-20 minutes");
        assert_eq!(convert_duration("P1DT2H"), "26 hours");
    }

    #[test]
    fn test_out_of_order_duration_is_kept() {
        assert_eq!(convert_duration("PT30M1H"), "PT30M1H");
        assert_eq!(convert_duration("PT30S1M"), "PT30S1M");
        assert_eq!(convert_duration("PT"), "PT");
    }

    #[test]
    fn test_malformed_times_do_not_break_extraction() {
        let html = r#"<script type="application/ld+json">
            {"@type": "Recipe", "name": "Odd Times", "prepTime": "PT30S1M", "cookTime": "PT30M1H",
             "recipeIngredient": ["1 egg"], "recipeInstructions": "Boil the egg."}
            </script>"#;
        let context = ParsingContext::new("https://example.com/odd", html);
        let draft = JsonLdExtractor.parse(&context).unwrap();
        assert_eq!(draft.prep_time.as_deref(), Some("PT30S1M"));
        assert_eq!(draft.cook_time.as_deref(), Some("PT30M1H"));
        assert_eq!(draft.ingredients, vec!["1 egg"]);
    }

    #[test]
    fn test_unsupported_image_value_is_ignored() {
        let html = r#"<script type="application/ld+json">
            {"@type": "Recipe", "name": "Toast", "image": 42,
             "recipeIngredient": ["1 slice bread"], "recipeInstructions": "Toast the bread."}
            </script>"#;
        let context = ParsingContext::new("https://example.com/toast", html);
        let draft = JsonLdExtractor.parse(&context).unwrap();
        assert!(draft.image_url.is_none());
        assert_eq!(draft.title.as_deref(), Some("Toast"));
    }

    #[test]
    fn test_sanitize_missing_commas() {
        let broken = r#"{"@type":"Recipe" "name":"Pie", "recipeIngredient":["a" "b",]}"#;
        let value: Value = serde_json::from_str(&sanitize_json(broken)).unwrap();
        assert_eq!(value["name"], "Pie");
        assert_eq!(value["recipeIngredient"][1], "b");
    }
}
