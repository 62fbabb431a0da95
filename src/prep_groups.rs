//! Mise-en-place grouping of ingredient lines.

use crate::model::{IngredientSection, PrepGroup, RecipeDraft};

/// Past participle found in ingredient lines, group title, and the stem
/// looked for in instructions.
const PREP_VERBS: &[(&str, &str, &str)] = &[
    ("sliced", "Slice", "slic"),
    ("diced", "Dice", "dic"),
    ("chopped", "Chop", "chop"),
    ("minced", "Mince", "minc"),
    ("grated", "Grate", "grat"),
    ("peeled", "Peel", "peel"),
    ("crushed", "Crush", "crush"),
    ("julienned", "Julienne", "julienn"),
    ("cubed", "Cube", "cub"),
    ("shredded", "Shred", "shred"),
    ("zested", "Zest", "zest"),
    ("melted", "Melt", "melt"),
    ("softened", "Soften", "soften"),
    ("toasted", "Toast", "toast"),
];

const TITLE_FILLER: &[&str] = &["for", "the", "a", "an", "and", "of", "to", "serve", "ingredients"];

fn lower_words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// First instruction with a word starting with any of `stems`.
fn first_step_mentioning(instructions: &[String], stems: &[String]) -> Option<usize> {
    instructions.iter().position(|step| {
        lower_words(step)
            .iter()
            .any(|word| stems.iter().any(|stem| word.starts_with(stem.as_str())))
    })
}

/// The prep verb appearing earliest in the line.
fn prep_verb(line: &str) -> Option<&'static (&'static str, &'static str, &'static str)> {
    let words = lower_words(line);
    words
        .iter()
        .find_map(|word| PREP_VERBS.iter().find(|(participle, _, _)| word == participle))
}

/// Groups ingredient lines for preparation.
///
/// Titled source sections become one group each, linked to the first step
/// that mentions a word of the title. Untitled lines are clustered by the
/// preparation verb they carry, in first-seen order; lines without one are
/// left out.
pub fn build_prep_groups(
    sections: &[IngredientSection],
    instructions: &[String],
) -> Vec<PrepGroup> {
    let mut groups: Vec<PrepGroup> = Vec::new();

    for section in sections {
        let Some(title) = section.title.as_deref().filter(|t| !t.trim().is_empty()) else {
            continue;
        };
        if section.items.is_empty() {
            continue;
        }
        let stems: Vec<String> = lower_words(title)
            .into_iter()
            .filter(|w| w.len() > 2 && !TITLE_FILLER.contains(&w.as_str()))
            .collect();
        groups.push(PrepGroup {
            title: title.trim().to_string(),
            items: section.items.clone(),
            step_index: first_step_mentioning(instructions, &stems),
        });
    }

    let mut verb_groups: Vec<(&'static str, PrepGroup)> = Vec::new();
    let untitled = sections
        .iter()
        .filter(|s| s.title.as_deref().map_or(true, |t| t.trim().is_empty()));
    for line in untitled.flat_map(|s| s.items.iter()) {
        let Some((_, title, stem)) = prep_verb(line) else {
            continue;
        };
        match verb_groups.iter_mut().find(|(s, _)| s == stem) {
            Some((_, group)) => group.items.push(line.clone()),
            None => verb_groups.push((
                stem,
                PrepGroup {
                    title: title.to_string(),
                    items: vec![line.clone()],
                    step_index: first_step_mentioning(instructions, &[stem.to_string()]),
                },
            )),
        }
    }

    groups.extend(verb_groups.into_iter().map(|(_, group)| group));
    groups
}

/// Prep groups for a draft, using its sections when it has any.
pub fn prep_groups_for(draft: &RecipeDraft) -> Vec<PrepGroup> {
    if draft.ingredient_sections.is_empty() {
        let single = IngredientSection {
            title: None,
            items: draft.ingredients.clone(),
        };
        build_prep_groups(std::slice::from_ref(&single), &draft.instructions)
    } else {
        build_prep_groups(&draft.ingredient_sections, &draft.instructions)
    }
}
