//! Taxonomy-driven ingredient classification.
//!
//! The taxonomy is embedded at compile time and parsed once into a
//! read-only [`Classifier`] shared by every caller.

mod category;
mod singular;
mod tokens;

pub use category::{IngredientCategory, IngredientClassification, MatchSource};
pub use singular::singularize;

use log::debug;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use tokens::{
    is_measure_token, is_stop_word, normalize_for_matching, phrase_key, segments,
    strip_leading_measures,
};

const MAX_NGRAM: usize = 4;

static TAXONOMY_JSON: &str = include_str!("../data/taxonomy.json");

static SHARED: LazyLock<Classifier> = LazyLock::new(|| {
    Classifier::from_json(TAXONOMY_JSON).expect("embedded taxonomy.json is valid")
});

#[derive(Debug, Deserialize)]
struct TaxonomyFile {
    entries: Vec<TaxonomyEntry>,
}

/// One canonical ingredient with its category and alternative spellings.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxonomyEntry {
    pub canonical: String,
    pub category: IngredientCategory,
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Lookup tables built from a taxonomy. Immutable after construction.
#[derive(Debug)]
pub struct Classifier {
    entries: Vec<(String, IngredientCategory)>,
    aliases: HashMap<String, usize>,
    canonicals: HashMap<String, usize>,
    heads: HashMap<String, usize>,
}

impl Classifier {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let file: TaxonomyFile = serde_json::from_str(json)?;
        Ok(Self::from_entries(&file.entries))
    }

    pub fn from_entries(entries: &[TaxonomyEntry]) -> Self {
        let mut classifier = Classifier {
            entries: Vec::with_capacity(entries.len()),
            aliases: HashMap::new(),
            canonicals: HashMap::new(),
            heads: HashMap::new(),
        };
        // head word -> (entry, phrase is exactly that word)
        let mut heads: HashMap<String, (usize, bool)> = HashMap::new();

        for entry in entries {
            let key = phrase_key(&entry.canonical);
            if key.is_empty() || classifier.canonicals.contains_key(&key) {
                continue;
            }
            let index = classifier.entries.len();
            classifier.entries.push((key.clone(), entry.category));
            classifier.canonicals.insert(key.clone(), index);

            let alias_keys: Vec<String> = entry.aliases.iter().map(|a| phrase_key(a)).collect();
            for phrase in std::iter::once(&key).chain(alias_keys.iter()) {
                if phrase.is_empty() {
                    continue;
                }
                if phrase != &key {
                    classifier.aliases.entry(phrase.clone()).or_insert(index);
                }
                let words: Vec<&str> = phrase.split(' ').collect();
                let Some(head) = words
                    .iter()
                    .find(|w| !is_stop_word(w) && !is_measure_token(w))
                else {
                    continue;
                };
                let exact = words.len() == 1;
                let replace = match heads.get(*head) {
                    Some(&(_, true)) => false,
                    Some(&(_, false)) => exact,
                    None => true,
                };
                if replace {
                    heads.insert(head.to_string(), (index, exact));
                }
            }
        }

        classifier.heads = heads.into_iter().map(|(k, (i, _))| (k, i)).collect();
        debug!(
            "Built ingredient taxonomy: {} entries, {} aliases, {} head words",
            classifier.entries.len(),
            classifier.aliases.len(),
            classifier.heads.len()
        );
        classifier
    }

    /// The process-wide classifier over the embedded taxonomy.
    pub fn shared() -> &'static Classifier {
        &SHARED
    }

    pub fn classify(&self, line: &str) -> IngredientClassification {
        let normalized = normalize_for_matching(line);
        let candidates = candidate_phrases(&normalized);

        let matched = candidates
            .iter()
            .find_map(|phrase| {
                if let Some(&i) = self.aliases.get(phrase) {
                    Some((i, MatchSource::Alias))
                } else {
                    self.canonicals
                        .get(phrase)
                        .map(|&i| (i, MatchSource::Canonical))
                }
            })
            .or_else(|| {
                candidates.iter().find_map(|phrase| {
                    let head = phrase
                        .split(' ')
                        .find(|w| !is_stop_word(w) && !is_measure_token(w))?;
                    self.heads.get(head).map(|&i| (i, MatchSource::Fallback))
                })
            });

        let mut classification = match matched {
            Some((index, source)) => {
                let (name, category) = &self.entries[index];
                IngredientClassification {
                    category: *category,
                    canonical_name: name.clone(),
                    source,
                }
            }
            None => IngredientClassification {
                category: IngredientCategory::Other,
                canonical_name: local_canonical(&normalized),
                source: MatchSource::Fallback,
            },
        };

        if classification.category == IngredientCategory::Produce {
            if let Some(category) = storage_form(line) {
                classification.category = category;
                classification.source = MatchSource::Override;
            }
        }
        classification
    }

    /// Dedupe key for a line: its canonical name.
    pub fn canonical_key(&self, line: &str) -> String {
        self.classify(line).canonical_name
    }
}

/// Classify with the shared taxonomy.
pub fn classify(line: &str) -> IngredientClassification {
    Classifier::shared().classify(line)
}

pub fn canonical_key(line: &str) -> String {
    Classifier::shared().canonical_key(line)
}

/// Whole line, comma segments, then per segment the measure-stripped phrase
/// and its n-grams from longest to shortest. Deduplicated, first wins.
fn candidate_phrases(normalized: &str) -> Vec<String> {
    let segments = segments(normalized);
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    let mut push = |phrase: String| {
        if !phrase.is_empty() && seen.insert(phrase.clone()) {
            out.push(phrase);
        }
    };

    push(
        segments
            .iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" "),
    );
    for tokens in &segments {
        push(tokens.join(" "));
    }
    for tokens in &segments {
        let stripped = strip_leading_measures(tokens);
        push(stripped.join(" "));
        for size in (1..=MAX_NGRAM.min(stripped.len())).rev() {
            for window in stripped.windows(size) {
                push(window.join(" "));
            }
        }
    }
    out
}

fn local_canonical(normalized: &str) -> String {
    let mut seen = HashSet::new();
    segments(normalized)
        .into_iter()
        .flat_map(|tokens| strip_leading_measures(&tokens).to_vec())
        .filter(|t| t.chars().count() > 1 && !is_stop_word(t) && !is_measure_token(t))
        .filter(|t| seen.insert(t.clone()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Packaged category implied by the first storage-form word anywhere in the
/// raw line, parentheticals included.
fn storage_form(line: &str) -> Option<IngredientCategory> {
    line.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .find_map(|token| match token {
            "canned" | "tinned" | "jarred" | "can" | "cans" | "tin" | "tins" | "jar" | "jars" => {
                Some(IngredientCategory::CannedJarred)
            }
            "dried" | "dehydrated" => Some(IngredientCategory::DryGoods),
            "frozen" => Some(IngredientCategory::Frozen),
            _ => None,
        })
}
