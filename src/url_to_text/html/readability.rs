use crate::model::RecipeDraft;
use crate::normalize::collapse_whitespace;
use crate::sections::split_plain_text;
use log::debug;
use scraper::{ElementRef, Html, Node, Selector};
use std::sync::LazyLock;

static CONTAINER: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("article, main, section, div").unwrap());
static BLOCK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1, h2, h3, h4, h5, h6, p, li, dt, dd, pre").unwrap());
static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());
static H1: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").unwrap());
static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());

const MAX_CONTAINERS: usize = 20_000;
const MIN_TEXT_CHARS: usize = 20;

const BOILERPLATE_WORDS: &[&str] = &[
    "nav",
    "navbar",
    "menu",
    "sidebar",
    "footer",
    "header",
    "banner",
    "cookie",
    "consent",
    "ads",
    "advert",
    "promo",
    "subscribe",
    "newsletter",
    "comment",
    "related",
];
const BOILERPLATE_TAGS: &[&str] = &["nav", "header", "footer", "aside", "form"];
const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Main-content text of a page, one line per block element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadableContent {
    pub title: Option<String>,
    pub lines: Vec<String>,
}

fn class_or_id_lc(element: &ElementRef) -> String {
    let value = element.value();
    let mut s = String::new();
    if let Some(id) = value.attr("id") {
        s.push_str(id);
        s.push(' ');
    }
    if let Some(class) = value.attr("class") {
        s.push_str(class);
    }
    s.to_ascii_lowercase()
}

fn is_boilerplate(element: &ElementRef) -> bool {
    if BOILERPLATE_TAGS.contains(&element.value().name()) {
        return true;
    }
    let s = class_or_id_lc(element);
    !s.is_empty() && BOILERPLATE_WORDS.iter().any(|bad| s.contains(bad))
}

fn is_hidden(node: &Node) -> bool {
    node.as_element()
        .is_some_and(|e| HIDDEN_TAGS.contains(&e.name()))
}

/// Visible text under `element`, skipping script and style bodies.
fn visible_text(element: ElementRef) -> String {
    let mut out = String::new();
    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .take_while(|a| a.id() != element.id())
            .any(|a| is_hidden(a.value()));
        if !hidden {
            out.push_str(text);
            out.push(' ');
        }
    }
    collapse_whitespace(&out)
}

fn text_chars(element: ElementRef) -> usize {
    visible_text(element).chars().count()
}

fn link_text_chars(element: ElementRef) -> usize {
    element
        .select(&LINK)
        .map(|a| visible_text(a).chars().count())
        .sum()
}

/// The densest non-boilerplate container: text chars minus twice the link
/// chars, with bonuses for `<article>` and `<main>`.
fn pick_main_container(document: &Html) -> Option<ElementRef<'_>> {
    let mut best_score: i64 = 0;
    let mut best: Option<ElementRef> = None;

    for el in document.select(&CONTAINER).take(MAX_CONTAINERS) {
        if is_boilerplate(&el) {
            continue;
        }
        let txt = text_chars(el);
        if txt < MIN_TEXT_CHARS {
            continue;
        }
        let link_txt = link_text_chars(el);
        let mut score = txt as i64 - 2 * (link_txt as i64);
        match el.value().name() {
            "article" => score += 500,
            "main" => score += 300,
            _ => {}
        }
        if link_txt > txt / 2 {
            score -= 500;
        }
        if score > best_score {
            best_score = score;
            best = Some(el);
        }
    }
    best
}

/// A block is emitted only when it holds no nested block, and when no
/// ancestor inside the container is boilerplate.
fn block_lines(container: ElementRef) -> Vec<String> {
    container
        .select(&BLOCK)
        .filter(|el| el.select(&BLOCK).next().is_none())
        .filter(|el| {
            !el.ancestors()
                .take_while(|a| a.id() != container.id())
                .filter_map(ElementRef::wrap)
                .any(|a| is_boilerplate(&a))
        })
        .map(visible_text)
        .filter(|line| !line.is_empty())
        .collect()
}

fn page_title(document: &Html) -> Option<String> {
    document
        .select(&H1)
        .map(visible_text)
        .find(|t| !t.is_empty())
        .or_else(|| {
            document
                .select(&TITLE)
                .map(visible_text)
                .find(|t| !t.is_empty())
        })
}

pub fn extract_main_content(html: &str) -> Option<ReadableContent> {
    let document = Html::parse_document(html);
    let container = pick_main_container(&document)?;
    let title = page_title(&document);
    let mut lines = block_lines(container);
    if let Some(title) = &title {
        lines.retain(|line| line != title);
    }
    (!lines.is_empty()).then_some(ReadableContent { title, lines })
}

/// Recipe draft from the page's main content, using keyword headings
/// ("Ingredients", "Instructions", ...) to find the sections.
pub fn extract_readability(html: &str) -> Option<RecipeDraft> {
    let content = extract_main_content(html)?;
    let mut sections = split_plain_text(&content.lines);
    if !sections.has_recipe_sections() {
        debug!(
            "Readability found {} lines but no recipe sections",
            content.lines.len()
        );
        return None;
    }
    if sections.title.is_none() {
        sections.title = content.title;
    }
    Some(sections.into_draft())
}
