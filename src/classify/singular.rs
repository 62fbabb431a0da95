/// Words that end in `s` but are not plurals, or whose plural rule would mangle them.
const INVARIANT: &[&str] = &[
    "asparagus",
    "couscous",
    "hummus",
    "molasses",
    "swiss",
    "species",
    "series",
    "gras",
    "bass",
    "schnapps",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("leaves", "leaf"),
    ("halves", "half"),
    ("loaves", "loaf"),
    ("knives", "knife"),
    ("geese", "goose"),
    ("teeth", "tooth"),
    ("feet", "foot"),
];

/// Heuristic English singularization of one lowercase token.
///
/// `berries -> berry`, `tomatoes -> tomato`, `peaches -> peach`,
/// `mushrooms -> mushroom`; `-ss`, `-us` and `-is` endings are kept.
pub fn singularize(token: &str) -> String {
    if token.chars().count() <= 3 || INVARIANT.contains(&token) {
        return token.to_string();
    }
    if let Some((_, singular)) = IRREGULAR.iter().find(|(plural, _)| *plural == token) {
        return singular.to_string();
    }

    if let Some(stem) = token.strip_suffix("ies") {
        if token.len() > 4 {
            return format!("{stem}y");
        }
    }
    if let Some(stem) = token.strip_suffix("oes") {
        return format!("{stem}o");
    }
    for sibilant in ["ches", "shes", "sses", "xes", "zzes"] {
        if token.ends_with(sibilant) {
            return token[..token.len() - 2].to_string();
        }
    }
    // `sizes`, `glazes`: the `e` belongs to the stem.
    if let Some(stem) = token.strip_suffix("zes") {
        return format!("{stem}ze");
    }
    if token.ends_with("ss") || token.ends_with("us") || token.ends_with("is") {
        return token.to_string();
    }
    match token.strip_suffix('s') {
        Some(stem) => stem.to_string(),
        None => token.to_string(),
    }
}
