//! Text normalization shared by every extractor, the OCR parser and the
//! shopping list.

mod lines;
mod metric;
mod text;

pub use lines::{
    clean_ingredient_line, clean_ingredient_lines, clean_instruction_lines, CleanedLine,
    CleanedLines,
};
pub use metric::convert_ingredient_measurement_to_metric;
pub use text::{
    balance_parens, clean_line, collapse_whitespace, decode_entities, strip_leading_glyphs,
    translate_fractions, vulgar_fraction,
};

pub(crate) use metric::parse_number;
