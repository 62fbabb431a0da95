//! End-to-end entry points from a URL, a photo or raw text to a
//! [`NormalizedRecipe`](crate::store::NormalizedRecipe).

pub mod image;
pub mod text;
pub mod url;
