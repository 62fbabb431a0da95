//! Turning a URL into recipe drafts: fetchers for the page and its
//! alternate renderings, and the parsers for each representation.

pub mod fetchers;
pub mod html;
pub mod markdown;
