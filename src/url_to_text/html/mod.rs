pub mod extractors;
pub mod meta;
pub mod readability;

pub use meta::PageMetadata;
pub use readability::{extract_main_content, extract_readability, ReadableContent};
