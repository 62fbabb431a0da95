mod markdown;
mod render;
mod request;

pub use markdown::{MarkdownDocument, MarkdownFetcher};
pub use render::{RenderFetcher, RenderedPage};
pub use request::{classify_status, looks_like_challenge, FetchedPage, RequestFetcher};
