pub mod parser;
pub mod vision;

pub use parser::{parse_ocr_text, score_line, OcrParse};
pub use vision::{GoogleVisionRecognizer, TextRecognizer};
