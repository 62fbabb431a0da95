use crate::error::ImportError;
use crate::ocr::{parse_ocr_text, TextRecognizer};
use crate::store::NormalizedRecipe;
use log::{debug, info};
use std::path::PathBuf;

/// OCR every photo, join the text in order and parse it as one recipe.
pub async fn process(
    recognizer: &dyn TextRecognizer,
    images: &[PathBuf],
) -> Result<NormalizedRecipe, ImportError> {
    let mut all_text = Vec::with_capacity(images.len());
    for image in images {
        let text = recognizer.recognize_file(image).await?;
        debug!("OCR of {} gave {} characters", image.display(), text.len());
        all_text.push(text);
    }
    from_ocr_text(&all_text.join("\n\n"))
}

/// Parse already recognized text.
pub fn from_ocr_text(text: &str) -> Result<NormalizedRecipe, ImportError> {
    let parsed = parse_ocr_text(text);
    info!(
        "OCR cleanup kept {} lines, dropped {}, {} metadata",
        parsed.kept_lines.len(),
        parsed.dropped_lines.len(),
        parsed.metadata_lines.len()
    );
    if !parsed.draft.has_content() {
        return Err(ImportError::OcrError(
            "No recipe found in recognized text".to_string(),
        ));
    }
    Ok(NormalizedRecipe::from_draft(None, &parsed.draft))
}
