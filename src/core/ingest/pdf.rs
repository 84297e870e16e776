use std::fmt::Write as _;

use lopdf::Document;

use super::{ExtractResult, Extractor, FileSource};
use crate::core::attachment::AttachmentKind;

pub(super) struct PdfExtractor;

impl Extractor for PdfExtractor {
    fn kind(&self) -> AttachmentKind {
        AttachmentKind::Text
    }

    fn extract(&self, source: &FileSource) -> ExtractResult {
        let document = Document::load_mem(&source.bytes)?;
        let mut text = String::new();

        // get_pages is keyed by 1-based page number, so iteration is in page order.
        for page_number in document.get_pages().into_keys() {
            let page_text = document.extract_text(&[page_number])?;
            let page_text = page_text.split_whitespace().collect::<Vec<_>>().join(" ");
            write!(text, "{}\n{page_text}\n\n", page_marker(page_number))?;
        }

        Ok(text.trim().to_string())
    }
}

pub(super) fn page_marker(page_number: u32) -> String {
    format!("--- Page {page_number} ---")
}
