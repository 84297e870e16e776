use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::{ExtractResult, Extractor, FileSource};
use crate::core::attachment::AttachmentKind;

pub(super) struct ImageExtractor;

impl Extractor for ImageExtractor {
    fn kind(&self) -> AttachmentKind {
        AttachmentKind::Image
    }

    fn extract(&self, source: &FileSource) -> ExtractResult {
        Ok(data_url(
            source.mime.as_deref().unwrap_or("application/octet-stream"),
            &source.bytes,
        ))
    }
}

pub(super) fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}
