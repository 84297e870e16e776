use super::{ExtractResult, Extractor, FileSource};
use crate::core::attachment::AttachmentKind;

const UTF8_BOM: char = '\u{feff}';

pub(super) struct PlainTextExtractor;

impl Extractor for PlainTextExtractor {
    fn kind(&self) -> AttachmentKind {
        AttachmentKind::Text
    }

    fn extract(&self, source: &FileSource) -> ExtractResult {
        let text = std::str::from_utf8(&source.bytes)?;
        Ok(text.strip_prefix(UTF8_BOM).unwrap_or(text).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_bom_is_dropped() {
        let source = FileSource::new("bom.csv", Some("text/csv"), b"\xEF\xBB\xBFa,b\n".to_vec());
        assert_eq!(PlainTextExtractor.extract(&source).expect("utf-8"), "a,b\n");
    }

    #[test]
    fn binary_content_is_rejected() {
        let source = FileSource::new("blob.bin", None, vec![0xc3, 0x28]);
        assert!(PlainTextExtractor.extract(&source).is_err());
    }
}
