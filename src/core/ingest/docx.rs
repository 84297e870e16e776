use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use super::{ExtractResult, Extractor, FileSource};
use crate::core::attachment::AttachmentKind;

const DOCUMENT_PART: &str = "word/document.xml";

pub(super) struct DocxExtractor;

impl Extractor for DocxExtractor {
    fn kind(&self) -> AttachmentKind {
        AttachmentKind::Text
    }

    fn extract(&self, source: &FileSource) -> ExtractResult {
        let mut archive = ZipArchive::new(Cursor::new(source.bytes.as_slice()))?;
        let mut xml = String::new();
        archive.by_name(DOCUMENT_PART)?.read_to_string(&mut xml)?;
        document_text(&xml)
    }
}

/// Raw text of a WordprocessingML body. Paragraphs are separated by a blank line.
fn document_text(xml: &str) -> ExtractResult {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event()? {
            Event::Start(element) if element.name().as_ref() == b"w:t" => in_text_run = true,
            Event::End(element) => match element.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => out.push_str("\n\n"),
                _ => {}
            },
            Event::Empty(element) => match element.name().as_ref() {
                b"w:tab" => out.push('\t'),
                b"w:br" | b"w:cr" => out.push('\n'),
                _ => {}
            },
            Event::Text(text) if in_text_run => out.push_str(&text.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(out.trim_end().to_string())
}
