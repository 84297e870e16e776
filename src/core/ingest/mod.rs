//! Attachment ingestion.
//!
//! A file is classified once, then handed to the extractor registered for its
//! class. Images become base64 data URLs; everything else becomes plain text.

mod docx;
mod image;
mod pdf;
mod text;

use std::error::Error as StdError;
use std::fmt;
use std::path::{Path, PathBuf};

use futures_util::future::join_all;
use tracing::debug;

use crate::core::attachment::{Attachment, AttachmentKind};

pub type ExtractResult = Result<String, Box<dyn StdError + Send + Sync>>;

/// Raw file contents plus the metadata needed to classify them.
#[derive(Debug, Clone)]
pub struct FileSource {
    pub name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl FileSource {
    pub fn new(name: impl Into<String>, mime: Option<&str>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.map(str::to_string),
            bytes,
        }
    }

    /// Reads a file from disk, guessing its MIME type from the extension.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let mime = mime_guess::from_path(path)
            .first()
            .map(|mime| mime.essence_str().to_string());
        Ok(Self {
            name: display_name(path),
            mime,
            bytes,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileClass {
    Image,
    Pdf,
    Docx,
    PlainText,
}

pub fn classify(source: &FileSource) -> FileClass {
    let mime = source.mime.as_deref().unwrap_or_default();
    if mime.starts_with("image/") {
        FileClass::Image
    } else if mime == "application/pdf" {
        FileClass::Pdf
    } else if source.name.to_ascii_lowercase().ends_with(".docx") {
        FileClass::Docx
    } else {
        FileClass::PlainText
    }
}

/// Turns the bytes of one file class into an attachment payload.
pub trait Extractor: Sync {
    fn kind(&self) -> AttachmentKind;
    fn extract(&self, source: &FileSource) -> ExtractResult;
}

pub fn extractor_for(class: FileClass) -> &'static dyn Extractor {
    match class {
        FileClass::Image => &image::ImageExtractor,
        FileClass::Pdf => &pdf::PdfExtractor,
        FileClass::Docx => &docx::DocxExtractor,
        FileClass::PlainText => &text::PlainTextExtractor,
    }
}

/// A file that could not be turned into an attachment.
#[derive(Debug)]
pub struct AttachmentError {
    pub file_name: String,
    pub cause: Box<dyn StdError + Send + Sync>,
}

impl AttachmentError {
    pub fn new(
        file_name: impl Into<String>,
        cause: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            cause: cause.into(),
        }
    }
}

impl fmt::Display for AttachmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Could not read {}. It might be corrupted or protected. ({})",
            self.file_name, self.cause
        )
    }
}

impl StdError for AttachmentError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.cause.as_ref())
    }
}

pub fn ingest(source: &FileSource) -> Result<Attachment, AttachmentError> {
    let class = classify(source);
    debug!(file = %source.name, ?class, bytes = source.bytes.len(), "ingesting attachment");

    let extractor = extractor_for(class);
    let payload = extractor
        .extract(source)
        .map_err(|cause| AttachmentError::new(source.name.clone(), cause))?;

    Ok(Attachment {
        name: source.name.clone(),
        kind: extractor.kind(),
        payload,
    })
}

/// Reads and ingests one file. Extraction runs on the blocking pool.
pub async fn ingest_path(path: &Path) -> Result<Attachment, AttachmentError> {
    let source = FileSource::from_path(path)
        .await
        .map_err(|err| AttachmentError::new(display_name(path), err))?;
    let name = source.name.clone();

    tokio::task::spawn_blocking(move || ingest(&source))
        .await
        .map_err(|err| AttachmentError::new(name, err))?
}

/// Ingests every path concurrently. Results come back in input order.
pub async fn ingest_all(paths: &[PathBuf]) -> Vec<Result<Attachment, AttachmentError>> {
    join_all(paths.iter().map(|path| ingest_path(path))).await
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
