//! Document loaders for plain-text and PDF sources.

use std::path::Path;

use tracing::debug;

use crate::document::Document;
use crate::error::{RagError, Result};

/// Loads documents from a source path.
///
/// Paginated formats return one [`Document`] per page; flat formats return a
/// single-element `Vec`.
pub trait DocumentLoader: Send + Sync {
    /// Load the source at `path` into documents.
    fn load(&self, path: &Path) -> Result<Vec<Document>>;
}

/// Character encoding accepted by [`TextLoader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// Strict UTF-8; invalid byte sequences fail the load.
    Utf8,
    /// UTF-8 with invalid sequences replaced by U+FFFD.
    Utf8Lossy,
}

/// Loads a plain-text file as a single document.
///
/// The document id is the file stem and the `source` metadata key records
/// the full path.
#[derive(Debug, Clone)]
pub struct TextLoader {
    encoding: TextEncoding,
}

impl TextLoader {
    /// Create a loader with an explicit character encoding.
    pub fn new(encoding: TextEncoding) -> Self {
        Self { encoding }
    }
}

impl Default for TextLoader {
    fn default() -> Self {
        Self::new(TextEncoding::Utf8)
    }
}

fn load_error(path: &Path, message: impl Into<String>) -> RagError {
    RagError::Load { source_path: path.display().to_string(), message: message.into() }
}

fn document_id(path: &Path) -> String {
    path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_else(|| "document".into())
}

impl DocumentLoader for TextLoader {
    fn load(&self, path: &Path) -> Result<Vec<Document>> {
        let bytes = std::fs::read(path).map_err(|e| load_error(path, e.to_string()))?;
        let text = match self.encoding {
            TextEncoding::Utf8 => String::from_utf8(bytes)
                .map_err(|e| load_error(path, format!("invalid UTF-8: {e}")))?,
            TextEncoding::Utf8Lossy => String::from_utf8_lossy(&bytes).into_owned(),
        };

        debug!(path = %path.display(), bytes = text.len(), "loaded text document");

        let mut document = Document::new(document_id(path), text);
        document.metadata.insert("source".to_string(), path.display().to_string());
        document.source_uri = Some(path.display().to_string());
        Ok(vec![document])
    }
}

/// Loads a PDF file as one document per page.
///
/// Page numbers are 1-based and recorded in the `page` metadata key, so a
/// chunk retrieved later can be traced back to its page.
#[derive(Debug, Clone, Default)]
pub struct PdfLoader;

impl PdfLoader {
    /// Create a new PDF loader.
    pub fn new() -> Self {
        Self
    }
}

impl DocumentLoader for PdfLoader {
    fn load(&self, path: &Path) -> Result<Vec<Document>> {
        let pdf = lopdf::Document::load(path)
            .map_err(|e| load_error(path, format!("failed to parse PDF: {e}")))?;

        let stem = document_id(path);
        let mut documents = Vec::new();

        for page_number in pdf.get_pages().keys() {
            let text = pdf
                .extract_text(&[*page_number])
                .map_err(|e| load_error(path, format!("failed to extract page {page_number}: {e}")))?;

            let mut document = Document::new(format!("{stem}_p{page_number}"), text);
            document.metadata.insert("source".to_string(), path.display().to_string());
            document.metadata.insert("page".to_string(), page_number.to_string());
            document.source_uri = Some(path.display().to_string());
            documents.push(document);
        }

        debug!(path = %path.display(), pages = documents.len(), "loaded PDF document");
        Ok(documents)
    }
}
