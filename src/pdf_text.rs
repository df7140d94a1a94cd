//! PDF text extraction behind a small page-oriented interface, so bulletin
//! parsing can run against canned pages in tests.

use pdf_extract::extract_text_from_mem_by_pages;
use tracing::{debug, info};

use crate::classifier::BulletinClassifier;
use crate::fetch_error::FetchError;

/// Anything that yields the text of a document page by page. A page without
/// extractable text yields `None`.
pub trait PageSource {
    fn pages(&self) -> Vec<Option<String>>;
}

/// Turns downloaded bytes into a [`PageSource`].
pub trait PdfLoader: Send + Sync {
    fn load(&self, bytes: &[u8]) -> Result<Box<dyn PageSource + Send>, FetchError>;
}

/// Pages already extracted into memory.
#[derive(Debug, Clone, Default)]
pub struct StaticPages(pub Vec<Option<String>>);

impl PageSource for StaticPages {
    fn pages(&self) -> Vec<Option<String>> {
        self.0.clone()
    }
}

/// A PDF parsed with `pdf-extract`.
#[derive(Debug, Clone)]
pub struct PdfDocument {
    pages: Vec<Option<String>>,
}

impl PdfDocument {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FetchError> {
        let pages = extract_text_from_mem_by_pages(bytes)
            .map_err(|e| FetchError::PdfExtraction(e.to_string()))?;
        debug!("Extracted text from {} PDF pages", pages.len());

        let pages = pages
            .into_iter()
            .map(|text| if text.trim().is_empty() { None } else { Some(text) })
            .collect();

        Ok(Self { pages })
    }
}

impl PageSource for PdfDocument {
    fn pages(&self) -> Vec<Option<String>> {
        self.pages.clone()
    }
}

/// Production loader backed by `pdf-extract`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractLoader;

impl PdfLoader for PdfExtractLoader {
    fn load(&self, bytes: &[u8]) -> Result<Box<dyn PageSource + Send>, FetchError> {
        info!("Parsing PDF ({} bytes)", bytes.len());
        Ok(Box::new(PdfDocument::from_bytes(bytes)?))
    }
}

/// Join every page that has text, each followed by a newline.
pub fn join_pages(source: &dyn PageSource) -> String {
    let mut text = String::new();
    for page in source.pages().into_iter().flatten() {
        text.push_str(&page);
        text.push('\n');
    }
    text
}

/// Lines that mention any of the classifier's localities, paired with their
/// 1-based page number. Pages without text still advance the numbering.
pub fn scan_pages(source: &dyn PageSource, classifier: &BulletinClassifier) -> Vec<(usize, String)> {
    let mut hits = Vec::new();
    for (idx, page) in source.pages().into_iter().enumerate() {
        let Some(text) = page else { continue };
        for line in text.lines() {
            if classifier.is_relevant(&BulletinClassifier::normalize_line(line)) {
                hits.push((idx + 1, line.trim().to_string()));
            }
        }
    }
    hits
}
