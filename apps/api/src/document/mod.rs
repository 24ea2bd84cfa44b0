//! PDF text extraction.
//!
//! Two independent extractors (`pdf-extract`, then `lopdf` page by page) run
//! over the same bytes and their text is concatenated, duplicates included.
//! A failing extractor contributes nothing; its failure is reported in the
//! returned `PdfExtraction` instead of escaping.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use lopdf::Document;
use tracing::{debug, warn};

/// Fewer characters than this means the upload is treated as unreadable.
pub const MIN_TEXT_CHARS: usize = 30;

type Extractor = fn(&[u8]) -> Result<String, String>;

const EXTRACTORS: [(&str, Extractor); 2] = [
    ("pdf-extract", extract_with_pdf_extract),
    ("lopdf", extract_with_lopdf),
];

#[derive(Debug, Clone, PartialEq)]
pub enum SourceOutcome {
    Extracted { chars: usize },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceReport {
    pub source: &'static str,
    pub outcome: SourceOutcome,
}

impl fmt::Display for SourceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            SourceOutcome::Extracted { chars } => write!(f, "{}: {chars} chars", self.source),
            SourceOutcome::Failed { reason } => write!(f, "{}: failed ({reason})", self.source),
        }
    }
}

/// Merged text plus what each extractor did.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfExtraction {
    pub text: String,
    pub sources: Vec<SourceReport>,
}

impl PdfExtraction {
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// One-line description of every source, for logs.
    pub fn summary(&self) -> String {
        self.sources
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Runs every extractor over `bytes`. Never fails; an unreadable document
/// yields empty text.
pub fn extract_pdf_text(bytes: &[u8]) -> PdfExtraction {
    let outputs = EXTRACTORS
        .iter()
        .map(|(source, extractor)| (*source, run_guarded(*extractor, bytes)))
        .collect();
    merge_outputs(outputs)
}

fn merge_outputs(outputs: Vec<(&'static str, Result<String, String>)>) -> PdfExtraction {
    let mut text = String::new();
    let mut sources = Vec::with_capacity(outputs.len());

    for (source, output) in outputs {
        let outcome = match output {
            Ok(chunk) => {
                let chars = chunk.chars().count();
                if !text.is_empty() && !text.ends_with('\n') {
                    text.push('\n');
                }
                text.push_str(&chunk);
                SourceOutcome::Extracted { chars }
            }
            Err(reason) => {
                warn!("{source} could not extract text: {reason}");
                SourceOutcome::Failed { reason }
            }
        };
        sources.push(SourceReport { source, outcome });
    }

    PdfExtraction {
        text: text.trim().to_string(),
        sources,
    }
}

/// Both PDF libraries can panic on malformed input; a panic counts as a failure.
fn run_guarded(extractor: Extractor, bytes: &[u8]) -> Result<String, String> {
    panic::catch_unwind(AssertUnwindSafe(|| extractor(bytes))).unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Err(format!("extractor panicked: {message}"))
    })
}

fn extract_with_pdf_extract(bytes: &[u8]) -> Result<String, String> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| format!("{e:?}"))
}

fn extract_with_lopdf(bytes: &[u8]) -> Result<String, String> {
    let doc = Document::load_mem(bytes).map_err(|e| e.to_string())?;

    let mut text = String::new();
    for page_num in doc.get_pages().keys() {
        match doc.extract_text(&[*page_num]) {
            Ok(page_text) if !page_text.trim().is_empty() => {
                text.push_str(&page_text);
                text.push('\n');
            }
            Ok(_) => {}
            Err(e) => debug!("lopdf skipped page {page_num}: {e}"),
        }
    }
    Ok(text)
}
