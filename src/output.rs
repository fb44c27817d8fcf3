//! Result types: per-document extractions and per-run reports.

use crate::error::ItemError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How a strategy arrived at its text.
///
/// Callers and tests use this to tell "no text because the document is a
/// scan and OCR is off" apart from "no text because tooling is broken".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractionOutcome {
    /// Text read directly from the file (text layer, DOCX body, plain text).
    Native,
    /// Text recognised by OCR over `pages` images.
    Ocr { pages: usize },
    /// The file carries no native text and OCR is not configured.
    NoText,
    /// No strategy handles this file type.
    Unsupported,
    /// A reader, renderer or OCR pass failed; `text` is whatever was
    /// recovered before the failure.
    Degraded { reason: String },
}

/// Text produced by a strategy together with how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub text: String,
    pub outcome: ExtractionOutcome,
}

impl Extraction {
    pub fn native(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            outcome: ExtractionOutcome::Native,
        }
    }

    pub fn ocr(text: impl Into<String>, pages: usize) -> Self {
        Self {
            text: text.into(),
            outcome: ExtractionOutcome::Ocr { pages },
        }
    }

    pub fn no_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            outcome: ExtractionOutcome::NoText,
        }
    }

    pub fn unsupported() -> Self {
        Self {
            text: String::new(),
            outcome: ExtractionOutcome::Unsupported,
        }
    }

    pub fn degraded(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            outcome: ExtractionOutcome::Degraded {
                reason: reason.into(),
            },
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.outcome, ExtractionOutcome::Degraded { .. })
    }
}

/// Outcome of processing one item in a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemResult {
    /// Source identifier of the item.
    pub source: String,

    /// Name of the strategy chosen for the item.
    pub strategy: String,

    /// Output file written, if the item got that far.
    pub output: Option<PathBuf>,

    /// Number of characters written.
    pub chars: usize,

    /// How the text was obtained. None when extraction itself failed.
    pub outcome: Option<ExtractionOutcome>,

    /// Set when the item failed; the rest of the run is unaffected.
    pub error: Option<ItemError>,

    /// Wall-clock time spent on the item.
    pub duration_ms: u64,
}

impl ItemResult {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate statistics for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Items handed to the pipeline.
    pub total_items: usize,
    /// Items whose output file was written.
    pub written_items: usize,
    /// Items that failed to extract or write.
    pub failed_items: usize,
    /// Written items whose extraction was degraded.
    pub degraded_items: usize,
    /// Written items whose text came from OCR.
    pub ocr_items: usize,
    /// Total wall-clock time.
    pub total_duration_ms: u64,
}

/// Everything a run produced, in processing order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    pub items: Vec<ItemResult>,
    pub stats: RunStats,
}

impl RunReport {
    /// Items that failed, in processing order.
    pub fn failures(&self) -> impl Iterator<Item = &ItemResult> {
        self.items.iter().filter(|r| !r.is_success())
    }
}
