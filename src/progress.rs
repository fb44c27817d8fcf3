//! Progress-callback trait for per-item run events.
//!
//! Attach an [`Arc<dyn RunProgressCallback>`] with
//! [`crate::convert::Pipeline::with_progress`] to receive events as the
//! pipeline works through its items. The CLI uses it to drive a progress
//! bar; library users can forward events wherever they like.
//!
//! # Example
//!
//! ```rust
//! use edgequake_doc2txt::RunProgressCallback;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! struct Counter(AtomicUsize);
//!
//! impl RunProgressCallback for Counter {
//!     fn on_item_complete(&self, _index: usize, _total: usize, source: &str, chars: usize) {
//!         self.0.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{source}: {chars} chars");
//!     }
//! }
//! ```

use std::sync::Arc;

/// Called by the pipeline as it processes each item.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Items are processed sequentially, so calls never
/// overlap, but the trait is `Send + Sync` so implementations can be shared.
pub trait RunProgressCallback: Send + Sync {
    /// Called once, after discovery, before the first item.
    fn on_run_start(&self, total_items: usize) {
        let _ = total_items;
    }

    /// Called before an item's strategy is resolved.
    ///
    /// `index` is 1-based.
    fn on_item_start(&self, index: usize, total_items: usize, source: &str) {
        let _ = (index, total_items, source);
    }

    /// Called after an item's output file was written.
    fn on_item_complete(&self, index: usize, total_items: usize, source: &str, chars: usize) {
        let _ = (index, total_items, source, chars);
    }

    /// Called when an item failed to extract or write.
    fn on_item_error(&self, index: usize, total_items: usize, source: &str, error: &str) {
        let _ = (index, total_items, source, error);
    }

    /// Called once after every item has been attempted.
    fn on_run_complete(&self, total_items: usize, written_items: usize) {
        let _ = (total_items, written_items);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl RunProgressCallback for NoopProgressCallback {}

/// Convenience alias for the shared callback handle.
pub type ProgressCallback = Arc<dyn RunProgressCallback>;
