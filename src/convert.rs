//! Batch conversion entry points.
//!
//! A [`Pipeline`] pairs a [`FileProvider`] with a [`StrategyRegistry`] and an
//! output root. [`Pipeline::run`] lists the items at a location, extracts each
//! one with the strategy its extension selects, and writes one `.txt` per item
//! under the output root, mirroring the item's relative directory:
//!
//! ```text
//! <input>/sub/dir/report.pdf  ──▶  <output>/sub/dir/report.txt
//! ```
//!
//! Items are processed sequentially. A failing item is logged and recorded in
//! the [`RunReport`]; the run always continues with the next one.

use crate::capability::Capabilities;
use crate::config::ExtractionConfig;
use crate::error::{Doc2TxtError, ItemError};
use crate::item::FileItem;
use crate::output::{Extraction, ExtractionOutcome, ItemResult, RunReport, RunStats};
use crate::progress::ProgressCallback;
use crate::provider::{FileProvider, LocalFileProvider};
use crate::strategy::StrategyRegistry;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Component, Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Drives items from a provider through the strategy registry to text files.
pub struct Pipeline {
    output_root: PathBuf,
    registry: StrategyRegistry,
    provider: Box<dyn FileProvider>,
    progress: Option<ProgressCallback>,
}

impl Pipeline {
    /// A pipeline over the local filesystem writing under `output_root`.
    pub fn new(output_root: impl Into<PathBuf>, registry: StrategyRegistry) -> Self {
        Self {
            output_root: output_root.into(),
            registry,
            provider: Box::new(LocalFileProvider),
            progress: None,
        }
    }

    /// Replace the item provider.
    pub fn with_provider(mut self, provider: impl FileProvider + 'static) -> Self {
        self.provider = Box::new(provider);
        self
    }

    /// Receive per-item progress events.
    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Convert every item the provider lists at `location`.
    ///
    /// An inaccessible location yields an empty report, not an error.
    pub fn run(&self, location: &str) -> RunReport {
        info!("Starting run: {} → {}", location, self.output_root.display());
        let items = self.provider.list_items(location);
        self.run_over_items(items)
    }

    /// Convert an explicit set of items, in the order given.
    pub fn run_over_items(&self, items: impl IntoIterator<Item = FileItem>) -> RunReport {
        let run_start = Instant::now();
        let items: Vec<FileItem> = items.into_iter().collect();
        let total = items.len();

        if let Some(ref cb) = self.progress {
            cb.on_run_start(total);
        }

        let mut results = Vec::with_capacity(total);
        for (idx, item) in items.iter().enumerate() {
            let index = idx + 1;
            if let Some(ref cb) = self.progress {
                cb.on_item_start(index, total, item.source());
            }

            let result = self.process_item(item);

            if let Some(ref cb) = self.progress {
                match &result.error {
                    None => cb.on_item_complete(index, total, item.source(), result.chars),
                    Some(e) => cb.on_item_error(index, total, item.source(), &e.to_string()),
                }
            }
            results.push(result);
        }

        let stats = summarize(&results, run_start.elapsed().as_millis() as u64);
        if let Some(ref cb) = self.progress {
            cb.on_run_complete(total, stats.written_items);
        }
        info!(
            "Run complete: {}/{} written, {} failed, {} degraded, {} via OCR, {}ms",
            stats.written_items,
            stats.total_items,
            stats.failed_items,
            stats.degraded_items,
            stats.ocr_items,
            stats.total_duration_ms
        );

        RunReport {
            items: results,
            stats,
        }
    }

    fn process_item(&self, item: &FileItem) -> ItemResult {
        let start = Instant::now();
        let strategy = self.registry.choose(item.extension());
        debug!("{} → strategy '{}'", item.source(), strategy.name());

        let mut result = ItemResult {
            source: item.source().to_string(),
            strategy: strategy.name().to_string(),
            output: None,
            chars: 0,
            outcome: None,
            error: None,
            duration_ms: 0,
        };

        let extracted = panic::catch_unwind(AssertUnwindSafe(|| strategy.extract(item)))
            .unwrap_or_else(|payload| {
                Err(Doc2TxtError::Internal(format!(
                    "strategy panicked: {}",
                    panic_message(payload.as_ref())
                )))
            });

        match extracted {
            Err(e) => {
                error!("Extraction failed for {}: {}", item.source(), e);
                result.error = Some(ItemError::ExtractionFailed {
                    item: item.source().to_string(),
                    strategy: strategy.name().to_string(),
                    detail: e.to_string(),
                });
            }
            Ok(Extraction { text, outcome }) => {
                if let ExtractionOutcome::Degraded { ref reason } = outcome {
                    warn!("Degraded extraction for {}: {}", item.source(), reason);
                }
                let path = output_path(&self.output_root, item);
                match write_output(&path, &text) {
                    Ok(()) => {
                        result.chars = text.chars().count();
                        info!(
                            "{} → {} ({} chars, {})",
                            item.source(),
                            path.display(),
                            result.chars,
                            strategy.name()
                        );
                        result.output = Some(path);
                    }
                    Err(e) => {
                        error!("{}", e);
                        result.error = Some(ItemError::WriteFailed {
                            item: item.source().to_string(),
                            path,
                            detail: e.to_string(),
                        });
                    }
                }
                result.outcome = Some(outcome);
            }
        }

        result.duration_ms = start.elapsed().as_millis() as u64;
        result
    }
}

/// Probe the native engines and assemble a pipeline with the built-in
/// strategies.
pub fn build_pipeline(config: &ExtractionConfig, output_root: impl Into<PathBuf>) -> Pipeline {
    let caps = Capabilities::probe(config);
    let registry = StrategyRegistry::with_defaults(&caps, config);
    Pipeline::new(output_root, registry)
}

/// `<output_root>/<relative_dir>/<name>.txt`
///
/// Only plain components of `relative_dir` and `name` are kept, so root,
/// prefix, `.` and `..` parts can never place the file outside `output_root`.
pub fn output_path(output_root: &Path, item: &FileItem) -> PathBuf {
    let mut path = output_root.to_path_buf();
    path.extend(normal_components(item.relative_dir()));

    let name = Path::new(item.name());
    let stem = name.file_name().unwrap_or_default().to_string_lossy();
    path.extend(normal_components(name.parent().unwrap_or(Path::new(""))));
    path.push(format!("{stem}.txt"));
    path
}

fn normal_components(path: &Path) -> impl Iterator<Item = &std::ffi::OsStr> {
    path.components().filter_map(|c| match c {
        Component::Normal(part) => Some(part),
        _ => None,
    })
}

/// Write `text` to `path`, creating parent directories.
///
/// Uses atomic write (temp file + rename) so an interrupted run never leaves
/// a truncated output. An existing file is replaced.
pub fn write_output(path: &Path, text: &str) -> Result<(), Doc2TxtError> {
    let write_err = |source| Doc2TxtError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }

    let tmp_path = path.with_extension("txt.tmp");
    std::fs::write(&tmp_path, text).map_err(write_err)?;
    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(write_err(e));
    }

    debug!("Wrote {} bytes to {}", text.len(), path.display());
    Ok(())
}

fn summarize(results: &[ItemResult], total_duration_ms: u64) -> RunStats {
    let written: Vec<&ItemResult> = results.iter().filter(|r| r.output.is_some()).collect();
    RunStats {
        total_items: results.len(),
        written_items: written.len(),
        failed_items: results.iter().filter(|r| !r.is_success()).count(),
        degraded_items: written
            .iter()
            .filter(|r| matches!(r.outcome, Some(ExtractionOutcome::Degraded { .. })))
            .count(),
        ocr_items: written
            .iter()
            .filter(|r| matches!(r.outcome, Some(ExtractionOutcome::Ocr { .. })))
            .count(),
        total_duration_ms,
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
