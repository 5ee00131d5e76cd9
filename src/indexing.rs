//! Bottom-up repository indexing
//!
//! Directories are processed strictly by descending depth so every child's
//! README exists on disk before its parent aggregates it. Within a depth
//! batch directories run in parallel, and within a directory files parse in
//! parallel. Cancellation is honored between directories; partial outputs
//! stay on disk.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AtlasError, Result};
use crate::parsing::parse_file;
use crate::routes::RouteRegistry;
use crate::scanner::scan_directory;
use crate::schema::ParseResult;
use crate::tree::DirectoryTree;
use crate::writer::{MarkdownWriter, WriteResult};

/// Outcome of one indexing run
#[derive(Debug, Default)]
pub struct IndexOutcome {
    pub directories_processed: usize,
    pub directories_failed: usize,
    pub files_parsed: usize,
    pub write_results: Vec<WriteResult>,
    pub cancelled: bool,
}

/// Parse files in parallel, preserving input order
pub fn parse_files_parallel(files: &[PathBuf]) -> Vec<ParseResult> {
    files.par_iter().map(|path| parse_file(path)).collect()
}

/// Index a repository: build the tree, then write READMEs bottom-up
pub fn index_repository(root: &Path, config: &Config) -> Result<IndexOutcome> {
    index_repository_with_cancel(root, config, None)
}

/// Like [`index_repository`], checking the cancel flag between directories
pub fn index_repository_with_cancel(
    root: &Path,
    config: &Config,
    cancel: Option<&AtomicBool>,
) -> Result<IndexOutcome> {
    if !root.is_dir() {
        return Err(AtlasError::DirectoryNotFound {
            path: root.display().to_string(),
        });
    }

    let run = || index_bottom_up(root, config, cancel);

    if config.parallel_workers > 0 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.parallel_workers)
            .build()
            .map_err(|e| AtlasError::InvalidConfig {
                message: format!("worker pool: {}", e),
            })?;
        Ok(pool.install(run))
    } else {
        Ok(run())
    }
}

fn index_bottom_up(root: &Path, config: &Config, cancel: Option<&AtomicBool>) -> IndexOutcome {
    let tree = DirectoryTree::build(root, config);
    let registry = RouteRegistry::from_config(&config.routes);
    let writer = MarkdownWriter::new(config);

    let order = tree.processing_order(config);
    info!(directories = order.len(), "indexing bottom-up");

    // group the already-sorted order into same-depth batches
    let mut batches: Vec<Vec<PathBuf>> = Vec::new();
    let mut current_depth: Option<usize> = None;
    for dir in order {
        let depth = tree.node(&dir).map(|n| n.depth).unwrap_or(0);
        if current_depth == Some(depth) {
            batches.last_mut().unwrap().push(dir);
        } else {
            current_depth = Some(depth);
            batches.push(vec![dir]);
        }
    }

    let files_parsed = AtomicUsize::new(0);
    let mut outcome = IndexOutcome::default();

    for batch in batches {
        if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            outcome.cancelled = true;
            break;
        }

        let results: Vec<WriteResult> = batch
            .par_iter()
            .map(|dir| {
                let scan = scan_directory(dir, config, Some(root), false);
                let parse_results = parse_files_parallel(&scan.files);
                files_parsed.fetch_add(parse_results.len(), Ordering::Relaxed);

                let routes = registry.extract_all(root, dir, &parse_results);

                // children only count once their README is on disk
                let child_dirs: Vec<PathBuf> = tree
                    .children(dir)
                    .into_iter()
                    .filter(|child| child.join(&config.output_file).exists())
                    .collect();

                let level = tree.level(dir, config);
                debug!(dir = %dir.display(), level = level.as_str(), files = scan.files.len(), "writing README");
                writer.write_readme(dir, &parse_results, level, &child_dirs, &routes)
            })
            .collect();

        for result in results {
            if result.success {
                outcome.directories_processed += 1;
            } else {
                warn!(path = %result.path.display(), "skipped: {}", result.error);
                outcome.directories_failed += 1;
            }
            outcome.write_results.push(result);
        }
    }

    outcome.files_parsed = files_parsed.into_inner();
    outcome
}
