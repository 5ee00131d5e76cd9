//! `codeatlas index`: bottom-up README generation

use std::path::Path;

use crate::config::Config;
use crate::error::Result;
use crate::indexing::index_repository;

pub fn run_index(dir: &Path, config: &Config) -> Result<()> {
    let outcome = index_repository(dir, config)?;

    println!(
        "Indexed {} directories ({} files parsed, {} failed writes)",
        outcome.directories_processed, outcome.files_parsed, outcome.directories_failed
    );
    for result in outcome.write_results.iter().filter(|r| r.truncated) {
        println!(
            "  truncated: {} ({} KB)",
            result.path.display(),
            result.size_bytes / 1024
        );
    }
    Ok(())
}
