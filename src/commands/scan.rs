//! `codeatlas scan`: per-directory JSON output

use std::path::Path;

use crate::config::Config;
use crate::error::{AtlasError, Result};
use crate::indexing::parse_files_parallel;
use crate::scanner::scan_directory;
use crate::schema::JsonReport;

use super::{print_error_envelope, print_report};

pub fn run_scan(dir: &Path, config: &Config, pretty: bool) -> Result<()> {
    if !dir.is_dir() {
        let error = AtlasError::DirectoryNotFound {
            path: dir.display().to_string(),
        };
        print_error_envelope(&error, pretty);
        return Err(error);
    }

    let scan = scan_directory(dir, config, Some(dir), true);
    let mut results = parse_files_parallel(&scan.files);
    for result in &mut results {
        result.canonicalize();
    }
    results.sort_by(|a, b| a.path.cmp(&b.path));

    let report = JsonReport::success(results);
    print_report(&report, pretty);
    Ok(())
}
