//! `codeatlas debt`: technical debt analysis

use std::path::Path;

use crate::cli::ReportFormat;
use crate::config::Config;
use crate::debt::{DebtReport, TechDebtDetector};
use crate::error::{AtlasError, Result};
use crate::indexing::parse_files_parallel;
use crate::scanner::scan_directory;
use crate::scorer::SymbolScorer;

pub fn run_debt(dir: &Path, config: &Config, format: ReportFormat) -> Result<()> {
    if !dir.is_dir() {
        return Err(AtlasError::DirectoryNotFound {
            path: dir.display().to_string(),
        });
    }

    let scan = scan_directory(dir, config, Some(dir), true);
    let results = parse_files_parallel(&scan.files);

    let detector = TechDebtDetector::new();
    let scorer = SymbolScorer::new();
    let analyses = results
        .iter()
        .filter(|r| r.error.is_none())
        .map(|r| detector.analyze(r, &scorer).0)
        .collect();

    let report = DebtReport::from_analyses(analyses);
    match format {
        ReportFormat::Markdown => println!("{}", report.to_markdown()),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report).unwrap_or_default()),
    }
    Ok(())
}
