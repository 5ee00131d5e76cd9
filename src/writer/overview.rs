//! Overview level: module list with one-line descriptions
//!
//! Used at the repository root. Statistics and descriptions come from the
//! children's already-written READMEs; the bottom-up processing order
//! guarantees those exist.

use std::path::Path;

use crate::schema::ParseResult;

use super::utils::{collect_recursive_stats, collect_top_symbols, extract_module_description};

pub fn generate(
    dir: &Path,
    results: &[ParseResult],
    child_dirs: &[std::path::PathBuf],
    output_file: &str,
) -> String {
    let dir_name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string());

    let local_symbols: usize = results.iter().map(|r| r.symbols.len()).sum();
    let (child_files, child_symbols) = collect_recursive_stats(child_dirs, output_file);

    let mut lines = vec![
        format!("# {}", dir_name),
        String::new(),
        "## Overview".to_string(),
        format!("- **Files**: {}", results.len() + child_files),
        format!("- **Symbols**: {}", local_symbols + child_symbols),
        format!("- **Modules**: {}", child_dirs.len()),
        String::new(),
    ];

    if !child_dirs.is_empty() {
        lines.push("## Modules".to_string());
        lines.push(String::new());
        for child in child_dirs {
            let name = child
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let description = extract_module_description(child, output_file);
            lines.push(format!("- **{}/** - {}", name, description));
        }
        lines.push(String::new());
    }

    let top = collect_top_symbols(child_dirs, output_file, 15);
    if !top.is_empty() {
        lines.push("## Key Symbols".to_string());
        lines.push(String::new());
        for (name, kind, module) in top {
            lines.push(format!("- `{}` ({}) - {}", name, kind, module));
        }
        lines.push(String::new());
    }

    if !results.is_empty() {
        lines.push("## Root Files".to_string());
        lines.push(String::new());
        for result in results {
            lines.push(format!(
                "- {} ({} symbols)",
                result.file_name(),
                result.symbols.len()
            ));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}
