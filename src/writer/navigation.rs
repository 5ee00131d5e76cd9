//! Navigation level: grouped files with key symbols
//!
//! Files are grouped by the configured stem-suffix patterns (Controller,
//! Service, ...). Each file shows its top key symbols: classes first, then
//! public methods, capped at 5.

use std::path::Path;

use crate::config::IndexingConfig;
use crate::schema::ParseResult;

use super::utils::{collect_recursive_stats, extract_module_description, group_files, key_symbols};

pub fn generate(
    dir: &Path,
    results: &[ParseResult],
    child_dirs: &[std::path::PathBuf],
    config: &IndexingConfig,
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
        format!("- **Subdirectories**: {}", child_dirs.len()),
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

    for (label, files) in group_files(results, config) {
        if label.is_empty() {
            lines.push("## Other Files".to_string());
        } else {
            lines.push(format!("## {}", label));
        }
        lines.push(String::new());

        for result in files {
            if let Some(error) = &result.error {
                lines.push(format!("- {} - unparsable ({})", result.file_name(), error));
                continue;
            }
            lines.push(format!(
                "- **{}** ({} symbols)",
                result.file_name(),
                result.symbols.len()
            ));
            for symbol in key_symbols(&result.symbols) {
                lines.push(format!(
                    "  - **{}** `{}`",
                    symbol.kind.as_str(),
                    symbol.signature
                ));
            }
        }
        lines.push(String::new());
    }

    lines.join("\n")
}
