//! Detailed level: full symbol information per file
//!
//! For each parsed file: filtered symbols up to the adaptive limit with
//! signatures and cleaned docstrings, route tables when a framework
//! extractor fired, and a summary of inheritance relationships.

use std::path::Path;

use crate::config::IndexingConfig;
use crate::routes::RouteInfo;
use crate::schema::ParseResult;
use crate::selector::AdaptiveSelector;

use super::utils::{filter_symbols, format_route_table};

pub fn generate(
    dir: &Path,
    results: &[ParseResult],
    config: &IndexingConfig,
    selector: &AdaptiveSelector,
    routes: &[(String, Vec<RouteInfo>)],
) -> String {
    let dir_name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string());

    let parsed: Vec<&ParseResult> = results.iter().filter(|r| r.error.is_none()).collect();
    let failed: Vec<&ParseResult> = results.iter().filter(|r| r.error.is_some()).collect();
    let total_symbols: usize = parsed.iter().map(|r| r.symbols.len()).sum();

    let mut lines = vec![
        format!("# {}", dir_name),
        String::new(),
        "## Overview".to_string(),
        format!("- **Files**: {}", results.len()),
        format!("- **Symbols**: {}", total_symbols),
        String::new(),
    ];

    for (framework, framework_routes) in routes {
        lines.extend(format_route_table(framework_routes, framework));
    }

    if !parsed.is_empty() {
        lines.push("## Files".to_string());
        lines.push(String::new());
    }

    for result in &parsed {
        lines.push(format!("### {}", result.file_name()));
        if !result.namespace.is_empty() {
            lines.push(format!("_Namespace: `{}`_", result.namespace));
        }
        if !result.module_docstring.is_empty() {
            lines.push(String::new());
            lines.push(result.module_docstring.lines().next().unwrap_or("").to_string());
        }
        lines.push(String::new());

        let filtered = filter_symbols(&result.symbols, config);
        let limit = selector.calculate_limit(result.file_lines, filtered.len());
        for symbol in filtered.iter().take(limit) {
            lines.push(format!(
                "- **{}** `{}` (lines {}-{})",
                symbol.kind.as_str(),
                symbol.signature,
                symbol.line_start,
                symbol.line_end
            ));
            if !symbol.docstring.is_empty() {
                let doc = symbol.docstring.lines().next().unwrap_or("");
                lines.push(format!("  - {}", doc));
            }
        }
        if filtered.len() > limit {
            lines.push(format!("- _{} more symbols omitted_", filtered.len() - limit));
        }
        lines.push(String::new());
    }

    let inheritances: Vec<String> = parsed
        .iter()
        .flat_map(|r| r.inheritances.iter())
        .map(|inh| format!("- `{}` extends `{}`", inh.child, inh.parent))
        .collect();
    if !inheritances.is_empty() {
        lines.push("## Inheritance".to_string());
        lines.push(String::new());
        lines.extend(inheritances);
        lines.push(String::new());
    }

    if !failed.is_empty() {
        lines.push("## Unparsable Files".to_string());
        lines.push(String::new());
        for result in &failed {
            let error = result.error.as_deref().unwrap_or("unknown error");
            lines.push(format!("- {} - {}", result.file_name(), error));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}
