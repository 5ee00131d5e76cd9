//! Shared helpers for README generation
//!
//! Stateless functions used by the level generators: symbol filtering and
//! selection, file grouping, child-README aggregation, route tables, and
//! size-capped truncation.

use std::path::Path;

use glob::Pattern;
use walkdir::WalkDir;

use crate::config::IndexingConfig;
use crate::routes::RouteInfo;
use crate::schema::{ParseResult, Symbol, SymbolKind};

/// Filter symbols by exclusion patterns and visibility configuration
pub fn filter_symbols<'a>(symbols: &'a [Symbol], config: &IndexingConfig) -> Vec<&'a Symbol> {
    let patterns: Vec<Pattern> = config
        .symbols
        .exclude_patterns
        .iter()
        .filter_map(|p| Pattern::new(p).ok())
        .collect();

    symbols
        .iter()
        .filter(|symbol| {
            let short = symbol.short_name();
            if patterns.iter().any(|p| p.matches(short)) {
                return false;
            }

            // visibility only constrains symbols that declare one
            let sig_lower = symbol.signature.to_lowercase();
            let declares_visibility = ["public", "private", "protected"]
                .iter()
                .any(|v| sig_lower.contains(v));
            if declares_visibility && !config.symbols.include_visibility.is_empty() {
                return config
                    .symbols
                    .include_visibility
                    .iter()
                    .any(|v| sig_lower.contains(v));
            }
            true
        })
        .collect()
}

/// Key symbols for navigation output: classes first, then public
/// methods/functions, capped at 5
pub fn key_symbols(symbols: &[Symbol]) -> Vec<&Symbol> {
    let mut key: Vec<&Symbol> = symbols
        .iter()
        .filter(|s| s.kind == SymbolKind::Class)
        .collect();

    for symbol in symbols {
        if matches!(symbol.kind, SymbolKind::Function | SymbolKind::Method) {
            let public = symbol.kind == SymbolKind::Function
                || symbol.signature.to_lowercase().contains("public");
            if public {
                key.push(symbol);
            }
        }
    }

    key.truncate(5);
    key
}

/// Group files by configured stem-suffix patterns; the pattern order is the
/// group order, ungrouped files land at the end under an empty label
pub fn group_files<'a>(
    results: &'a [ParseResult],
    config: &IndexingConfig,
) -> Vec<(String, Vec<&'a ParseResult>)> {
    if !config.grouping.enabled {
        return vec![(String::new(), results.iter().collect())];
    }

    let mut grouped: Vec<(String, Vec<&ParseResult>)> = config
        .grouping
        .patterns
        .iter()
        .map(|p| (format!("{} ({})", p.label, p.suffix), Vec::new()))
        .collect();
    let mut ungrouped: Vec<&ParseResult> = Vec::new();

    for result in results {
        let stem = result.file_stem();
        let slot = config
            .grouping
            .patterns
            .iter()
            .position(|p| stem.ends_with(&p.suffix));
        match slot {
            Some(index) => grouped[index].1.push(result),
            None => ungrouped.push(result),
        }
    }

    let mut ordered: Vec<(String, Vec<&ParseResult>)> = grouped
        .into_iter()
        .filter(|(_, files)| !files.is_empty())
        .collect();
    if !ungrouped.is_empty() {
        ordered.push((String::new(), ungrouped));
    }
    ordered
}

/// Parse the integer after a `**{key}**:` marker on any line
fn stat_value(content: &str, key: &str) -> Option<usize> {
    let marker = format!("**{}**:", key);
    for line in content.lines() {
        if let Some(rest) = line.split(&marker).nth(1) {
            let digits: String = rest
                .trim_start()
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            if !digits.is_empty() {
                return digits.parse().ok();
            }
        }
    }
    None
}

/// Symbol names listed as `**class** \`Name\`` (or function) in a README
fn listed_symbols(content: &str) -> Vec<(String, String)> {
    let mut found = Vec::new();
    for line in content.lines() {
        for kind in ["class", "function"] {
            let marker = format!("**{}** `", kind);
            let mut rest = line;
            while let Some(start) = rest.find(&marker) {
                let after = &rest[start + marker.len()..];
                if let Some(end) = after.find('`') {
                    let mut name = after[..end].trim();
                    name = name.strip_prefix("class ").unwrap_or(name);
                    name = name.strip_prefix("def ").unwrap_or(name);
                    // keep the bare identifier
                    let ident: String = name
                        .chars()
                        .take_while(|c| c.is_alphanumeric() || *c == '_')
                        .collect();
                    if !ident.is_empty() {
                        found.push((kind.to_string(), ident));
                    }
                    rest = &after[end..];
                } else {
                    break;
                }
            }
        }
    }
    found
}

/// Aggregate file/symbol counts from child README files
pub fn collect_recursive_stats(child_dirs: &[impl AsRef<Path>], output_file: &str) -> (usize, usize) {
    let mut total_files = 0;
    let mut total_symbols = 0;
    for child in child_dirs {
        let readme = child.as_ref().join(output_file);
        if let Ok(content) = std::fs::read_to_string(&readme) {
            total_files += stat_value(&content, "Files").unwrap_or(0);
            total_symbols += stat_value(&content, "Symbols").unwrap_or(0);
        }
    }
    (total_files, total_symbols)
}

/// Brief description of a child module from its already-written README:
/// structured stats plus top class names, else the first free-text line
pub fn extract_module_description(dir: &Path, output_file: &str) -> String {
    let readme = dir.join(output_file);
    let Ok(content) = std::fs::read_to_string(&readme) else {
        return "Module directory".to_string();
    };

    let mut parts = Vec::new();
    if let Some(files) = stat_value(&content, "Files") {
        parts.push(format!("{} files", files));
    }
    if let Some(symbols) = stat_value(&content, "Symbols") {
        parts.push(format!("{} symbols", symbols));
    }
    let classes: Vec<String> = listed_symbols(&content)
        .into_iter()
        .filter(|(kind, _)| kind == "class")
        .map(|(_, name)| name)
        .collect();
    if !classes.is_empty() {
        let shown: Vec<&str> = classes.iter().take(5).map(String::as_str).collect();
        let mut class_str = format!("classes: {}", shown.join(", "));
        if classes.len() > 5 {
            class_str.push_str(&format!(" +{} more", classes.len() - 5));
        }
        parts.push(class_str);
    }
    if !parts.is_empty() {
        return parts.join(" | ");
    }

    // first free-text line
    for line in content.lines().skip(2).take(13) {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with("<!--") || line.starts_with('-') {
            continue;
        }
        let mut cut = line.len().min(80);
        while cut > 0 && !line.is_char_boundary(cut) {
            cut -= 1;
        }
        return line[..cut].to_string();
    }

    "Module directory".to_string()
}

/// Top (name, kind, module) symbols found in child READMEs, deduplicated
pub fn collect_top_symbols(
    child_dirs: &[impl AsRef<Path>],
    output_file: &str,
    limit: usize,
) -> Vec<(String, String, String)> {
    let mut seen = std::collections::HashSet::new();
    let mut top = Vec::new();

    for child in child_dirs {
        for entry in WalkDir::new(child.as_ref()).into_iter().flatten() {
            if entry.file_name().to_string_lossy() != output_file {
                continue;
            }
            let Ok(content) = std::fs::read_to_string(entry.path()) else {
                continue;
            };
            let module = entry
                .path()
                .parent()
                .and_then(Path::file_name)
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            for (kind, name) in listed_symbols(&content) {
                if seen.insert(name.clone()) {
                    top.push((name, kind, module.clone()));
                }
                if top.len() >= limit {
                    return top;
                }
            }
        }
    }
    top
}

/// Markdown route table, capped at 30 rows
pub fn format_route_table(routes: &[RouteInfo], framework: &str) -> Vec<String> {
    if routes.is_empty() {
        return Vec::new();
    }

    let display = match framework {
        "thinkphp" => "ThinkPHP".to_string(),
        "spring" => "Spring".to_string(),
        other => {
            let mut chars = other.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => other.to_string(),
            }
        }
    };

    let mut lines = vec![
        format!("## Routes ({})", display),
        String::new(),
        "| URL | Controller | Action | Location | Description |".to_string(),
        "|-----|------------|--------|----------|-------------|".to_string(),
    ];

    for route in routes.iter().take(30) {
        let location = if route.file_path.is_empty() {
            String::new()
        } else {
            format!("`{}:{}`", route.file_path, route.line_number)
        };
        lines.push(format!(
            "| `{}` | {} | {} | {} | {} |",
            route.url, route.controller, route.action, location, route.description
        ));
    }
    if routes.len() > 30 {
        lines.push(format!("| ... | _{} more routes_ | | | |", routes.len() - 30));
    }
    lines.push(String::new());
    lines
}

pub const TRUNCATION_NOTICE: &str =
    "\n\n---\n_Content truncated due to size limit. See individual module README files for details._\n";

/// Enforce the size cap. Truncation prefers the last `## ` section boundary
/// past the midpoint, then appends the truncation notice.
pub fn truncate_content(content: &str, max_size: usize) -> (String, bool) {
    if content.len() <= max_size {
        return (content.to_string(), false);
    }

    let budget = max_size.saturating_sub(200);
    let mut cut = budget.min(content.len());
    while cut > 0 && !content.is_char_boundary(cut) {
        cut -= 1;
    }
    let mut truncated = content[..cut].to_string();

    if let Some(last_section) = truncated.rfind("\n## ") {
        if last_section > truncated.len() / 2 {
            truncated.truncate(last_section);
        }
    }

    truncated.push_str(TRUNCATION_NOTICE);
    (truncated, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndexingConfig;
    use crate::schema::SymbolKind;

    fn symbol(name: &str, kind: SymbolKind, signature: &str) -> Symbol {
        Symbol {
            name: name.to_string(),
            kind,
            signature: signature.to_string(),
            docstring: String::new(),
            line_start: 1,
            line_end: 2,
            annotations: Vec::new(),
        }
    }

    #[test]
    fn test_filter_symbols_exclusion_patterns() {
        let config = IndexingConfig::default();
        let symbols = vec![
            symbol("C::getName", SymbolKind::Method, "public function getName()"),
            symbol("C::setName", SymbolKind::Method, "public function setName()"),
            symbol("C::__construct", SymbolKind::Method, "public function __construct()"),
            symbol("C::process", SymbolKind::Method, "public function process()"),
        ];
        let kept = filter_symbols(&symbols, &config);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "C::process");
    }

    #[test]
    fn test_filter_symbols_visibility() {
        let config = IndexingConfig::default();
        let symbols = vec![
            symbol("C::run", SymbolKind::Method, "public function run()"),
            symbol("C::guard", SymbolKind::Method, "protected function guard()"),
            symbol("C::inner", SymbolKind::Method, "private function inner()"),
            symbol("plain", SymbolKind::Function, "def plain()"),
        ];
        let kept = filter_symbols(&symbols, &config);
        let names: Vec<&str> = kept.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["C::run", "C::guard", "plain"]);
    }

    #[test]
    fn test_key_symbols_classes_first_capped() {
        let mut symbols = vec![
            symbol("helper", SymbolKind::Function, "def helper()"),
            symbol("Alpha", SymbolKind::Class, "class Alpha"),
            symbol("Beta", SymbolKind::Class, "class Beta"),
        ];
        for i in 0..6 {
            symbols.push(symbol(
                &format!("A::m{}", i),
                SymbolKind::Method,
                "public function m()",
            ));
        }
        let key = key_symbols(&symbols);
        assert_eq!(key.len(), 5);
        assert_eq!(key[0].name, "Alpha");
        assert_eq!(key[1].name, "Beta");
        assert_eq!(key[2].name, "helper");
    }

    #[test]
    fn test_group_files_by_suffix() {
        let config = IndexingConfig::default();
        let mk = |path: &str| {
            let mut r = ParseResult::with_error(Path::new(path), "php", String::new(), 10);
            r.error = None;
            r
        };
        let results = vec![
            mk("app/UserController.php"),
            mk("app/OrderService.php"),
            mk("app/util.php"),
            mk("app/IndexController.php"),
        ];
        let groups = group_files(&results, &config);

        assert_eq!(groups[0].0, "HTTP request handling (Controller)");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, "Business logic (Service)");
        // ungrouped trails with an empty label
        assert_eq!(groups.last().unwrap().0, "");
        assert_eq!(groups.last().unwrap().1.len(), 1);
    }

    #[test]
    fn test_stat_value_and_listed_symbols() {
        let content = "# mod\n\n## Overview\n- **Files**: 3\n- **Symbols**: 42\n\n- **class** `class User` does things\n- **function** `def load` loads\n";
        assert_eq!(stat_value(content, "Files"), Some(3));
        assert_eq!(stat_value(content, "Symbols"), Some(42));
        let symbols = listed_symbols(content);
        assert!(symbols.contains(&("class".to_string(), "User".to_string())));
        assert!(symbols.contains(&("function".to_string(), "load".to_string())));
    }

    #[test]
    fn test_extract_module_description() {
        let dir = tempfile::tempdir().unwrap();
        let child = dir.path().join("core");
        std::fs::create_dir_all(&child).unwrap();
        std::fs::write(
            child.join("README_AI.md"),
            "# core\n\n- **Files**: 2\n- **Symbols**: 9\n- **class** `Engine`\n",
        )
        .unwrap();

        let description = extract_module_description(&child, "README_AI.md");
        assert!(description.contains("2 files"));
        assert!(description.contains("9 symbols"));
        assert!(description.contains("Engine"));

        let missing = extract_module_description(&dir.path().join("nope"), "README_AI.md");
        assert_eq!(missing, "Module directory");
    }

    #[test]
    fn test_collect_recursive_stats() {
        let dir = tempfile::tempdir().unwrap();
        for (name, files, symbols) in [("a", 2, 10), ("b", 3, 4)] {
            let child = dir.path().join(name);
            std::fs::create_dir_all(&child).unwrap();
            std::fs::write(
                child.join("README_AI.md"),
                format!("# {}\n\n- **Files**: {}\n- **Symbols**: {}\n", name, files, symbols),
            )
            .unwrap();
        }
        let children = [dir.path().join("a"), dir.path().join("b")];
        let (files, symbols) = collect_recursive_stats(&children, "README_AI.md");
        assert_eq!(files, 5);
        assert_eq!(symbols, 14);
    }

    #[test]
    fn test_truncate_content() {
        let (unchanged, truncated) = truncate_content("short", 1000);
        assert_eq!(unchanged, "short");
        assert!(!truncated);

        let mut long = String::from("# Title\n\nintro\n");
        for i in 0..200 {
            long.push_str(&format!("\n## Section {}\n\n{}\n", i, "x".repeat(100)));
        }
        let cap = 5000;
        let (cut, truncated) = truncate_content(&long, cap);
        assert!(truncated);
        assert!(cut.len() <= cap);
        assert!(cut.ends_with(TRUNCATION_NOTICE));
        // still ends at a section boundary before the notice
        let body = cut.trim_end_matches(TRUNCATION_NOTICE);
        assert!(body.rfind("\n## ").is_some());
    }

    #[test]
    fn test_format_route_table_caps_rows() {
        let routes: Vec<RouteInfo> = (0..35)
            .map(|i| RouteInfo {
                url: format!("/m/c/a{}", i),
                controller: "C".to_string(),
                action: format!("a{}", i),
                method_signature: String::new(),
                line_number: i + 1,
                file_path: "C.php".to_string(),
                description: String::new(),
            })
            .collect();
        let lines = format_route_table(&routes, "thinkphp");
        assert_eq!(lines[0], "## Routes (ThinkPHP)");
        assert!(lines.iter().any(|l| l.contains("_5 more routes_")));
        // header + separator + 30 rows + more-line + trailing blank + title + blank
        assert_eq!(lines.len(), 4 + 30 + 1 + 1);
    }
}
