//! Project-wide symbol index
//!
//! Re-collects symbols across every indexed directory that has a written
//! README and emits one Markdown index grouped by kind and by file. No
//! cross-file resolution is attempted.

use std::collections::BTreeMap;
use std::path::Path;

use crate::config::Config;
use crate::error::Result;
use crate::indexing::parse_files_parallel;
use crate::scanner::{find_all_directories, scan_directory};
use crate::schema::{ParseResult, SymbolKind};

/// Builds `PROJECT_SYMBOLS.md` at the repository root
pub struct GlobalSymbolIndex<'a> {
    config: &'a Config,
}

impl<'a> GlobalSymbolIndex<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Collect parse results from every directory whose README exists
    pub fn collect(&self, root: &Path) -> Vec<ParseResult> {
        let mut results = Vec::new();
        for dir in find_all_directories(root, self.config) {
            if !dir.join(&self.config.output_file).exists() {
                continue;
            }
            let scan = scan_directory(&dir, self.config, Some(root), false);
            results.extend(parse_files_parallel(&scan.files));
        }
        results
    }

    /// Render the index document
    pub fn render(&self, root: &Path, results: &[ParseResult]) -> String {
        let parsed: Vec<&ParseResult> = results.iter().filter(|r| r.error.is_none()).collect();
        let total_symbols: usize = parsed.iter().map(|r| r.symbols.len()).sum();

        let mut lines = vec![
            "# Project Symbols".to_string(),
            String::new(),
            format!("- **Files**: {}", parsed.len()),
            format!("- **Symbols**: {}", total_symbols),
            String::new(),
        ];

        // group by kind
        let mut by_kind: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();
        for result in &parsed {
            let rel = Path::new(&result.path)
                .strip_prefix(root)
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| result.path.clone());
            for symbol in &result.symbols {
                by_kind
                    .entry(symbol.kind.as_str())
                    .or_default()
                    .push(format!("- `{}` - {} (line {})", symbol.name, rel, symbol.line_start));
            }
        }

        if !by_kind.is_empty() {
            lines.push("## By Kind".to_string());
            lines.push(String::new());
            for (kind, mut entries) in by_kind {
                lines.push(format!("### {}", kind));
                lines.push(String::new());
                entries.sort();
                lines.extend(entries);
                lines.push(String::new());
            }
        }

        lines.push("## By File".to_string());
        lines.push(String::new());
        let mut sorted: Vec<&&ParseResult> = parsed.iter().collect();
        sorted.sort_by(|a, b| a.path.cmp(&b.path));
        for result in sorted {
            let rel = Path::new(&result.path)
                .strip_prefix(root)
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| result.path.clone());
            lines.push(format!("### {}", rel));
            lines.push(String::new());
            let classes = result
                .symbols
                .iter()
                .filter(|s| s.kind == SymbolKind::Class)
                .count();
            lines.push(format!(
                "{} symbols ({} classes)",
                result.symbols.len(),
                classes
            ));
            for symbol in &result.symbols {
                lines.push(format!("- {} `{}`", symbol.kind.as_str(), symbol.name));
            }
            lines.push(String::new());
        }

        lines.join("\n")
    }

    /// Collect, render, and write the index file at the repository root
    pub fn generate(&self, root: &Path) -> Result<std::path::PathBuf> {
        let results = self.collect(root);
        let content = self.render(root, &results);
        let output = root.join(&self.config.symbol_index_file);
        std::fs::write(&output, content)?;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_collect_requires_written_readme() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "indexed/a.py", "class A:\n    pass\n");
        write(root, "indexed/README_AI.md", "# indexed\n");
        write(root, "skipped/b.py", "class B:\n    pass\n");

        let config = Config::default();
        let index = GlobalSymbolIndex::new(&config);
        let results = index.collect(root);
        assert_eq!(results.len(), 1);
        assert!(results[0].path.ends_with("a.py"));
    }

    #[test]
    fn test_render_groups_by_kind_and_file() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "src/models.py", "class User:\n    def save(self):\n        pass\n\ndef helper():\n    pass\n");
        write(root, "src/README_AI.md", "# src\n");

        let config = Config::default();
        let index = GlobalSymbolIndex::new(&config);
        let results = index.collect(root);
        let content = index.render(root, &results);

        assert!(content.starts_with("# Project Symbols"));
        assert!(content.contains("### class"));
        assert!(content.contains("`User`"));
        assert!(content.contains("### function"));
        assert!(content.contains("`helper`"));
        assert!(content.contains("### src/models.py"));
    }

    #[test]
    fn test_generate_writes_index() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "src/a.py", "def f():\n    pass\n");
        write(root, "src/README_AI.md", "# src\n");

        let config = Config::default();
        let index = GlobalSymbolIndex::new(&config);
        let output = index.generate(root).unwrap();
        assert!(output.ends_with("PROJECT_SYMBOLS.md"));
        assert!(output.exists());
    }
}
