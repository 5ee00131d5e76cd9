//! Markdown writer
//!
//! Dispatches to the level generators, enforces the per-file size cap with
//! deterministic truncation, and reports write outcomes. Write failures are
//! captured in the result, never raised; the run continues with other
//! directories.

mod detailed;
mod navigation;
mod overview;
pub mod utils;

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::config::Config;
use crate::routes::RouteInfo;
use crate::schema::ParseResult;
use crate::selector::AdaptiveSelector;
use crate::tree::Level;

pub use utils::{format_route_table, truncate_content, TRUNCATION_NOTICE};

/// Result of writing one README file
#[derive(Debug, Clone)]
pub struct WriteResult {
    pub path: PathBuf,
    pub success: bool,
    pub error: String,
    pub size_bytes: usize,
    pub truncated: bool,
}

/// Level-aware README writer
pub struct MarkdownWriter {
    config: Config,
    selector: AdaptiveSelector,
}

impl MarkdownWriter {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            selector: AdaptiveSelector::new(config.indexing.symbols.adaptive.clone()),
        }
    }

    /// Render and write the README for one directory
    pub fn write_readme(
        &self,
        dir: &Path,
        parse_results: &[ParseResult],
        level: Level,
        child_dirs: &[PathBuf],
        routes: &[(String, Vec<RouteInfo>)],
    ) -> WriteResult {
        let output_path = dir.join(&self.config.output_file);
        let content = self.render(dir, parse_results, level, child_dirs, routes);

        let (content, truncated) =
            truncate_content(&content, self.config.indexing.max_readme_size);
        let size_bytes = content.len();

        match std::fs::write(&output_path, content) {
            Ok(()) => WriteResult {
                path: output_path,
                success: true,
                error: String::new(),
                size_bytes,
                truncated,
            },
            Err(e) => {
                warn!(path = %output_path.display(), "write failed: {}", e);
                WriteResult {
                    path: output_path,
                    success: false,
                    error: e.to_string(),
                    size_bytes: 0,
                    truncated: false,
                }
            }
        }
    }

    /// Render the README content without touching disk
    pub fn render(
        &self,
        dir: &Path,
        parse_results: &[ParseResult],
        level: Level,
        child_dirs: &[PathBuf],
        routes: &[(String, Vec<RouteInfo>)],
    ) -> String {
        match level {
            Level::Overview => {
                overview::generate(dir, parse_results, child_dirs, &self.config.output_file)
            }
            Level::Navigation => navigation::generate(
                dir,
                parse_results,
                child_dirs,
                &self.config.indexing,
                &self.config.output_file,
            ),
            Level::Detailed => detailed::generate(
                dir,
                parse_results,
                &self.config.indexing,
                &self.selector,
                routes,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::Lang;
    use crate::parsing::parse_bytes;

    #[test]
    fn test_write_readme_detailed() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        let writer = MarkdownWriter::new(&config);

        let result = parse_bytes(
            &dir.path().join("mod.py"),
            Lang::Python,
            b"def entry():\n    \"\"\"Starts the run.\"\"\"\n    pass\n",
        );

        let write = writer.write_readme(dir.path(), &[result], Level::Detailed, &[], &[]);
        assert!(write.success);
        assert!(!write.truncated);
        assert!(write.size_bytes > 0);

        let content = std::fs::read_to_string(write.path).unwrap();
        assert!(content.contains("**function** `def entry()`"));
        assert!(content.contains("Starts the run."));
    }

    #[test]
    fn test_size_cap_enforced() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.indexing.max_readme_size = 2048;
        let writer = MarkdownWriter::new(&config);

        let mut source = String::new();
        for i in 0..100 {
            source.push_str(&format!(
                "def very_long_function_name_number_{}():\n    \"\"\"Docstring for function {} with padding text.\"\"\"\n    pass\n\n",
                i, i
            ));
        }
        let result = parse_bytes(&dir.path().join("big.py"), Lang::Python, source.as_bytes());

        let write = writer.write_readme(dir.path(), &[result], Level::Detailed, &[], &[]);
        assert!(write.success);
        assert!(write.size_bytes <= 2048);
        if write.truncated {
            let content = std::fs::read_to_string(&write.path).unwrap();
            assert!(content.ends_with(TRUNCATION_NOTICE));
        }
    }

    #[test]
    fn test_write_failure_is_captured() {
        let config = Config::default();
        let writer = MarkdownWriter::new(&config);
        let write = writer.write_readme(
            Path::new("/nonexistent/dir/for/codeatlas"),
            &[],
            Level::Detailed,
            &[],
            &[],
        );
        assert!(!write.success);
        assert!(!write.error.is_empty());
    }
}
