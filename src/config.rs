//! Configuration loading for codeatlas
//!
//! Configuration lives in `.codeatlas.toml` at the repository root. Every
//! field has a default, so a missing file yields a fully usable config.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AtlasError, Result};
use crate::lang::Lang;
use crate::tree::Level;

pub const DEFAULT_CONFIG_NAME: &str = ".codeatlas.toml";
pub const DEFAULT_OUTPUT_FILE: &str = "README_AI.md";
pub const DEFAULT_SYMBOL_INDEX_FILE: &str = "PROJECT_SYMBOLS.md";

const DEFAULT_CONFIG_TEMPLATE: &str = r#"# codeatlas configuration

# Directory prefixes to scan; empty means the whole repository
include = []

# Patterns to exclude (`**` matches zero or more path segments)
exclude = [
    "**/__pycache__/**",
    "**/node_modules/**",
    "**/.git/**",
    "**/vendor/**",
    "**/venv/**",
    "**/target/**",
    "**/dist/**",
]

# Supported languages to index
languages = ["python", "php", "java", "typescript", "javascript"]

output_file = "README_AI.md"
symbol_index_file = "PROJECT_SYMBOLS.md"

# 0 = one worker per CPU core
parallel_workers = 0

[indexing]
max_readme_size = 51200

[indexing.symbols]
max_per_file = 15
include_visibility = ["public", "protected"]
exclude_patterns = ["get*", "set*", "__*"]

[incremental]
enabled = true
skip_lines = 5
current_only = 50
suggest_full = 200

[routes]
enabled = true
frameworks = ["thinkphp", "spring"]
"#;

fn default_exclude() -> Vec<String> {
    [
        "**/__pycache__/**",
        "**/node_modules/**",
        "**/.git/**",
        "**/vendor/**",
        "**/venv/**",
        "**/target/**",
        "**/dist/**",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_languages() -> Vec<String> {
    ["python", "php", "java", "typescript", "javascript"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_output_file() -> String {
    DEFAULT_OUTPUT_FILE.to_string()
}

fn default_symbol_index_file() -> String {
    DEFAULT_SYMBOL_INDEX_FILE.to_string()
}

/// Top-level configuration record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory prefixes to scan; empty means the whole repository
    pub include: Vec<String>,
    /// Exclusion globs evaluated against `/`-normalized relative paths
    pub exclude: Vec<String>,
    pub languages: Vec<String>,
    pub output_file: String,
    pub symbol_index_file: String,
    /// 0 = one worker per CPU core
    pub parallel_workers: usize,
    pub indexing: IndexingConfig,
    pub incremental: IncrementalConfig,
    pub routes: RoutesConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            include: Vec::new(),
            exclude: default_exclude(),
            languages: default_languages(),
            output_file: default_output_file(),
            symbol_index_file: default_symbol_index_file(),
            parallel_workers: 0,
            indexing: IndexingConfig::default(),
            incremental: IncrementalConfig::default(),
            routes: RoutesConfig::default(),
        }
    }
}

impl Config {
    /// Load from an explicit path, or fall back to defaults when the default
    /// config file does not exist
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (std::env::current_dir()?.join(DEFAULT_CONFIG_NAME), false),
        };

        if !path.exists() {
            if explicit {
                return Err(AtlasError::NoConfigFound {
                    path: path.display().to_string(),
                });
            }
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(&path)?;
        toml::from_str(&raw).map_err(|e| AtlasError::InvalidConfig {
            message: format!("{}: {}", path.display(), e),
        })
    }

    /// Write the default config template; refuses to overwrite
    pub fn write_default(path: &Path) -> Result<()> {
        if path.exists() {
            return Err(AtlasError::InvalidConfig {
                message: format!("{} already exists", path.display()),
            });
        }
        fs::write(path, DEFAULT_CONFIG_TEMPLATE)?;
        Ok(())
    }

    /// Lowercased file extensions for the configured languages
    pub fn extension_set(&self) -> HashSet<String> {
        let mut extensions = HashSet::new();
        for key in &self.languages {
            for ext in Lang::extensions_for_key(key) {
                extensions.insert(ext.to_string());
            }
        }
        extensions
    }
}

/// Controls README generation strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexingConfig {
    /// Per-file Markdown size cap in bytes
    pub max_readme_size: usize,
    pub symbols: SymbolsConfig,
    pub grouping: GroupingConfig,
    pub root_level: Level,
    pub module_level: Level,
    pub leaf_level: Level,
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            max_readme_size: 50 * 1024,
            symbols: SymbolsConfig::default(),
            grouping: GroupingConfig::default(),
            root_level: Level::Overview,
            module_level: Level::Navigation,
            leaf_level: Level::Detailed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolsConfig {
    pub max_per_file: usize,
    pub include_visibility: Vec<String>,
    pub exclude_patterns: Vec<String>,
    pub adaptive: AdaptiveConfig,
}

impl Default for SymbolsConfig {
    fn default() -> Self {
        Self {
            max_per_file: 15,
            include_visibility: vec!["public".to_string(), "protected".to_string()],
            exclude_patterns: vec!["get*".to_string(), "set*".to_string(), "__*".to_string()],
            adaptive: AdaptiveConfig::default(),
        }
    }
}

/// One file-grouping rule for the navigation writer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupPattern {
    /// Filename-stem suffix, e.g. `Controller`
    pub suffix: String,
    /// Human label shown as the group heading
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingConfig {
    pub enabled: bool,
    /// Ordered: the first matching suffix wins and group order follows
    pub patterns: Vec<GroupPattern>,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        let patterns = [
            ("Controller", "HTTP request handling"),
            ("Service", "Business logic"),
            ("Model", "Data models"),
            ("Repository", "Data access"),
            ("Command", "CLI commands"),
            ("Event", "Event handling"),
            ("Job", "Background jobs"),
            ("Middleware", "Middleware"),
            ("Exception", "Error handling"),
            ("Helper", "Utilities"),
        ]
        .iter()
        .map(|(suffix, label)| GroupPattern {
            suffix: suffix.to_string(),
            label: label.to_string(),
        })
        .collect();

        Self {
            enabled: true,
            patterns,
        }
    }
}

/// File-size tier boundaries (upper bounds, exclusive)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveThresholds {
    pub tiny: usize,
    pub small: usize,
    pub medium: usize,
    pub large: usize,
    pub xlarge: usize,
    pub huge: usize,
}

impl Default for AdaptiveThresholds {
    fn default() -> Self {
        Self {
            tiny: 100,
            small: 200,
            medium: 500,
            large: 1000,
            xlarge: 2000,
            huge: 5000,
        }
    }
}

/// Symbol display limit per file-size tier
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveLimits {
    pub tiny: usize,
    pub small: usize,
    pub medium: usize,
    pub large: usize,
    pub xlarge: usize,
    pub huge: usize,
    pub mega: usize,
}

impl Default for AdaptiveLimits {
    fn default() -> Self {
        Self {
            tiny: 10,
            small: 15,
            medium: 30,
            large: 50,
            xlarge: 80,
            huge: 120,
            mega: 150,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveConfig {
    pub enabled: bool,
    pub thresholds: AdaptiveThresholds,
    pub limits: AdaptiveLimits,
    pub min_symbols: usize,
    pub max_symbols: usize,
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            thresholds: AdaptiveThresholds::default(),
            limits: AdaptiveLimits::default(),
            min_symbols: 5,
            max_symbols: 200,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IncrementalConfig {
    pub enabled: bool,
    /// Changes below this line count: skip the update entirely
    pub skip_lines: usize,
    /// Below this: update changed directories only
    pub current_only: usize,
    /// At or above this: suggest a full re-index
    pub suggest_full: usize,
}

impl Default for IncrementalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            skip_lines: 5,
            current_only: 50,
            suggest_full: 200,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutesConfig {
    pub enabled: bool,
    pub frameworks: Vec<String>,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            frameworks: vec!["thinkphp".to_string(), "spring".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.output_file, "README_AI.md");
        assert_eq!(config.languages.len(), 5);
        assert_eq!(config.indexing.max_readme_size, 50 * 1024);
        assert_eq!(config.incremental.skip_lines, 5);
        assert!(config.routes.frameworks.contains(&"spring".to_string()));
    }

    #[test]
    fn test_extension_set() {
        let mut config = Config::default();
        config.languages = vec!["python".to_string(), "typescript".to_string()];
        let extensions = config.extension_set();
        assert!(extensions.contains("py"));
        assert!(extensions.contains("ts"));
        assert!(extensions.contains("tsx"));
        assert!(!extensions.contains("php"));
    }

    #[test]
    fn test_default_template_parses() {
        let config: Config = toml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.parallel_workers, 0);
        assert_eq!(config.incremental.suggest_full, 200);
        assert!(config.include.is_empty());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str("languages = [\"java\"]\n").unwrap();
        assert_eq!(config.languages, vec!["java"]);
        assert_eq!(config.output_file, "README_AI.md");
        assert_eq!(config.indexing.symbols.max_per_file, 15);
    }

    #[test]
    fn test_load_missing_default_is_ok() {
        // explicit missing path is a setup error
        let err = Config::load(Some(Path::new("/nonexistent/.codeatlas.toml"))).unwrap_err();
        assert!(matches!(err, AtlasError::NoConfigFound { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_NAME);
        std::fs::write(&path, "parallel_workers = 4\n").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.parallel_workers, 4);
    }

    #[test]
    fn test_write_default_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_NAME);
        Config::write_default(&path).unwrap();
        assert!(Config::write_default(&path).is_err());

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.output_file, "README_AI.md");
    }
}
