//! Language detection and tree-sitter grammar loading

use std::path::Path;
use tree_sitter::Language;

use crate::error::{AtlasError, Result};

/// Supported programming languages / grammar variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lang {
    Python,
    Php,
    Java,
    TypeScript,
    Tsx,
    JavaScript,
    /// JSX files parsed with the plain JavaScript grammar (it accepts JSX)
    Jsx,
}

impl Lang {
    /// Detect language from file path extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| AtlasError::UnsupportedLanguage {
                extension: "none".to_string(),
            })?;

        Self::from_extension(ext)
    }

    /// Detect language from file extension string
    pub fn from_extension(ext: &str) -> Result<Self> {
        match ext.to_lowercase().as_str() {
            "py" | "pyi" => Ok(Self::Python),
            "php" | "phtml" => Ok(Self::Php),
            "java" => Ok(Self::Java),
            "ts" | "mts" | "cts" => Ok(Self::TypeScript),
            "tsx" => Ok(Self::Tsx),
            "js" | "mjs" | "cjs" => Ok(Self::JavaScript),
            "jsx" => Ok(Self::Jsx),
            _ => Err(AtlasError::UnsupportedLanguage {
                extension: ext.to_string(),
            }),
        }
    }

    /// Canonical name of the language as reported in ParseResult JSON
    pub fn name(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Php => "php",
            Self::Java => "java",
            Self::TypeScript => "typescript",
            Self::Tsx => "tsx",
            Self::JavaScript => "javascript",
            Self::Jsx => "jsx",
        }
    }

    /// Configuration key this grammar variant belongs to
    /// (`tsx` counts as typescript, `jsx` as javascript)
    pub fn config_key(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Php => "php",
            Self::Java => "java",
            Self::TypeScript | Self::Tsx => "typescript",
            Self::JavaScript | Self::Jsx => "javascript",
        }
    }

    /// Get the tree-sitter Language for parsing
    pub fn tree_sitter_language(&self) -> Language {
        match self {
            Self::Python => tree_sitter_python::LANGUAGE.into(),
            Self::Php => tree_sitter_php::LANGUAGE_PHP.into(),
            Self::Java => tree_sitter_java::LANGUAGE.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Self::JavaScript | Self::Jsx => tree_sitter_javascript::LANGUAGE.into(),
        }
    }

    /// File extensions associated with a configuration language key
    pub fn extensions_for_key(key: &str) -> &'static [&'static str] {
        match key {
            "python" => &["py", "pyi"],
            "php" => &["php", "phtml"],
            "java" => &["java"],
            "typescript" => &["ts", "mts", "cts", "tsx"],
            "javascript" => &["js", "mjs", "cjs", "jsx"],
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_language_detection() {
        assert_eq!(Lang::from_extension("py").unwrap(), Lang::Python);
        assert_eq!(Lang::from_extension("php").unwrap(), Lang::Php);
        assert_eq!(Lang::from_extension("phtml").unwrap(), Lang::Php);
        assert_eq!(Lang::from_extension("java").unwrap(), Lang::Java);
        assert_eq!(Lang::from_extension("ts").unwrap(), Lang::TypeScript);
        assert_eq!(Lang::from_extension("tsx").unwrap(), Lang::Tsx);
        assert_eq!(Lang::from_extension("js").unwrap(), Lang::JavaScript);
        assert_eq!(Lang::from_extension("jsx").unwrap(), Lang::Jsx);
    }

    #[test]
    fn test_language_from_path() {
        let path = PathBuf::from("src/components/App.tsx");
        assert_eq!(Lang::from_path(&path).unwrap(), Lang::Tsx);

        let path = PathBuf::from("models.py");
        assert_eq!(Lang::from_path(&path).unwrap(), Lang::Python);
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(Lang::from_extension("rb").is_err());
        assert!(Lang::from_path(&PathBuf::from("Makefile")).is_err());
    }

    #[test]
    fn test_config_keys() {
        assert_eq!(Lang::Tsx.config_key(), "typescript");
        assert_eq!(Lang::Jsx.config_key(), "javascript");
        assert_eq!(Lang::Php.config_key(), "php");
    }

    #[test]
    fn test_extensions_for_key() {
        assert!(Lang::extensions_for_key("typescript").contains(&"tsx"));
        assert!(Lang::extensions_for_key("python").contains(&"py"));
        assert!(Lang::extensions_for_key("cobol").is_empty());
    }
}
