//! Data model for parsed source files
//!
//! These structs form the stable JSON contract emitted for per-file and
//! per-scan queries. Every language parser produces the same shapes; only
//! naming conventions (separators, constructor forms) differ per language.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;

/// Kind of a named code entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Class,
    Interface,
    Enum,
    Record,
    TypeAlias,
    Namespace,
    Function,
    Method,
    Constructor,
    Field,
    Property,
    Variable,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Enum => "enum",
            Self::Record => "record",
            Self::TypeAlias => "type_alias",
            Self::Namespace => "namespace",
            Self::Function => "function",
            Self::Method => "method",
            Self::Constructor => "constructor",
            Self::Field => "field",
            Self::Property => "property",
            Self::Variable => "variable",
        }
    }
}

/// An annotation attached to a symbol (Java `@Foo(...)`; empty elsewhere)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub name: String,
    /// Key/value arguments; a bare `@Foo("x")` is stored under key `value`
    #[serde(default)]
    pub arguments: BTreeMap<String, String>,
}

/// A named code entity extracted from one file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Symbol {
    /// Qualified name: members are prefixed with their owner class using the
    /// language separator (`Owner.method` / `Owner::method`)
    pub name: String,
    pub kind: SymbolKind,
    /// Reconstructed source-like declaration text
    pub signature: String,
    /// Cleaned leading documentation comment
    pub docstring: String,
    /// 1-based, inclusive
    pub line_start: usize,
    pub line_end: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

impl Symbol {
    /// Unqualified trailing segment of the name (after `::` or `.`)
    pub fn short_name(&self) -> &str {
        let after_scope = self.name.rsplit("::").next().unwrap_or(&self.name);
        after_scope.rsplit('.').next().unwrap_or(after_scope)
    }
}

/// An import statement
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Import {
    /// Fully qualified module path as written (relative dots preserved)
    pub module: String,
    /// Symbols brought into scope; empty for whole-module and side-effect
    /// imports, `["*"]` for wildcard
    #[serde(default)]
    pub names: Vec<String>,
    /// True for `from X import Y` and equivalents
    pub is_from: bool,
    /// Optional local binding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

/// One inheritance edge (extends or implements)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inheritance {
    /// Fully qualified child type
    pub child: String,
    /// Fully qualified parent type, generics stripped
    pub parent: String,
}

/// Discriminates how a call site was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallType {
    Function,
    Method,
    StaticMethod,
    Constructor,
    Dynamic,
}

impl CallType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Method => "method",
            Self::StaticMethod => "static_method",
            Self::Constructor => "constructor",
            Self::Dynamic => "dynamic",
        }
    }
}

/// One call edge within a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    /// Fully qualified containing symbol, or `<module>` for top-level
    pub caller: String,
    /// Resolved callee; `None` only for `dynamic` calls
    pub callee: Option<String>,
    pub line_number: usize,
    pub call_type: CallType,
    /// Best-effort positional argument count
    pub arguments_count: Option<usize>,
}

/// Caller name used for top-level code
pub const MODULE_CALLER: &str = "<module>";

/// Result of parsing one source file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseResult {
    #[serde(rename = "file_path")]
    pub path: String,
    pub language: String,
    /// Declared namespace/package; empty unless explicitly declared
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub module_docstring: String,
    pub file_lines: usize,
    #[serde(default)]
    pub symbols: Vec<Symbol>,
    #[serde(default)]
    pub imports: Vec<Import>,
    #[serde(default)]
    pub inheritances: Vec<Inheritance>,
    #[serde(default)]
    pub calls: Vec<Call>,
    /// Non-null disables downstream consumers but preserves partial data
    pub error: Option<String>,
}

impl ParseResult {
    /// Empty result for a file that could not be processed
    pub fn with_error(path: &Path, language: &str, error: String, file_lines: usize) -> Self {
        Self {
            path: path.display().to_string(),
            language: language.to_string(),
            namespace: String::new(),
            module_docstring: String::new(),
            file_lines,
            symbols: Vec::new(),
            imports: Vec::new(),
            inheritances: Vec::new(),
            calls: Vec::new(),
            error: Some(error),
        }
    }

    /// Sort all fact lists by their stable keys so re-serialization yields a
    /// canonical form
    pub fn canonicalize(&mut self) {
        self.symbols
            .sort_by(|a, b| (a.line_start, &a.name).cmp(&(b.line_start, &b.name)));
        self.imports
            .sort_by(|a, b| (&a.module, &a.names, &a.alias).cmp(&(&b.module, &b.names, &b.alias)));
        self.inheritances
            .sort_by(|a, b| (&a.child, &a.parent).cmp(&(&b.child, &b.parent)));
        self.calls.sort_by(|a, b| {
            (a.line_number, &a.caller, &a.callee).cmp(&(b.line_number, &b.caller, &b.callee))
        });
    }

    /// File name component of the path
    pub fn file_name(&self) -> &str {
        Path::new(&self.path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.path)
    }

    /// File stem (name without extension)
    pub fn file_stem(&self) -> &str {
        Path::new(&self.path)
            .file_stem()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.path)
    }
}

/// Aggregate counters for a scan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanSummary {
    pub total_files: usize,
    pub total_symbols: usize,
    pub total_imports: usize,
    pub errors: usize,
}

impl ScanSummary {
    pub fn from_results(results: &[ParseResult]) -> Self {
        Self {
            total_files: results.len(),
            total_symbols: results.iter().map(|r| r.symbols.len()).sum(),
            total_imports: results.iter().map(|r| r.imports.len()).sum(),
            errors: results.iter().filter(|r| r.error.is_some()).count(),
        }
    }
}

/// Structured error payload for the JSON envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Top-level JSON document for per-file and per-scan queries
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonReport {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
    pub results: Vec<ParseResult>,
    pub summary: ScanSummary,
}

impl JsonReport {
    pub fn success(results: Vec<ParseResult>) -> Self {
        let summary = ScanSummary::from_results(&results);
        Self {
            success: true,
            error: None,
            results,
            summary,
        }
    }

    pub fn failure(error: ErrorInfo, results: Vec<ParseResult>) -> Self {
        let summary = ScanSummary::from_results(&results);
        Self {
            success: false,
            error: Some(error),
            results,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn symbol(name: &str, line: usize) -> Symbol {
        Symbol {
            name: name.to_string(),
            kind: SymbolKind::Function,
            signature: format!("def {}()", name),
            docstring: String::new(),
            line_start: line,
            line_end: line + 1,
            annotations: Vec::new(),
        }
    }

    #[test]
    fn test_kind_and_call_type_str() {
        assert_eq!(SymbolKind::Class.as_str(), "class");
        assert_eq!(SymbolKind::TypeAlias.as_str(), "type_alias");
        assert_eq!(CallType::StaticMethod.as_str(), "static_method");
        assert_eq!(CallType::Dynamic.as_str(), "dynamic");
    }

    #[test]
    fn test_symbol_short_name() {
        let s = symbol("Owner.method", 1);
        assert_eq!(s.short_name(), "method");

        let mut s = symbol("App\\User::save", 1);
        s.name = "User::save".to_string();
        assert_eq!(s.short_name(), "save");

        let s = symbol("plain", 1);
        assert_eq!(s.short_name(), "plain");
    }

    #[test]
    fn test_canonicalize_is_stable() {
        let mut result = ParseResult::with_error(&PathBuf::from("a.py"), "python", String::new(), 10);
        result.error = None;
        result.symbols = vec![symbol("b", 5), symbol("a", 5), symbol("z", 1)];
        result.canonicalize();
        let names: Vec<&str> = result.symbols.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["z", "a", "b"]);

        let first = serde_json::to_string(&result).unwrap();
        result.canonicalize();
        let second = serde_json::to_string(&result).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_json_contract_field_names() {
        let result = ParseResult::with_error(&PathBuf::from("x.java"), "java", "boom".into(), 3);
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("file_path").is_some());
        assert_eq!(json["language"], "java");
        assert_eq!(json["file_lines"], 3);
        assert_eq!(json["error"], "boom");
    }

    #[test]
    fn test_summary_counts() {
        let mut ok = ParseResult::with_error(&PathBuf::from("a.py"), "python", String::new(), 1);
        ok.error = None;
        ok.symbols.push(symbol("f", 1));
        ok.imports.push(Import {
            module: "os".into(),
            ..Default::default()
        });
        let bad = ParseResult::with_error(&PathBuf::from("b.py"), "python", "io error".into(), 0);

        let summary = ScanSummary::from_results(&[ok, bad]);
        assert_eq!(summary.total_files, 2);
        assert_eq!(summary.total_symbols, 1);
        assert_eq!(summary.total_imports, 1);
        assert_eq!(summary.errors, 1);
    }

    #[test]
    fn test_report_envelope() {
        let report = JsonReport::failure(
            ErrorInfo {
                code: ErrorCode::DirectoryNotFound,
                message: "missing".into(),
                detail: None,
            },
            Vec::new(),
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "DIRECTORY_NOT_FOUND");
        assert_eq!(json["summary"]["total_files"], 0);
    }
}
