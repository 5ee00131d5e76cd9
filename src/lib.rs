//! codeatlas: multi-language code indexer with AI-ready output
//!
//! Ingests a source repository and produces per-directory Markdown
//! summaries, a project-wide symbol index, and machine-readable JSON of
//! every parsed file's symbols, imports, call edges, inheritance edges, and
//! framework routes. Parsing is tree-sitter based and covers Python, PHP,
//! Java, TypeScript/TSX, and JavaScript/JSX.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use codeatlas::parsing::parse_file;
//!
//! let result = parse_file(Path::new("src/models.py"));
//! for symbol in &result.symbols {
//!     println!("{} ({})", symbol.name, symbol.kind.as_str());
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod debt;
pub mod enhance;
pub mod error;
pub mod incremental;
pub mod indexing;
pub mod lang;
pub mod parsers;
pub mod parsing;
pub mod routes;
pub mod scanner;
pub mod schema;
pub mod scorer;
pub mod selector;
pub mod symbol_index;
pub mod tree;
pub mod writer;

// Re-export commonly used types
pub use config::Config;
pub use error::{AtlasError, ErrorCode, Result};
pub use lang::Lang;
pub use parsing::{parse_bytes, parse_file, parse_file_with_lang};
pub use schema::{
    Annotation, Call, CallType, Import, Inheritance, JsonReport, ParseResult, ScanSummary, Symbol,
    SymbolKind,
};

pub use debt::{DebtAnalysis, DebtIssue, DebtReport, DebtSeverity, TechDebtDetector};
pub use incremental::{analyze_changes, ChangeAnalysis, UpdateLevel};
pub use indexing::{index_repository, parse_files_parallel, IndexOutcome};
pub use routes::{RouteInfo, RouteRegistry};
pub use scanner::{find_all_directories, scan_directory, ScanResult};
pub use scorer::SymbolScorer;
pub use selector::AdaptiveSelector;
pub use symbol_index::GlobalSymbolIndex;
pub use tree::{DirectoryTree, Level};
pub use writer::{MarkdownWriter, WriteResult};
