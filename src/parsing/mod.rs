//! Tree-sitter adapter: parse entry points and node helpers
//!
//! Grammar objects are process-wide constants; a `Parser` is configured per
//! parse, which keeps the hot path free of shared mutable state. All strings
//! are copied out of the source buffer before the tree is dropped.

use std::fs;
use std::path::Path;

use tree_sitter::{Node, Parser, Tree};

use crate::error::{AtlasError, Result};
use crate::lang::Lang;
use crate::parsers;
use crate::schema::ParseResult;

/// Extract the text of a node from the source buffer
pub fn node_text(node: &Node, source: &[u8]) -> String {
    match node.utf8_text(source) {
        Ok(text) => text.to_string(),
        Err(_) => String::from_utf8_lossy(&source[node.byte_range()]).into_owned(),
    }
}

/// Best-effort positional argument count for a call's argument node.
///
/// Counts children that are not the syntactic tokens `(`, `)`, `,`; a
/// zero-argument call counts as `Some(0)`. Callers return `None` only when
/// the call has no argument node at all.
pub fn count_arguments(args_node: &Node) -> Option<usize> {
    let mut count = 0;
    let mut cursor = args_node.walk();
    for child in args_node.children(&mut cursor) {
        if !matches!(child.kind(), "(" | ")" | ",") {
            count += 1;
        }
    }
    Some(count)
}

/// Number of lines in a source buffer (a trailing fragment without a final
/// newline still counts as a line)
pub fn count_lines(source: &[u8]) -> usize {
    let newlines = source.iter().filter(|&&b| b == b'\n').count();
    if !source.is_empty() && source.last() != Some(&b'\n') {
        newlines + 1
    } else {
        newlines
    }
}

/// Parse a source buffer with the grammar for `lang`
pub fn parse_source(source: &[u8], lang: Lang) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&lang.tree_sitter_language())
        .map_err(|e| AtlasError::ParseFailure {
            message: format!("failed to load {} grammar: {}", lang.name(), e),
        })?;

    parser.parse(source, None).ok_or_else(|| AtlasError::ParseFailure {
        message: format!("{} parser produced no tree", lang.name()),
    })
}

/// Parse one file, routing by extension.
///
/// Never returns an error: unreadable or unparsable files yield a
/// `ParseResult` with `error` populated and empty fact lists, preserving
/// `file_lines` where it could be computed.
pub fn parse_file(path: &Path) -> ParseResult {
    match Lang::from_path(path) {
        Ok(lang) => parse_file_with_lang(path, lang),
        Err(e) => ParseResult::with_error(path, "unknown", format!("unsupported_language: {}", e), 0),
    }
}

/// Parse one file with an explicit language
pub fn parse_file_with_lang(path: &Path, lang: Lang) -> ParseResult {
    let source = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            return ParseResult::with_error(path, lang.name(), format!("io_error: {}", e), 0);
        }
    };

    parse_bytes(path, lang, &source)
}

/// Parse an in-memory buffer as if it were the file at `path`
pub fn parse_bytes(path: &Path, lang: Lang, source: &[u8]) -> ParseResult {
    let file_lines = count_lines(source);

    let tree = match parse_source(source, lang) {
        Ok(tree) => tree,
        Err(e) => {
            return ParseResult::with_error(path, lang.name(), format!("syntax_error: {}", e), file_lines);
        }
    };

    if tree.root_node().has_error() {
        return ParseResult::with_error(
            path,
            lang.name(),
            "syntax_error: source contains syntax errors".to_string(),
            file_lines,
        );
    }

    let mut result = parsers::extract(path, lang, &tree, source);
    result.file_lines = file_lines;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_count_lines() {
        assert_eq!(count_lines(b""), 0);
        assert_eq!(count_lines(b"one line"), 1);
        assert_eq!(count_lines(b"a\nb\n"), 2);
        assert_eq!(count_lines(b"a\nb\nc"), 3);
    }

    #[test]
    fn test_count_arguments_python() {
        let source = b"f(1, 2, 3)\ng()\n";
        let tree = parse_source(source, Lang::Python).unwrap();
        let root = tree.root_node();

        let mut counts = Vec::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if node.kind() == "call" {
                let args = node.child_by_field_name("arguments").unwrap();
                counts.push(count_arguments(&args));
            }
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                stack.push(child);
            }
        }
        counts.sort();
        assert_eq!(counts, vec![Some(0), Some(3)]);
    }

    #[test]
    fn test_parse_file_missing() {
        let result = parse_file(&PathBuf::from("/nonexistent/deeply/missing.py"));
        let error = result.error.expect("missing file must set error");
        assert!(error.starts_with("io_error:"), "got: {}", error);
        assert_eq!(result.file_lines, 0);
        assert!(result.symbols.is_empty());
    }

    #[test]
    fn test_parse_file_unsupported_extension() {
        let result = parse_file(&PathBuf::from("notes.txt"));
        let error = result.error.expect("unsupported file must set error");
        assert!(error.starts_with("unsupported_language:"), "got: {}", error);
    }

    #[test]
    fn test_syntax_error_keeps_file_lines() {
        let source = b"def broken(:\n    pass\n";
        let result = parse_bytes(&PathBuf::from("broken.py"), Lang::Python, source);
        let error = result.error.expect("syntax error must set error");
        assert!(error.starts_with("syntax_error:"), "got: {}", error);
        assert_eq!(result.file_lines, 2);
        assert!(result.symbols.is_empty());
    }

    #[test]
    fn test_parse_bytes_clean_source() {
        let source = b"def hello():\n    pass\n";
        let result = parse_bytes(&PathBuf::from("hello.py"), Lang::Python, source);
        assert!(result.error.is_none());
        assert_eq!(result.file_lines, 2);
        assert_eq!(result.language, "python");
    }
}
