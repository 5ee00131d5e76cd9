//! Language-specific fact extractors
//!
//! Each module walks one file's CST and produces the four fact kinds
//! (symbols, imports, inheritances, calls) with language-aware name
//! resolution. Extraction order within a file lets calls and inheritances
//! reuse earlier results.

pub mod java;
pub mod php;
pub mod python;
pub mod typescript;

use std::path::Path;

use tree_sitter::Tree;

use crate::lang::Lang;
use crate::schema::ParseResult;

/// Dispatch extraction to the language module for `lang`
pub fn extract(path: &Path, lang: Lang, tree: &Tree, source: &[u8]) -> ParseResult {
    match lang {
        Lang::Python => python::extract(path, tree, source),
        Lang::Php => php::extract(path, tree, source),
        Lang::Java => java::extract(path, tree, source),
        Lang::TypeScript | Lang::Tsx | Lang::JavaScript | Lang::Jsx => {
            typescript::extract(path, lang, tree, source)
        }
    }
}

/// Strip generic type parameters: `List<String>` → `List`, `List[str]` → `List`
pub(crate) fn strip_generics(type_name: &str) -> String {
    let end = type_name
        .find('<')
        .or_else(|| type_name.find('['))
        .unwrap_or(type_name.len());
    type_name[..end].trim().to_string()
}

/// True when the first character is uppercase
pub(crate) fn starts_uppercase(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_generics() {
        assert_eq!(strip_generics("List<String>"), "List");
        assert_eq!(strip_generics("Map<String, List<Integer>>"), "Map");
        assert_eq!(strip_generics("List[str]"), "List");
        assert_eq!(strip_generics("Plain"), "Plain");
    }

    #[test]
    fn test_starts_uppercase() {
        assert!(starts_uppercase("Foo"));
        assert!(!starts_uppercase("foo"));
        assert!(!starts_uppercase(""));
        assert!(!starts_uppercase("_Foo"));
    }
}
