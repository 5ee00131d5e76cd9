//! ThinkPHP route extraction
//!
//! Convention-based routing: controllers live in
//! `Application/{Module}/Controller/`, and every public method of a
//! `*Controller` class maps to `/{module}/{controller}/{action}`.

use crate::schema::SymbolKind;

use super::{parent_dir_name, table_description, ExtractionContext, RouteExtractor, RouteInfo};

pub struct ThinkPhpRouteExtractor;

impl RouteExtractor for ThinkPhpRouteExtractor {
    fn framework_name(&self) -> &'static str {
        "thinkphp"
    }

    /// Routes are extracted only from Controller directories
    fn can_extract(&self, context: &ExtractionContext) -> bool {
        context
            .current_dir
            .file_name()
            .map(|n| n == "Controller")
            .unwrap_or(false)
    }

    fn extract_routes(&self, context: &ExtractionContext) -> Vec<RouteInfo> {
        let module_name = parent_dir_name(context.current_dir).to_lowercase();
        let mut routes = Vec::new();

        for result in context.parse_results {
            if result.error.is_some() {
                continue;
            }

            let Some(controller_class) = result
                .symbols
                .iter()
                .find(|s| s.kind == SymbolKind::Class && s.name.ends_with("Controller"))
                .map(|s| s.name.clone())
            else {
                continue;
            };
            let controller_name = controller_class
                .trim_end_matches("Controller")
                .to_lowercase();

            for symbol in &result.symbols {
                if symbol.kind != SymbolKind::Method {
                    continue;
                }
                // only public methods are actions
                if !symbol.signature.to_lowercase().contains("public") {
                    continue;
                }
                // magic and internal methods are not routable
                let action = symbol.short_name();
                if action.starts_with('_') {
                    continue;
                }

                routes.push(RouteInfo {
                    url: format!("/{}/{}/{}", module_name, controller_name, action),
                    controller: controller_class.clone(),
                    action: action.to_string(),
                    method_signature: symbol.signature.clone(),
                    line_number: symbol.line_start,
                    file_path: result.file_name().to_string(),
                    description: table_description(&symbol.docstring),
                });
            }
        }

        routes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::Lang;
    use crate::parsing::parse_bytes;
    use std::path::{Path, PathBuf};

    fn controller_result() -> crate::schema::ParseResult {
        let source = r#"<?php
namespace Admin\Controller;

class UserController {
    /** List all users. */
    public function index() {}

    public function detail($id) {}

    protected function formatRow($row) {}

    public function _internal() {}

    public function __call($name, $args) {}
}
"#;
        parse_bytes(
            &PathBuf::from("Application/Admin/Controller/UserController.php"),
            Lang::Php,
            source.as_bytes(),
        )
    }

    #[test]
    fn test_fires_only_in_controller_directories() {
        let extractor = ThinkPhpRouteExtractor;
        let results = [controller_result()];

        let controller_dir = Path::new("Application/Admin/Controller");
        let context = ExtractionContext {
            root_path: Path::new("."),
            current_dir: controller_dir,
            parse_results: &results,
        };
        assert!(extractor.can_extract(&context));

        let model_dir = Path::new("Application/Admin/Model");
        let context = ExtractionContext {
            root_path: Path::new("."),
            current_dir: model_dir,
            parse_results: &results,
        };
        assert!(!extractor.can_extract(&context));
    }

    #[test]
    fn test_route_urls() {
        let extractor = ThinkPhpRouteExtractor;
        let results = [controller_result()];
        let context = ExtractionContext {
            root_path: Path::new("."),
            current_dir: Path::new("Application/Admin/Controller"),
            parse_results: &results,
        };

        let routes = extractor.extract_routes(&context);
        let urls: Vec<&str> = routes.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["/admin/user/index", "/admin/user/detail"]);
        assert_eq!(routes[0].controller, "UserController");
        assert_eq!(routes[0].description, "List all users.");
        assert!(routes[0].line_number > 0);
    }

    #[test]
    fn test_error_results_skipped() {
        let extractor = ThinkPhpRouteExtractor;
        let bad = crate::schema::ParseResult::with_error(
            &PathBuf::from("broken.php"),
            "php",
            "syntax_error".to_string(),
            10,
        );
        let context = ExtractionContext {
            root_path: Path::new("."),
            current_dir: Path::new("Controller"),
            parse_results: std::slice::from_ref(&bad),
        };
        assert!(extractor.extract_routes(&context).is_empty());
    }
}
