//! Spring Framework route extraction
//!
//! Annotation-driven: `@RestController`/`@Controller` marks a controller
//! class, a class-level `@RequestMapping` contributes a path prefix, and
//! `@GetMapping`/`@PostMapping`/`@PutMapping`/`@DeleteMapping`/
//! `@PatchMapping` methods become routes keyed by HTTP method.

use std::collections::BTreeMap;

use crate::schema::{ParseResult, Symbol, SymbolKind};

use super::{table_description, ExtractionContext, RouteExtractor, RouteInfo};

pub struct SpringRouteExtractor;

impl RouteExtractor for SpringRouteExtractor {
    fn framework_name(&self) -> &'static str {
        "spring"
    }

    /// Applies when any parsed class carries a controller annotation
    fn can_extract(&self, context: &ExtractionContext) -> bool {
        context
            .parse_results
            .iter()
            .filter(|r| r.error.is_none())
            .any(|r| find_controller(r).is_some())
    }

    fn extract_routes(&self, context: &ExtractionContext) -> Vec<RouteInfo> {
        let mut routes = Vec::new();
        for result in context.parse_results {
            if result.error.is_some() {
                continue;
            }
            routes.extend(extract_from_result(result));
        }
        routes
    }
}

fn is_controller_annotation(name: &str) -> bool {
    matches!(name, "RestController" | "Controller")
}

fn find_controller(result: &ParseResult) -> Option<&Symbol> {
    result.symbols.iter().find(|s| {
        s.kind == SymbolKind::Class
            && s.annotations
                .iter()
                .any(|a| is_controller_annotation(&a.name))
    })
}

fn extract_from_result(result: &ParseResult) -> Vec<RouteInfo> {
    let Some(controller) = find_controller(result) else {
        return Vec::new();
    };
    let controller_class = controller.name.clone();

    let prefix = controller
        .annotations
        .iter()
        .find(|a| a.name == "RequestMapping")
        .map(|a| annotation_path(&a.arguments))
        .unwrap_or_default();

    let mut routes = Vec::new();
    for symbol in &result.symbols {
        if symbol.kind != SymbolKind::Method {
            continue;
        }
        if !symbol.name.starts_with(&format!("{}.", controller_class)) {
            continue;
        }

        let Some((http_method, mapping)) = symbol.annotations.iter().find_map(|a| {
            http_method_for(&a.name).map(|m| (m, a))
        }) else {
            continue;
        };

        let method_path = annotation_path(&mapping.arguments);
        let full_path = join_paths(&prefix, &method_path);

        routes.push(RouteInfo {
            url: format!("{} {}", http_method, full_path),
            controller: controller_class.clone(),
            action: symbol.short_name().to_string(),
            method_signature: symbol.signature.clone(),
            line_number: symbol.line_start,
            file_path: result.file_name().to_string(),
            description: table_description(&symbol.docstring),
        });
    }
    routes
}

fn http_method_for(annotation: &str) -> Option<&'static str> {
    match annotation {
        "GetMapping" => Some("GET"),
        "PostMapping" => Some("POST"),
        "PutMapping" => Some("PUT"),
        "DeleteMapping" => Some("DELETE"),
        "PatchMapping" => Some("PATCH"),
        _ => None,
    }
}

/// Path from annotation arguments: `value`/`path` keys accepted, array
/// values (`{"/a", "/b"}`) yield their first element
fn annotation_path(arguments: &BTreeMap<String, String>) -> String {
    for key in ["value", "path"] {
        if let Some(raw) = arguments.get(key) {
            return unwrap_path_value(raw);
        }
    }
    String::new()
}

fn unwrap_path_value(raw: &str) -> String {
    let raw = raw.trim();
    if raw.starts_with('{') {
        // array initializer: take the first quoted element
        if let Some(start) = raw.find('"') {
            if let Some(len) = raw[start + 1..].find('"') {
                return raw[start + 1..start + 1 + len].to_string();
            }
        }
        return String::new();
    }
    raw.trim_matches('"').to_string()
}

fn join_paths(prefix: &str, path: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    let path = if path.is_empty() {
        String::new()
    } else if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    };

    match (prefix.is_empty(), path.is_empty()) {
        (true, true) => "/".to_string(),
        (true, false) => path,
        (false, true) => prefix.to_string(),
        (false, false) => format!("{}{}", prefix, path),
    }
}
