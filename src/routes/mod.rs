//! Framework-specific route extraction
//!
//! A registry maps framework names to extractors. Each extractor decides
//! whether a directory's parse results are relevant (`can_extract`) before
//! producing routes. The registry is built once at startup and read-only
//! afterwards.

pub mod spring;
pub mod thinkphp;

use std::path::Path;

use serde::Serialize;

use crate::config::RoutesConfig;
use crate::schema::ParseResult;

/// One discovered route
#[derive(Debug, Clone, Serialize)]
pub struct RouteInfo {
    /// URL, optionally prefixed with the HTTP method (`GET /api/users`)
    pub url: String,
    pub controller: String,
    pub action: String,
    pub method_signature: String,
    pub line_number: usize,
    pub file_path: String,
    pub description: String,
}

/// Context handed to extractors: the directory under analysis and its
/// parse results
pub struct ExtractionContext<'a> {
    pub root_path: &'a Path,
    pub current_dir: &'a Path,
    pub parse_results: &'a [ParseResult],
}

/// A framework-specific route extractor
pub trait RouteExtractor: Send + Sync {
    /// Framework identifier in lowercase
    fn framework_name(&self) -> &'static str;

    /// Whether this extractor applies to the given directory
    fn can_extract(&self, context: &ExtractionContext) -> bool;

    fn extract_routes(&self, context: &ExtractionContext) -> Vec<RouteInfo>;
}

/// Registry of route extractors keyed by framework name
#[derive(Default)]
pub struct RouteRegistry {
    extractors: Vec<Box<dyn RouteExtractor>>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the configured framework extractors enabled
    pub fn from_config(config: &RoutesConfig) -> Self {
        let mut registry = Self::new();
        if !config.enabled {
            return registry;
        }
        for framework in &config.frameworks {
            match framework.as_str() {
                "thinkphp" => registry.register(Box::new(thinkphp::ThinkPhpRouteExtractor)),
                "spring" => registry.register(Box::new(spring::SpringRouteExtractor)),
                other => tracing::warn!(framework = %other, "unknown route framework, skipping"),
            }
        }
        registry
    }

    pub fn register(&mut self, extractor: Box<dyn RouteExtractor>) {
        // last registration for a name wins
        self.extractors
            .retain(|e| e.framework_name() != extractor.framework_name());
        self.extractors.push(extractor);
    }

    pub fn get(&self, framework: &str) -> Option<&dyn RouteExtractor> {
        self.extractors
            .iter()
            .find(|e| e.framework_name() == framework)
            .map(|e| e.as_ref())
    }

    pub fn frameworks(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> =
            self.extractors.iter().map(|e| e.framework_name()).collect();
        names.sort();
        names
    }

    /// Run every applicable extractor over one directory's parse results;
    /// returns (framework, routes) pairs for those that fired
    pub fn extract_all(
        &self,
        root: &Path,
        dir: &Path,
        results: &[ParseResult],
    ) -> Vec<(String, Vec<RouteInfo>)> {
        let context = ExtractionContext {
            root_path: root,
            current_dir: dir,
            parse_results: results,
        };
        let mut extracted = Vec::new();
        for extractor in &self.extractors {
            if extractor.can_extract(&context) {
                let routes = extractor.extract_routes(&context);
                if !routes.is_empty() {
                    extracted.push((extractor.framework_name().to_string(), routes));
                }
            }
        }
        extracted
    }
}

/// Trim a docstring to a table-friendly single description
pub(crate) fn table_description(docstring: &str) -> String {
    let description = docstring.trim().lines().next().unwrap_or("").trim();
    if description.len() > 60 {
        let mut cut = 60;
        while cut > 0 && !description.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}...", &description[..cut])
    } else {
        description.to_string()
    }
}

/// Parent directory name of a path, for module inference
pub(crate) fn parent_dir_name(dir: &Path) -> String {
    dir.parent()
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
