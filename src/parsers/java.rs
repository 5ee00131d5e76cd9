//! Java fact extraction
//!
//! Resolves short type names with the precedence explicit import >
//! `java.lang.*` well-known classes > same-package qualification. Static
//! imports (including wildcards) seed a separate map consulted for bare
//! function-like calls. Generic parameters are stripped from parent types
//! and constructor callees.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use tree_sitter::{Node, Tree};

use crate::parsing::node_text;
use crate::schema::{
    Annotation, Call, CallType, Import, Inheritance, ParseResult, Symbol, SymbolKind,
};

use super::{starts_uppercase, strip_generics};

/// Classes implicitly importable from java.lang
const JAVA_LANG_CLASSES: [&str; 23] = [
    "Object",
    "String",
    "Exception",
    "RuntimeException",
    "Throwable",
    "Error",
    "Class",
    "Number",
    "Integer",
    "Long",
    "Double",
    "Float",
    "Boolean",
    "Character",
    "Byte",
    "Short",
    "Void",
    "Math",
    "System",
    "Thread",
    "Runnable",
    "StringBuilder",
    "StringBuffer",
];

pub fn extract(path: &Path, tree: &Tree, source: &[u8]) -> ParseResult {
    let root = tree.root_node();

    let namespace = extract_package(&root, source);
    let import_map = build_import_map(&root, source);

    let mut symbols = Vec::new();
    let mut inheritances = Vec::new();
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        match child.kind() {
            "class_declaration" => parse_class(
                &child,
                source,
                "",
                &namespace,
                &import_map,
                &mut symbols,
                &mut inheritances,
            ),
            "interface_declaration" => parse_interface(
                &child,
                source,
                &namespace,
                &import_map,
                &mut symbols,
                &mut inheritances,
            ),
            "enum_declaration" => parse_enum(&child, source, &mut symbols),
            "record_declaration" => parse_record(&child, source, &mut symbols),
            _ => {}
        }
    }

    let imports = extract_imports(&root, source);
    let calls = extract_calls(&root, source, &namespace, &import_map, &inheritances);

    ParseResult {
        path: path.display().to_string(),
        language: "java".to_string(),
        namespace,
        module_docstring: extract_module_docstring(&root, source),
        file_lines: 0,
        symbols,
        imports,
        inheritances,
        calls,
        error: None,
    }
}

fn extract_package(root: &Node, source: &[u8]) -> String {
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        if child.kind() == "package_declaration" {
            let mut inner = child.walk();
            for part in child.children(&mut inner) {
                if matches!(part.kind(), "scoped_identifier" | "identifier") {
                    return node_text(&part, source);
                }
            }
        }
    }
    String::new()
}

/// Short class name → fully qualified name, from import declarations
fn build_import_map(root: &Node, source: &[u8]) -> HashMap<String, String> {
    let mut map = HashMap::new();
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        if child.kind() != "import_declaration" {
            continue;
        }
        let mut inner = child.walk();
        for part in child.children(&mut inner) {
            match part.kind() {
                "scoped_identifier" => {
                    let full = node_text(&part, source);
                    let short = full.rsplit('.').next().unwrap_or(&full).to_string();
                    map.insert(short, full);
                }
                "identifier" => {
                    let name = node_text(&part, source);
                    map.insert(name.clone(), name);
                }
                _ => {}
            }
        }
    }
    map
}

fn resolve_type(short_name: &str, namespace: &str, import_map: &HashMap<String, String>) -> String {
    if short_name.contains('.') {
        return short_name.to_string();
    }
    if JAVA_LANG_CLASSES.contains(&short_name) {
        return format!("java.lang.{}", short_name);
    }
    if let Some(full) = import_map.get(short_name) {
        return full.clone();
    }
    if !namespace.is_empty() {
        return format!("{}.{}", namespace, short_name);
    }
    short_name.to_string()
}

// ============================================================================
// Imports
// ============================================================================

fn extract_imports(root: &Node, source: &[u8]) -> Vec<Import> {
    let mut imports = Vec::new();
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        if child.kind() != "import_declaration" {
            continue;
        }
        let mut module = String::new();
        let mut is_static = false;
        let mut is_wildcard = false;

        let mut inner = child.walk();
        for part in child.children(&mut inner) {
            match part.kind() {
                "scoped_identifier" | "identifier" => module = node_text(&part, source),
                "asterisk" => is_wildcard = true,
                "static" => is_static = true,
                _ => {}
            }
        }

        if !module.is_empty() {
            if is_wildcard {
                module.push_str(".*");
            }
            imports.push(Import {
                module,
                names: Vec::new(),
                is_from: is_static,
                alias: None,
            });
        }
    }
    imports
}

// ============================================================================
// Modifiers, annotations, docs
// ============================================================================

fn extract_modifiers(node: &Node, source: &[u8]) -> Vec<String> {
    let mut modifiers = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "modifiers" {
            let mut inner = child.walk();
            for modifier in child.children(&mut inner) {
                if !matches!(modifier.kind(), "marker_annotation" | "annotation") {
                    modifiers.push(node_text(&modifier, source));
                }
            }
        }
    }
    modifiers
}

fn extract_annotations(node: &Node, source: &[u8]) -> Vec<Annotation> {
    let mut annotations = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() != "modifiers" {
            continue;
        }
        let mut inner = child.walk();
        for modifier in child.children(&mut inner) {
            match modifier.kind() {
                "marker_annotation" => {
                    if let Some(name) = annotation_name(&modifier, source) {
                        annotations.push(Annotation {
                            name,
                            arguments: BTreeMap::new(),
                        });
                    }
                }
                "annotation" => {
                    let Some(name) = annotation_name(&modifier, source) else {
                        continue;
                    };
                    let mut arguments = BTreeMap::new();
                    let mut parts = modifier.walk();
                    for part in modifier.children(&mut parts) {
                        if part.kind() == "annotation_argument_list" {
                            arguments = parse_annotation_arguments(&part, source);
                        }
                    }
                    annotations.push(Annotation { name, arguments });
                }
                _ => {}
            }
        }
    }
    annotations
}

fn annotation_name(node: &Node, source: &[u8]) -> Option<String> {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if matches!(child.kind(), "identifier" | "scoped_identifier") {
            return Some(node_text(&child, source));
        }
    }
    None
}

fn parse_annotation_arguments(node: &Node, source: &[u8]) -> BTreeMap<String, String> {
    let mut arguments = BTreeMap::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "element_value_pair" => {
                let mut key = String::new();
                let mut value = String::new();
                let mut parts = child.walk();
                for part in child.children(&mut parts) {
                    match part.kind() {
                        "identifier" => key = node_text(&part, source),
                        "string_literal" => {
                            value = node_text(&part, source).trim_matches('"').to_string()
                        }
                        "decimal_integer_literal" | "true" | "false"
                        | "element_value_array_initializer" => value = node_text(&part, source),
                        _ => {}
                    }
                }
                if !key.is_empty() && !value.is_empty() {
                    arguments.insert(key, value);
                }
            }
            // single unnamed argument: @RequestMapping("/api")
            "string_literal" => {
                arguments.insert(
                    "value".to_string(),
                    node_text(&child, source).trim_matches('"').to_string(),
                );
            }
            "decimal_integer_literal" => {
                arguments.insert("value".to_string(), node_text(&child, source));
            }
            "element_value_array_initializer" => {
                arguments.insert("value".to_string(), node_text(&child, source));
            }
            _ => {}
        }
    }
    arguments
}

fn extract_javadoc(node: &Node, source: &[u8]) -> String {
    if let Some(prev) = node.prev_sibling() {
        if prev.kind() == "block_comment" {
            let text = node_text(&prev, source);
            if text.starts_with("/**") {
                return clean_javadoc(&text);
            }
        }
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "block_comment" {
            let text = node_text(&child, source);
            if text.starts_with("/**") {
                return clean_javadoc(&text);
            }
        }
    }
    String::new()
}

fn clean_javadoc(text: &str) -> String {
    text.trim_start_matches("/**")
        .trim_end_matches("*/")
        .trim()
        .to_string()
}

fn extract_module_docstring(root: &Node, source: &[u8]) -> String {
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        match child.kind() {
            "block_comment" => {
                let text = node_text(&child, source);
                if text.starts_with("/**") {
                    return clean_javadoc(&text);
                }
            }
            "class_declaration" | "interface_declaration" | "enum_declaration"
            | "record_declaration" => return extract_javadoc(&child, source),
            _ => {}
        }
    }
    String::new()
}

// ============================================================================
// Type declarations
// ============================================================================

fn build_signature(modifiers: &[String], parts: &[String]) -> String {
    let mut segments = Vec::new();
    if !modifiers.is_empty() {
        segments.push(modifiers.join(" "));
    }
    segments.extend(parts.iter().cloned());
    segments.join(" ")
}

#[allow(clippy::too_many_arguments)]
fn parse_class(
    node: &Node,
    source: &[u8],
    owner: &str,
    namespace: &str,
    import_map: &HashMap<String, String>,
    symbols: &mut Vec<Symbol>,
    inheritances: &mut Vec<Inheritance>,
) {
    let modifiers = extract_modifiers(node, source);
    let annotations = extract_annotations(node, source);

    let mut class_name = String::new();
    let mut type_params = String::new();
    let mut superclass = String::new();
    let mut interfaces = Vec::new();

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "identifier" => class_name = node_text(&child, source),
            "type_parameters" => type_params = node_text(&child, source),
            "superclass" => {
                if let Some(parent) = type_in_node(&child, source) {
                    superclass = parent;
                }
            }
            "super_interfaces" => {
                interfaces.extend(type_list_names(&child, source));
            }
            _ => {}
        }
    }

    if class_name.is_empty() {
        return;
    }

    // Nested types are owner-qualified: Outer.Inner
    let symbol_name = if owner.is_empty() {
        class_name.clone()
    } else {
        format!("{}.{}", owner, class_name)
    };
    let full_class = if namespace.is_empty() {
        symbol_name.clone()
    } else {
        format!("{}.{}", namespace, symbol_name)
    };

    if !superclass.is_empty() {
        inheritances.push(Inheritance {
            child: full_class.clone(),
            parent: resolve_type(&strip_generics(&superclass), namespace, import_map),
        });
    }
    for interface in &interfaces {
        inheritances.push(Inheritance {
            child: full_class.clone(),
            parent: resolve_type(&strip_generics(interface), namespace, import_map),
        });
    }

    let class_decl = format!("{}{}", class_name, type_params);
    let mut sig_parts = vec!["class".to_string(), class_decl];
    if !superclass.is_empty() {
        sig_parts.push(format!("extends {}", superclass));
    }
    if !interfaces.is_empty() {
        sig_parts.push(format!("implements {}", interfaces.join(", ")));
    }

    symbols.push(Symbol {
        name: symbol_name.clone(),
        kind: SymbolKind::Class,
        signature: build_signature(&modifiers, &sig_parts),
        docstring: extract_javadoc(node, source),
        line_start: node.start_position().row + 1,
        line_end: node.end_position().row + 1,
        annotations,
    });

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() != "class_body" {
            continue;
        }
        let mut members = child.walk();
        for member in child.children(&mut members) {
            match member.kind() {
                "method_declaration" => {
                    symbols.push(parse_method(&member, source, &symbol_name));
                }
                "constructor_declaration" => {
                    symbols.push(parse_constructor(&member, source, &symbol_name));
                }
                "field_declaration" => {
                    symbols.extend(parse_field(&member, source, &symbol_name));
                }
                "class_declaration" => parse_class(
                    &member,
                    source,
                    &symbol_name,
                    namespace,
                    import_map,
                    symbols,
                    inheritances,
                ),
                _ => {}
            }
        }
    }
}

fn parse_interface(
    node: &Node,
    source: &[u8],
    namespace: &str,
    import_map: &HashMap<String, String>,
    symbols: &mut Vec<Symbol>,
    inheritances: &mut Vec<Inheritance>,
) {
    let modifiers = extract_modifiers(node, source);
    let annotations = extract_annotations(node, source);

    let mut interface_name = String::new();
    let mut type_params = String::new();
    let mut extends = Vec::new();

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "identifier" => interface_name = node_text(&child, source),
            "type_parameters" => type_params = node_text(&child, source),
            "extends_interfaces" => extends.extend(type_list_names(&child, source)),
            _ => {}
        }
    }

    if interface_name.is_empty() {
        return;
    }

    let full_name = if namespace.is_empty() {
        interface_name.clone()
    } else {
        format!("{}.{}", namespace, interface_name)
    };
    for parent in &extends {
        inheritances.push(Inheritance {
            child: full_name.clone(),
            parent: resolve_type(&strip_generics(parent), namespace, import_map),
        });
    }

    let decl = format!("{}{}", interface_name, type_params);
    let mut sig_parts = vec!["interface".to_string(), decl];
    if !extends.is_empty() {
        sig_parts.push(format!("extends {}", extends.join(", ")));
    }

    symbols.push(Symbol {
        name: interface_name.clone(),
        kind: SymbolKind::Interface,
        signature: build_signature(&modifiers, &sig_parts),
        docstring: extract_javadoc(node, source),
        line_start: node.start_position().row + 1,
        line_end: node.end_position().row + 1,
        annotations,
    });

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "interface_body" {
            let mut members = child.walk();
            for member in child.children(&mut members) {
                if member.kind() == "method_declaration" {
                    symbols.push(parse_method(&member, source, &interface_name));
                }
            }
        }
    }
}

fn parse_enum(node: &Node, source: &[u8], symbols: &mut Vec<Symbol>) {
    let modifiers = extract_modifiers(node, source);
    let annotations = extract_annotations(node, source);
    let Some(enum_name) = identifier_child(node, source) else {
        return;
    };

    symbols.push(Symbol {
        name: enum_name.clone(),
        kind: SymbolKind::Enum,
        signature: build_signature(&modifiers, &["enum".to_string(), enum_name.clone()]),
        docstring: extract_javadoc(node, source),
        line_start: node.start_position().row + 1,
        line_end: node.end_position().row + 1,
        annotations,
    });

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() != "enum_body" {
            continue;
        }
        let mut members = child.walk();
        for member in child.children(&mut members) {
            match member.kind() {
                "method_declaration" => symbols.push(parse_method(&member, source, &enum_name)),
                "constructor_declaration" => {
                    symbols.push(parse_constructor(&member, source, &enum_name))
                }
                // methods and constructors sit inside enum_body_declarations
                "enum_body_declarations" => {
                    let mut decls = member.walk();
                    for decl in member.children(&mut decls) {
                        match decl.kind() {
                            "method_declaration" => {
                                symbols.push(parse_method(&decl, source, &enum_name))
                            }
                            "constructor_declaration" => {
                                symbols.push(parse_constructor(&decl, source, &enum_name))
                            }
                            _ => {}
                        }
                    }
                }
                _ => {}
            }
        }
    }
}

fn parse_record(node: &Node, source: &[u8], symbols: &mut Vec<Symbol>) {
    let modifiers = extract_modifiers(node, source);
    let annotations = extract_annotations(node, source);

    let mut record_name = String::new();
    let mut type_params = String::new();
    let mut params = String::new();

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "identifier" => record_name = node_text(&child, source),
            "type_parameters" => type_params = node_text(&child, source),
            "formal_parameters" => params = node_text(&child, source),
            _ => {}
        }
    }

    if record_name.is_empty() {
        return;
    }

    let decl = format!("{}{}{}", record_name, type_params, params);
    symbols.push(Symbol {
        name: record_name.clone(),
        kind: SymbolKind::Record,
        signature: build_signature(&modifiers, &["record".to_string(), decl]),
        docstring: extract_javadoc(node, source),
        line_start: node.start_position().row + 1,
        line_end: node.end_position().row + 1,
        annotations,
    });

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "class_body" {
            let mut members = child.walk();
            for member in child.children(&mut members) {
                if member.kind() == "method_declaration" {
                    symbols.push(parse_method(&member, source, &record_name));
                }
            }
        }
    }
}

fn parse_method(node: &Node, source: &[u8], owner: &str) -> Symbol {
    let modifiers = extract_modifiers(node, source);
    let annotations = extract_annotations(node, source);

    let mut name = String::new();
    let mut params = String::new();
    let mut return_type = String::new();
    let mut type_params = String::new();
    let mut throws = String::new();

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "identifier" => name = node_text(&child, source),
            "formal_parameters" => params = node_text(&child, source),
            "type_identifier" | "void_type" | "generic_type" | "array_type"
            | "scoped_type_identifier" | "integral_type" | "floating_point_type"
            | "boolean_type" => return_type = node_text(&child, source),
            "type_parameters" => type_params = node_text(&child, source),
            "throws" => throws = node_text(&child, source),
            _ => {}
        }
    }

    let return_str = if return_type.is_empty() {
        "void".to_string()
    } else {
        return_type
    };
    let method_decl = if type_params.is_empty() {
        return_str
    } else {
        format!("{} {}", type_params, return_str)
    };
    let mut signature =
        build_signature(&modifiers, &[method_decl, format!("{}{}", name, params)]);
    if !throws.is_empty() {
        signature.push_str(&format!(" {}", throws));
    }

    let (full_name, kind) = if owner.is_empty() {
        (name, SymbolKind::Function)
    } else {
        (format!("{}.{}", owner, name), SymbolKind::Method)
    };

    Symbol {
        name: full_name,
        kind,
        signature,
        docstring: extract_javadoc(node, source),
        line_start: node.start_position().row + 1,
        line_end: node.end_position().row + 1,
        annotations,
    }
}

fn parse_constructor(node: &Node, source: &[u8], owner: &str) -> Symbol {
    let modifiers = extract_modifiers(node, source);
    let annotations = extract_annotations(node, source);

    let mut name = String::new();
    let mut params = String::new();
    let mut throws = String::new();

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "identifier" => name = node_text(&child, source),
            "formal_parameters" => params = node_text(&child, source),
            "throws" => throws = node_text(&child, source),
            _ => {}
        }
    }

    let mut signature = build_signature(&modifiers, &[format!("{}{}", name, params)]);
    if !throws.is_empty() {
        signature.push_str(&format!(" {}", throws));
    }

    Symbol {
        // constructor form is <init>, prefixed with the owning class
        name: format!("{}.<init>", owner),
        kind: SymbolKind::Constructor,
        signature,
        docstring: extract_javadoc(node, source),
        line_start: node.start_position().row + 1,
        line_end: node.end_position().row + 1,
        annotations,
    }
}

fn parse_field(node: &Node, source: &[u8], owner: &str) -> Vec<Symbol> {
    let modifiers = extract_modifiers(node, source);
    let annotations = extract_annotations(node, source);

    let mut type_name = String::new();
    let mut names = Vec::new();

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "type_identifier" | "generic_type" | "array_type" | "integral_type"
            | "floating_point_type" | "boolean_type" | "scoped_type_identifier" => {
                type_name = node_text(&child, source)
            }
            "variable_declarator" => {
                let mut inner = child.walk();
                for part in child.children(&mut inner) {
                    if part.kind() == "identifier" {
                        names.push(node_text(&part, source));
                    }
                }
            }
            _ => {}
        }
    }

    names
        .into_iter()
        .map(|field_name| Symbol {
            name: format!("{}.{}", owner, field_name),
            kind: SymbolKind::Field,
            signature: build_signature(&modifiers, &[type_name.clone(), field_name]),
            docstring: String::new(),
            line_start: node.start_position().row + 1,
            line_end: node.end_position().row + 1,
            annotations: annotations.clone(),
        })
        .collect()
}

fn identifier_child(node: &Node, source: &[u8]) -> Option<String> {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "identifier" {
            return Some(node_text(&child, source));
        }
    }
    None
}

fn type_in_node(node: &Node, source: &[u8]) -> Option<String> {
    if matches!(
        node.kind(),
        "type_identifier" | "generic_type" | "scoped_type_identifier"
    ) {
        return Some(node_text(node, source));
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = type_in_node(&child, source) {
            return Some(found);
        }
    }
    None
}

fn type_list_names(node: &Node, source: &[u8]) -> Vec<String> {
    let mut names = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "type_list" {
            let mut inner = child.walk();
            for type_node in child.children(&mut inner) {
                if matches!(
                    type_node.kind(),
                    "type_identifier" | "generic_type" | "scoped_type_identifier"
                ) {
                    names.push(node_text(&type_node, source));
                }
            }
        }
    }
    names
}

// ============================================================================
// Calls
// ============================================================================

/// Statically imported method names → fully qualified names. Wildcard static
/// imports are kept under a `_wildcard_` key and matched as a fallback.
fn build_static_import_map(root: &Node, source: &[u8]) -> HashMap<String, String> {
    let mut map = HashMap::new();
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        if child.kind() != "import_declaration" {
            continue;
        }
        let mut is_static = false;
        let mut import_path = String::new();
        let mut has_wildcard = false;

        let mut inner = child.walk();
        for part in child.children(&mut inner) {
            match part.kind() {
                "static" => is_static = true,
                "scoped_identifier" => import_path = node_text(&part, source),
                "asterisk" => has_wildcard = true,
                _ => {}
            }
        }

        if is_static && !import_path.is_empty() {
            if has_wildcard {
                map.insert(format!("_wildcard_{}", import_path), import_path);
            } else if import_path.contains('.') {
                let method = import_path.rsplit('.').next().unwrap().to_string();
                map.entry(method).or_insert(import_path);
            }
        }
    }
    map
}

fn resolve_static_import(method: &str, static_imports: &HashMap<String, String>) -> Option<String> {
    if let Some(full) = static_imports.get(method) {
        return Some(full.clone());
    }
    for (key, package) in static_imports {
        if key.starts_with("_wildcard_") {
            return Some(format!("{}.{}", package, method));
        }
    }
    None
}

fn extract_calls(
    root: &Node,
    source: &[u8],
    namespace: &str,
    import_map: &HashMap<String, String>,
    inheritances: &[Inheritance],
) -> Vec<Call> {
    let static_imports = build_static_import_map(root, source);
    let parent_map: HashMap<String, String> = inheritances
        .iter()
        .map(|inh| (inh.child.clone(), inh.parent.clone()))
        .collect();

    let mut calls = Vec::new();
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        if !matches!(child.kind(), "class_declaration" | "interface_declaration") {
            continue;
        }
        let Some(class_name) = identifier_child(&child, source) else {
            continue;
        };
        let full_class = if namespace.is_empty() {
            class_name
        } else {
            format!("{}.{}", namespace, class_name)
        };

        let mut inner = child.walk();
        for body in child.children(&mut inner) {
            if !matches!(body.kind(), "class_body" | "interface_body") {
                continue;
            }
            let mut members = body.walk();
            for member in body.children(&mut members) {
                match member.kind() {
                    "method_declaration" => {
                        if let Some(method_name) = identifier_child(&member, source) {
                            let caller = format!("{}.{}", full_class, method_name);
                            collect_calls_in(
                                &member,
                                source,
                                &caller,
                                namespace,
                                import_map,
                                &static_imports,
                                &parent_map,
                                &mut calls,
                            );
                        }
                    }
                    "constructor_declaration" => {
                        let caller = format!("{}.<init>", full_class);
                        collect_calls_in(
                            &member,
                            source,
                            &caller,
                            namespace,
                            import_map,
                            &static_imports,
                            &parent_map,
                            &mut calls,
                        );
                    }
                    _ => {}
                }
            }
        }
    }
    calls
}

#[allow(clippy::too_many_arguments)]
fn collect_calls_in(
    node: &Node,
    source: &[u8],
    caller: &str,
    namespace: &str,
    import_map: &HashMap<String, String>,
    static_imports: &HashMap<String, String>,
    parent_map: &HashMap<String, String>,
    calls: &mut Vec<Call>,
) {
    match node.kind() {
        "method_invocation" => {
            if let Some(call) = parse_method_invocation(
                node,
                source,
                caller,
                namespace,
                import_map,
                static_imports,
                parent_map,
            ) {
                calls.push(call);
            }
        }
        "object_creation_expression" => {
            if let Some(call) = parse_constructor_call(node, source, caller, namespace, import_map)
            {
                calls.push(call);
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_calls_in(
            &child,
            source,
            caller,
            namespace,
            import_map,
            static_imports,
            parent_map,
            calls,
        );
    }
}

fn argument_count(node: &Node) -> Option<usize> {
    node.child_by_field_name("arguments")
        .and_then(|args| crate::parsing::count_arguments(&args))
}

/// Base identifier of a (possibly chained) receiver expression
fn chain_base_identifier(node: &Node, source: &[u8]) -> Option<String> {
    match node.kind() {
        "identifier" => Some(node_text(node, source)),
        "method_invocation" => match node.child_by_field_name("object") {
            Some(object) => chain_base_identifier(&object, source),
            // receiverless call at the chain root: the call's own name is
            // the base (getInstance().run() -> getInstance.run)
            None => node
                .child_by_field_name("name")
                .map(|name| node_text(&name, source)),
        },
        "field_access" => {
            let object = node.child_by_field_name("object")?;
            chain_base_identifier(&object, source)
        }
        _ => None,
    }
}

fn field_access_path(node: &Node, source: &[u8]) -> Vec<String> {
    match node.kind() {
        "identifier" => vec![node_text(node, source)],
        "field_access" => {
            let mut parts = Vec::new();
            if let Some(object) = node.child_by_field_name("object") {
                parts.extend(field_access_path(&object, source));
            }
            if let Some(field) = node.child_by_field_name("field") {
                parts.push(node_text(&field, source));
            }
            parts
        }
        _ => Vec::new(),
    }
}

#[allow(clippy::too_many_arguments)]
fn parse_method_invocation(
    node: &Node,
    source: &[u8],
    caller: &str,
    namespace: &str,
    import_map: &HashMap<String, String>,
    static_imports: &HashMap<String, String>,
    parent_map: &HashMap<String, String>,
) -> Option<Call> {
    let method_name = node
        .child_by_field_name("name")
        .map(|n| node_text(&n, source))?;
    let object = node.child_by_field_name("object");

    let mut resolved: Option<String> = None;

    let callee_raw = match object {
        Some(obj) if obj.kind() == "super" => {
            // super.m() -> parent-class-qualified via the inheritance list
            let class_name = caller.rsplit_once('.').map(|(c, _)| c).unwrap_or(caller);
            resolved = match parent_map.get(class_name) {
                Some(parent) => Some(format!("{}.{}", parent, method_name)),
                None => Some(format!("{}.Parent.{}", namespace, method_name)),
            };
            format!("super.{}", method_name)
        }
        Some(obj) if obj.kind() == "method_invocation" => {
            // chained call: attribute the edge to the chain's base object
            match chain_base_identifier(&obj, source) {
                Some(base) => format!("{}.{}", base, method_name),
                None => method_name.clone(),
            }
        }
        Some(obj) if obj.kind() == "field_access" => {
            let mut parts = field_access_path(&obj, source);
            parts.push(method_name.clone());
            parts.join(".")
        }
        Some(obj) => format!("{}.{}", node_text(&obj, source), method_name),
        None => method_name.clone(),
    };

    if callee_raw.is_empty() {
        return None;
    }

    let callee = match resolved {
        Some(c) => c,
        None => resolve_invocation(&callee_raw, namespace, import_map, static_imports),
    };

    let call_type = if callee_raw.contains('.') {
        let first = callee_raw.split('.').next().unwrap_or("");
        if starts_uppercase(first) || first == "super" {
            CallType::StaticMethod
        } else {
            CallType::Method
        }
    } else {
        CallType::Function
    };

    Some(Call {
        caller: caller.to_string(),
        callee: Some(callee),
        line_number: node.start_position().row + 1,
        call_type,
        arguments_count: argument_count(node),
    })
}

fn resolve_invocation(
    callee_raw: &str,
    namespace: &str,
    import_map: &HashMap<String, String>,
    static_imports: &HashMap<String, String>,
) -> String {
    if !callee_raw.contains('.') {
        // bare call: static imports (incl. wildcards) before package scope
        if let Some(full) = resolve_static_import(callee_raw, static_imports) {
            return full;
        }
        return format!("{}.{}", namespace, callee_raw);
    }

    let parts: Vec<&str> = callee_raw.split('.').collect();
    if parts.len() >= 3 && !starts_uppercase(parts[0]) {
        // already-qualified reference like com.example.util.helper(...)
        return callee_raw.to_string();
    }

    let class_part = parts[0];
    let method_part = parts[1..].join(".");

    if let Some(full) = import_map.get(class_part) {
        return format!("{}.{}", full, method_part);
    }
    if starts_uppercase(class_part) {
        return format!("{}.{}", namespace, callee_raw);
    }

    // lowercase receiver: try the capitalized form as a class-name guess
    let mut chars = class_part.chars();
    let capitalized: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    if let Some(full) = import_map.get(&capitalized) {
        return format!("{}.{}", full, method_part);
    }
    format!("{}.{}.{}", namespace, capitalized, method_part)
}

fn parse_constructor_call(
    node: &Node,
    source: &[u8],
    caller: &str,
    namespace: &str,
    import_map: &HashMap<String, String>,
) -> Option<Call> {
    let type_node = node.child_by_field_name("type")?;
    let type_name = match type_node.kind() {
        "type_identifier" | "scoped_type_identifier" => node_text(&type_node, source),
        "generic_type" => {
            let mut name = String::new();
            let mut cursor = type_node.walk();
            for child in type_node.children(&mut cursor) {
                if matches!(child.kind(), "type_identifier" | "scoped_type_identifier") {
                    name = node_text(&child, source);
                    break;
                }
            }
            name
        }
        _ => return None,
    };
    if type_name.is_empty() {
        return None;
    }

    let full_type = if type_name.contains('.') {
        type_name
    } else if let Some(full) = import_map.get(&type_name) {
        full.clone()
    } else {
        format!("{}.{}", namespace, type_name)
    };

    Some(Call {
        caller: caller.to_string(),
        callee: Some(format!("{}.<init>", full_type)),
        line_number: node.start_position().row + 1,
        call_type: CallType::Constructor,
        arguments_count: argument_count(node),
    })
}
