//! TypeScript / JavaScript fact extraction
//!
//! One extractor covers all four grammar variants (.ts, .tsx, .js, .jsx).
//! `export` wrapping is transparent for symbols, imports, and heritage.
//! Call resolution uses an import map built from both ESM and CommonJS
//! imports; `this.` and `super.` receivers are never rewritten.

use std::collections::HashMap;
use std::path::Path;

use tree_sitter::{Node, Tree};

use crate::lang::Lang;
use crate::parsing::node_text;
use crate::schema::{Call, CallType, Import, Inheritance, ParseResult, Symbol, SymbolKind};

use super::{starts_uppercase, strip_generics};

pub fn extract(path: &Path, lang: Lang, tree: &Tree, source: &[u8]) -> ParseResult {
    let root = tree.root_node();

    let symbols = extract_symbols(&root, source);
    let imports = extract_imports(&root, source);
    let inheritances = extract_inheritances(&root, source);
    let calls = extract_calls(&root, source, &imports);

    ParseResult {
        path: path.display().to_string(),
        language: lang.name().to_string(),
        namespace: String::new(),
        module_docstring: extract_module_docstring(&root, source),
        file_lines: 0,
        symbols,
        imports,
        inheritances,
        calls,
        error: None,
    }
}

// ============================================================================
// Symbols
// ============================================================================

fn extract_symbols(root: &Node, source: &[u8]) -> Vec<Symbol> {
    let mut symbols = Vec::new();
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        collect_node_symbols(&child, source, &mut symbols);
    }
    symbols
}

fn collect_node_symbols(node: &Node, source: &[u8], out: &mut Vec<Symbol>) {
    match node.kind() {
        "function_declaration" | "generator_function_declaration" => {
            if let Some(sym) = parse_function_declaration(node, source) {
                out.push(sym);
            }
        }
        "class_declaration" => parse_class_declaration(node, source, false, out),
        "abstract_class_declaration" => parse_class_declaration(node, source, true, out),
        "interface_declaration" => {
            if let Some(sym) = parse_interface_declaration(node, source) {
                out.push(sym);
            }
        }
        "enum_declaration" => {
            if let Some(sym) = parse_enum_declaration(node, source) {
                out.push(sym);
            }
        }
        "type_alias_declaration" => {
            if let Some(sym) = parse_type_alias(node, source) {
                out.push(sym);
            }
        }
        "lexical_declaration" | "variable_declaration" => {
            parse_variable_statement(node, source, out);
        }
        "export_statement" => {
            // export wrapping is transparent
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                collect_node_symbols(&child, source, out);
            }
        }
        "module" | "internal_module" => {
            if let Some(sym) = parse_namespace(node, source) {
                out.push(sym);
            }
        }
        "expression_statement" => {
            // namespace declarations can be wrapped in expression_statement
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                if matches!(child.kind(), "module" | "internal_module") {
                    if let Some(sym) = parse_namespace(&child, source) {
                        out.push(sym);
                    }
                }
            }
        }
        _ => {}
    }
}

fn parse_function_declaration(node: &Node, source: &[u8]) -> Option<Symbol> {
    let mut name = String::new();
    let mut params = String::new();
    let mut is_async = false;

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "identifier" => name = node_text(&child, source),
            "formal_parameters" => params = node_text(&child, source),
            "async" => is_async = true,
            _ => {}
        }
    }
    if name.is_empty() {
        return None;
    }
    let is_generator = node.kind() == "generator_function_declaration";

    let mut sig_parts = Vec::new();
    if is_async {
        sig_parts.push("async".to_string());
    }
    sig_parts.push("function".to_string());
    if is_generator {
        sig_parts.push("*".to_string());
    }
    sig_parts.push(format!("{}{}", name, params));
    let return_type = type_annotation(node, source);
    if !return_type.is_empty() {
        sig_parts.push(format!(": {}", return_type));
    }

    Some(Symbol {
        name,
        kind: SymbolKind::Function,
        signature: sig_parts.join(" "),
        docstring: extract_jsdoc(node, source),
        line_start: node.start_position().row + 1,
        line_end: node.end_position().row + 1,
        annotations: Vec::new(),
    })
}

fn parse_class_declaration(node: &Node, source: &[u8], is_abstract: bool, out: &mut Vec<Symbol>) {
    let mut class_name = String::new();
    let mut type_params = String::new();
    let mut extends = String::new();
    let mut implements = Vec::new();

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "type_identifier" | "identifier" => {
                if class_name.is_empty() {
                    class_name = node_text(&child, source);
                }
            }
            "type_parameters" => type_params = node_text(&child, source),
            "class_heritage" => {
                let (ext, impls) = parse_class_heritage(&child, source);
                extends = ext;
                implements = impls;
            }
            _ => {}
        }
    }
    if class_name.is_empty() {
        return;
    }

    let mut sig_parts = Vec::new();
    if is_abstract {
        sig_parts.push("abstract".to_string());
    }
    sig_parts.push("class".to_string());
    sig_parts.push(format!("{}{}", class_name, type_params));
    if !extends.is_empty() {
        sig_parts.push(format!("extends {}", extends));
    }
    if !implements.is_empty() {
        sig_parts.push(format!("implements {}", implements.join(", ")));
    }

    out.push(Symbol {
        name: class_name.clone(),
        kind: SymbolKind::Class,
        signature: sig_parts.join(" "),
        docstring: extract_jsdoc(node, source),
        line_start: node.start_position().row + 1,
        line_end: node.end_position().row + 1,
        annotations: Vec::new(),
    });

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "class_body" {
            let mut members = child.walk();
            for member in child.children(&mut members) {
                match member.kind() {
                    "method_definition" => {
                        if let Some(sym) = parse_method_definition(&member, source, &class_name) {
                            out.push(sym);
                        }
                    }
                    "public_field_definition" | "field_definition" => {
                        if let Some(sym) = parse_field_definition(&member, source, &class_name) {
                            out.push(sym);
                        }
                    }
                    _ => {}
                }
            }
        }
    }
}

/// `class_heritage` holds zero-or-one extends clause and zero-or-more
/// implements clauses
fn parse_class_heritage(node: &Node, source: &[u8]) -> (String, Vec<String>) {
    let mut extends = String::new();
    let mut implements = Vec::new();

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "extends_clause" => {
                let mut inner = child.walk();
                for ext in child.children(&mut inner) {
                    if matches!(
                        ext.kind(),
                        "identifier" | "type_identifier" | "generic_type" | "member_expression"
                    ) {
                        extends = node_text(&ext, source);
                    }
                }
            }
            // the JavaScript grammar puts the extends expression directly
            // under class_heritage, without an extends_clause wrapper
            "identifier" | "member_expression" => {
                if extends.is_empty() {
                    extends = node_text(&child, source);
                }
            }
            "implements_clause" => {
                let mut inner = child.walk();
                for impl_node in child.children(&mut inner) {
                    if matches!(impl_node.kind(), "type_identifier" | "generic_type") {
                        implements.push(node_text(&impl_node, source));
                    }
                }
            }
            _ => {}
        }
    }

    (extends, implements)
}

fn parse_method_definition(node: &Node, source: &[u8], class_name: &str) -> Option<Symbol> {
    let mut name = String::new();
    let mut params = String::new();
    let mut is_async = false;
    let mut is_static = false;
    let mut is_getter = false;
    let mut is_setter = false;
    let mut accessibility = String::new();

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "property_identifier" => name = node_text(&child, source),
            "formal_parameters" => params = node_text(&child, source),
            "async" => is_async = true,
            "static" => is_static = true,
            "get" => is_getter = true,
            "set" => is_setter = true,
            "accessibility_modifier" => accessibility = node_text(&child, source),
            _ => {}
        }
    }
    if name.is_empty() {
        return None;
    }

    let kind = if name == "constructor" {
        SymbolKind::Constructor
    } else {
        SymbolKind::Method
    };

    let mut sig_parts = Vec::new();
    if !accessibility.is_empty() {
        sig_parts.push(accessibility);
    }
    if is_static {
        sig_parts.push("static".to_string());
    }
    if is_async {
        sig_parts.push("async".to_string());
    }
    if is_getter {
        sig_parts.push("get".to_string());
    }
    if is_setter {
        sig_parts.push("set".to_string());
    }
    sig_parts.push(format!("{}{}", name, params));
    let return_type = type_annotation(node, source);
    if !return_type.is_empty() {
        sig_parts.push(format!(": {}", return_type));
    }

    Some(Symbol {
        name: format!("{}.{}", class_name, name),
        kind,
        signature: sig_parts.join(" "),
        docstring: extract_jsdoc(node, source),
        line_start: node.start_position().row + 1,
        line_end: node.end_position().row + 1,
        annotations: Vec::new(),
    })
}

fn parse_field_definition(node: &Node, source: &[u8], class_name: &str) -> Option<Symbol> {
    let mut name = String::new();
    let mut accessibility = String::new();

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "property_identifier" => name = node_text(&child, source),
            "accessibility_modifier" => accessibility = node_text(&child, source),
            _ => {}
        }
    }
    if name.is_empty() {
        return None;
    }

    let mut sig_parts = Vec::new();
    if !accessibility.is_empty() {
        sig_parts.push(accessibility);
    }
    sig_parts.push(name.clone());
    let type_ann = type_annotation(node, source);
    if !type_ann.is_empty() {
        sig_parts.push(format!(": {}", type_ann));
    }

    Some(Symbol {
        name: format!("{}.{}", class_name, name),
        kind: SymbolKind::Field,
        signature: sig_parts.join(" "),
        docstring: String::new(),
        line_start: node.start_position().row + 1,
        line_end: node.end_position().row + 1,
        annotations: Vec::new(),
    })
}

fn parse_interface_declaration(node: &Node, source: &[u8]) -> Option<Symbol> {
    let mut name = String::new();
    let mut type_params = String::new();
    let mut extends = Vec::new();

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "type_identifier" => name = node_text(&child, source),
            "type_parameters" => type_params = node_text(&child, source),
            "extends_type_clause" => {
                let mut inner = child.walk();
                for ext in child.children(&mut inner) {
                    if matches!(ext.kind(), "type_identifier" | "generic_type") {
                        extends.push(node_text(&ext, source));
                    }
                }
            }
            _ => {}
        }
    }
    if name.is_empty() {
        return None;
    }

    let mut sig_parts = vec!["interface".to_string(), format!("{}{}", name, type_params)];
    if !extends.is_empty() {
        sig_parts.push(format!("extends {}", extends.join(", ")));
    }

    Some(Symbol {
        name,
        kind: SymbolKind::Interface,
        signature: sig_parts.join(" "),
        docstring: extract_jsdoc(node, source),
        line_start: node.start_position().row + 1,
        line_end: node.end_position().row + 1,
        annotations: Vec::new(),
    })
}

fn parse_enum_declaration(node: &Node, source: &[u8]) -> Option<Symbol> {
    let mut name = String::new();
    let mut is_const = false;

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "identifier" => name = node_text(&child, source),
            "const" => is_const = true,
            _ => {}
        }
    }
    if name.is_empty() {
        return None;
    }

    let signature = if is_const {
        format!("const enum {}", name)
    } else {
        format!("enum {}", name)
    };

    Some(Symbol {
        name,
        kind: SymbolKind::Enum,
        signature,
        docstring: extract_jsdoc(node, source),
        line_start: node.start_position().row + 1,
        line_end: node.end_position().row + 1,
        annotations: Vec::new(),
    })
}

fn parse_type_alias(node: &Node, source: &[u8]) -> Option<Symbol> {
    let mut name = String::new();
    let mut type_params = String::new();

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "type_identifier" => {
                if name.is_empty() {
                    name = node_text(&child, source);
                }
            }
            "type_parameters" => type_params = node_text(&child, source),
            _ => {}
        }
    }
    if name.is_empty() {
        return None;
    }

    Some(Symbol {
        name: name.clone(),
        kind: SymbolKind::TypeAlias,
        signature: format!("type {}{}", name, type_params),
        docstring: extract_jsdoc(node, source),
        line_start: node.start_position().row + 1,
        line_end: node.end_position().row + 1,
        annotations: Vec::new(),
    })
}

fn parse_namespace(node: &Node, source: &[u8]) -> Option<Symbol> {
    let mut name = String::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if matches!(child.kind(), "identifier" | "nested_identifier") {
            name = node_text(&child, source);
            break;
        }
    }
    if name.is_empty() {
        return None;
    }

    Some(Symbol {
        name: name.clone(),
        kind: SymbolKind::Namespace,
        signature: format!("namespace {}", name),
        docstring: extract_jsdoc(node, source),
        line_start: node.start_position().row + 1,
        line_end: node.end_position().row + 1,
        annotations: Vec::new(),
    })
}

/// const/let/var declarations: an arrow-function or function-expression
/// initializer yields a `function` symbol, anything else a `variable`
fn parse_variable_statement(node: &Node, source: &[u8], out: &mut Vec<Symbol>) {
    let decl_keyword = node
        .child(0)
        .map(|c| node_text(&c, source))
        .unwrap_or_else(|| "const".to_string());

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() != "variable_declarator" {
            continue;
        }
        let mut name = String::new();
        let mut value: Option<Node> = None;

        let mut inner = child.walk();
        for part in child.children(&mut inner) {
            match part.kind() {
                "identifier" => {
                    if name.is_empty() {
                        name = node_text(&part, source);
                    }
                }
                "arrow_function" | "function_expression" | "function" => value = Some(part),
                _ => {}
            }
        }
        if name.is_empty() {
            continue;
        }

        let line_start = node.start_position().row + 1;
        let line_end = node.end_position().row + 1;

        match value {
            Some(func) if func.kind() == "arrow_function" => {
                let mut params = String::new();
                let mut is_async = false;
                let mut func_cursor = func.walk();
                for part in func.children(&mut func_cursor) {
                    match part.kind() {
                        "formal_parameters" => params = node_text(&part, source),
                        "async" => is_async = true,
                        "identifier" => {
                            // single bare parameter: x => ...
                            if params.is_empty() {
                                params = format!("({})", node_text(&part, source));
                            }
                        }
                        _ => {}
                    }
                }
                let mut sig_parts = vec![decl_keyword.clone()];
                if is_async {
                    sig_parts.push("async".to_string());
                }
                sig_parts.push(format!("{} = {} =>", name, params));

                out.push(Symbol {
                    name,
                    kind: SymbolKind::Function,
                    signature: sig_parts.join(" "),
                    docstring: extract_jsdoc(node, source),
                    line_start,
                    line_end,
                    annotations: Vec::new(),
                });
            }
            Some(_) => {
                out.push(Symbol {
                    name: name.clone(),
                    kind: SymbolKind::Function,
                    signature: format!("{} {} = function", decl_keyword, name),
                    docstring: extract_jsdoc(node, source),
                    line_start,
                    line_end,
                    annotations: Vec::new(),
                });
            }
            None => {
                let mut sig_parts = vec![decl_keyword.clone(), name.clone()];
                let type_ann = type_annotation(&child, source);
                if !type_ann.is_empty() {
                    sig_parts.push(format!(": {}", type_ann));
                }
                out.push(Symbol {
                    name,
                    kind: SymbolKind::Variable,
                    signature: sig_parts.join(" "),
                    docstring: String::new(),
                    line_start,
                    line_end,
                    annotations: Vec::new(),
                });
            }
        }
    }
}

// ============================================================================
// Imports
// ============================================================================

fn extract_imports(root: &Node, source: &[u8]) -> Vec<Import> {
    let mut imports = Vec::new();
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        match child.kind() {
            "import_statement" => parse_import_statement(&child, source, &mut imports),
            "export_statement" => parse_export_as_import(&child, source, &mut imports),
            "lexical_declaration" | "variable_declaration" => {
                parse_require(&child, source, &mut imports);
            }
            _ => {}
        }
    }
    imports
}

fn parse_import_statement(node: &Node, source: &[u8], out: &mut Vec<Import>) {
    let mut module = String::new();
    let mut import_clause: Option<Node> = None;

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "string" => module = string_content(&child, source),
            "import_clause" => import_clause = Some(child),
            _ => {}
        }
    }
    if module.is_empty() {
        return;
    }

    let Some(clause) = import_clause else {
        // side-effect import: import 'module'
        out.push(Import {
            module,
            names: Vec::new(),
            is_from: false,
            alias: None,
        });
        return;
    };

    let mut cursor = clause.walk();
    for child in clause.children(&mut cursor) {
        match child.kind() {
            "identifier" => {
                // default import: import X from 'module'
                let default_name = node_text(&child, source);
                out.push(Import {
                    module: module.clone(),
                    names: vec![default_name.clone()],
                    is_from: true,
                    alias: Some(default_name),
                });
            }
            "named_imports" => {
                let mut names = Vec::new();
                let mut specs = child.walk();
                for spec in child.children(&mut specs) {
                    if spec.kind() == "import_specifier" {
                        let mut spec_cursor = spec.walk();
                        for part in spec.children(&mut spec_cursor) {
                            if matches!(part.kind(), "identifier" | "type_identifier") {
                                names.push(node_text(&part, source));
                                break;
                            }
                        }
                    }
                }
                if !names.is_empty() {
                    out.push(Import {
                        module: module.clone(),
                        names,
                        is_from: true,
                        alias: None,
                    });
                }
            }
            "namespace_import" => {
                // import * as X from 'module'
                let mut alias = None;
                let mut ns_cursor = child.walk();
                for part in child.children(&mut ns_cursor) {
                    if part.kind() == "identifier" {
                        alias = Some(node_text(&part, source));
                    }
                }
                out.push(Import {
                    module: module.clone(),
                    names: vec!["*".to_string()],
                    is_from: true,
                    alias,
                });
            }
            _ => {}
        }
    }
}

/// `export { X } from 'm'` and `export * from 'm'` are recorded as
/// re-export Imports
fn parse_export_as_import(node: &Node, source: &[u8], out: &mut Vec<Import>) {
    let mut module = String::new();
    let mut names = Vec::new();
    let mut is_wildcard = false;

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "string" => module = string_content(&child, source),
            "export_clause" => {
                let mut specs = child.walk();
                for spec in child.children(&mut specs) {
                    if spec.kind() == "export_specifier" {
                        let mut spec_cursor = spec.walk();
                        for part in spec.children(&mut spec_cursor) {
                            if matches!(part.kind(), "identifier" | "type_identifier") {
                                names.push(node_text(&part, source));
                                break;
                            }
                        }
                    }
                }
            }
            "*" => is_wildcard = true,
            _ => {}
        }
    }

    if module.is_empty() {
        return;
    }
    if is_wildcard {
        out.push(Import {
            module,
            names: vec!["*".to_string()],
            is_from: true,
            alias: None,
        });
    } else if !names.is_empty() {
        out.push(Import {
            module,
            names,
            is_from: true,
            alias: None,
        });
    }
}

/// CommonJS: `const X = require('m')` and `const { A, B } = require('m')`
fn parse_require(node: &Node, source: &[u8], out: &mut Vec<Import>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() != "variable_declarator" {
            continue;
        }
        let mut var_name = String::new();
        let mut destructured = Vec::new();
        let mut module = String::new();

        let mut inner = child.walk();
        for part in child.children(&mut inner) {
            match part.kind() {
                "identifier" => var_name = node_text(&part, source),
                "object_pattern" => {
                    let mut pat_cursor = part.walk();
                    for pat in part.children(&mut pat_cursor) {
                        if matches!(pat.kind(), "shorthand_property_identifier_pattern") {
                            destructured.push(node_text(&pat, source));
                        }
                    }
                }
                "call_expression" => {
                    let mut is_require = false;
                    let mut call_cursor = part.walk();
                    for call_part in part.children(&mut call_cursor) {
                        match call_part.kind() {
                            "identifier" => {
                                is_require = node_text(&call_part, source) == "require";
                            }
                            "arguments" => {
                                let mut arg_cursor = call_part.walk();
                                for arg in call_part.children(&mut arg_cursor) {
                                    if arg.kind() == "string" {
                                        module = string_content(&arg, source);
                                    }
                                }
                            }
                            _ => {}
                        }
                    }
                    if !is_require {
                        module.clear();
                    }
                }
                _ => {}
            }
        }

        if module.is_empty() {
            continue;
        }
        if !destructured.is_empty() {
            out.push(Import {
                module,
                names: destructured,
                is_from: false,
                alias: None,
            });
        } else if !var_name.is_empty() {
            out.push(Import {
                module,
                names: vec![var_name.clone()],
                is_from: false,
                alias: Some(var_name),
            });
        }
    }
}

// ============================================================================
// Inheritances
// ============================================================================

fn extract_inheritances(root: &Node, source: &[u8]) -> Vec<Inheritance> {
    let mut inheritances = Vec::new();
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        collect_inheritances(&child, source, &mut inheritances);
    }
    inheritances
}

fn collect_inheritances(node: &Node, source: &[u8], out: &mut Vec<Inheritance>) {
    match node.kind() {
        "class_declaration" | "abstract_class_declaration" => {
            let mut class_name = String::new();
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                match child.kind() {
                    "type_identifier" | "identifier" => {
                        if class_name.is_empty() {
                            class_name = node_text(&child, source);
                        }
                    }
                    "class_heritage" if !class_name.is_empty() => {
                        let (extends, implements) = parse_class_heritage(&child, source);
                        if !extends.is_empty() {
                            out.push(Inheritance {
                                child: class_name.clone(),
                                parent: strip_generics(&extends),
                            });
                        }
                        for implemented in implements {
                            out.push(Inheritance {
                                child: class_name.clone(),
                                parent: strip_generics(&implemented),
                            });
                        }
                    }
                    _ => {}
                }
            }
        }
        "interface_declaration" => {
            let mut iface_name = String::new();
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                match child.kind() {
                    "type_identifier" => {
                        if iface_name.is_empty() {
                            iface_name = node_text(&child, source);
                        }
                    }
                    "extends_type_clause" if !iface_name.is_empty() => {
                        let mut inner = child.walk();
                        for ext in child.children(&mut inner) {
                            if matches!(ext.kind(), "type_identifier" | "generic_type") {
                                out.push(Inheritance {
                                    child: iface_name.clone(),
                                    parent: strip_generics(&node_text(&ext, source)),
                                });
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
        "export_statement" => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                collect_inheritances(&child, source, out);
            }
        }
        _ => {}
    }
}

// ============================================================================
// Calls
// ============================================================================

/// Local-name → source-of-truth mapping:
/// named imports resolve to `module.name`; default and namespace imports
/// resolve to the module itself
fn build_import_map(imports: &[Import]) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for imp in imports {
        if imp.is_from && !imp.names.is_empty() {
            if imp.names == ["*"] {
                if let Some(alias) = &imp.alias {
                    map.insert(alias.clone(), imp.module.clone());
                }
            } else if imp.names.len() == 1 && imp.alias.as_deref() == Some(imp.names[0].as_str()) {
                // default import
                map.insert(imp.names[0].clone(), imp.module.clone());
            } else {
                for name in &imp.names {
                    map.insert(name.clone(), format!("{}.{}", imp.module, name));
                }
            }
        } else if !imp.is_from && !imp.names.is_empty() {
            if imp.alias.is_some() && imp.names.len() == 1 {
                // const X = require('m') binds the whole module
                map.insert(imp.names[0].clone(), imp.module.clone());
            } else {
                for name in &imp.names {
                    map.insert(name.clone(), format!("{}.{}", imp.module, name));
                }
            }
        }
    }
    map
}

/// `this.` and `super.` receivers are never rewritten
fn resolve_callee(callee: &str, import_map: &HashMap<String, String>) -> String {
    if callee.is_empty() || callee.starts_with("this.") || callee.starts_with("super.") {
        return callee.to_string();
    }
    if let Some(resolved) = import_map.get(callee) {
        return resolved.clone();
    }
    if let Some((prefix, suffix)) = callee.split_once('.') {
        if let Some(resolved) = import_map.get(prefix) {
            return format!("{}.{}", resolved, suffix);
        }
    }
    callee.to_string()
}

fn extract_calls(root: &Node, source: &[u8], imports: &[Import]) -> Vec<Call> {
    let import_map = build_import_map(imports);
    let mut calls = Vec::new();
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        collect_calls(&child, source, "", &import_map, &mut calls);
    }
    calls
}

fn collect_calls(
    node: &Node,
    source: &[u8],
    caller: &str,
    import_map: &HashMap<String, String>,
    calls: &mut Vec<Call>,
) {
    match node.kind() {
        "function_declaration" | "generator_function_declaration" => {
            let mut name = String::new();
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                if child.kind() == "identifier" {
                    name = node_text(&child, source);
                    break;
                }
            }
            let next_caller = if name.is_empty() { caller } else { &name };
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                collect_calls(&child, source, next_caller, import_map, calls);
            }
            return;
        }
        "class_declaration" | "abstract_class_declaration" => {
            let mut class_name = String::new();
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                if matches!(child.kind(), "type_identifier" | "identifier") {
                    class_name = node_text(&child, source);
                    break;
                }
            }
            if class_name.is_empty() {
                return;
            }
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                if child.kind() != "class_body" {
                    continue;
                }
                let mut members = child.walk();
                for member in child.children(&mut members) {
                    if member.kind() != "method_definition" {
                        continue;
                    }
                    let mut method_name = String::new();
                    let mut method_cursor = member.walk();
                    for part in member.children(&mut method_cursor) {
                        if part.kind() == "property_identifier" {
                            method_name = node_text(&part, source);
                            break;
                        }
                    }
                    if !method_name.is_empty() {
                        let method_caller = format!("{}.{}", class_name, method_name);
                        let mut body_cursor = member.walk();
                        for part in member.children(&mut body_cursor) {
                            collect_calls(&part, source, &method_caller, import_map, calls);
                        }
                    }
                }
            }
            return;
        }
        "export_statement" => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                collect_calls(&child, source, caller, import_map, calls);
            }
            return;
        }
        "call_expression" => {
            if let Some(call) = parse_call_expression(node, source, caller, import_map) {
                calls.push(call);
            }
        }
        "new_expression" => {
            if let Some(call) = parse_new_expression(node, source, caller, import_map) {
                calls.push(call);
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_calls(&child, source, caller, import_map, calls);
    }
}

fn caller_or_module(caller: &str) -> String {
    if caller.is_empty() {
        crate::schema::MODULE_CALLER.to_string()
    } else {
        caller.to_string()
    }
}

fn call_arguments(node: &Node) -> Option<usize> {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "arguments" {
            return crate::parsing::count_arguments(&child);
        }
    }
    None
}

fn parse_call_expression(
    node: &Node,
    source: &[u8],
    caller: &str,
    import_map: &HashMap<String, String>,
) -> Option<Call> {
    let func = node.child(0)?;

    let (callee_text, call_type) = match func.kind() {
        "identifier" => {
            let text = node_text(&func, source);
            // require() is handled by import extraction
            if text == "require" {
                return None;
            }
            (text, CallType::Function)
        }
        "member_expression" => {
            let text = node_text(&func, source);
            let base = func.child(0).map(|c| (c.kind().to_string(), node_text(&c, source)));
            let call_type = match base {
                Some((kind, _)) if kind == "this" => CallType::Method,
                Some((kind, name)) if kind == "identifier" && starts_uppercase(&name) => {
                    CallType::StaticMethod
                }
                _ => CallType::Method,
            };
            (text, call_type)
        }
        _ => {
            // complex callee (IIFE, chained call result); keep a bounded label
            let mut text = node_text(&func, source);
            if text.len() > 80 {
                let mut cut = 77;
                while cut > 0 && !text.is_char_boundary(cut) {
                    cut -= 1;
                }
                text.truncate(cut);
                text.push_str("...");
            }
            (text, CallType::Method)
        }
    };

    if callee_text.is_empty() {
        return None;
    }
    let resolved = resolve_callee(&callee_text, import_map);

    Some(Call {
        caller: caller_or_module(caller),
        callee: Some(resolved),
        line_number: node.start_position().row + 1,
        call_type,
        arguments_count: call_arguments(node),
    })
}

fn parse_new_expression(
    node: &Node,
    source: &[u8],
    caller: &str,
    import_map: &HashMap<String, String>,
) -> Option<Call> {
    let mut type_name = String::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if matches!(
            child.kind(),
            "identifier" | "type_identifier" | "member_expression"
        ) {
            type_name = node_text(&child, source);
            break;
        }
    }
    if type_name.is_empty() {
        return None;
    }

    let resolved = resolve_callee(&type_name, import_map);

    Some(Call {
        caller: caller_or_module(caller),
        callee: Some(format!("{}.<init>", resolved)),
        line_number: node.start_position().row + 1,
        call_type: CallType::Constructor,
        arguments_count: call_arguments(node),
    })
}

// ============================================================================
// Helpers
// ============================================================================

fn string_content(node: &Node, source: &[u8]) -> String {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "string_fragment" {
            return node_text(&child, source);
        }
    }
    let text = node_text(node, source);
    text.trim_matches(|c| c == '\'' || c == '"' || c == '`').to_string()
}

fn type_annotation(node: &Node, source: &[u8]) -> String {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "type_annotation" {
            let mut inner = child.walk();
            for part in child.children(&mut inner) {
                if part.kind() != ":" {
                    return node_text(&part, source);
                }
            }
        }
    }
    String::new()
}

fn extract_jsdoc(node: &Node, source: &[u8]) -> String {
    if let Some(doc) = jsdoc_before(node, source) {
        return doc;
    }
    // export wrapping is transparent: the comment sits before the export
    if let Some(parent) = node.parent() {
        if parent.kind() == "export_statement" {
            if let Some(doc) = jsdoc_before(&parent, source) {
                return doc;
            }
        }
    }
    String::new()
}

fn jsdoc_before(node: &Node, source: &[u8]) -> Option<String> {
    let prev = node.prev_sibling()?;
    if prev.kind() != "comment" {
        return None;
    }
    let text = node_text(&prev, source);
    if !text.starts_with("/**") {
        return None;
    }
    Some(
        text.trim_start_matches("/**")
            .trim_end_matches("*/")
            .trim()
            .to_string(),
    )
}

fn extract_module_docstring(root: &Node, source: &[u8]) -> String {
    if let Some(first) = root.child(0) {
        if first.kind() == "comment" {
            let text = node_text(&first, source);
            if text.starts_with("/**") {
                return text
                    .trim_start_matches("/**")
                    .trim_end_matches("*/")
                    .trim()
                    .to_string();
            }
        }
    }
    String::new()
}
