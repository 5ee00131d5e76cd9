//! PHP fact extraction
//!
//! Tracks the declared namespace and the `use` map so that class names in
//! inheritance and call records come out fully qualified with `\` separators.
//! Member calls on `$this` resolve to the enclosing class; other receivers
//! use the capitalized-variable heuristic and degrade to `dynamic` when no
//! receiver is recoverable.

use std::collections::HashMap;
use std::path::Path;

use tree_sitter::{Node, Tree};

use crate::parsing::node_text;
use crate::schema::{Call, CallType, Import, Inheritance, ParseResult, Symbol, SymbolKind};

pub fn extract(path: &Path, tree: &Tree, source: &[u8]) -> ParseResult {
    let root = tree.root_node();

    let namespace = extract_namespace(&root, source);
    let use_map = build_use_map(&root, source);

    let symbols = extract_symbols(&root, source);
    let imports = extract_imports(&root, source);
    let inheritances = extract_inheritances(&root, source, &namespace, &use_map);
    let calls = extract_calls(&root, source, &namespace, &use_map, &inheritances);

    ParseResult {
        path: path.display().to_string(),
        language: "php".to_string(),
        namespace,
        module_docstring: String::new(),
        file_lines: 0,
        symbols,
        imports,
        inheritances,
        calls,
        error: None,
    }
}

fn extract_namespace(root: &Node, source: &[u8]) -> String {
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        if child.kind() == "namespace_definition" {
            let mut inner = child.walk();
            for part in child.children(&mut inner) {
                if part.kind() == "namespace_name" {
                    return node_text(&part, source);
                }
            }
        }
    }
    String::new()
}

/// Resolution precedence for bare class names: use-map entry, then namespace
/// qualification, then the bare name (global namespace)
fn qualify(name: &str, namespace: &str, use_map: &HashMap<String, String>) -> String {
    if let Some(stripped) = name.strip_prefix('\\') {
        return stripped.to_string();
    }
    if name.contains('\\') {
        return name.to_string();
    }
    if let Some(full) = use_map.get(name) {
        return full.clone();
    }
    if !namespace.is_empty() {
        return format!("{}\\{}", namespace, name);
    }
    name.to_string()
}

// ============================================================================
// Imports (use statements, include/require)
// ============================================================================

fn extract_imports(root: &Node, source: &[u8]) -> Vec<Import> {
    let mut imports = Vec::new();
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        match child.kind() {
            "namespace_use_declaration" => parse_use(&child, source, &mut imports),
            _ => collect_includes(&child, source, &mut imports),
        }
    }
    imports
}

/// `include`/`require` with a string argument yields an Import with the
/// literal path as module
fn collect_includes(node: &Node, source: &[u8], out: &mut Vec<Import>) {
    if matches!(
        node.kind(),
        "include_expression"
            | "include_once_expression"
            | "require_expression"
            | "require_once_expression"
    ) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if matches!(child.kind(), "string" | "encapsed_string") {
                let raw = node_text(&child, source);
                let module = raw.trim_matches(|c| c == '\'' || c == '"').to_string();
                out.push(Import {
                    module,
                    names: Vec::new(),
                    is_from: false,
                    alias: None,
                });
                return;
            }
        }
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_includes(&child, source, out);
    }
}

/// Handles all three `use` forms: single, aliased, and grouped.
/// PHP `use` brings whole classes, so `names` stays empty.
fn parse_use(node: &Node, source: &[u8], out: &mut Vec<Import>) {
    let mut base_namespace = String::new();

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "namespace_name" => {
                // group import base: use App\Repository\{...}
                base_namespace = node_text(&child, source);
            }
            "namespace_use_clause" => {
                if let Some(import) = parse_use_clause(&child, source, &base_namespace) {
                    out.push(import);
                }
            }
            "namespace_use_group" => {
                let mut group_cursor = child.walk();
                for group_child in child.children(&mut group_cursor) {
                    if matches!(
                        group_child.kind(),
                        "namespace_use_clause" | "namespace_use_group_clause"
                    ) {
                        if let Some(import) = parse_use_clause(&group_child, source, &base_namespace)
                        {
                            out.push(import);
                        }
                    }
                }
            }
            _ => {}
        }
    }
}

fn parse_use_clause(clause: &Node, source: &[u8], base_namespace: &str) -> Option<Import> {
    let mut module = String::new();
    let mut alias: Option<String> = None;

    let mut cursor = clause.walk();
    for child in clause.children(&mut cursor) {
        match child.kind() {
            "qualified_name" | "namespace_name" => {
                if module.is_empty() {
                    module = node_text(&child, source);
                }
            }
            "name" => {
                if module.is_empty() {
                    module = node_text(&child, source);
                } else {
                    alias = Some(node_text(&child, source));
                }
            }
            "namespace_aliasing_clause" => {
                let mut alias_cursor = child.walk();
                for alias_child in child.children(&mut alias_cursor) {
                    if alias_child.kind() == "name" {
                        alias = Some(node_text(&alias_child, source));
                    }
                }
            }
            _ => {}
        }
    }

    if module.is_empty() {
        return None;
    }
    let module = if base_namespace.is_empty() {
        module
    } else {
        format!("{}\\{}", base_namespace, module)
    };

    Some(Import {
        module,
        names: Vec::new(),
        is_from: true,
        alias,
    })
}

fn build_use_map(root: &Node, source: &[u8]) -> HashMap<String, String> {
    let mut imports = Vec::new();
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        if child.kind() == "namespace_use_declaration" {
            parse_use(&child, source, &mut imports);
        }
    }

    let mut map = HashMap::new();
    for imp in imports {
        let key = match &imp.alias {
            Some(alias) => alias.clone(),
            None => imp
                .module
                .rsplit('\\')
                .next()
                .unwrap_or(&imp.module)
                .to_string(),
        };
        map.insert(key, imp.module);
    }
    map
}

// ============================================================================
// Symbols
// ============================================================================

fn extract_symbols(root: &Node, source: &[u8]) -> Vec<Symbol> {
    let mut symbols = Vec::new();
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        match child.kind() {
            "function_definition" => symbols.push(parse_function(&child, source)),
            "class_declaration" => parse_class(&child, source, &mut symbols),
            _ => {}
        }
    }
    symbols
}

fn parse_function(node: &Node, source: &[u8]) -> Symbol {
    let name = name_child(node, source).unwrap_or_default();
    let params = params_text(node, source);
    let return_type = return_type_text(node, source);

    let mut signature = format!("function {}{}", name, params);
    if !return_type.is_empty() {
        signature.push_str(&format!(": {}", return_type));
    }

    Symbol {
        name,
        kind: SymbolKind::Function,
        signature,
        docstring: extract_doc_comment(node, source),
        line_start: node.start_position().row + 1,
        line_end: node.end_position().row + 1,
        annotations: Vec::new(),
    }
}

fn parse_class(node: &Node, source: &[u8], out: &mut Vec<Symbol>) {
    let class_name = name_child(node, source).unwrap_or_default();
    let mut is_abstract = false;
    let mut is_final = false;
    let mut extends = String::new();
    let mut implements = Vec::new();

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "abstract_modifier" => is_abstract = true,
            "final_modifier" => is_final = true,
            "base_clause" => {
                let mut inner = child.walk();
                for base in child.children(&mut inner) {
                    if matches!(base.kind(), "name" | "qualified_name") {
                        extends = node_text(&base, source);
                    }
                }
            }
            "class_interface_clause" => {
                let mut inner = child.walk();
                for iface in child.children(&mut inner) {
                    if matches!(iface.kind(), "name" | "qualified_name") {
                        implements.push(node_text(&iface, source));
                    }
                }
            }
            _ => {}
        }
    }

    let mut sig_parts = Vec::new();
    if is_abstract {
        sig_parts.push("abstract".to_string());
    } else if is_final {
        sig_parts.push("final".to_string());
    }
    sig_parts.push(format!("class {}", class_name));
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
        docstring: extract_doc_comment(node, source),
        line_start: node.start_position().row + 1,
        line_end: node.end_position().row + 1,
        annotations: Vec::new(),
    });

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "declaration_list" {
            let mut members = child.walk();
            for member in child.children(&mut members) {
                match member.kind() {
                    "method_declaration" => out.push(parse_method(&member, source, &class_name)),
                    "property_declaration" => {
                        out.extend(parse_property(&member, source, &class_name))
                    }
                    _ => {}
                }
            }
        }
    }
}

fn parse_method(node: &Node, source: &[u8], class_name: &str) -> Symbol {
    let name = name_child(node, source).unwrap_or_default();
    let params = params_text(node, source);
    let return_type = return_type_text(node, source);
    let (visibility, is_static) = modifiers(node, source);

    let mut sig_parts = Vec::new();
    if !visibility.is_empty() {
        sig_parts.push(visibility);
    }
    if is_static {
        sig_parts.push("static".to_string());
    }
    sig_parts.push(format!("function {}{}", name, params));
    let mut signature = sig_parts.join(" ");
    if !return_type.is_empty() {
        signature.push_str(&format!(": {}", return_type));
    }

    let kind = if name == "__construct" {
        SymbolKind::Constructor
    } else {
        SymbolKind::Method
    };

    Symbol {
        name: format!("{}::{}", class_name, name),
        kind,
        signature,
        docstring: extract_doc_comment(node, source),
        line_start: node.start_position().row + 1,
        line_end: node.end_position().row + 1,
        annotations: Vec::new(),
    }
}

fn parse_property(node: &Node, source: &[u8], class_name: &str) -> Vec<Symbol> {
    let (visibility, is_static) = modifiers(node, source);
    let mut prop_type = String::new();
    let mut names = Vec::new();

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "named_type" | "primitive_type" | "optional_type" | "union_type" => {
                prop_type = node_text(&child, source);
            }
            "property_element" => {
                let mut inner = child.walk();
                for part in child.children(&mut inner) {
                    if part.kind() == "variable_name" {
                        names.push(node_text(&part, source));
                    }
                }
            }
            _ => {}
        }
    }

    names
        .into_iter()
        .map(|prop_name| {
            let mut sig_parts = Vec::new();
            if !visibility.is_empty() {
                sig_parts.push(visibility.clone());
            }
            if is_static {
                sig_parts.push("static".to_string());
            }
            if !prop_type.is_empty() {
                sig_parts.push(prop_type.clone());
            }
            sig_parts.push(prop_name.clone());

            Symbol {
                name: format!("{}::{}", class_name, prop_name),
                kind: SymbolKind::Property,
                signature: sig_parts.join(" "),
                docstring: String::new(),
                line_start: node.start_position().row + 1,
                line_end: node.end_position().row + 1,
                annotations: Vec::new(),
            }
        })
        .collect()
}

fn modifiers(node: &Node, source: &[u8]) -> (String, bool) {
    let mut visibility = String::new();
    let mut is_static = false;
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "visibility_modifier" => visibility = node_text(&child, source),
            "static_modifier" => is_static = true,
            _ => {}
        }
    }
    (visibility, is_static)
}

fn name_child(node: &Node, source: &[u8]) -> Option<String> {
    if let Some(name) = node.child_by_field_name("name") {
        return Some(node_text(&name, source));
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "name" {
            return Some(node_text(&child, source));
        }
    }
    None
}

fn params_text(node: &Node, source: &[u8]) -> String {
    if let Some(params) = node.child_by_field_name("parameters") {
        return node_text(&params, source);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "formal_parameters" {
            return node_text(&child, source);
        }
    }
    String::new()
}

fn return_type_text(node: &Node, source: &[u8]) -> String {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if matches!(
            child.kind(),
            "named_type" | "primitive_type" | "optional_type" | "union_type"
        ) {
            return node_text(&child, source);
        }
    }
    String::new()
}

// ============================================================================
// Doc comments
// ============================================================================

/// PHPDoc (`/** */`) or `//` comment; checked on children first, then the
/// previous sibling (method-level comments are siblings in the grammar)
fn extract_doc_comment(node: &Node, source: &[u8]) -> String {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "comment" {
            return clean_comment(&node_text(&child, source));
        }
    }
    if let Some(prev) = node.prev_sibling() {
        if prev.kind() == "comment" {
            return clean_comment(&node_text(&prev, source));
        }
    }
    String::new()
}

/// Extract the description from a PHPDoc block, stopping at the first
/// annotation line (`@param`, `@return`, ...)
fn clean_comment(text: &str) -> String {
    let text = text.trim();
    if let Some(line_comment) = text.strip_prefix("//") {
        return line_comment.trim().to_string();
    }
    if !text.starts_with("/**") {
        return String::new();
    }

    if !text.contains('\n') {
        let content = text
            .trim_start_matches("/**")
            .trim_end_matches("*/")
            .trim();
        if content.starts_with('@') {
            return String::new();
        }
        return content.to_string();
    }

    let mut description = Vec::new();
    let lines: Vec<&str> = text.lines().collect();
    for line in &lines[1..lines.len().saturating_sub(1)] {
        let line = line.trim().trim_start_matches('*').trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with('@') {
            break;
        }
        description.push(line);
    }
    description.join(" ")
}

// ============================================================================
// Inheritances
// ============================================================================

fn extract_inheritances(
    root: &Node,
    source: &[u8],
    namespace: &str,
    use_map: &HashMap<String, String>,
) -> Vec<Inheritance> {
    let mut inheritances = Vec::new();
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        if child.kind() != "class_declaration" {
            continue;
        }
        let Some(class_name) = name_child(&child, source) else {
            continue;
        };
        let full_class = if namespace.is_empty() {
            class_name
        } else {
            format!("{}\\{}", namespace, class_name)
        };

        let mut inner = child.walk();
        for clause in child.children(&mut inner) {
            match clause.kind() {
                "base_clause" | "class_interface_clause" => {
                    let mut parents = clause.walk();
                    for parent in clause.children(&mut parents) {
                        if matches!(parent.kind(), "name" | "qualified_name") {
                            inheritances.push(Inheritance {
                                child: full_class.clone(),
                                parent: qualify(&node_text(&parent, source), namespace, use_map),
                            });
                        }
                    }
                }
                _ => {}
            }
        }
    }
    inheritances
}

// ============================================================================
// Calls
// ============================================================================

fn extract_calls(
    root: &Node,
    source: &[u8],
    namespace: &str,
    use_map: &HashMap<String, String>,
    inheritances: &[Inheritance],
) -> Vec<Call> {
    let parent_map: HashMap<String, String> = inheritances
        .iter()
        .map(|inh| (inh.child.clone(), inh.parent.clone()))
        .collect();

    let mut calls = Vec::new();
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        match child.kind() {
            "function_definition" => {
                if let Some(func_name) = name_child(&child, source) {
                    let caller = if namespace.is_empty() {
                        func_name
                    } else {
                        format!("{}\\{}", namespace, func_name)
                    };
                    collect_calls_in(
                        &child, source, &caller, "", namespace, use_map, &parent_map, &mut calls,
                    );
                }
            }
            "class_declaration" => {
                let Some(class_name) = name_child(&child, source) else {
                    continue;
                };
                let full_class = if namespace.is_empty() {
                    class_name
                } else {
                    format!("{}\\{}", namespace, class_name)
                };

                let mut inner = child.walk();
                for body in child.children(&mut inner) {
                    if body.kind() != "declaration_list" {
                        continue;
                    }
                    let mut members = body.walk();
                    for member in body.children(&mut members) {
                        if member.kind() != "method_declaration" {
                            continue;
                        }
                        if let Some(method_name) = name_child(&member, source) {
                            let caller = format!("{}::{}", full_class, method_name);
                            collect_calls_in(
                                &member,
                                source,
                                &caller,
                                &full_class,
                                namespace,
                                use_map,
                                &parent_map,
                                &mut calls,
                            );
                        }
                    }
                }
            }
            _ => {}
        }
    }
    calls
}

#[allow(clippy::too_many_arguments)]
fn collect_calls_in(
    node: &Node,
    source: &[u8],
    caller: &str,
    current_class: &str,
    namespace: &str,
    use_map: &HashMap<String, String>,
    parent_map: &HashMap<String, String>,
    calls: &mut Vec<Call>,
) {
    match node.kind() {
        "function_call_expression" => {
            if let Some(call) = parse_function_call(node, source, caller, use_map) {
                calls.push(call);
            }
        }
        "member_call_expression" => {
            if let Some(call) =
                parse_member_call(node, source, caller, current_class, namespace, use_map)
            {
                calls.push(call);
            }
        }
        "scoped_call_expression" => {
            if let Some(call) = parse_scoped_call(
                node,
                source,
                caller,
                current_class,
                namespace,
                use_map,
                parent_map,
            ) {
                calls.push(call);
            }
        }
        "object_creation_expression" => {
            if let Some(call) = parse_object_creation(node, source, caller, namespace, use_map) {
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
            current_class,
            namespace,
            use_map,
            parent_map,
            calls,
        );
    }
}

fn call_arguments_count(node: &Node) -> Option<usize> {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "arguments" {
            return crate::parsing::count_arguments(&child);
        }
    }
    None
}

fn parse_function_call(
    node: &Node,
    source: &[u8],
    caller: &str,
    use_map: &HashMap<String, String>,
) -> Option<Call> {
    let mut func_name = String::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if matches!(child.kind(), "name" | "qualified_name") {
            func_name = node_text(&child, source);
            break;
        }
    }
    if func_name.is_empty() {
        return None;
    }

    // Built-ins like var_dump stay bare; qualified names drop the leading `\`
    let callee = if let Some(stripped) = func_name.strip_prefix('\\') {
        stripped.to_string()
    } else if let Some(full) = use_map.get(&func_name) {
        full.clone()
    } else {
        func_name
    };

    Some(Call {
        caller: caller.to_string(),
        callee: Some(callee),
        line_number: node.start_position().row + 1,
        call_type: CallType::Function,
        arguments_count: call_arguments_count(node),
    })
}

fn parse_member_call(
    node: &Node,
    source: &[u8],
    caller: &str,
    current_class: &str,
    namespace: &str,
    use_map: &HashMap<String, String>,
) -> Option<Call> {
    let mut object_name: Option<String> = None;
    let mut method_name: Option<String> = None;

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "variable_name" => {
                if object_name.is_none() {
                    object_name = Some(node_text(&child, source));
                }
            }
            "name" => method_name = Some(node_text(&child, source)),
            _ => {}
        }
    }
    let method_name = method_name?;
    let line_number = node.start_position().row + 1;
    let arguments_count = call_arguments_count(node);

    if object_name.as_deref() == Some("$this") && !current_class.is_empty() {
        return Some(Call {
            caller: caller.to_string(),
            callee: Some(format!("{}::{}", current_class, method_name)),
            line_number,
            call_type: CallType::Method,
            arguments_count,
        });
    }

    if let Some(object) = object_name.as_deref().and_then(|o| o.strip_prefix('$')) {
        // Known-imprecise but load-bearing: guess the class by capitalizing
        // the receiver variable name
        let mut chars = object.chars();
        let class_guess: String = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
        if !class_guess.is_empty() {
            let full_class = qualify(&class_guess, namespace, use_map);
            return Some(Call {
                caller: caller.to_string(),
                callee: Some(format!("{}::{}", full_class, method_name)),
                line_number,
                call_type: CallType::Method,
                arguments_count,
            });
        }
    }

    // Receiver not recoverable (chained call, expression receiver, ...)
    Some(Call {
        caller: caller.to_string(),
        callee: None,
        line_number,
        call_type: CallType::Dynamic,
        arguments_count,
    })
}

fn parse_scoped_call(
    node: &Node,
    source: &[u8],
    caller: &str,
    current_class: &str,
    namespace: &str,
    use_map: &HashMap<String, String>,
    parent_map: &HashMap<String, String>,
) -> Option<Call> {
    let mut scope_name: Option<String> = None;
    let mut method_name: Option<String> = None;

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "name" | "qualified_name" | "relative_scope" => {
                if scope_name.is_none() {
                    scope_name = Some(node_text(&child, source));
                } else if child.kind() == "name" {
                    method_name = Some(node_text(&child, source));
                }
            }
            _ => {}
        }
    }
    let scope = scope_name?;
    let method_name = method_name?;

    let callee = match scope.as_str() {
        "parent" if !current_class.is_empty() => match parent_map.get(current_class) {
            Some(parent) => format!("{}::{}", parent, method_name),
            None => format!("parent::{}", method_name),
        },
        "self" | "static" if !current_class.is_empty() => {
            format!("{}::{}", current_class, method_name)
        }
        _ => format!("{}::{}", qualify(&scope, namespace, use_map), method_name),
    };

    Some(Call {
        caller: caller.to_string(),
        callee: Some(callee),
        line_number: node.start_position().row + 1,
        call_type: CallType::StaticMethod,
        arguments_count: call_arguments_count(node),
    })
}

fn parse_object_creation(
    node: &Node,
    source: &[u8],
    caller: &str,
    namespace: &str,
    use_map: &HashMap<String, String>,
) -> Option<Call> {
    let mut class_name = String::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "name" | "qualified_name" => {
                class_name = node_text(&child, source);
                break;
            }
            // anonymous classes (`new class { ... }`) are skipped
            "class" => return None,
            _ => {}
        }
    }
    if class_name.is_empty() {
        return None;
    }

    let full_class = qualify(&class_name, namespace, use_map);

    Some(Call {
        caller: caller.to_string(),
        callee: Some(format!("{}::__construct", full_class)),
        line_number: node.start_position().row + 1,
        call_type: CallType::Constructor,
        arguments_count: call_arguments_count(node),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::Lang;
    use crate::parsing::parse_bytes;
    use std::path::PathBuf;

    fn parse(source: &str) -> ParseResult {
        parse_bytes(&PathBuf::from("test.php"), Lang::Php, source.as_bytes())
    }

    #[test]
    fn test_namespace_and_class_symbols() {
        let result = parse(
            "<?php\nnamespace App\\Models;\n\nclass User {\n    public $name;\n    public function save(): bool {\n        return true;\n    }\n}\n",
        );
        assert!(result.error.is_none());
        assert_eq!(result.namespace, "App\\Models");

        let names: Vec<&str> = result.symbols.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["User", "User::$name", "User::save"]);
        assert_eq!(result.symbols[1].kind, SymbolKind::Property);
        assert!(result.symbols[2].signature.contains("public"));
        assert!(result.symbols[2].signature.contains(": bool"));
    }

    #[test]
    fn test_use_forms() {
        let result = parse(
            "<?php\nuse App\\Service\\UserService;\nuse App\\Model\\User as UserModel;\nuse App\\Repo\\{UserRepo, OrderRepo as Orders};\n",
        );
        let imports = &result.imports;
        assert_eq!(imports.len(), 4);
        assert_eq!(imports[0].module, "App\\Service\\UserService");
        assert!(imports[0].names.is_empty());
        assert!(imports[0].alias.is_none());
        assert_eq!(imports[1].alias.as_deref(), Some("UserModel"));
        assert_eq!(imports[2].module, "App\\Repo\\UserRepo");
        assert_eq!(imports[3].module, "App\\Repo\\OrderRepo");
        assert_eq!(imports[3].alias.as_deref(), Some("Orders"));
    }

    #[test]
    fn test_require_literal() {
        let result = parse("<?php\nrequire 'vendor/autoload.php';\n");
        assert_eq!(result.imports[0].module, "vendor/autoload.php");
        assert!(!result.imports[0].is_from);
    }

    #[test]
    fn test_inheritance_resolution() {
        let result = parse(
            "<?php\nnamespace App;\nuse Lib\\Base as B;\n\nclass C extends B implements Countable {\n}\n",
        );
        assert_eq!(result.inheritances.len(), 2);
        assert_eq!(result.inheritances[0].child, "App\\C");
        assert_eq!(result.inheritances[0].parent, "Lib\\Base");
        // no use-map entry: namespace qualification
        assert_eq!(result.inheritances[1].parent, "App\\Countable");
    }

    #[test]
    fn test_scoped_call_via_alias() {
        let result =
            parse("<?php\nnamespace App;\nuse X\\Y as Z;\nclass C { function f() { Z::g(); } }\n");
        let call = &result.calls[0];
        assert_eq!(call.caller, "App\\C::f");
        assert_eq!(call.callee.as_deref(), Some("X\\Y::g"));
        assert_eq!(call.call_type, CallType::StaticMethod);
    }

    #[test]
    fn test_this_method_call() {
        let result =
            parse("<?php\nclass C { function f() { $this->m(1, 2); } function m($a, $b) {} }\n");
        let call = &result.calls[0];
        assert_eq!(call.caller, "C::f");
        assert_eq!(call.callee.as_deref(), Some("C::m"));
        assert_eq!(call.call_type, CallType::Method);
        assert_eq!(call.arguments_count, Some(2));
    }

    #[test]
    fn test_parent_self_static_scopes() {
        let result = parse(
            "<?php\nnamespace App;\nclass Base { function init() {} }\nclass Child extends Base {\n    function boot() {\n        parent::init();\n        self::helper();\n        static::helper();\n    }\n    function helper() {}\n}\n",
        );
        let callees: Vec<&str> = result
            .calls
            .iter()
            .filter_map(|c| c.callee.as_deref())
            .collect();
        assert!(callees.contains(&"App\\Base::init"));
        assert_eq!(
            callees.iter().filter(|c| **c == "App\\Child::helper").count(),
            2
        );
    }

    #[test]
    fn test_constructor_via_alias() {
        let result = parse("<?php\nnamespace App;\nuse X\\Y as D;\nfunction make() { return new D(); }\n");
        let call = &result.calls[0];
        assert_eq!(call.callee.as_deref(), Some("X\\Y::__construct"));
        assert_eq!(call.call_type, CallType::Constructor);
        assert_eq!(call.caller, "App\\make");
    }

    #[test]
    fn test_member_call_variable_heuristic() {
        let result = parse(
            "<?php\nnamespace App;\nuse Lib\\Mailer;\nclass C { function f() { $mailer->send(); $order->ship(); } }\n",
        );
        let callees: Vec<&str> = result
            .calls
            .iter()
            .filter_map(|c| c.callee.as_deref())
            .collect();
        assert!(callees.contains(&"Lib\\Mailer::send"));
        assert!(callees.contains(&"App\\Order::ship"));
    }

    #[test]
    fn test_bare_builtin_function_call() {
        let result = parse("<?php\nfunction f() { var_dump(1); }\n");
        assert_eq!(result.calls[0].callee.as_deref(), Some("var_dump"));
        assert_eq!(result.calls[0].call_type, CallType::Function);
    }

    #[test]
    fn test_anonymous_class_skipped() {
        let result = parse("<?php\nfunction f() { $x = new class { public function m() {} }; }\n");
        assert!(result
            .calls
            .iter()
            .all(|c| c.call_type != CallType::Constructor));
    }

    #[test]
    fn test_phpdoc_description() {
        let result = parse(
            "<?php\nclass C {\n    /**\n     * Saves the model.\n     *\n     * @return bool\n     */\n    public function save() {}\n}\n",
        );
        let save = result.symbols.iter().find(|s| s.name == "C::save").unwrap();
        assert_eq!(save.docstring, "Saves the model.");
    }

    #[test]
    fn test_constructor_symbol_kind() {
        let result = parse("<?php\nclass C { public function __construct() {} }\n");
        let ctor = result
            .symbols
            .iter()
            .find(|s| s.name == "C::__construct")
            .unwrap();
        assert_eq!(ctor.kind, SymbolKind::Constructor);
    }
}
