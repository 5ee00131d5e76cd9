//! Python fact extraction
//!
//! Handles module/class/function symbols (including nesting and decorated
//! definitions), all import forms, base-class edges with subscript generics
//! stripped, and call edges with alias, `self.` and `super().` resolution.

use std::collections::HashMap;
use std::path::Path;

use tree_sitter::{Node, Tree};

use crate::parsing::{count_arguments, node_text};
use crate::schema::{
    Call, CallType, Import, Inheritance, ParseResult, Symbol, SymbolKind, MODULE_CALLER,
};

use super::{starts_uppercase, strip_generics};

/// Builtins whose invocation is dynamic dispatch rather than a direct call
const DYNAMIC_BUILTINS: [&str; 5] = ["getattr", "setattr", "eval", "exec", "__import__"];

pub fn extract(path: &Path, tree: &Tree, source: &[u8]) -> ParseResult {
    let root = tree.root_node();

    let symbols = extract_symbols(&root, source);
    let imports = extract_imports(&root, source);
    let inheritances = extract_inheritances(&root, source);
    let calls = extract_calls(&root, source, &imports, &inheritances);

    ParseResult {
        path: path.display().to_string(),
        language: "python".to_string(),
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
        collect_definition_symbols(&child, source, "", &mut symbols);
    }
    symbols
}

fn collect_definition_symbols(node: &Node, source: &[u8], owner: &str, out: &mut Vec<Symbol>) {
    match node.kind() {
        "function_definition" => out.push(parse_function(node, source, owner)),
        "class_definition" => parse_class(node, source, owner, out),
        "decorated_definition" => {
            let mut cursor = node.walk();
            for inner in node.children(&mut cursor) {
                if matches!(inner.kind(), "function_definition" | "class_definition") {
                    collect_definition_symbols(&inner, source, owner, out);
                }
            }
        }
        _ => {}
    }
}

fn parse_function(node: &Node, source: &[u8], owner: &str) -> Symbol {
    let name = node
        .child_by_field_name("name")
        .map(|n| node_text(&n, source))
        .unwrap_or_default();
    let params = node
        .child_by_field_name("parameters")
        .map(|n| node_text(&n, source))
        .unwrap_or_default();
    let return_type = node
        .child_by_field_name("return_type")
        .map(|n| format!(" -> {}", node_text(&n, source)))
        .unwrap_or_default();

    let (kind, full_name) = if owner.is_empty() {
        (SymbolKind::Function, name.clone())
    } else if name == "__init__" {
        (SymbolKind::Constructor, format!("{}.{}", owner, name))
    } else {
        (SymbolKind::Method, format!("{}.{}", owner, name))
    };

    Symbol {
        name: full_name,
        kind,
        signature: format!("def {}{}{}", name, params, return_type),
        docstring: extract_docstring(node, source),
        line_start: node.start_position().row + 1,
        line_end: node.end_position().row + 1,
        annotations: Vec::new(),
    }
}

fn parse_class(node: &Node, source: &[u8], owner: &str, out: &mut Vec<Symbol>) {
    let class_name = node
        .child_by_field_name("name")
        .map(|n| node_text(&n, source))
        .unwrap_or_default();
    let bases = class_bases(node, source);

    let full_name = if owner.is_empty() {
        class_name.clone()
    } else {
        format!("{}.{}", owner, class_name)
    };

    let mut signature = format!("class {}", class_name);
    if !bases.is_empty() {
        signature.push_str(&format!("({})", bases.join(", ")));
    }

    out.push(Symbol {
        name: full_name.clone(),
        kind: SymbolKind::Class,
        signature,
        docstring: extract_docstring(node, source),
        line_start: node.start_position().row + 1,
        line_end: node.end_position().row + 1,
        annotations: Vec::new(),
    });

    if let Some(body) = node.child_by_field_name("body") {
        let mut cursor = body.walk();
        for member in body.children(&mut cursor) {
            collect_definition_symbols(&member, source, &full_name, out);
        }
    }
}

/// Base names from a class head's argument list, subscript generics stripped
fn class_bases(class_node: &Node, source: &[u8]) -> Vec<String> {
    let mut bases = Vec::new();
    if let Some(args) = class_node.child_by_field_name("superclasses") {
        let mut cursor = args.walk();
        for arg in args.children(&mut cursor) {
            if matches!(arg.kind(), "identifier" | "attribute" | "subscript") {
                bases.push(strip_generics(&node_text(&arg, source)));
            }
        }
    }
    bases
}

// ============================================================================
// Docstrings
// ============================================================================

fn extract_docstring(def_node: &Node, source: &[u8]) -> String {
    let Some(body) = def_node.child_by_field_name("body") else {
        return String::new();
    };
    let Some(first) = body.named_child(0) else {
        return String::new();
    };
    if first.kind() != "expression_statement" {
        return String::new();
    }
    string_in_statement(&first, source).unwrap_or_default()
}

fn extract_module_docstring(root: &Node, source: &[u8]) -> String {
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        match child.kind() {
            "expression_statement" => {
                return string_in_statement(&child, source).unwrap_or_default();
            }
            "comment" => continue,
            _ => break,
        }
    }
    String::new()
}

fn string_in_statement(stmt: &Node, source: &[u8]) -> Option<String> {
    let mut cursor = stmt.walk();
    for expr in stmt.children(&mut cursor) {
        if expr.kind() == "string" {
            return Some(clean_string_literal(&node_text(&expr, source)));
        }
    }
    None
}

fn clean_string_literal(text: &str) -> String {
    let t = text.trim();
    for quote in ["\"\"\"", "'''"] {
        if t.len() >= 6 && t.starts_with(quote) && t.ends_with(quote) {
            return t[3..t.len() - 3].trim().to_string();
        }
    }
    for quote in ['"', '\''] {
        if t.len() >= 2 && t.starts_with(quote) && t.ends_with(quote) {
            return t[1..t.len() - 1].trim().to_string();
        }
    }
    t.to_string()
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
            "import_from_statement" => parse_from_import(&child, source, &mut imports),
            _ => {}
        }
    }
    imports
}

fn parse_import_statement(node: &Node, source: &[u8], out: &mut Vec<Import>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "dotted_name" => out.push(Import {
                module: node_text(&child, source),
                names: Vec::new(),
                is_from: false,
                alias: None,
            }),
            "aliased_import" => {
                let module = child
                    .child_by_field_name("name")
                    .map(|n| node_text(&n, source))
                    .unwrap_or_default();
                let alias = child.child_by_field_name("alias").map(|n| node_text(&n, source));
                if !module.is_empty() {
                    out.push(Import {
                        module,
                        names: Vec::new(),
                        is_from: false,
                        alias,
                    });
                }
            }
            _ => {}
        }
    }
}

/// `from M import A as B, C` yields one Import per target, each with its own
/// alias; the alias map for call resolution depends on this
fn parse_from_import(node: &Node, source: &[u8], out: &mut Vec<Import>) {
    let Some(module_node) = node.child_by_field_name("module_name") else {
        return;
    };
    let module = node_text(&module_node, source);
    if module.is_empty() {
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.id() == module_node.id() {
            continue;
        }
        match child.kind() {
            "dotted_name" | "identifier" => {
                let name = node_text(&child, source);
                if name != module && !matches!(name.as_str(), "from" | "import") {
                    out.push(Import {
                        module: module.clone(),
                        names: vec![name],
                        is_from: true,
                        alias: None,
                    });
                }
            }
            "aliased_import" => {
                let name = child
                    .child_by_field_name("name")
                    .map(|n| node_text(&n, source))
                    .unwrap_or_default();
                let alias = child.child_by_field_name("alias").map(|n| node_text(&n, source));
                if !name.is_empty() {
                    out.push(Import {
                        module: module.clone(),
                        names: vec![name],
                        is_from: true,
                        alias,
                    });
                }
            }
            "wildcard_import" => out.push(Import {
                module: module.clone(),
                names: vec!["*".to_string()],
                is_from: true,
                alias: None,
            }),
            _ => {}
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
        collect_class_inheritances(&child, source, "", &mut inheritances);
    }
    inheritances
}

fn collect_class_inheritances(node: &Node, source: &[u8], owner: &str, out: &mut Vec<Inheritance>) {
    match node.kind() {
        "class_definition" => {
            let class_name = node
                .child_by_field_name("name")
                .map(|n| node_text(&n, source))
                .unwrap_or_default();
            let full_name = if owner.is_empty() {
                class_name
            } else {
                format!("{}.{}", owner, class_name)
            };
            for base in class_bases(node, source) {
                out.push(Inheritance {
                    child: full_name.clone(),
                    parent: base,
                });
            }
            if let Some(body) = node.child_by_field_name("body") {
                let mut cursor = body.walk();
                for member in body.children(&mut cursor) {
                    collect_class_inheritances(&member, source, &full_name, out);
                }
            }
        }
        "decorated_definition" => {
            let mut cursor = node.walk();
            for inner in node.children(&mut cursor) {
                if inner.kind() == "class_definition" {
                    collect_class_inheritances(&inner, source, owner, out);
                }
            }
        }
        _ => {}
    }
}

// ============================================================================
// Calls
// ============================================================================

/// Map local bindings to their source-of-truth names:
/// `import pandas as pd` → `pd: pandas`,
/// `from numpy import array as np_array` → `np_array: numpy.array`
fn build_alias_map(imports: &[Import]) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for imp in imports {
        if let Some(alias) = &imp.alias {
            if imp.is_from && !imp.names.is_empty() {
                map.insert(alias.clone(), format!("{}.{}", imp.module, imp.names[0]));
            } else {
                map.insert(alias.clone(), imp.module.clone());
            }
        }
    }
    map
}

fn resolve_alias(callee: &str, alias_map: &HashMap<String, String>) -> String {
    if callee.is_empty() {
        return callee.to_string();
    }
    if let Some(resolved) = alias_map.get(callee) {
        return resolved.clone();
    }
    if let Some((prefix, suffix)) = callee.split_once('.') {
        if let Some(resolved) = alias_map.get(prefix) {
            return format!("{}.{}", resolved, suffix);
        }
    }
    callee.to_string()
}

fn extract_calls(
    root: &Node,
    source: &[u8],
    imports: &[Import],
    inheritances: &[Inheritance],
) -> Vec<Call> {
    let alias_map = build_alias_map(imports);
    let parent_map: HashMap<String, String> = inheritances
        .iter()
        .map(|inh| (inh.child.clone(), inh.parent.clone()))
        .collect();

    let mut calls = Vec::new();
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        match child.kind() {
            "function_definition" => {
                if let Some(name) = definition_name(&child, source) {
                    collect_calls_in(&child, source, &name, &alias_map, &parent_map, &mut calls);
                }
            }
            "class_definition" => {
                collect_class_calls(&child, source, &alias_map, &parent_map, &mut calls);
            }
            "decorated_definition" => {
                collect_decorator_calls(&child, source, MODULE_CALLER, &mut calls);
                let mut inner_cursor = child.walk();
                for inner in child.children(&mut inner_cursor) {
                    match inner.kind() {
                        "function_definition" => {
                            if let Some(name) = definition_name(&inner, source) {
                                collect_calls_in(
                                    &inner, source, &name, &alias_map, &parent_map, &mut calls,
                                );
                            }
                        }
                        "class_definition" => {
                            collect_class_calls(&inner, source, &alias_map, &parent_map, &mut calls);
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }
    calls
}

fn collect_class_calls(
    class_node: &Node,
    source: &[u8],
    alias_map: &HashMap<String, String>,
    parent_map: &HashMap<String, String>,
    calls: &mut Vec<Call>,
) {
    let Some(class_name) = definition_name(class_node, source) else {
        return;
    };
    let Some(body) = class_node.child_by_field_name("body") else {
        return;
    };

    let mut cursor = body.walk();
    for member in body.children(&mut cursor) {
        match member.kind() {
            "function_definition" => {
                if let Some(method_name) = definition_name(&member, source) {
                    let caller = format!("{}.{}", class_name, method_name);
                    collect_calls_in(&member, source, &caller, alias_map, parent_map, calls);
                }
            }
            "decorated_definition" => {
                collect_decorator_calls(&member, source, &class_name, calls);
                let mut inner_cursor = member.walk();
                for inner in member.children(&mut inner_cursor) {
                    if inner.kind() == "function_definition" {
                        if let Some(method_name) = definition_name(&inner, source) {
                            let caller = format!("{}.{}", class_name, method_name);
                            collect_calls_in(&inner, source, &caller, alias_map, parent_map, calls);
                        }
                    }
                }
            }
            _ => {}
        }
    }
}

fn definition_name(node: &Node, source: &[u8]) -> Option<String> {
    node.child_by_field_name("name")
        .map(|n| node_text(&n, source))
        .filter(|n| !n.is_empty())
}

fn collect_calls_in(
    node: &Node,
    source: &[u8],
    caller: &str,
    alias_map: &HashMap<String, String>,
    parent_map: &HashMap<String, String>,
    calls: &mut Vec<Call>,
) {
    if node.kind() == "call" {
        if let Some(call) = parse_call(node, source, caller, alias_map, parent_map) {
            calls.push(call);
        }
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_calls_in(&child, source, caller, alias_map, parent_map, calls);
    }
}

fn parse_call(
    node: &Node,
    source: &[u8],
    caller: &str,
    alias_map: &HashMap<String, String>,
    parent_map: &HashMap<String, String>,
) -> Option<Call> {
    let func = node.child_by_field_name("function")?;
    let mut callee = extract_call_name(&func, source);
    if callee.is_empty() {
        return None;
    }

    // self.m() inside Owner.m -> Owner.m
    if callee.starts_with("self.") && caller.contains('.') {
        let class_name = caller.rsplit_once('.').map(|(c, _)| c).unwrap_or(caller);
        callee = callee.replacen("self.", &format!("{}.", class_name), 1);
    }

    // super().m() inside Child.m with a known parent -> Parent.m
    if callee.starts_with("super.") && caller.contains('.') {
        let class_name = caller.rsplit_once('.').map(|(c, _)| c).unwrap_or(caller);
        if let Some(parent) = parent_map.get(class_name) {
            callee = callee.replacen("super.", &format!("{}.", parent), 1);
        }
    }

    let mut callee = resolve_alias(&callee, alias_map);
    let call_type = determine_call_type(&func, source);

    if call_type == CallType::Constructor {
        callee.push_str(".__init__");
    }

    let arguments_count = node
        .child_by_field_name("arguments")
        .and_then(|args| count_arguments(&args));

    Some(Call {
        caller: caller.to_string(),
        callee: Some(callee),
        line_number: node.start_position().row + 1,
        call_type,
        arguments_count,
    })
}

/// Raw callee name: plain identifier, dotted attribute path, or `super.<m>`
/// for `super().m(...)`
fn extract_call_name(func: &Node, source: &[u8]) -> String {
    match func.kind() {
        "identifier" => node_text(func, source),
        "attribute" => {
            let mut parts: Vec<String> = Vec::new();
            let mut current = Some(*func);
            while let Some(node) = current {
                match node.kind() {
                    "attribute" => {
                        if let Some(attr) = node.child_by_field_name("attribute") {
                            parts.insert(0, node_text(&attr, source));
                        }
                        current = node.child_by_field_name("object");
                    }
                    "identifier" => {
                        parts.insert(0, node_text(&node, source));
                        break;
                    }
                    "call" => {
                        let is_super = node
                            .child_by_field_name("function")
                            .filter(|f| f.kind() == "identifier")
                            .map(|f| node_text(&f, source) == "super")
                            .unwrap_or(false);
                        parts.insert(0, if is_super { "super".into() } else { "<call>".into() });
                        break;
                    }
                    _ => break,
                }
            }
            parts.join(".")
        }
        _ => String::new(),
    }
}

fn determine_call_type(func: &Node, source: &[u8]) -> CallType {
    match func.kind() {
        "identifier" => {
            let name = node_text(func, source);
            if starts_uppercase(&name) {
                CallType::Constructor
            } else if DYNAMIC_BUILTINS.contains(&name.as_str()) {
                CallType::Dynamic
            } else {
                CallType::Function
            }
        }
        "attribute" => {
            if let Some(attr) = func.child_by_field_name("attribute") {
                if starts_uppercase(&node_text(&attr, source)) {
                    return CallType::Constructor;
                }
            }
            if let Some(obj) = func.child_by_field_name("object") {
                if obj.kind() == "identifier" && starts_uppercase(&node_text(&obj, source)) {
                    return CallType::StaticMethod;
                }
            }
            CallType::Method
        }
        _ => CallType::Function,
    }
}

// ============================================================================
// Decorators
// ============================================================================

/// Only simple decorators (`@name`, `@mod.name`) emit call edges; decorated
/// calls like `@name(...)` are skipped.
fn is_simple_decorator(decorator: &Node) -> bool {
    let mut cursor = decorator.walk();
    for child in decorator.children(&mut cursor) {
        if child.kind() == "call" {
            return false;
        }
    }
    true
}

fn decorator_name(decorator: &Node, source: &[u8]) -> String {
    let mut cursor = decorator.walk();
    for child in decorator.children(&mut cursor) {
        match child.kind() {
            "identifier" => return node_text(&child, source),
            "attribute" => return extract_call_name(&child, source),
            _ => {}
        }
    }
    String::new()
}

fn collect_decorator_calls(decorated: &Node, source: &[u8], caller: &str, calls: &mut Vec<Call>) {
    let mut cursor = decorated.walk();
    for child in decorated.children(&mut cursor) {
        if child.kind() == "decorator" && is_simple_decorator(&child) {
            let name = decorator_name(&child, source);
            if !name.is_empty() {
                calls.push(Call {
                    caller: caller.to_string(),
                    callee: Some(name),
                    line_number: child.start_position().row + 1,
                    call_type: CallType::Function,
                    // a decorator receives exactly the decorated object
                    arguments_count: Some(1),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::Lang;
    use crate::parsing::parse_bytes;
    use std::path::PathBuf;

    fn parse(source: &str) -> ParseResult {
        parse_bytes(&PathBuf::from("test.py"), Lang::Python, source.as_bytes())
    }

    #[test]
    fn test_symbols_functions_and_classes() {
        let result = parse(
            "def top():\n    pass\n\nclass Calculator:\n    \"\"\"Does math.\"\"\"\n\n    def add(self, a, b):\n        return a + b\n",
        );
        assert!(result.error.is_none());
        let names: Vec<&str> = result.symbols.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["top", "Calculator", "Calculator.add"]);
        assert_eq!(result.symbols[1].kind, SymbolKind::Class);
        assert_eq!(result.symbols[1].docstring, "Does math.");
        assert_eq!(result.symbols[2].kind, SymbolKind::Method);
    }

    #[test]
    fn test_nested_class_symbols_and_inheritance() {
        let result = parse(
            "class Outer:\n    class Inner(Base):\n        def m(self):\n            pass\n",
        );
        let names: Vec<&str> = result.symbols.iter().map(|s| s.name.as_str()).collect();
        assert!(names.contains(&"Outer.Inner"));
        assert!(names.contains(&"Outer.Inner.m"));
        assert_eq!(
            result.inheritances,
            vec![Inheritance {
                child: "Outer.Inner".to_string(),
                parent: "Base".to_string()
            }]
        );
    }

    #[test]
    fn test_generic_base_stripped() {
        let result = parse("class Stack(Generic[T]):\n    pass\n");
        assert_eq!(result.inheritances[0].parent, "Generic");
        assert!(result.symbols[0].signature.contains("Generic"));
    }

    #[test]
    fn test_import_forms() {
        let result = parse(
            "import os\nimport numpy as np\nfrom typing import Dict as D, List\nfrom . import sibling\n",
        );
        let imports = &result.imports;
        assert_eq!(imports.len(), 5);

        assert_eq!(imports[0].module, "os");
        assert!(!imports[0].is_from);
        assert!(imports[0].alias.is_none());

        assert_eq!(imports[1].module, "numpy");
        assert_eq!(imports[1].alias.as_deref(), Some("np"));

        assert_eq!(imports[2].module, "typing");
        assert_eq!(imports[2].names, vec!["Dict"]);
        assert_eq!(imports[2].alias.as_deref(), Some("D"));

        assert_eq!(imports[3].module, "typing");
        assert_eq!(imports[3].names, vec!["List"]);
        assert!(imports[3].alias.is_none());

        assert_eq!(imports[4].module, ".");
        assert_eq!(imports[4].names, vec!["sibling"]);
    }

    #[test]
    fn test_wildcard_import() {
        let result = parse("from pkg import *\n");
        assert_eq!(result.imports[0].names, vec!["*"]);
        assert!(result.imports[0].is_from);
    }

    #[test]
    fn test_alias_resolution_in_calls() {
        let result = parse("import pandas as pd\ndef load():\n    pd.read_csv(\"x\")\n");
        let call = &result.calls[0];
        assert_eq!(call.caller, "load");
        assert_eq!(call.callee.as_deref(), Some("pandas.read_csv"));
        assert_eq!(call.call_type, CallType::Method);
        assert_eq!(call.arguments_count, Some(1));
    }

    #[test]
    fn test_from_import_alias_direct_match() {
        let result = parse("from numpy import array as np_array\ndef f():\n    np_array([1])\n");
        assert_eq!(result.calls[0].callee.as_deref(), Some("numpy.array"));
        assert_eq!(result.calls[0].call_type, CallType::Function);
    }

    #[test]
    fn test_super_resolution() {
        let result = parse(
            "class A:\n    def f(self):\n        pass\n\nclass B(A):\n    def f(self):\n        super().f()\n",
        );
        assert_eq!(
            result.inheritances,
            vec![Inheritance {
                child: "B".to_string(),
                parent: "A".to_string()
            }]
        );
        let call = result
            .calls
            .iter()
            .find(|c| c.caller == "B.f")
            .expect("call in B.f");
        assert_eq!(call.callee.as_deref(), Some("A.f"));
        assert_eq!(call.call_type, CallType::Method);
    }

    #[test]
    fn test_self_rewrite() {
        let result = parse(
            "class Calc:\n    def add(self, x):\n        return self.push(x)\n    def push(self, x):\n        pass\n",
        );
        let call = &result.calls[0];
        assert_eq!(call.caller, "Calc.add");
        assert_eq!(call.callee.as_deref(), Some("Calc.push"));
    }

    #[test]
    fn test_constructor_call() {
        let result = parse("def make():\n    return Widget(1, 2)\n");
        let call = &result.calls[0];
        assert_eq!(call.callee.as_deref(), Some("Widget.__init__"));
        assert_eq!(call.call_type, CallType::Constructor);
        assert_eq!(call.arguments_count, Some(2));
    }

    #[test]
    fn test_dynamic_builtin() {
        let result = parse("def probe(obj):\n    return getattr(obj, \"x\")\n");
        assert_eq!(result.calls[0].call_type, CallType::Dynamic);
        assert_eq!(result.calls[0].callee.as_deref(), Some("getattr"));
    }

    #[test]
    fn test_simple_decorator_emits_call() {
        let result = parse("@cached\ndef slow():\n    pass\n");
        let call = &result.calls[0];
        assert_eq!(call.caller, MODULE_CALLER);
        assert_eq!(call.callee.as_deref(), Some("cached"));
        assert_eq!(call.arguments_count, Some(1));
        // the decorated function symbol is still extracted
        assert_eq!(result.symbols[0].name, "slow");
    }

    #[test]
    fn test_decorator_with_arguments_skipped() {
        let result = parse("@app.route(\"/x\")\ndef handler():\n    pass\n");
        assert!(result
            .calls
            .iter()
            .all(|c| c.callee.as_deref() != Some("app.route")));
    }

    #[test]
    fn test_decorated_method_caller_is_class() {
        let result = parse(
            "class Svc:\n    @staticmethod\n    def util():\n        helper()\n",
        );
        let deco = result
            .calls
            .iter()
            .find(|c| c.callee.as_deref() == Some("staticmethod"))
            .expect("decorator call");
        assert_eq!(deco.caller, "Svc");
        let inner = result
            .calls
            .iter()
            .find(|c| c.callee.as_deref() == Some("helper"))
            .expect("body call");
        assert_eq!(inner.caller, "Svc.util");
    }

    #[test]
    fn test_module_docstring() {
        let result = parse("\"\"\"Module summary.\"\"\"\nimport os\n");
        assert_eq!(result.module_docstring, "Module summary.");

        let result = parse("# comment first\n'''Single quoted.'''\n");
        assert_eq!(result.module_docstring, "Single quoted.");

        let result = parse("import os\n\"late string\"\n");
        assert_eq!(result.module_docstring, "");
    }

    #[test]
    fn test_constructor_symbol_kind() {
        let result = parse("class A:\n    def __init__(self):\n        pass\n");
        let init = result.symbols.iter().find(|s| s.name == "A.__init__").unwrap();
        assert_eq!(init.kind, SymbolKind::Constructor);
    }

    #[test]
    fn test_parse_twice_is_deterministic() {
        let source = "import json\nclass A(B):\n    def f(self):\n        json.dumps({})\n";
        let a = serde_json::to_string(&parse(source)).unwrap();
        let b = serde_json::to_string(&parse(source)).unwrap();
        assert_eq!(a, b);
    }
}
