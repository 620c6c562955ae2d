//! Python symbol extractor backed by tree-sitter.
//!
//! Extracts: imports (anywhere), classes (any nesting), methods (direct members
//! of a class body), module-level functions. Nested functions are not symbols.

use std::path::Path;

use tree_sitter::{Node, Parser, Tree};

use super::{read_source, ExtractError, SymbolExtractor};
use crate::symbol::{Symbol, SymbolKind};

/// Python language symbol extractor.
#[derive(Debug, Default, Clone, Copy)]
pub struct PythonExtractor;

impl SymbolExtractor for PythonExtractor {
    fn language_id(&self) -> &'static str {
        "python"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["py"]
    }

    fn parse_file(&self, path: &Path) -> Result<Vec<Symbol>, ExtractError> {
        let source = read_source(path)?;
        self.extract_source(&source, path)
    }

    fn find_usages(&self, symbol_name: &str, path: &Path) -> Vec<usize> {
        let Ok(source) = read_source(path) else {
            return Vec::new();
        };
        let Ok(tree) = parse(&source, path) else {
            return Vec::new();
        };

        let mut lines = Vec::new();
        collect_usages(
            tree.root_node(),
            None,
            source.as_bytes(),
            symbol_name,
            &mut lines,
        );
        lines.sort_unstable();
        lines.dedup();
        lines
    }
}

impl PythonExtractor {
    /// Extract symbols from source text already in memory.
    pub fn extract_source(&self, source: &str, path: &Path) -> Result<Vec<Symbol>, ExtractError> {
        let tree = parse(source, path)?;
        let mut symbols = Vec::new();

        self.visit(tree.root_node(), source.as_bytes(), path, &mut symbols);

        symbols.sort_by_key(|s| s.line_number);
        Ok(symbols)
    }

    fn visit(&self, node: Node, source: &[u8], path: &Path, out: &mut Vec<Symbol>) {
        match node.kind() {
            "import_statement" => push_imports(node, source, path, out),
            "import_from_statement" => push_from_imports(node, source, path, out),
            "class_definition" => self.visit_class(node, Vec::new(), source, path, out),
            "decorated_definition" => {
                if let Some(definition) = node.child_by_field_name("definition") {
                    if definition.kind() == "class_definition" {
                        self.visit_class(definition, decorators(node, source), source, path, out);
                    } else {
                        self.visit_children(definition, source, path, out);
                    }
                }
            }
            "module" => {
                for child in named_children(node) {
                    if let Some((function, decorators)) = function_parts(child, source) {
                        out.push(function_symbol(function, decorators, None, source, path));
                    }
                }
                self.visit_children(node, source, path, out);
            }
            _ => self.visit_children(node, source, path, out),
        }
    }

    fn visit_children(&self, node: Node, source: &[u8], path: &Path, out: &mut Vec<Symbol>) {
        for child in named_children(node) {
            self.visit(child, source, path, out);
        }
    }

    fn visit_class(
        &self,
        class: Node,
        decorators: Vec<String>,
        source: &[u8],
        path: &Path,
        out: &mut Vec<Symbol>,
    ) {
        let Some(name) = class.child_by_field_name("name").map(|n| text(n, source)) else {
            return;
        };
        let body = class.child_by_field_name("body");

        let mut symbol = Symbol::new(name, SymbolKind::Class, path, line_of(class));
        symbol.doc = body.and_then(|b| docstring(b, source));
        symbol.annotations = decorators;
        symbol.extends = class
            .child_by_field_name("superclasses")
            .map(|args| {
                named_children(args)
                    .into_iter()
                    .filter(|arg| arg.kind() != "keyword_argument")
                    .map(|arg| text(arg, source).to_string())
                    .collect()
            })
            .unwrap_or_default();
        let header_end = body.map(|b| b.start_byte()).unwrap_or(class.end_byte());
        symbol.signature = source
            .get(class.start_byte()..header_end)
            .and_then(|header| std::str::from_utf8(header).ok())
            .map(|header| header.trim().to_string());
        out.push(symbol);

        if let Some(body) = body {
            for member in named_children(body) {
                if let Some((function, decorators)) = function_parts(member, source) {
                    out.push(function_symbol(function, decorators, Some(name), source, path));
                }
            }
            self.visit_children(body, source, path, out);
        }
    }
}

fn parse(source: &str, path: &Path) -> Result<Tree, ExtractError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| ExtractError::Grammar {
            language: "python",
            message: e.to_string(),
        })?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ExtractError::Parse {
            path: path.to_path_buf(),
        })?;

    if tree.root_node().has_error() {
        return Err(ExtractError::Parse {
            path: path.to_path_buf(),
        });
    }

    Ok(tree)
}

fn text<'a>(node: Node, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}

fn line_of(node: Node) -> usize {
    node.start_position().row + 1
}

fn named_children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// The function node and its decorators, for plain or decorated function definitions.
fn function_parts<'t>(node: Node<'t>, source: &[u8]) -> Option<(Node<'t>, Vec<String>)> {
    match node.kind() {
        "function_definition" => Some((node, Vec::new())),
        "decorated_definition" => node
            .child_by_field_name("definition")
            .filter(|def| def.kind() == "function_definition")
            .map(|def| (def, decorators(node, source))),
        _ => None,
    }
}

/// Decorator names without `@` or call arguments, e.g. `app.route`.
fn decorators(decorated: Node, source: &[u8]) -> Vec<String> {
    named_children(decorated)
        .into_iter()
        .filter(|child| child.kind() == "decorator")
        .map(|decorator| {
            let raw = text(decorator, source).trim_start_matches('@');
            raw.split('(').next().unwrap_or(raw).trim().to_string()
        })
        .collect()
}

fn function_symbol(
    function: Node,
    decorators: Vec<String>,
    parent: Option<&str>,
    source: &[u8],
    path: &Path,
) -> Symbol {
    let name = function
        .child_by_field_name("name")
        .map(|n| text(n, source))
        .unwrap_or_default();
    let kind = if parent.is_some() {
        SymbolKind::Method
    } else {
        SymbolKind::Function
    };

    let is_async = {
        let mut cursor = function.walk();
        let found = function
            .children(&mut cursor)
            .any(|child| child.kind() == "async");
        found
    };
    let params = function.child_by_field_name("parameters");
    let return_type = function
        .child_by_field_name("return_type")
        .map(|n| text(n, source).to_string());

    let mut signature = format!(
        "{}def {}{}",
        if is_async { "async " } else { "" },
        name,
        params.map(|p| text(p, source)).unwrap_or("()")
    );
    if let Some(ret) = &return_type {
        signature.push_str(" -> ");
        signature.push_str(ret);
    }

    let mut symbol = Symbol::new(name, kind, path, line_of(function)).with_parent(parent);
    symbol.doc = function
        .child_by_field_name("body")
        .and_then(|body| docstring(body, source));
    symbol.signature = Some(signature);
    symbol.parameters = params
        .map(|p| parameter_names(p, source))
        .unwrap_or_default();
    symbol.return_type = return_type;
    symbol.annotations = decorators;
    symbol.is_async = is_async;
    symbol
}

/// Positional parameter names; stops at `*`, `*args` or `**kwargs`.
fn parameter_names(params: Node, source: &[u8]) -> Vec<String> {
    let mut names = Vec::new();

    for param in named_children(params) {
        match param.kind() {
            "identifier" => names.push(text(param, source).to_string()),
            "typed_parameter" => match named_children(param).first() {
                Some(first) if first.kind() == "identifier" => {
                    names.push(text(*first, source).to_string())
                }
                _ => break,
            },
            "default_parameter" | "typed_default_parameter" => {
                if let Some(name) = param.child_by_field_name("name") {
                    names.push(text(name, source).to_string());
                }
            }
            "list_splat_pattern" | "dictionary_splat_pattern" | "keyword_separator" => break,
            _ => {}
        }
    }

    names
}

/// Body-leading string literal, cleaned.
fn docstring(body: Node, source: &[u8]) -> Option<String> {
    let first = named_children(body).into_iter().next()?;
    if first.kind() != "expression_statement" {
        return None;
    }
    let literal = named_children(first).into_iter().next()?;
    if literal.kind() != "string" {
        return None;
    }
    clean_docstring(text(literal, source))
}

/// Strip quotes and common indentation from a string literal.
fn clean_docstring(literal: &str) -> Option<String> {
    let prefix_len = literal
        .find(|c: char| c == '"' || c == '\'')
        .unwrap_or(literal.len());
    let prefix = literal[..prefix_len].to_ascii_lowercase();
    if prefix.contains('b') || prefix.contains('f') {
        return None;
    }

    let quoted = &literal[prefix_len..];
    let inner = ["\"\"\"", "'''", "\"", "'"].iter().find_map(|quote| {
        (quoted.len() >= quote.len() * 2 && quoted.starts_with(quote) && quoted.ends_with(quote))
            .then(|| &quoted[quote.len()..quoted.len() - quote.len()])
    })?;

    let lines: Vec<&str> = inner.lines().collect();
    let margin = lines
        .iter()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut cleaned: Vec<String> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                line.trim().to_string()
            } else {
                line.get(margin..).unwrap_or("").trim_end().to_string()
            }
        })
        .collect();

    while cleaned.last().is_some_and(|line| line.is_empty()) {
        cleaned.pop();
    }
    let leading_blank = cleaned.iter().take_while(|line| line.is_empty()).count();
    let doc = cleaned[leading_blank..].join("\n");

    (!doc.is_empty()).then_some(doc)
}

fn push_imports(node: Node, source: &[u8], path: &Path, out: &mut Vec<Symbol>) {
    let mut cursor = node.walk();
    for name in node.children_by_field_name("name", &mut cursor) {
        let imported = imported_name(name, source);
        if !imported.is_empty() {
            out.push(Symbol::new(imported, SymbolKind::Import, path, line_of(node)));
        }
    }
}

fn push_from_imports(node: Node, source: &[u8], path: &Path, out: &mut Vec<Symbol>) {
    let module = node
        .child_by_field_name("module_name")
        .map(|m| text(m, source).trim_start_matches('.'))
        .unwrap_or_default();

    let mut names: Vec<String> = {
        let mut cursor = node.walk();
        let collected = node
            .children_by_field_name("name", &mut cursor)
            .map(|name| imported_name(name, source).to_string())
            .collect();
        collected
    };
    if named_children(node)
        .iter()
        .any(|child| child.kind() == "wildcard_import")
    {
        names.push("*".to_string());
    }

    for name in names.into_iter().filter(|n| !n.is_empty()) {
        let qualified = if module.is_empty() {
            name
        } else {
            format!("{}.{}", module, name)
        };
        out.push(Symbol::new(qualified, SymbolKind::Import, path, line_of(node)));
    }
}

/// `a.b` for `a.b` and for `a.b as c`.
fn imported_name<'a>(node: Node, source: &'a [u8]) -> &'a str {
    if node.kind() == "aliased_import" {
        node.child_by_field_name("name")
            .map(|n| text(n, source))
            .unwrap_or_default()
    } else {
        text(node, source)
    }
}

/// Whether `node` is the identifier being declared rather than referenced.
fn is_declaration_name(node: Node, parent: Node) -> bool {
    match parent.kind() {
        "function_definition" | "class_definition" | "keyword_argument"
        | "default_parameter" | "typed_default_parameter" => {
            parent.child_by_field_name("name") == Some(node)
        }
        "parameters" | "lambda_parameters" | "typed_parameter" => true,
        _ => false,
    }
}

fn collect_usages(
    node: Node,
    parent: Option<Node>,
    source: &[u8],
    symbol_name: &str,
    lines: &mut Vec<usize>,
) {
    match node.kind() {
        "import_statement" | "import_from_statement" => return,
        "identifier" => {
            let declared = parent.is_some_and(|p| is_declaration_name(node, p));
            if !declared && text(node, source) == symbol_name {
                lines.push(line_of(node));
            }
            return;
        }
        _ => {}
    }

    for child in named_children(node) {
        collect_usages(child, Some(node), source, symbol_name, lines);
    }
}
