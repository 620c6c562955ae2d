//! Java symbol extractor using line-oriented declaration patterns.
//!
//! No parser is involved. Each line is matched against an ordered table of
//! patterns (package, import, type, constructor, method, field). Only one
//! enclosing type is tracked at a time, so members that follow a nested type
//! are attributed to the nested type. Multi-line signatures are matched on
//! their first line only.

use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

use super::{read_source, ExtractError, SymbolExtractor};
use crate::symbol::{Symbol, SymbolKind};

const MODIFIERS: &[&str] = &[
    "public",
    "private",
    "protected",
    "static",
    "final",
    "abstract",
    "synchronized",
    "native",
    "volatile",
    "transient",
];

/// Words that look like a return type or name in statements, never in declarations.
const STATEMENT_KEYWORDS: &[&str] = &[
    "if", "else", "while", "for", "do", "switch", "case", "catch", "try", "finally", "return",
    "throw", "new", "assert", "break", "continue", "yield",
];

lazy_static! {
    static ref PACKAGE: Regex = Regex::new(r"^package\s+([\w.]+)\s*;").unwrap();
    static ref IMPORT: Regex = Regex::new(r"^import\s+(?:static\s+)?([\w.*]+)\s*;").unwrap();
    static ref ANNOTATION: Regex = Regex::new(r"^@([\w.]+(?:\([^)]*\))?)").unwrap();
    static ref TYPE_DECL: Regex = Regex::new(
        r"^(?:(?:public|private|protected|abstract|final|static|sealed|non-sealed|strictfp)\s+)*(class|interface|enum|record)\s+(\w+)(?:\s*<[^{]*?>)?(?:\s*\([^)]*\))?(?:\s+extends\s+([\w.<>,\s]+?))?(?:\s+implements\s+([\w.<>,\s]+?))?(?:\s+permits\s+[\w.<>,\s]+?)?\s*(?:\{.*)?$"
    )
    .unwrap();
    static ref CONSTRUCTOR: Regex =
        Regex::new(r"^(?:(?:public|private|protected)\s+)*(\w+)\s*\(([^)]*)\)?").unwrap();
    static ref METHOD: Regex = Regex::new(
        r"^(?:(?:public|private|protected|static|final|abstract|synchronized|native|default|strictfp)\s+)*(?:<[^()]*>\s+)?([\w.]+(?:<[^()]*>)?(?:\[\])*)\s+(\w+)\s*\(([^)]*)\)?"
    )
    .unwrap();
    static ref FIELD: Regex = Regex::new(
        r"^(?:(?:public|private|protected|static|final|transient|volatile)\s+)*([\w.]+(?:<[^=;()]*>)?(?:\[\])*)\s+(\w+)\s*(?:=|;|,)"
    )
    .unwrap();
}

/// Java language symbol extractor.
#[derive(Debug, Default, Clone, Copy)]
pub struct JavaExtractor;

impl SymbolExtractor for JavaExtractor {
    fn language_id(&self) -> &'static str {
        "java"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["java"]
    }

    fn parse_file(&self, path: &Path) -> Result<Vec<Symbol>, ExtractError> {
        let source = read_source(path)?;
        Ok(self.extract_source(&source, path))
    }

    fn find_usages(&self, symbol_name: &str, path: &Path) -> Vec<usize> {
        let Ok(source) = read_source(path) else {
            return Vec::new();
        };
        let Ok(pattern) = Regex::new(&format!(r"\b{}\b", regex::escape(symbol_name))) else {
            return Vec::new();
        };

        source
            .lines()
            .enumerate()
            .filter(|(_, line)| pattern.is_match(line))
            .map(|(i, _)| i + 1)
            .collect()
    }
}

impl JavaExtractor {
    /// Extract symbols from source text already in memory.
    pub fn extract_source(&self, source: &str, path: &Path) -> Vec<Symbol> {
        let mut scanner = Scanner::new(path);
        for (i, line) in source.lines().enumerate() {
            scanner.scan_line(i + 1, line);
        }
        scanner.symbols
    }
}

/// Line scanner state.
struct Scanner<'p> {
    path: &'p Path,
    symbols: Vec<Symbol>,
    current_type: Option<String>,
    /// Brace depth at which members of `current_type` are declared
    member_depth: usize,
    depth: usize,
    in_javadoc: bool,
    in_comment: bool,
    pending_doc: Option<String>,
    pending_annotations: Vec<String>,
}

impl<'p> Scanner<'p> {
    fn new(path: &'p Path) -> Self {
        Self {
            path,
            symbols: Vec::new(),
            current_type: None,
            member_depth: 0,
            depth: 0,
            in_javadoc: false,
            in_comment: false,
            pending_doc: None,
            pending_annotations: Vec::new(),
        }
    }

    fn scan_line(&mut self, line_number: usize, line: &str) {
        let mut stripped = line.trim();

        if self.in_javadoc {
            let Some(end) = stripped.find("*/") else {
                self.append_doc(stripped);
                return;
            };
            self.append_doc(&stripped[..end + 2]);
            self.in_javadoc = false;
            stripped = stripped[end + 2..].trim_start();
        } else if self.in_comment {
            let Some(end) = stripped.find("*/") else {
                return;
            };
            self.in_comment = false;
            stripped = stripped[end + 2..].trim_start();
        }

        // Leading block comments; code may follow one that closes on this line
        while let Some(rest) = stripped.strip_prefix("/*") {
            let is_doc = rest.starts_with('*') && !rest.starts_with("*/");
            let body = if is_doc { &rest[1..] } else { rest };

            match body.find("*/") {
                Some(end) => {
                    if is_doc {
                        self.pending_doc = Some(format!("/**{}", &body[..end + 2]));
                    }
                    stripped = body[end + 2..].trim_start();
                }
                None => {
                    if is_doc {
                        self.pending_doc = Some(stripped.to_string());
                        self.in_javadoc = true;
                    } else {
                        self.in_comment = true;
                    }
                    return;
                }
            }
        }

        if stripped.is_empty() || stripped.starts_with("//") {
            return;
        }

        let code = self.take_annotations(stripped);
        if code.is_empty() {
            return;
        }

        let depth_before = self.depth;
        self.match_declaration(line_number, code, depth_before);

        self.depth = (self.depth as isize + brace_delta(code)).max(0) as usize;
        if self.depth < self.member_depth {
            self.member_depth = self.depth;
        }
    }

    fn append_doc(&mut self, text: &str) {
        if let Some(doc) = self.pending_doc.as_mut() {
            doc.push('\n');
            doc.push_str(text);
        }
    }

    /// Strip leading `@Annotation(...)` tokens. Only annotations at member
    /// depth are kept for the next declaration; statement annotations inside
    /// bodies are dropped.
    fn take_annotations<'l>(&mut self, mut code: &'l str) -> &'l str {
        let at_member_depth = self.depth == self.member_depth;
        while !code.starts_with("@interface") {
            let Some(m) = ANNOTATION.captures(code) else {
                break;
            };
            if at_member_depth {
                self.pending_annotations.push(m[1].to_string());
            }
            code = code[m[0].len()..].trim_start();
        }
        code
    }

    fn match_declaration(&mut self, line_number: usize, code: &str, depth: usize) {
        if let Some(caps) = PACKAGE.captures(code) {
            self.push_plain(&caps[1], SymbolKind::Package, line_number);
            return;
        }
        if let Some(caps) = IMPORT.captures(code) {
            self.push_plain(&caps[1], SymbolKind::Import, line_number);
            return;
        }

        if let Some(caps) = TYPE_DECL.captures(code) {
            let kind = match &caps[1] {
                "interface" => SymbolKind::Interface,
                "enum" => SymbolKind::Enum,
                _ => SymbolKind::Class,
            };
            let name = caps[2].to_string();

            let mut symbol = self.declaration(&name, kind, line_number, code, None);
            symbol.extends = caps.get(3).map(|m| split_types(m.as_str())).unwrap_or_default();
            symbol.implements = caps.get(4).map(|m| split_types(m.as_str())).unwrap_or_default();
            self.symbols.push(symbol);

            self.current_type = Some(name);
            self.member_depth = depth + 1;
            return;
        }

        if depth != self.member_depth {
            return;
        }

        if let Some(caps) = CONSTRUCTOR.captures(code) {
            if self.current_type.as_deref() == Some(&caps[1]) {
                let mut symbol = self.member(&caps[1], SymbolKind::Constructor, line_number, code);
                symbol.parameters = parameter_names(&caps[2]);
                self.symbols.push(symbol);
                return;
            }
        }

        if let Some(caps) = METHOD.captures(code) {
            let return_type = &caps[1];
            let name = &caps[2];
            if !is_statement_keyword(return_type) && !is_statement_keyword(name) {
                let mut symbol = self.member(name, SymbolKind::Method, line_number, code);
                symbol.return_type = Some(return_type.to_string());
                symbol.parameters = parameter_names(&caps[3]);
                self.symbols.push(symbol);
                return;
            }
        }

        if self.current_type.is_some() {
            if let Some(caps) = FIELD.captures(code) {
                let field_type = &caps[1];
                if !is_statement_keyword(field_type) && !MODIFIERS.contains(&field_type) {
                    let mut symbol = self.member(&caps[2], SymbolKind::Field, line_number, code);
                    symbol.return_type = Some(field_type.to_string());
                    self.symbols.push(symbol);
                }
            }
        }
    }

    fn push_plain(&mut self, name: &str, kind: SymbolKind, line_number: usize) {
        self.symbols
            .push(Symbol::new(name, kind, self.path, line_number));
        self.pending_doc = None;
        self.pending_annotations.clear();
    }

    fn member(&mut self, name: &str, kind: SymbolKind, line_number: usize, code: &str) -> Symbol {
        let parent = self.current_type.clone();
        self.declaration(name, kind, line_number, code, parent)
    }

    /// Build a declaration symbol, consuming the pending doc and annotations.
    fn declaration(
        &mut self,
        name: &str,
        kind: SymbolKind,
        line_number: usize,
        code: &str,
        parent: Option<String>,
    ) -> Symbol {
        let mut symbol = Symbol::new(name, kind, self.path, line_number);
        symbol.parent_type = parent;
        symbol.doc = self.pending_doc.take().and_then(|doc| clean_javadoc(&doc));
        symbol.annotations = std::mem::take(&mut self.pending_annotations);
        symbol.modifiers = modifiers(code);
        symbol.signature = Some(code.trim_end_matches('{').trim_end().to_string());
        symbol
    }
}

fn is_statement_keyword(word: &str) -> bool {
    STATEMENT_KEYWORDS.contains(&word)
}

/// Modifier keywords in the declaration head, before any `(`, `=` or `{`.
fn modifiers(code: &str) -> Vec<String> {
    let head = code
        .split(|c: char| c == '(' || c == '=' || c == '{')
        .next()
        .unwrap_or(code);

    head.split_whitespace()
        .filter(|word| MODIFIERS.contains(word))
        .map(str::to_string)
        .collect()
}

/// Split on commas outside of angle brackets.
fn split_top_level(list: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in list.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(list[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(list[start..].trim());
    parts.retain(|part| !part.is_empty());
    parts
}

fn split_types(list: &str) -> Vec<String> {
    split_top_level(list)
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Parameter names: the last word of each top-level comma-separated entry.
fn parameter_names(params: &str) -> Vec<String> {
    split_top_level(params)
        .into_iter()
        .filter_map(|param| param.split_whitespace().last())
        .map(str::to_string)
        .collect()
}

/// Strip `/**`, `*/` and leading `*`, collapsing whitespace into one line.
fn clean_javadoc(raw: &str) -> Option<String> {
    let body = raw.replace("/**", "").replace("*/", "");
    let words: Vec<&str> = body
        .lines()
        .map(|line| line.trim_start().trim_start_matches('*'))
        .flat_map(str::split_whitespace)
        .collect();

    (!words.is_empty()).then(|| words.join(" "))
}

/// Net change in brace depth, ignoring string and char literals and `//` comments.
fn brace_delta(code: &str) -> isize {
    let mut delta = 0;
    let mut quote: Option<char> = None;
    let mut chars = code.chars().peekable();

    while let Some(c) = chars.next() {
        match quote {
            Some(q) => match c {
                '\\' => {
                    chars.next();
                }
                _ if c == q => quote = None,
                _ => {}
            },
            None => match c {
                '"' | '\'' => quote = Some(c),
                '/' if chars.peek() == Some(&'/') => break,
                '{' => delta += 1,
                '}' => delta -= 1,
                _ => {}
            },
        }
    }

    delta
}
