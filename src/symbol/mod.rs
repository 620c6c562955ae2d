//! Symbol model and in-memory symbol index
//!
//! Symbols are the code entities (functions, classes, methods, fields, imports)
//! produced by the language extractors. The [`SymbolIndex`] maps names to every
//! declaration carrying that name across a directory scope.

pub mod index;

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

pub use index::SymbolIndex;

/// Kind of an indexed code entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Package,
    Import,
    Class,
    Interface,
    Enum,
    Function,
    Method,
    Constructor,
    Field,
}

impl SymbolKind {
    /// Convert to a string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Package => "package",
            SymbolKind::Import => "import",
            SymbolKind::Class => "class",
            SymbolKind::Interface => "interface",
            SymbolKind::Enum => "enum",
            SymbolKind::Function => "function",
            SymbolKind::Method => "method",
            SymbolKind::Constructor => "constructor",
            SymbolKind::Field => "field",
        }
    }

    /// Kinds that answer a "where is X defined" query.
    ///
    /// Imports, packages and fields are declarations but never definitions.
    pub fn is_definition(&self) -> bool {
        matches!(
            self,
            SymbolKind::Function
                | SymbolKind::Class
                | SymbolKind::Method
                | SymbolKind::Interface
                | SymbolKind::Constructor
        )
    }

    /// Kinds that open a type scope.
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            SymbolKind::Class | SymbolKind::Interface | SymbolKind::Enum
        )
    }

    /// Kinds that live inside a type.
    pub fn is_member(&self) -> bool {
        matches!(
            self,
            SymbolKind::Method | SymbolKind::Constructor | SymbolKind::Field
        )
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// An indexed code entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Symbol {
    /// Identifier text (never empty)
    pub name: String,
    /// Declaration kind
    pub kind: SymbolKind,
    /// File containing the declaration
    pub file_path: PathBuf,
    /// 1-indexed line of the declaration
    pub line_number: usize,
    /// Documentation attached to the declaration
    pub doc: Option<String>,
    /// Raw declaration text
    pub signature: Option<String>,
    /// Enclosing type name for methods, constructors and fields
    pub parent_type: Option<String>,
    /// Parameter names in declaration order
    pub parameters: Vec<String>,
    /// Return type (or field type) text
    pub return_type: Option<String>,
    /// Decorator / annotation texts
    pub annotations: Vec<String>,
    /// Declared with `async`
    pub is_async: bool,
    /// Access and storage modifiers (public, static, ...)
    pub modifiers: Vec<String>,
    /// Base classes / extended types
    pub extends: Vec<String>,
    /// Implemented interfaces
    pub implements: Vec<String>,
}

impl Symbol {
    /// Create a symbol with only its identity set.
    pub fn new(
        name: impl Into<String>,
        kind: SymbolKind,
        file_path: impl Into<PathBuf>,
        line_number: usize,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            file_path: file_path.into(),
            line_number,
            doc: None,
            signature: None,
            parent_type: None,
            parameters: Vec::new(),
            return_type: None,
            annotations: Vec::new(),
            is_async: false,
            modifiers: Vec::new(),
            extends: Vec::new(),
            implements: Vec::new(),
        }
    }

    /// Set the enclosing type.
    pub fn with_parent(mut self, parent: Option<&str>) -> Self {
        self.parent_type = parent.map(str::to_string);
        self
    }

    /// Render `name(param, ...)` for symbols without a raw signature.
    pub fn display_signature(&self) -> String {
        match &self.signature {
            Some(signature) => signature.clone(),
            None => format!("{}({})", self.name, self.parameters.join(", ")),
        }
    }
}
