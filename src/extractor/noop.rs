//! Extractor for unsupported languages.

use std::path::Path;

use super::{ContextWindow, ExtractError, SymbolExtractor};
use crate::symbol::Symbol;

/// Yields nothing for every file.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopExtractor;

impl SymbolExtractor for NoopExtractor {
    fn language_id(&self) -> &'static str {
        "none"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[]
    }

    fn parse_file(&self, _path: &Path) -> Result<Vec<Symbol>, ExtractError> {
        Ok(Vec::new())
    }

    fn find_usages(&self, _symbol_name: &str, _path: &Path) -> Vec<usize> {
        Vec::new()
    }

    fn extract_context(&self, _path: &Path, _line_number: usize, _radius: usize) -> ContextWindow {
        ContextWindow::default()
    }
}
