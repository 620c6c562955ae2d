//! Per-language symbol extractors.
//!
//! Each extractor turns one source file into a list of [`Symbol`]s, finds
//! identifier usages, and returns line context. Python is parsed precisely with
//! tree-sitter; Java is scanned line by line with declaration patterns. Every
//! other extension routes to [`NoopExtractor`].

pub mod context;
pub mod java;
pub mod noop;
pub mod python;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tracing::debug;

use crate::symbol::Symbol;

pub use context::{extract_context, ContextWindow};
pub use java::JavaExtractor;
pub use noop::NoopExtractor;
pub use python::PythonExtractor;

/// Failure while reading or parsing a single file.
///
/// Never escapes an extractor's public surface: it is logged and the file
/// degrades to zero symbols.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load {language} grammar: {message}")]
    Grammar {
        language: &'static str,
        message: String,
    },

    #[error("failed to parse {path}")]
    Parse { path: PathBuf },
}

/// Read a file as UTF-8, mapping the failure to [`ExtractError::Read`].
pub(crate) fn read_source(path: &Path) -> Result<String, ExtractError> {
    std::fs::read_to_string(path).map_err(|source| ExtractError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Language-specific symbol extraction.
pub trait SymbolExtractor: Send + Sync {
    /// Language identifier string (e.g. "python", "java").
    fn language_id(&self) -> &'static str;

    /// File extensions (without the dot) handled by this extractor.
    fn extensions(&self) -> &'static [&'static str];

    /// Parse a file into symbols, reporting read and parse failures.
    fn parse_file(&self, path: &Path) -> Result<Vec<Symbol>, ExtractError>;

    /// Sorted, de-duplicated 1-indexed lines where `symbol_name` occurs as a
    /// whole identifier. Empty on any failure.
    fn find_usages(&self, symbol_name: &str, path: &Path) -> Vec<usize>;

    /// Parse a file into symbols. Empty on any failure.
    fn extract(&self, path: &Path) -> Vec<Symbol> {
        match self.parse_file(path) {
            Ok(symbols) => symbols,
            Err(e) => {
                debug!("{} extractor skipped file: {}", self.language_id(), e);
                Vec::new()
            }
        }
    }

    /// Lines around `line_number`. Empty strings when out of range or unreadable.
    fn extract_context(&self, path: &Path, line_number: usize, radius: usize) -> ContextWindow {
        extract_context(path, line_number, radius)
    }
}

/// Extension lookup table of extractors, with per-file memoization.
pub struct ExtractorRegistry {
    extractors: Vec<Arc<dyn SymbolExtractor>>,
    by_extension: HashMap<String, usize>,
    fallback: NoopExtractor,
    cache: Mutex<HashMap<PathBuf, Arc<Vec<Symbol>>>>,
}

impl ExtractorRegistry {
    /// Create a registry with all built-in extractors.
    pub fn new() -> Self {
        let mut registry = Self {
            extractors: Vec::new(),
            by_extension: HashMap::new(),
            fallback: NoopExtractor,
            cache: Mutex::new(HashMap::new()),
        };

        registry.register(Arc::new(PythonExtractor));
        registry.register(Arc::new(JavaExtractor));

        registry
    }

    /// Register an extractor for all of its extensions.
    pub fn register(&mut self, extractor: Arc<dyn SymbolExtractor>) {
        let slot = self.extractors.len();
        for ext in extractor.extensions() {
            self.by_extension.insert(ext.to_string(), slot);
        }
        self.extractors.push(extractor);
    }

    /// Extractor for a path, or the no-op extractor for unsupported extensions.
    pub fn for_path(&self, path: &Path) -> &dyn SymbolExtractor {
        let slot = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.by_extension.get(ext));

        match slot {
            Some(&slot) => self.extractors[slot].as_ref(),
            None => &self.fallback,
        }
    }

    /// Whether a real extractor handles this path.
    pub fn is_indexable(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.by_extension.contains_key(ext))
            .unwrap_or(false)
    }

    /// Extract symbols for a file, memoized by path.
    ///
    /// Only successful parses are memoized, so an unreadable file is retried
    /// on the next call.
    pub fn extract(&self, path: &Path) -> Arc<Vec<Symbol>> {
        if let Some(symbols) = self.lock_cache().get(path) {
            return Arc::clone(symbols);
        }

        let extractor = self.for_path(path);
        match extractor.parse_file(path) {
            Ok(symbols) => {
                let symbols = Arc::new(symbols);
                self.lock_cache()
                    .insert(path.to_path_buf(), Arc::clone(&symbols));
                symbols
            }
            Err(e) => {
                debug!("{} extractor skipped file: {}", extractor.language_id(), e);
                Arc::new(Vec::new())
            }
        }
    }

    /// Drop every memoized symbol list.
    pub fn clear_cache(&self) {
        self.lock_cache().clear();
    }

    /// Number of memoized files.
    pub fn cached_files(&self) -> usize {
        self.lock_cache().len()
    }

    /// Languages with a real extractor.
    pub fn supported_languages(&self) -> Vec<&'static str> {
        self.extractors.iter().map(|e| e.language_id()).collect()
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, HashMap<PathBuf, Arc<Vec<Symbol>>>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
