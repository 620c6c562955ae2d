use anyhow::{bail, Context, Result};
use std::path::Path;

use crate::extractor::ExtractorRegistry;

/// Print every symbol the matching extractor finds in `file`.
pub async fn run(file: &Path, json: bool) -> Result<()> {
    let registry = ExtractorRegistry::new();
    if !registry.is_indexable(file) {
        bail!(
            "No extractor for {} (supported: {})",
            file.display(),
            registry.supported_languages().join(", ")
        );
    }

    let extractor = registry.for_path(file);
    let symbols = extractor
        .parse_file(file)
        .with_context(|| format!("Failed to extract symbols from {}", file.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&symbols)?);
        return Ok(());
    }

    println!(
        "{} symbols in {} ({})\n",
        symbols.len(),
        file.display(),
        extractor.language_id()
    );
    for symbol in &symbols {
        let name = match &symbol.parent_type {
            Some(parent) => format!("{}.{}", parent, symbol.name),
            None => symbol.name.clone(),
        };
        println!("{:>5}  {:<12} {}", symbol.line_number, symbol.kind, name);
    }

    Ok(())
}
