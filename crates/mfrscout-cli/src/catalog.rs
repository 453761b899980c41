//! `catalog` command: show what the evidence strategy will match against.

use std::path::Path;

use mfrscout_core::{load_catalog, AppConfig, ManufacturerCatalog};

pub(crate) fn run_catalog(config: &AppConfig, path: Option<&Path>) -> anyhow::Result<()> {
    let path = path.unwrap_or(&config.catalog_path);
    let catalog = load_catalog(path)?;
    print!("{}", format_catalog(&catalog));
    println!("{} manufacturers from {}", catalog.len(), path.display());
    Ok(())
}

/// One line per canonical name: name, variant count, then the alternates.
pub(crate) fn format_catalog(catalog: &ManufacturerCatalog) -> String {
    catalog
        .iter()
        .map(|entry| {
            let alternates = &entry.variants[1..];
            if alternates.is_empty() {
                format!("{:<32} (1 variant)\n", entry.canonical)
            } else {
                format!(
                    "{:<32} ({} variants) {}\n",
                    entry.canonical,
                    entry.variants.len(),
                    alternates.join(", ")
                )
            }
        })
        .collect()
}
