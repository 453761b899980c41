//! Manufacturer reference catalog: canonical names and their known variants.

use std::collections::HashMap;
use std::path::Path;

use crate::ConfigError;

/// One canonical manufacturer and the spellings it is known under.
///
/// `variants[0]` is always the canonical name itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub canonical: String,
    pub variants: Vec<String>,
}

/// Insertion-ordered, read-only mapping of canonical manufacturer names to
/// name variants.
///
/// Built once from the flat catalog file and shared by reference afterwards.
/// Iteration follows first-insertion order, which the evidence scorer relies
/// on for deterministic tie-breaks.
#[derive(Debug, Clone, Default)]
pub struct ManufacturerCatalog {
    entries: Vec<CatalogEntry>,
    index: HashMap<String, usize>,
}

impl ManufacturerCatalog {
    /// Parse catalog text: one manufacturer per line, `Canonical[/Variant]*`.
    ///
    /// Blank lines and empty segments are ignored. A canonical name seen
    /// again merges its variants into the earlier entry.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut catalog = Self::default();
        for line in text.lines() {
            let mut segments = line
                .split('/')
                .map(str::trim)
                .filter(|s| !s.is_empty());
            let Some(canonical) = segments.next() else {
                continue;
            };
            catalog.insert(canonical, segments);
        }
        catalog
    }

    fn insert<'a>(&mut self, canonical: &str, variants: impl Iterator<Item = &'a str>) {
        let idx = match self.index.get(canonical) {
            Some(&idx) => idx,
            None => {
                self.entries.push(CatalogEntry {
                    canonical: canonical.to_owned(),
                    variants: vec![canonical.to_owned()],
                });
                let idx = self.entries.len() - 1;
                self.index.insert(canonical.to_owned(), idx);
                idx
            }
        };

        let entry = &mut self.entries[idx];
        for variant in variants {
            if !entry.variants.iter().any(|v| v == variant) {
                entry.variants.push(variant.to_owned());
            }
        }
    }

    /// Entries in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn get(&self, canonical: &str) -> Option<&CatalogEntry> {
        self.index.get(canonical).map(|&idx| &self.entries[idx])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for ManufacturerCatalog {
    fn from_iter<I: IntoIterator<Item = S>>(lines: I) -> Self {
        let text = lines
            .into_iter()
            .map(|l| l.as_ref().to_owned())
            .collect::<Vec<_>>()
            .join("\n");
        Self::parse(&text)
    }
}

/// Load the manufacturer catalog from a flat text file.
///
/// # Errors
///
/// Returns [`ConfigError::CatalogIo`] if the file cannot be read.
pub fn load_catalog(path: &Path) -> Result<ManufacturerCatalog, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogIo {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(ManufacturerCatalog::parse(&content))
}
