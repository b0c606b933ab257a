//! Immutable item catalog and the load pipeline feeding it

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use super::diagnostics::{Diagnostic, DiagnosticKind, Location};
use super::parser::parse_catalog;
use super::stock::StockEntry;
use crate::config::LoaderOptions;
use crate::items::{CharacterClass, Item, ItemType};

/// Catalog query and file-boundary errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("item not found: {0}")]
    NotFound(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not valid UTF-8: {source}")]
    Encoding {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

/// Items keyed by section name, in section order
///
/// Built once per load and never mutated; share it by reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    items: IndexMap<String, Item>,
}

/// A best-effort catalog together with everything noticed while loading it
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub catalog: Catalog,
    pub diagnostics: Vec<Diagnostic>,
}

impl LoadReport {
    /// Diagnostics for records that could not be built
    pub fn failed_records(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::InvalidItemDefinition)
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl Catalog {
    /// Load catalog text with default options
    pub fn load(text: &str) -> LoadReport {
        Self::load_with(text, &LoaderOptions::default())
    }

    /// Load catalog text
    ///
    /// Never fails: each record is built on its own, and a record that
    /// cannot become an item is reported as an `InvalidItemDefinition`
    /// diagnostic while the rest load normally.
    pub fn load_with(text: &str, options: &LoaderOptions) -> LoadReport {
        let parsed = parse_catalog(text, options);
        let mut diagnostics = parsed.diagnostics;
        let mut items = IndexMap::with_capacity(parsed.records.len());

        for (key, record) in &parsed.records {
            match Item::from_record(record, options, &mut diagnostics) {
                Ok(item) => {
                    items.insert(key.clone(), item);
                }
                Err(e) => {
                    warn!("Skipping record {}: {}", key, e);
                    diagnostics.push(Diagnostic::new(
                        Location::record(key),
                        record.line_of(e.field()),
                        e.field(),
                        DiagnosticKind::InvalidItemDefinition,
                        e.to_string(),
                    ));
                }
            }
        }

        debug!(
            "Loaded {} of {} records ({} diagnostics)",
            items.len(),
            parsed.records.len(),
            diagnostics.len()
        );

        LoadReport {
            catalog: Catalog { items },
            diagnostics,
        }
    }

    /// Read and load a UTF-8 catalog file
    pub fn load_path(path: &Path, options: &LoaderOptions) -> Result<LoadReport, CatalogError> {
        let bytes = std::fs::read(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let text = String::from_utf8(bytes).map_err(|source| CatalogError::Encoding {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loading catalog from {}", path.display());
        Ok(Self::load_with(&text, options))
    }

    /// Get an item by key
    pub fn get(&self, key: &str) -> Result<&Item, CatalogError> {
        self.items
            .get(key)
            .ok_or_else(|| CatalogError::NotFound(key.to_string()))
    }

    /// Check if an item exists
    pub fn contains(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    /// All items in catalog order
    pub fn list(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Items matching a predicate, lazily, in catalog order
    pub fn filter<'a, P>(&'a self, predicate: P) -> impl Iterator<Item = &'a Item> + 'a
    where
        P: Fn(&Item) -> bool + 'a,
    {
        self.items.values().filter(move |item| predicate(item))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    pub fn of_type(&self, item_type: ItemType) -> impl Iterator<Item = &Item> {
        self.filter(move |item| item.item_type() == item_type)
    }

    /// Items whose flags explicitly allow the class
    pub fn usable_by(&self, class: CharacterClass) -> impl Iterator<Item = &Item> {
        self.filter(move |item| item.can_use(class))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up every entry of a stock list
    pub fn resolve_stock(&self, entries: &[StockEntry]) -> Result<Vec<(u32, &Item)>, CatalogError> {
        entries
            .iter()
            .map(|entry| Ok((entry.quantity, self.get(&entry.key)?)))
            .collect()
    }
}
