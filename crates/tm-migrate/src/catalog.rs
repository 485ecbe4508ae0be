//! Migration catalog trait and the in-memory implementation

use crate::error::{CatalogError, CatalogResult};
use crate::unit::MigrationUnit;
use std::collections::BTreeMap;
use tm_core::MigrationId;

/// Source of migration units.
///
/// Implementations must hand out a fresh unit on every `load_unit` call.
pub trait Catalog: Send + Sync {
    /// All identifiers, in ascending lexical order
    fn list_identifiers(&self) -> CatalogResult<Vec<MigrationId>>;

    /// Load the unit for `id`, failing with [`CatalogError::NotFound`] when
    /// there is none
    fn load_unit(&self, id: &MigrationId) -> CatalogResult<MigrationUnit>;
}

/// Catalog of code-defined units
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    units: BTreeMap<MigrationId, MigrationUnit>,
}

impl MemoryCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, id: impl Into<String>, unit: MigrationUnit) -> Self {
        self.insert(id, unit);
        self
    }

    /// Register a unit, replacing any previous unit with the same identifier.
    ///
    /// Panics if `id` is empty.
    pub fn insert(&mut self, id: impl Into<String>, unit: MigrationUnit) {
        self.units.insert(MigrationId::new(id), unit);
    }

    /// Number of registered units
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl Catalog for MemoryCatalog {
    fn list_identifiers(&self) -> CatalogResult<Vec<MigrationId>> {
        Ok(self.units.keys().cloned().collect())
    }

    fn load_unit(&self, id: &MigrationId) -> CatalogResult<MigrationUnit> {
        self.units
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound { id: id.clone() })
    }
}
