//! Copy-on-write override store.

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::error::{Result, StratumError};
use crate::model::{Entity, Layer, LayerId, RecordId};

use super::layered::LayeredStore;

/// Run-local store of entity overrides.
///
/// The first request for an identifier resolves its current version through
/// the record store and deep-copies it into the writable output; subsequent
/// requests return the cached override. This guarantees at most one override
/// per identifier per run, even under repeated calls from different pipeline
/// stages, and makes patches from earlier stages visible to later ones.
///
/// Overrides are exclusively owned here while the run is in progress and
/// only handed out by mutable reference; [`OverrideStore::into_layer`]
/// releases them as the run's output layer.
#[derive(Debug, Default)]
pub struct OverrideStore {
    overrides: IndexMap<RecordId, Entity>,
}

impl OverrideStore {
    /// Create an empty override store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the override for an identifier, creating it from the current
    /// version on first call.
    ///
    /// Fails with [`StratumError::Resolution`] when the identifier has no
    /// current version; no override is created in that case.
    pub fn get_or_create(
        &mut self,
        id: &RecordId,
        store: &LayeredStore,
    ) -> Result<&mut Entity> {
        match self.overrides.entry(id.clone()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let current = store
                    .resolve(id)
                    .cloned()
                    .ok_or_else(|| StratumError::Resolution { id: id.clone() })?;
                Ok(entry.insert(current))
            }
        }
    }

    /// Get the staged override for an identifier, if one exists.
    pub fn get(&self, id: &RecordId) -> Option<&Entity> {
        self.overrides.get(id)
    }

    /// Check whether an override exists for the identifier.
    pub fn contains(&self, id: &RecordId) -> bool {
        self.overrides.contains_key(id)
    }

    /// Number of overrides created so far.
    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    /// Check whether no overrides were created.
    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    /// Release the overrides as an output layer, in creation order.
    pub fn into_layer(self, id: impl Into<LayerId>) -> Layer {
        Layer {
            id: id.into(),
            enabled: true,
            entities: self.overrides.into_values().collect(),
        }
    }
}
