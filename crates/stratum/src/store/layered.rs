//! Layered record store with a precomputed resolution cache.

use std::collections::HashMap;

use crate::model::{Entity, Layer, LayerId, RecordId};

/// Read-only view over an ordered load order of layers.
///
/// The store precomputes a resolution cache mapping each record identifier
/// to the position of its single highest-priority declaration: later layers
/// shadow earlier ones, and disabled layers never contribute. Base and
/// current versions are exclusively owned here and never mutated; patches go
/// through [`crate::store::OverrideStore`] instead.
#[derive(Debug)]
pub struct LayeredStore {
    layers: Vec<Layer>,
    // id -> (layer position, entity position within the layer)
    cache: HashMap<RecordId, (usize, usize)>,
}

impl LayeredStore {
    /// Build a store from an ordered load order.
    pub fn new(layers: Vec<Layer>) -> Self {
        let mut cache = HashMap::new();
        for (layer_pos, layer) in layers.iter().enumerate() {
            if !layer.enabled {
                continue;
            }
            for (entity_pos, entity) in layer.entities.iter().enumerate() {
                cache.insert(entity.id.clone(), (layer_pos, entity_pos));
            }
        }
        Self { layers, cache }
    }

    /// Resolve an identifier to its current version, if any.
    pub fn resolve(&self, id: &RecordId) -> Option<&Entity> {
        let &(layer_pos, entity_pos) = self.cache.get(id)?;
        self.layers.get(layer_pos)?.entities.get(entity_pos)
    }

    /// The full load order, in priority order (later wins).
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Look up a layer by identity, regardless of its enabled flag.
    pub fn layer(&self, id: &LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| &l.id == id)
    }

    /// Look up a layer by identity, only if it is enabled.
    pub fn enabled_layer(&self, id: &LayerId) -> Option<&Layer> {
        self.layer(id).filter(|l| l.enabled)
    }

    /// Check whether a layer is present in the load order and enabled.
    pub fn is_enabled_and_present(&self, id: &LayerId) -> bool {
        self.enabled_layer(id).is_some()
    }
}
