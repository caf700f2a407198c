//! Layers - named, ordered collections of entity declarations.

use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::id::{LayerId, RecordId};

fn default_enabled() -> bool {
    true
}

/// One named collection of entities contributing to the combined dataset.
///
/// Layers are combined by priority into a single logical current view per
/// record identifier: later layers in the load order win. A layer may
/// declare entities it originally defined as well as override versions of
/// entities defined by earlier layers (those keep their original
/// identifier).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    /// Layer identity.
    pub id: LayerId,

    /// Whether the layer participates in resolution.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Declared entities, in declaration order.
    #[serde(default)]
    pub entities: Vec<Entity>,
}

impl Layer {
    /// Create an empty, enabled layer.
    pub fn new(id: impl Into<LayerId>) -> Self {
        Self {
            id: id.into(),
            enabled: true,
            entities: Vec::new(),
        }
    }

    /// Disable the layer.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Add an entity declaration.
    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.entities.push(entity);
        self
    }

    /// Look up a declared entity by identifier.
    pub fn entity(&self, id: &RecordId) -> Option<&Entity> {
        self.entities.iter().find(|e| &e.id == id)
    }

    /// Iterate over the identifiers this layer declares.
    pub fn entity_ids(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.entities.iter().map(|e| e.id.clone())
    }

    /// Total annotation count across all declared sub-entities.
    pub fn annotation_count(&self) -> usize {
        self.entities
            .iter()
            .flat_map(|e| &e.sub_entities)
            .map(|s| s.annotations.len())
            .sum()
    }
}
