//! Entities and their addressable sub-entities.

use serde::{Deserialize, Serialize};

use super::annotation::Annotation;
use super::id::RecordId;

/// Classification tag of a sub-entity, used by rule functions to filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Bound to a place or region.
    Spatial,
    /// Bound to an acting participant.
    Agent,
    /// Bound to a stored value or container.
    Storage,
    /// Anything else.
    Misc,
}

/// Addressable child unit of an [`Entity`].
///
/// Sub-entities are addressed within their owning entity by a small local
/// index that stays stable across layers as long as the owning entity itself
/// is not replaced. The patch engine never reassigns these indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubEntity {
    /// Local index within the owning entity.
    pub index: u32,

    /// Classification tag.
    pub class: Classification,

    /// Optional display label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Annotations carried by this sub-entity. Unordered for comparison
    /// purposes; the patch engine only ever appends.
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl SubEntity {
    /// Create a sub-entity with no annotations.
    pub fn new(index: u32, class: Classification) -> Self {
        Self {
            index,
            class,
            label: None,
            annotations: Vec::new(),
        }
    }

    /// Set the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Add an annotation.
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Check whether this sub-entity carries an annotation structurally
    /// equal to the given one.
    pub fn has_annotation(&self, annotation: &Annotation) -> bool {
        crate::diff::has_annotation(&self.annotations, annotation)
    }
}

/// Top-level patchable record containing an ordered sequence of
/// sub-entities.
///
/// The entity's domain partition is the defining layer of its identifier,
/// used to exclude already-handled entities from redundant processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Record identifier. Immutable once assigned.
    pub id: RecordId,

    /// Optional display label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Ordered sub-entities.
    #[serde(default)]
    pub sub_entities: Vec<SubEntity>,
}

impl Entity {
    /// Create an entity with no sub-entities.
    pub fn new(id: RecordId) -> Self {
        Self {
            id,
            label: None,
            sub_entities: Vec::new(),
        }
    }

    /// Set the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Add a sub-entity.
    pub fn with_sub_entity(mut self, sub: SubEntity) -> Self {
        self.sub_entities.push(sub);
        self
    }

    /// Look up a sub-entity by its local index.
    pub fn sub_entity(&self, index: u32) -> Option<&SubEntity> {
        self.sub_entities.iter().find(|s| s.index == index)
    }

    /// Look up a sub-entity mutably by its local index.
    pub fn sub_entity_mut(&mut self, index: u32) -> Option<&mut SubEntity> {
        self.sub_entities.iter_mut().find(|s| s.index == index)
    }
}
