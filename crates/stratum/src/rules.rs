//! Built-in transform rules for optional extension layers.
//!
//! Each rule carries the partition layer its `filter` excludes: entities
//! originally defined by that layer are already covered by the forwarding
//! pass and must not be reprocessed (the disjointness precondition of the
//! two stages).

use std::collections::BTreeSet;

use crate::model::{Classification, Entity, FunctionTag, LayerId, RecordId, SubEntity};
use crate::pipeline::TransformRule;

fn spatial_targets(entity: &Entity, pred: impl Fn(&SubEntity) -> bool) -> BTreeSet<u32> {
    entity
        .sub_entities
        .iter()
        .filter(|s| s.class == Classification::Spatial && pred(s))
        .map(|s| s.index)
        .collect()
}

/// Selects spatial sub-entities that already carry at least one annotation.
pub struct AnnotatedSpatialRule {
    partition: LayerId,
}

impl AnnotatedSpatialRule {
    /// Create the rule with the partition layer to exclude.
    pub fn new(partition: impl Into<LayerId>) -> Self {
        Self {
            partition: partition.into(),
        }
    }
}

impl TransformRule for AnnotatedSpatialRule {
    fn select(&self, entity: &Entity) -> BTreeSet<u32> {
        spatial_targets(entity, |s| !s.annotations.is_empty())
    }

    fn filter(&self, entity: &Entity) -> bool {
        entity.id.layer != self.partition
    }
}

/// Selects annotated spatial sub-entities, excluding a named label.
pub struct AnnotatedSpatialExceptRule {
    partition: LayerId,
    excluded_label: String,
}

impl AnnotatedSpatialExceptRule {
    /// Create the rule with the partition layer and label to exclude.
    pub fn new(partition: impl Into<LayerId>, excluded_label: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            excluded_label: excluded_label.into(),
        }
    }
}

impl TransformRule for AnnotatedSpatialExceptRule {
    fn select(&self, entity: &Entity) -> BTreeSet<u32> {
        spatial_targets(entity, |s| {
            !s.annotations.is_empty() && s.label.as_deref() != Some(self.excluded_label.as_str())
        })
    }

    fn filter(&self, entity: &Entity) -> bool {
        entity.id.layer != self.partition
    }
}

/// Selects spatial sub-entities carrying an annotation with a given
/// function tag and operand reference.
pub struct OperandMarkedRule {
    partition: LayerId,
    function: FunctionTag,
    operand: RecordId,
}

impl OperandMarkedRule {
    /// Create the rule with the partition layer and the marker to look for.
    pub fn new(partition: impl Into<LayerId>, function: FunctionTag, operand: RecordId) -> Self {
        Self {
            partition: partition.into(),
            function,
            operand,
        }
    }
}

impl TransformRule for OperandMarkedRule {
    fn select(&self, entity: &Entity) -> BTreeSet<u32> {
        spatial_targets(entity, |s| {
            s.annotations
                .iter()
                .any(|a| a.function == self.function && a.references(&self.operand))
        })
    }

    fn filter(&self, entity: &Entity) -> bool {
        entity.id.layer != self.partition
    }
}
