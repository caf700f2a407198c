//! Forwarding pipeline - propagate one canonical annotation to every
//! dependent of the canonical source entity.

use std::collections::BTreeSet;

use crate::diff;
use crate::error::Result;
use crate::model::{Annotation, Entity, RecordId};
use crate::store::{LayeredStore, OverrideStore};

use super::report::StageReport;

/// Stage name used in forwarding reports.
pub const FORWARD_STAGE: &str = "forward";

/// Applies a single fixed annotation to the sub-entities of every dependent
/// of one canonical source entity.
///
/// The required index set is computed once from the canonical source and
/// reused for every dependent. This relies on the precondition that all
/// dependents structurally mirror the canonical entity's sub-entity
/// ordering; a dependent that violates it is skipped and recorded as a
/// layout mismatch rather than patched at unrelated indices.
pub struct ForwardingPipeline<'a> {
    store: &'a LayeredStore,
    annotation: Annotation,
}

impl<'a> ForwardingPipeline<'a> {
    /// Create a pipeline over the given resolution view and canonical
    /// annotation.
    pub fn new(store: &'a LayeredStore, annotation: Annotation) -> Self {
        Self { store, annotation }
    }

    /// The canonical annotation being forwarded.
    pub fn annotation(&self) -> &Annotation {
        &self.annotation
    }

    /// Indices of the source's sub-entities that carry the canonical
    /// annotation. Fixed once at the start of the run.
    pub fn required_indices(&self, source: &Entity) -> BTreeSet<u32> {
        diff::indices_with_annotation(source, &self.annotation)
    }

    /// Run the pipeline over the dependents of `source`.
    ///
    /// Each dependent is resolved to its current version; sub-entities in
    /// the required set that lack the annotation receive a fresh structural
    /// copy through an override. Entities whose required set is already
    /// satisfied are left untouched: no override, no report entry.
    pub fn run(
        &self,
        source: &Entity,
        dependents: impl IntoIterator<Item = RecordId>,
        overrides: &mut OverrideStore,
    ) -> Result<StageReport> {
        let required = self.required_indices(source);
        let mut report = StageReport::new(FORWARD_STAGE);

        for id in dependents {
            report.examined += 1;

            let Some(current) = self.store.resolve(&id) else {
                report.record_unresolved(id);
                continue;
            };

            // Annotations staged by an earlier stage count as present.
            let staged = overrides.get(&id).unwrap_or(current);

            // Layout-mirror precondition: every required local index must
            // exist on the dependent.
            if required.iter().any(|i| staged.sub_entity(*i).is_none()) {
                report.record_layout_mismatch(id);
                continue;
            }

            let actual = diff::indices_with_annotation(staged, &self.annotation);
            let to_patch: Vec<u32> = required.difference(&actual).copied().collect();
            if to_patch.is_empty() {
                continue;
            }

            let label = current.label.clone();
            let target = overrides.get_or_create(&id, self.store)?;
            for &index in &to_patch {
                if let Some(sub) = target.sub_entity_mut(index) {
                    sub.annotations.push(self.annotation.clone());
                }
            }

            report.record_patch(id, label, to_patch);
        }

        Ok(report)
    }
}
