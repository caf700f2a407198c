//! Conditional-transform pipeline - the general rule-driven case.

use std::collections::BTreeSet;

use crate::diff;
use crate::error::Result;
use crate::model::{Annotation, Entity, RecordId};
use crate::store::{LayeredStore, OverrideStore};

use super::report::StageReport;

/// A per-record rule deciding which sub-entities of an entity should carry
/// the pipeline's annotation.
///
/// Each optional extension supplies one implementation; the pipeline drives
/// them through dynamic dispatch.
pub trait TransformRule {
    /// Compute the target set: local indices of the sub-entities that
    /// should carry the annotation on this current entity.
    fn select(&self, entity: &Entity) -> BTreeSet<u32>;

    /// Entity-level gate, checked before [`TransformRule::select`]. Used
    /// for domain-partition exclusion: entities already covered by the
    /// forwarding pass are rejected here.
    fn filter(&self, _entity: &Entity) -> bool {
        true
    }

    /// Short-circuit on the selected target set.
    fn should_patch(&self, selected: &BTreeSet<u32>) -> bool {
        !selected.is_empty()
    }
}

/// Applies a fixed required annotation to the sub-entities a rule selects,
/// patching only the ones not already carrying it.
///
/// Constructed once per run and shared by reference across every
/// contributor. An entity whose target set is already fully satisfied gets
/// no override and no report entry, which is what makes repeated runs
/// stable.
pub struct ConditionalTransformPipeline<'a> {
    store: &'a LayeredStore,
    annotation: Annotation,
}

impl<'a> ConditionalTransformPipeline<'a> {
    /// Create a pipeline over the given resolution view and required
    /// annotation.
    pub fn new(store: &'a LayeredStore, annotation: Annotation) -> Self {
        Self { store, annotation }
    }

    /// The required annotation.
    pub fn annotation(&self) -> &Annotation {
        &self.annotation
    }

    /// Run one rule over a set of candidate entities.
    ///
    /// Per candidate, against its current resolved version: filter, select
    /// the target set T, gate on `should_patch`, compute the actual set A of
    /// sub-entities already carrying the annotation, and patch exactly
    /// T \ A through an override.
    pub fn run(
        &self,
        stage: impl Into<String>,
        rule: &dyn TransformRule,
        candidates: impl IntoIterator<Item = RecordId>,
        overrides: &mut OverrideStore,
    ) -> Result<StageReport> {
        let mut report = StageReport::new(stage);

        for id in candidates {
            report.examined += 1;

            let Some(current) = self.store.resolve(&id) else {
                report.record_unresolved(id);
                continue;
            };

            if !rule.filter(current) {
                continue;
            }

            let targets = rule.select(current);
            if !rule.should_patch(&targets) {
                continue;
            }

            // The actual set is computed from the staged override when an
            // earlier stage already created one; annotations it appended
            // must count as present, or an overlapping rule would append a
            // second structurally-equal copy.
            let staged = overrides.get(&id).unwrap_or(current);
            let actual = diff::indices_with_annotation(staged, &self.annotation);
            let to_patch: Vec<u32> = targets
                .difference(&actual)
                .filter(|i| staged.sub_entity(**i).is_some())
                .copied()
                .collect();
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Classification, Layer, SubEntity};

    fn annotation() -> Annotation {
        Annotation::member_of(RecordId::new("canon.layer", 100))
    }

    /// Selects every sub-entity, unconditionally.
    struct SelectAll;

    impl TransformRule for SelectAll {
        fn select(&self, entity: &Entity) -> BTreeSet<u32> {
            entity.sub_entities.iter().map(|s| s.index).collect()
        }
    }

    /// Rejects every entity at the filter gate; selecting would panic.
    struct RejectAll;

    impl TransformRule for RejectAll {
        fn select(&self, _entity: &Entity) -> BTreeSet<u32> {
            panic!("select must not be invoked for filtered entities");
        }

        fn filter(&self, _entity: &Entity) -> bool {
            false
        }
    }

    fn two_sub_entity_store() -> LayeredStore {
        // Index 0 already carries the annotation, index 1 does not.
        let entity = Entity::new(RecordId::new("plug.layer", 1))
            .with_sub_entity(
                SubEntity::new(0, Classification::Spatial).with_annotation(annotation()),
            )
            .with_sub_entity(SubEntity::new(1, Classification::Agent));
        LayeredStore::new(vec![Layer::new("plug.layer").with_entity(entity)])
    }

    #[test]
    fn test_patches_only_the_difference() {
        let store = two_sub_entity_store();
        let pipeline = ConditionalTransformPipeline::new(&store, annotation());
        let mut overrides = OverrideStore::new();

        let report = pipeline
            .run(
                "select-all",
                &SelectAll,
                [RecordId::new("plug.layer", 1)],
                &mut overrides,
            )
            .unwrap();

        // One override, annotation appended only to sub-entity 1.
        assert_eq!(overrides.len(), 1);
        assert_eq!(report.patched[0].indices, vec![1]);

        let layer = overrides.into_layer("stratum.patch");
        let patched = layer.entity(&RecordId::new("plug.layer", 1)).unwrap();
        assert_eq!(patched.sub_entity(0).unwrap().annotations.len(), 1);
        assert_eq!(patched.sub_entity(1).unwrap().annotations.len(), 1);
    }

    #[test]
    fn test_filtered_entity_never_reaches_select() {
        let store = two_sub_entity_store();
        let pipeline = ConditionalTransformPipeline::new(&store, annotation());
        let mut overrides = OverrideStore::new();

        let report = pipeline
            .run(
                "reject-all",
                &RejectAll,
                [RecordId::new("plug.layer", 1)],
                &mut overrides,
            )
            .unwrap();

        assert!(report.is_noop());
        assert!(overrides.is_empty());
    }

    #[test]
    fn test_later_stage_counts_staged_annotations_as_present() {
        let store = two_sub_entity_store();
        let pipeline = ConditionalTransformPipeline::new(&store, annotation());
        let mut overrides = OverrideStore::new();
        let id = RecordId::new("plug.layer", 1);

        pipeline
            .run("first", &SelectAll, [id.clone()], &mut overrides)
            .unwrap();

        // A second overlapping stage sharing the override store must see
        // the annotation staged by the first and change nothing.
        let report = pipeline
            .run("second", &SelectAll, [id.clone()], &mut overrides)
            .unwrap();
        assert!(report.is_noop());

        let layer = overrides.into_layer("stratum.patch");
        let patched = layer.entity(&id).unwrap();
        for sub in &patched.sub_entities {
            let copies = sub
                .annotations
                .iter()
                .filter(|a| **a == annotation())
                .count();
            assert_eq!(copies, 1, "sub-entity {} holds duplicates", sub.index);
        }
    }

    #[test]
    fn test_selected_index_without_sub_entity_is_dropped() {
        struct SelectPhantom;
        impl TransformRule for SelectPhantom {
            fn select(&self, _entity: &Entity) -> BTreeSet<u32> {
                BTreeSet::from([1, 9])
            }
        }

        let store = two_sub_entity_store();
        let pipeline = ConditionalTransformPipeline::new(&store, annotation());
        let mut overrides = OverrideStore::new();

        let report = pipeline
            .run(
                "phantom",
                &SelectPhantom,
                [RecordId::new("plug.layer", 1)],
                &mut overrides,
            )
            .unwrap();

        // Index 9 has no sub-entity; it must appear neither in the report
        // nor as an untouched override.
        assert_eq!(report.patched[0].indices, vec![1]);
        assert_eq!(report.annotations_added(), 1);
    }

    #[test]
    fn test_only_phantom_indices_creates_no_override() {
        struct SelectOnlyPhantom;
        impl TransformRule for SelectOnlyPhantom {
            fn select(&self, _entity: &Entity) -> BTreeSet<u32> {
                BTreeSet::from([9])
            }
        }

        let store = two_sub_entity_store();
        let pipeline = ConditionalTransformPipeline::new(&store, annotation());
        let mut overrides = OverrideStore::new();

        let report = pipeline
            .run(
                "phantom-only",
                &SelectOnlyPhantom,
                [RecordId::new("plug.layer", 1)],
                &mut overrides,
            )
            .unwrap();

        assert!(report.is_noop());
        assert!(overrides.is_empty());
    }

    #[test]
    fn test_empty_target_set_short_circuits() {
        struct SelectNone;
        impl TransformRule for SelectNone {
            fn select(&self, _entity: &Entity) -> BTreeSet<u32> {
                BTreeSet::new()
            }
        }

        let store = two_sub_entity_store();
        let pipeline = ConditionalTransformPipeline::new(&store, annotation());
        let mut overrides = OverrideStore::new();

        let report = pipeline
            .run(
                "select-none",
                &SelectNone,
                [RecordId::new("plug.layer", 1)],
                &mut overrides,
            )
            .unwrap();

        assert!(report.is_noop());
        assert!(overrides.is_empty());
    }
}
