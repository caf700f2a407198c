//! Diff engine - minimal-diff computation over annotation sets.
//!
//! All functions here are pure and never mutate their inputs. Scans are
//! O(|C|·|R|); structural-equality cost dominates set size at the typical
//! scale of tens of annotations, so no hashing is used.

use std::collections::BTreeSet;

use crate::model::{Annotation, Entity};

/// Check whether some element of `current` is structurally equal to
/// `required`.
pub fn has_annotation(current: &[Annotation], required: &Annotation) -> bool {
    current.iter().any(|a| a == required)
}

/// Compute the subset of `required` not structurally equal to any element of
/// `current`.
pub fn missing_annotations<'a>(
    current: &[Annotation],
    required: &'a [Annotation],
) -> Vec<&'a Annotation> {
    required
        .iter()
        .filter(|r| !has_annotation(current, r))
        .collect()
}

/// Compute the set of sub-entity local indices of `entity` that currently
/// carry an annotation structurally equal to `annotation`.
pub fn indices_with_annotation(entity: &Entity, annotation: &Annotation) -> BTreeSet<u32> {
    entity
        .sub_entities
        .iter()
        .filter(|s| has_annotation(&s.annotations, annotation))
        .map(|s| s.index)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Classification, FunctionTag, RecordId, SubEntity};

    fn member(index: u32) -> Annotation {
        Annotation::member_of(RecordId::new("canon.layer", index))
    }

    fn marker(index: u32) -> Annotation {
        Annotation::new(FunctionTag::HasMarker, vec![RecordId::new("canon.layer", index)])
    }

    #[test]
    fn test_has_annotation() {
        let current = vec![member(1), marker(2)];

        assert!(has_annotation(&current, &member(1)));
        assert!(has_annotation(&current, &marker(2)));
        assert!(!has_annotation(&current, &member(2)));
        assert!(!has_annotation(&[], &member(1)));
    }

    #[test]
    fn test_missing_annotations_is_minimal() {
        let current = vec![member(1), marker(2)];
        let required = vec![member(1), member(3), marker(2), marker(4)];

        let missing = missing_annotations(&current, &required);
        assert_eq!(missing, vec![&member(3), &marker(4)]);
    }

    #[test]
    fn test_missing_annotations_empty_when_satisfied() {
        let current = vec![member(1), marker(2)];
        let required = vec![marker(2), member(1)];

        assert!(missing_annotations(&current, &required).is_empty());
    }

    #[test]
    fn test_indices_with_annotation() {
        let entity = Entity::new(RecordId::new("base.layer", 1))
            .with_sub_entity(SubEntity::new(0, Classification::Spatial).with_annotation(member(1)))
            .with_sub_entity(SubEntity::new(1, Classification::Spatial))
            .with_sub_entity(SubEntity::new(2, Classification::Agent).with_annotation(member(1)));

        let indices = indices_with_annotation(&entity, &member(1));
        assert_eq!(indices, BTreeSet::from([0, 2]));
    }
}
