//! Annotations - structural markers attached to sub-entities.

use serde::{Deserialize, Serialize};

use super::id::RecordId;

/// Function tag of an annotation, drawn from a fixed enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionTag {
    /// The sub-entity is constrained to members of a shared set record.
    MemberOfSet,
    /// The sub-entity is constrained to non-members of a shared set record.
    NotMemberOfSet,
    /// The sub-entity carries a marker record.
    HasMarker,
    /// The sub-entity lacks a marker record.
    LacksMarker,
}

impl FunctionTag {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            FunctionTag::MemberOfSet => "member_of_set",
            FunctionTag::NotMemberOfSet => "not_member_of_set",
            FunctionTag::HasMarker => "has_marker",
            FunctionTag::LacksMarker => "lacks_marker",
        }
    }
}

/// A structural annotation: a function tag plus one or more operand
/// references.
///
/// Annotations are compared structurally, never by identity: two annotations
/// are interchangeable for patching purposes iff their function tags are
/// equal and every corresponding operand reference is equal. Operand
/// equality is reference equality of [`RecordId`]s, not deep equality of the
/// referenced records. The derived `PartialEq` implements exactly this.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Annotation {
    /// Function tag.
    pub function: FunctionTag,
    /// Operand references, in order.
    pub operands: Vec<RecordId>,
}

impl Annotation {
    /// Create an annotation from a function tag and operands.
    pub fn new(function: FunctionTag, operands: Vec<RecordId>) -> Self {
        Self { function, operands }
    }

    /// Create a membership annotation over a shared set record.
    pub fn member_of(set: RecordId) -> Self {
        Self::new(FunctionTag::MemberOfSet, vec![set])
    }

    /// Check whether this annotation references the given record as an
    /// operand.
    pub fn references(&self, operand: &RecordId) -> bool {
        self.operands.iter().any(|op| op == operand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_id() -> RecordId {
        RecordId::new("canon.layer", 10)
    }

    #[test]
    fn test_structural_equality_not_identity() {
        let original = Annotation::member_of(set_id());
        let copy = original.clone();

        // A deep copy is equal to the canonical instance.
        assert_eq!(original, copy);
    }

    #[test]
    fn test_unequal_on_different_tag() {
        let a = Annotation::new(FunctionTag::MemberOfSet, vec![set_id()]);
        let b = Annotation::new(FunctionTag::NotMemberOfSet, vec![set_id()]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_unequal_on_different_operand() {
        let a = Annotation::member_of(set_id());
        let b = Annotation::member_of(RecordId::new("canon.layer", 11));
        assert_ne!(a, b);
    }

    #[test]
    fn test_references_operand() {
        let a = Annotation::member_of(set_id());
        assert!(a.references(&set_id()));
        assert!(!a.references(&RecordId::new("canon.layer", 11)));
    }
}
