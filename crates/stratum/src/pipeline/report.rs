//! Structured run reports emitted by the pipelines.
//!
//! Reports are the engine's observability surface: one entry per patched
//! entity with its patched sub-entity indices, plus diagnostics for entities
//! skipped locally. They are informational, not part of the data contract;
//! the output layer carries the actual patches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::RecordId;

/// One patched entity and the sub-entity indices that received the
/// annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchedEntity {
    /// Identifier of the patched entity.
    pub id: RecordId,

    /// Display label of the current version, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Local indices of the sub-entities that were patched, ascending.
    pub indices: Vec<u32>,
}

/// Report for one pipeline stage (the forwarding pass or one contributor).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageReport {
    /// Stage name.
    pub stage: String,

    /// Number of candidate entities examined.
    pub examined: usize,

    /// Entities patched by this stage, in processing order.
    pub patched: Vec<PatchedEntity>,

    /// Identifiers that could not be resolved to a current version.
    pub unresolved: Vec<RecordId>,

    /// Identifiers skipped because they do not mirror the canonical
    /// sub-entity layout (forwarding only).
    pub layout_mismatches: Vec<RecordId>,
}

impl StageReport {
    /// Create an empty report for a stage.
    pub fn new(stage: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            examined: 0,
            patched: Vec::new(),
            unresolved: Vec::new(),
            layout_mismatches: Vec::new(),
        }
    }

    /// Record a patched entity.
    pub fn record_patch(&mut self, id: RecordId, label: Option<String>, indices: Vec<u32>) {
        self.patched.push(PatchedEntity { id, label, indices });
    }

    /// Record an identifier that could not be resolved.
    pub fn record_unresolved(&mut self, id: RecordId) {
        self.unresolved.push(id);
    }

    /// Record an identifier that failed the layout-mirror precondition.
    pub fn record_layout_mismatch(&mut self, id: RecordId) {
        self.layout_mismatches.push(id);
    }

    /// Number of entities patched.
    pub fn entities_patched(&self) -> usize {
        self.patched.len()
    }

    /// Total annotations added across all patched entities.
    pub fn annotations_added(&self) -> usize {
        self.patched.iter().map(|p| p.indices.len()).sum()
    }

    /// Check whether the stage changed nothing and raised no diagnostics.
    pub fn is_noop(&self) -> bool {
        self.patched.is_empty() && self.unresolved.is_empty() && self.layout_mismatches.is_empty()
    }
}

/// Aggregate report for a full engine run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineReport {
    /// When the run started.
    pub started_at: DateTime<Utc>,

    /// When the run finished.
    pub finished_at: DateTime<Utc>,

    /// Names of the active contributors returned by the registry scan, in
    /// registration order.
    pub contributors: Vec<String>,

    /// Number of overrides created across all stages.
    pub overrides_created: usize,

    /// Per-stage reports: the forwarding pass first, then one per
    /// contributor.
    pub stages: Vec<StageReport>,
}

impl EngineReport {
    /// Total entities patched across all stages.
    pub fn entities_patched(&self) -> usize {
        self.stages.iter().map(|s| s.entities_patched()).sum()
    }

    /// Total annotations added across all stages.
    pub fn annotations_added(&self) -> usize {
        self.stages.iter().map(|s| s.annotations_added()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_report_totals() {
        let mut report = StageReport::new("forward");
        report.examined = 3;
        report.record_patch(RecordId::new("base.layer", 1), None, vec![0, 2]);
        report.record_patch(RecordId::new("base.layer", 2), None, vec![1]);

        assert_eq!(report.entities_patched(), 2);
        assert_eq!(report.annotations_added(), 3);
        assert!(!report.is_noop());
    }

    #[test]
    fn test_empty_stage_is_noop() {
        let mut report = StageReport::new("plugin");
        report.examined = 10;
        assert!(report.is_noop());

        report.record_unresolved(RecordId::new("base.layer", 1));
        assert!(!report.is_noop());
    }
}
