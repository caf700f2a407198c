//! Stratum: a rule-driven patch engine for layered record datasets.
//!
//! A dataset is an ordered load order of layers - a read-only base plus
//! optional extension layers - combined by priority into one logical current
//! view per record. Stratum inspects the current view, determines which
//! sub-entities are missing a required annotation, and stages minimal
//! copy-on-write overrides that add it.
//!
//! # Core Principles
//!
//! - **Minimal diffs**: exactly the missing annotations are added, nothing
//!   else is touched
//! - **Copy-on-write**: base and current versions are never mutated; at most
//!   one override per record per run
//! - **Idempotent**: re-running against already-patched output changes
//!   nothing
//!
//! # Example
//!
//! ```no_run
//! use stratum::{Dataset, EngineConfig, PatchEngine};
//!
//! let store = Dataset::load("dataset.json").unwrap().into_store();
//! let engine = PatchEngine::new(EngineConfig::new("canon.layer", "RegionSetAll"));
//!
//! let outcome = engine.run(&store).unwrap();
//! println!("Overrides: {}", outcome.overrides.entities.len());
//! ```

pub mod diff;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod registry;
pub mod rules;
pub mod store;

mod engine;

pub use engine::{EngineConfig, PatchEngine, PatchOutcome};
pub use error::{Result, StratumError};
pub use model::{
    Annotation, Classification, Entity, FunctionTag, Layer, LayerId, RecordId, SubEntity,
};
pub use pipeline::{
    ConditionalTransformPipeline, EngineReport, ForwardingPipeline, PatchedEntity, StageReport,
    TransformRule,
};
pub use registry::{Contributor, PluginDescriptor, PluginRegistry};
pub use store::{Dataset, LayeredStore, OverrideStore};
