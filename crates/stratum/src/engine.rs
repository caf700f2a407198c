//! Patch engine - orchestrates one full pipeline run.

use chrono::Utc;

use crate::error::{Result, StratumError};
use crate::model::{Annotation, Entity, FunctionTag, Layer, LayerId, RecordId};
use crate::pipeline::{ConditionalTransformPipeline, EngineReport, ForwardingPipeline};
use crate::registry::PluginRegistry;
use crate::store::{LayeredStore, OverrideStore};

/// Configuration for a patch run.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Layer that defines the canonical annotation and the entities the
    /// forwarding pass covers. Must be enabled and present.
    pub canonical_layer: LayerId,

    /// Label of the shared set record the canonical annotation references.
    pub canonical_set_label: String,

    /// Identity given to the output override layer.
    pub output_layer: LayerId,
}

impl EngineConfig {
    /// Create a config with the default output layer identity.
    pub fn new(canonical_layer: impl Into<LayerId>, set_label: impl Into<String>) -> Self {
        Self {
            canonical_layer: canonical_layer.into(),
            canonical_set_label: set_label.into(),
            output_layer: LayerId::new("stratum.patch"),
        }
    }

    /// Set the output layer identity.
    pub fn with_output_layer(mut self, output: impl Into<LayerId>) -> Self {
        self.output_layer = output.into();
        self
    }
}

/// Result of a completed run: the output layer plus the run report.
#[derive(Debug)]
pub struct PatchOutcome {
    /// The override layer - the run's sole externally visible output.
    pub overrides: Layer,

    /// Aggregate observability report.
    pub report: EngineReport,
}

/// Drives one complete patch run: the one-time canonical annotation search,
/// the forwarding pass, the registry scan, and one conditional-transform
/// invocation per active contributor, in that order.
///
/// Runs are single-threaded and synchronous; they either complete or fail
/// fatally before committing any output.
pub struct PatchEngine {
    config: EngineConfig,
    registry: PluginRegistry,
}

impl PatchEngine {
    /// Create an engine with an empty registry.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            registry: PluginRegistry::new(),
        }
    }

    /// Attach a populated plugin registry.
    pub fn with_registry(mut self, registry: PluginRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Mutable access to the registry, for incremental registration.
    pub fn registry_mut(&mut self) -> &mut PluginRegistry {
        &mut self.registry
    }

    /// Run the full pipeline against a load order.
    pub fn run(&self, store: &LayeredStore) -> Result<PatchOutcome> {
        let started_at = Utc::now();

        let canonical_layer = store
            .enabled_layer(&self.config.canonical_layer)
            .ok_or_else(|| StratumError::MissingDependency {
                layer: self.config.canonical_layer.clone(),
            })?;

        let set_record = self.find_set_record(canonical_layer)?;
        let (source, annotation) = find_canonical_annotation(canonical_layer, &set_record)?;

        let mut overrides = OverrideStore::new();
        let mut stages = Vec::new();

        // Forwarding runs first, over the canonical layer's own entities.
        // The shared set record itself is not a dependent.
        let forwarding = ForwardingPipeline::new(store, annotation.clone());
        let dependents = canonical_layer.entity_ids().filter(|id| id != &set_record);
        stages.push(forwarding.run(source, dependents, &mut overrides)?);

        // Registry scan, then one conditional-transform pass per
        // contributor, in registration order.
        let contributors = self.registry.scan(store)?;
        let names: Vec<String> = contributors.iter().map(|c| c.name.clone()).collect();

        let pipeline = ConditionalTransformPipeline::new(store, annotation);
        for contributor in &contributors {
            stages.push(pipeline.run(
                contributor.name.clone(),
                contributor.rule.as_ref(),
                contributor.entities.iter().cloned(),
                &mut overrides,
            )?);
        }

        let overrides_created = overrides.len();
        Ok(PatchOutcome {
            overrides: overrides.into_layer(self.config.output_layer.clone()),
            report: EngineReport {
                started_at,
                finished_at: Utc::now(),
                contributors: names,
                overrides_created,
                stages,
            },
        })
    }

    /// Locate the shared set record in the canonical layer by label.
    fn find_set_record(&self, layer: &Layer) -> Result<RecordId> {
        layer
            .entities
            .iter()
            .find(|e| e.label.as_deref() == Some(self.config.canonical_set_label.as_str()))
            .map(|e| e.id.clone())
            .ok_or_else(|| StratumError::CanonicalSourceNotFound {
                label: self.config.canonical_set_label.clone(),
            })
    }
}

/// One-time search for the canonical annotation instance: the first
/// annotation across the layer's sub-entities that constrains membership in
/// the shared set record. Returns the entity it was found on (the canonical
/// source) and a structural copy of the annotation.
fn find_canonical_annotation<'a>(
    layer: &'a Layer,
    set_record: &RecordId,
) -> Result<(&'a Entity, Annotation)> {
    for entity in &layer.entities {
        for sub in &entity.sub_entities {
            for annotation in &sub.annotations {
                if annotation.function == FunctionTag::MemberOfSet
                    && annotation.operands.as_slice() == std::slice::from_ref(set_record)
                {
                    return Ok((entity, annotation.clone()));
                }
            }
        }
    }
    Err(StratumError::CanonicalAnnotationNotFound)
}
