//! Patch manifest - declarative run configuration mapping optional layers
//! to built-in rules.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use stratum::rules::{AnnotatedSpatialExceptRule, AnnotatedSpatialRule, OperandMarkedRule};
use stratum::{EngineConfig, FunctionTag, PluginDescriptor, PluginRegistry, RecordId};

/// Rule selection for a manifest plugin entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleKind {
    /// Spatial sub-entities that already carry at least one annotation.
    AnnotatedSpatial,
    /// Annotated spatial sub-entities, excluding a named label.
    AnnotatedSpatialExcept { label: String },
    /// Spatial sub-entities marked by a specific function tag and operand.
    OperandMarked {
        function: FunctionTag,
        operand: RecordId,
    },
}

/// One plugin declaration in the manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginEntry {
    /// Plugin name, used in reports.
    pub name: String,

    /// Layer whose presence activates the plugin.
    pub layer: String,

    /// Whether an absent layer aborts the run.
    #[serde(default)]
    pub required: bool,

    /// Rule the plugin contributes.
    pub rule: RuleKind,
}

fn default_output_layer() -> String {
    "stratum.patch".to_string()
}

/// Declarative configuration for one patch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchManifest {
    /// Layer defining the canonical annotation and the forwarded entities.
    pub canonical_layer: String,

    /// Label of the shared set record within the canonical layer.
    pub canonical_set_label: String,

    /// Layer whose entities the plugin rules exclude (already covered by
    /// the forwarding pass).
    pub partition_layer: String,

    /// Identity of the produced override layer.
    #[serde(default = "default_output_layer")]
    pub output_layer: String,

    /// Plugin declarations, in activation order.
    #[serde(default)]
    pub plugins: Vec<PluginEntry>,
}

impl PatchManifest {
    /// Load a manifest from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| format!("Failed to open manifest '{}': {}", path.display(), e))?;
        let manifest = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| format!("Failed to parse manifest '{}': {}", path.display(), e))?;
        Ok(manifest)
    }

    /// Build the engine configuration this manifest describes.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::new(self.canonical_layer.as_str(), self.canonical_set_label.as_str())
            .with_output_layer(self.output_layer.as_str())
    }

    /// Build the plugin registry from the manifest's plugin entries.
    pub fn build_registry(&self) -> PluginRegistry {
        let mut registry = PluginRegistry::new();

        for entry in &self.plugins {
            let descriptor = if entry.required {
                PluginDescriptor::required(entry.name.as_str(), entry.layer.as_str())
            } else {
                PluginDescriptor::optional(entry.name.as_str(), entry.layer.as_str())
            };

            let partition = self.partition_layer.clone();
            match entry.rule.clone() {
                RuleKind::AnnotatedSpatial => {
                    registry.register(descriptor, move |_layer| {
                        Box::new(AnnotatedSpatialRule::new(partition.as_str()))
                    });
                }
                RuleKind::AnnotatedSpatialExcept { label } => {
                    registry.register(descriptor, move |_layer| {
                        Box::new(AnnotatedSpatialExceptRule::new(
                            partition.as_str(),
                            label.as_str(),
                        ))
                    });
                }
                RuleKind::OperandMarked { function, operand } => {
                    registry.register(descriptor, move |_layer| {
                        Box::new(OperandMarkedRule::new(
                            partition.as_str(),
                            function,
                            operand.clone(),
                        ))
                    });
                }
            }
        }

        registry
    }
}
