//! Plugin registry - conditional rule contributors keyed by optional
//! extension layers.

use crate::error::{Result, StratumError};
use crate::model::{Layer, LayerId, RecordId};
use crate::pipeline::TransformRule;
use crate::store::LayeredStore;

/// Declarative descriptor for a registered plugin: the layer that triggers
/// it and whether that layer is required for the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginDescriptor {
    /// Human-readable plugin name (used in reports).
    pub name: String,

    /// Layer whose presence activates the plugin.
    pub layer: LayerId,

    /// Whether an absent layer aborts the run.
    pub required: bool,
}

impl PluginDescriptor {
    /// Describe an optional plugin: silently skipped when its layer is
    /// absent.
    pub fn optional(name: impl Into<String>, layer: impl Into<LayerId>) -> Self {
        Self {
            name: name.into(),
            layer: layer.into(),
            required: false,
        }
    }

    /// Describe a required plugin: an absent layer aborts the run.
    pub fn required(name: impl Into<String>, layer: impl Into<LayerId>) -> Self {
        Self {
            name: name.into(),
            layer: layer.into(),
            required: true,
        }
    }
}

/// Factory building a rule contributor from the plugin's resolved layer.
pub type RuleFactory = Box<dyn Fn(&Layer) -> Box<dyn TransformRule>>;

/// An active contributor produced by a registry scan: the rule plus the
/// entities it governs.
pub struct Contributor {
    /// Name from the descriptor.
    pub name: String,

    /// The rule to drive through the conditional-transform pipeline.
    pub rule: Box<dyn TransformRule>,

    /// Identifiers of the entities the plugin's layer declares, in
    /// declaration order.
    pub entities: Vec<RecordId>,
}

impl std::fmt::Debug for Contributor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Contributor")
            .field("name", &self.name)
            .field("entities", &self.entities)
            .finish_non_exhaustive()
    }
}

/// Registry of plugin descriptors and their factories.
///
/// Registration happens at build time, before any run; `scan` is invoked
/// exactly once per run against the run's load order. Order among
/// contributors is registration order; it has no effect on final output
/// since rules operate on disjoint predicates and patching is idempotent.
#[derive(Default)]
pub struct PluginRegistry {
    entries: Vec<(PluginDescriptor, RuleFactory)>,
}

impl PluginRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin descriptor with its factory.
    pub fn register(
        &mut self,
        descriptor: PluginDescriptor,
        factory: impl Fn(&Layer) -> Box<dyn TransformRule> + 'static,
    ) {
        self.entries.push((descriptor, Box::new(factory)));
    }

    /// Registered descriptors, in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &PluginDescriptor> {
        self.entries.iter().map(|(d, _)| d)
    }

    /// Number of registered plugins.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether no plugins are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Scan the load order and instantiate contributors for the plugins
    /// whose layers are enabled and present.
    ///
    /// A required descriptor whose layer is absent fails the whole scan with
    /// [`StratumError::MissingDependency`]; absent optional descriptors are
    /// silently skipped.
    pub fn scan(&self, store: &LayeredStore) -> Result<Vec<Contributor>> {
        let mut active = Vec::new();

        for (descriptor, factory) in &self.entries {
            if let Some(layer) = store.enabled_layer(&descriptor.layer) {
                active.push(Contributor {
                    name: descriptor.name.clone(),
                    rule: factory(layer),
                    entities: layer.entity_ids().collect(),
                });
            } else if descriptor.required {
                return Err(StratumError::MissingDependency {
                    layer: descriptor.layer.clone(),
                });
            }
        }

        Ok(active)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::model::Entity;

    struct NoopRule;

    impl TransformRule for NoopRule {
        fn select(&self, _entity: &Entity) -> BTreeSet<u32> {
            BTreeSet::new()
        }
    }

    fn noop_factory(_layer: &Layer) -> Box<dyn TransformRule> {
        Box::new(NoopRule)
    }

    fn registry_with_three_optional() -> PluginRegistry {
        let mut registry = PluginRegistry::new();
        registry.register(PluginDescriptor::optional("first", "first.layer"), noop_factory);
        registry.register(PluginDescriptor::optional("second", "second.layer"), noop_factory);
        registry.register(PluginDescriptor::optional("third", "third.layer"), noop_factory);
        registry
    }

    #[test]
    fn test_scan_gates_on_present_layers() {
        // Only the second descriptor's layer is present.
        let store = LayeredStore::new(vec![Layer::new("second.layer")]);
        let registry = registry_with_three_optional();

        let active = registry.scan(&store).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "second");
    }

    #[test]
    fn test_scan_fails_on_missing_required_layer() {
        let store = LayeredStore::new(vec![Layer::new("second.layer")]);
        let mut registry = registry_with_three_optional();
        registry.register(PluginDescriptor::required("vital", "vital.layer"), noop_factory);

        let err = registry.scan(&store).unwrap_err();
        assert!(matches!(
            err,
            StratumError::MissingDependency { layer } if layer.as_str() == "vital.layer"
        ));
    }

    #[test]
    fn test_scan_skips_disabled_layers() {
        let store = LayeredStore::new(vec![Layer::new("second.layer").disabled()]);
        let registry = registry_with_three_optional();

        let active = registry.scan(&store).unwrap();
        assert!(active.is_empty());
    }

    #[test]
    fn test_contributors_keep_registration_order() {
        let store = LayeredStore::new(vec![
            Layer::new("first.layer"),
            Layer::new("third.layer"),
        ]);
        let registry = registry_with_three_optional();

        let active = registry.scan(&store).unwrap();
        let names: Vec<_> = active.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["first", "third"]);
    }
}
