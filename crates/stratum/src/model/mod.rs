//! Data model: identifiers, annotations, entities, and layers.

mod annotation;
mod entity;
mod id;
mod layer;

pub use annotation::{Annotation, FunctionTag};
pub use entity::{Classification, Entity, SubEntity};
pub use id::{LayerId, RecordId};
pub use layer::Layer;
