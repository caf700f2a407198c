//! Patch pipelines: the forwarding pass, the conditional-transform pass,
//! and the reports they emit.

mod forward;
mod report;
mod transform;

pub use forward::{FORWARD_STAGE, ForwardingPipeline};
pub use report::{EngineReport, PatchedEntity, StageReport};
pub use transform::{ConditionalTransformPipeline, TransformRule};
