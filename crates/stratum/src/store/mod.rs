//! Record storage: the layered resolution view, the copy-on-write override
//! store, and JSON persistence.

mod layered;
mod overrides;
mod persistence;

pub use layered::LayeredStore;
pub use overrides::OverrideStore;
pub use persistence::Dataset;
