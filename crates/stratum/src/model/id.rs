//! Record and layer identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a named layer in the load order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(String);

impl LayerId {
    /// Create a layer identity from a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the layer name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for LayerId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for LayerId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Globally unique record key: the defining layer plus a local sequence
/// number. Two identifiers are equal iff both components match.
///
/// The defining layer is the layer that originally introduced the record,
/// which is not necessarily the layer a given version of it was declared in
/// (override layers re-declare records under their original identifier).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId {
    /// Layer that originally defined the record.
    pub layer: LayerId,
    /// Local sequence number within the defining layer.
    pub index: u32,
}

impl RecordId {
    /// Create a record identifier.
    pub fn new(layer: impl Into<LayerId>, index: u32) -> Self {
        Self {
            layer: layer.into(),
            index,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:06}", self.layer, self.index)
    }
}
