//! Machine model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A processing resource that runs one operation at a time.
///
/// Carries no scheduling state. Queues and availability times are local
/// bookkeeping of the decoder and the heuristics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Machine {
    id: String,
}

impl Machine {
    /// Creates a machine.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Machine identifier.
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Machine({})", self.id)
    }
}
