use serde::{Deserialize, Serialize};

/// A single simulation record as supplied by the store.
///
/// The UI only ever reads these; creation, mutation, and deletion all go
/// through `store::SimStore`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Simulation {
    pub id: u64,
    pub name: String,
    /// Free-form display string ("ready", "running", "error", ...).
    /// The UI color-codes known values and falls back to dim text.
    pub status: String,
}

impl Simulation {
    pub fn new(id: u64, name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            status: status.into(),
        }
    }
}
