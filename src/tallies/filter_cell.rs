use serde::{Deserialize, Serialize};

/// Cell filter for tallies - filters events based on which cell they occur in
///
/// Cell ids are not checked against the geometry; an id the geometry does
/// not contain is reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellFilter {
    /// The cell ID to filter on
    pub cell_id: u32,
}

impl CellFilter {
    pub fn new(cell_id: u32) -> Self {
        Self { cell_id }
    }
}
