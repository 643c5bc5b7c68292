use serde::{Deserialize, Serialize};

/// One observed track, one input value per declared fuzzy variable.
///
/// Column order matches variable declaration order; the loader is
/// responsible for preserving that coupling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackRecord {
    pub inputs: Vec<f64>,
}

impl TrackRecord {
    pub fn new(inputs: Vec<f64>) -> Self {
        Self { inputs }
    }
}
