use serde::{Deserialize, Serialize};

/// Crisp threat score attributed to one input record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ThreatScore {
    pub record_index: usize,
    pub score: f64,
}

/// Batch result: per-record scores in input order plus their mean.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ThreatReport {
    pub scores: Vec<ThreatScore>,
    pub average: f64,
}

impl ThreatReport {
    /// Score values in record order, for plotting and report rendering.
    pub fn profile(&self) -> Vec<f64> {
        self.scores.iter().map(|score| score.score).collect()
    }
}
