use fiscore::tracks::{ThreatReport, ThreatScore};
use serde::{Deserialize, Serialize};

/// State published to the visualizer: the latest batch's scores plus the
/// notes the workflow attached to them.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VisualizationModel {
    pub threat_profile: Vec<f64>,
    pub record_count: usize,
    pub average: f64,
    pub threat_scores: Vec<ThreatScore>,
    pub evaluation_notes: Vec<String>,
}

impl VisualizationModel {
    pub fn from_report(report: &ThreatReport, notes: Vec<String>) -> Self {
        Self {
            threat_profile: report.profile(),
            record_count: report.scores.len(),
            average: report.average,
            threat_scores: report.scores.clone(),
            evaluation_notes: notes,
        }
    }
}
