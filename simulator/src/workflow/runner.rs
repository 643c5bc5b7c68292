use crate::workflow::config::ScenarioConfig;
use anyhow::Context;
use fiscore::tracks::{ThreatReport, TrackRecord};
use log::info;

pub struct WorkflowResult {
    pub report: ThreatReport,
    pub notes: Vec<String>,
}

#[derive(Clone)]
pub struct Runner {
    config: ScenarioConfig,
}

impl Runner {
    pub fn new(config: ScenarioConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    pub fn execute(&self, records: &[TrackRecord]) -> anyhow::Result<WorkflowResult> {
        let engine = self
            .config
            .to_engine()
            .with_context(|| format!("preparing scenario {}", self.config.name))?;
        let report = engine
            .score_batch(records)
            .context("scoring track batch")?;
        info!(
            "workflow {} scored {} records",
            self.config.name,
            report.scores.len()
        );

        let notes = vec![
            format!("scenario {}", self.config.name),
            format!(
                "{} variables, {} rules",
                engine.variables().len(),
                engine.rules().len()
            ),
            format!("average threat {:.6}", report.average),
        ];

        Ok(WorkflowResult { report, notes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::profile::build_track_batch;

    #[test]
    fn runner_executes_workflow() {
        let config = ScenarioConfig::builtin();
        let runner = Runner::new(config.clone());
        let records = build_track_batch(&config, 8, 7);
        let result = runner.execute(&records).unwrap();
        assert_eq!(result.report.scores.len(), 8);
        assert!(result.report.average >= 0.0 && result.report.average <= 100.0);
        assert_eq!(result.notes.len(), 3);
    }

    #[test]
    fn runner_rejects_malformed_records() {
        let runner = Runner::new(ScenarioConfig::builtin());
        let records = vec![TrackRecord::new(vec![640.0, 1500.0])];
        assert!(runner.execute(&records).is_err());
    }
}
