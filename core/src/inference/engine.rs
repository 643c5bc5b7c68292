use crate::fuzzy::{FuzzyVariable, MembershipFunction, Rule, SetRef};
use crate::math::stats::StatsHelper;
use crate::prelude::{EngineError, EngineResult};
use crate::telemetry::log::LogManager;
use crate::telemetry::metrics::{MetricsRecorder, MetricsSnapshot};
use crate::tracks::{ThreatReport, ThreatScore, TrackRecord};

/// Mamdani-style inference engine over a fixed variable and rule table.
///
/// Both tables are validated at construction and immutable afterwards;
/// scoring is a deterministic in-order pass with no shared mutable state
/// beyond the telemetry counters.
#[derive(Debug)]
pub struct InferenceEngine {
    variables: Vec<FuzzyVariable>,
    rules: Vec<Rule>,
    logger: LogManager,
    metrics: MetricsRecorder,
}

impl InferenceEngine {
    /// Builds an engine, checking every rule reference against the
    /// variable table. An out-of-range reference means the rule base was
    /// written against a different schema and aborts construction before
    /// any record is processed.
    pub fn new(variables: Vec<FuzzyVariable>, rules: Vec<Rule>) -> EngineResult<Self> {
        for (index, rule) in rules.iter().enumerate() {
            Self::check_rule(&variables, rule).map_err(|source| EngineError::InvalidRule {
                rule: index,
                source: Box::new(source),
            })?;
        }
        Ok(Self {
            variables,
            rules,
            logger: LogManager::new("engine"),
            metrics: MetricsRecorder::new(),
        })
    }

    fn check_rule(variables: &[FuzzyVariable], rule: &Rule) -> EngineResult<()> {
        for set_ref in rule.antecedents.iter().chain([&rule.consequent]) {
            Self::resolve(variables, set_ref)?;
        }
        Ok(())
    }

    fn resolve<'v>(
        variables: &'v [FuzzyVariable],
        set_ref: &SetRef,
    ) -> EngineResult<&'v MembershipFunction> {
        let variable =
            variables
                .get(set_ref.variable)
                .ok_or(EngineError::VariableOutOfRange {
                    index: set_ref.variable,
                    count: variables.len(),
                })?;
        variable.get(set_ref.set)
    }

    pub fn variables(&self) -> &[FuzzyVariable] {
        &self.variables
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    fn check_arity(&self, record: &TrackRecord) -> EngineResult<()> {
        if record.inputs.len() != self.variables.len() {
            return Err(EngineError::RecordArity {
                expected: self.variables.len(),
                got: record.inputs.len(),
            });
        }
        Ok(())
    }

    /// Firing strength of one rule against one record.
    ///
    /// Each antecedent grades the record column owned by its referenced
    /// variable; And takes the minimum of the two grades, Or the maximum.
    pub fn rule_strength(&self, rule_index: usize, record: &TrackRecord) -> EngineResult<f64> {
        let rule = self.rules.get(rule_index).ok_or(EngineError::RuleOutOfRange {
            index: rule_index,
            count: self.rules.len(),
        })?;
        self.check_arity(record)?;
        Ok(self.strength(rule, record))
    }

    // References were validated at construction and arity by the caller.
    fn strength(&self, rule: &Rule, record: &TrackRecord) -> f64 {
        let grade = |set_ref: &SetRef| {
            let variable = &self.variables[set_ref.variable];
            variable.sets()[set_ref.set].evaluate(record.inputs[set_ref.variable])
        };
        let first = grade(&rule.antecedents[0]);
        let second = grade(&rule.antecedents[1]);
        rule.operator.combine(first, second)
    }

    /// Defuzzifies one record into a crisp threat score.
    ///
    /// Height defuzzification: each rule contributes its consequent peak
    /// weighted by firing strength. This is the legacy behavior and is
    /// deliberately not centroid-of-area; switching would change every
    /// deployed score. A record that fires no rule scores exactly 0.0.
    pub fn score(&self, record: &TrackRecord) -> EngineResult<f64> {
        self.check_arity(record)?;
        let mut weighted = 0.0;
        let mut total = 0.0;
        for rule in &self.rules {
            let strength = self.strength(rule, record);
            let representative =
                self.variables[rule.consequent.variable].sets()[rule.consequent.set]
                    .representative();
            weighted += strength * representative;
            total += strength;
        }
        if total == 0.0 {
            return Ok(0.0);
        }
        Ok(weighted / total)
    }

    /// Scores a whole batch in input order.
    ///
    /// Arity is checked for every record before any scoring so a malformed
    /// batch fails without partial output. An empty batch reports an
    /// average of exactly 0.0.
    pub fn score_batch(&self, records: &[TrackRecord]) -> EngineResult<ThreatReport> {
        for record in records {
            if let Err(err) = self.check_arity(record) {
                self.metrics.record_error();
                return Err(err);
            }
        }

        let mut scores = Vec::with_capacity(records.len());
        for (record_index, record) in records.iter().enumerate() {
            let score = self.score(record)?;
            scores.push(ThreatScore {
                record_index,
                score,
            });
        }

        let report = ThreatReport {
            average: StatsHelper::mean(
                &scores.iter().map(|score| score.score).collect::<Vec<_>>(),
            ),
            scores,
        };
        self.metrics.record_scored(report.scores.len());
        self.logger.record(&format!(
            "scored {} records, average {:.6}",
            report.scores.len(),
            report.average
        ));
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuzzy::RuleOperator;

    fn set(name: &str, left: f64, peak: f64, right: f64) -> MembershipFunction {
        MembershipFunction::triangle(name, left, peak, right).unwrap()
    }

    fn speed_threat_engine() -> InferenceEngine {
        let variables = vec![
            FuzzyVariable::new(
                "speed",
                vec![set("low", 0.0, 0.0, 50.0), set("high", 0.0, 100.0, 100.0)],
            ),
            FuzzyVariable::new("threat", vec![set("low", 0.0, 10.0, 20.0)]),
        ];
        let rules = vec![Rule::new(
            [SetRef::new(0, 0), SetRef::new(0, 0)],
            RuleOperator::And,
            SetRef::new(1, 0),
        )];
        InferenceEngine::new(variables, rules).unwrap()
    }

    #[test]
    fn construction_rejects_dangling_variable_reference() {
        let variables = vec![FuzzyVariable::new("x", vec![set("only", 0.0, 1.0, 2.0)])];
        let rules = vec![Rule::new(
            [SetRef::new(0, 0), SetRef::new(3, 0)],
            RuleOperator::And,
            SetRef::new(0, 0),
        )];
        let err = InferenceEngine::new(variables, rules).unwrap_err();
        assert!(matches!(err, EngineError::InvalidRule { rule: 0, .. }));
    }

    #[test]
    fn construction_rejects_dangling_set_reference() {
        let variables = vec![FuzzyVariable::new("x", vec![set("only", 0.0, 1.0, 2.0)])];
        let rules = vec![Rule::new(
            [SetRef::new(0, 0), SetRef::new(0, 0)],
            RuleOperator::And,
            SetRef::new(0, 7),
        )];
        assert!(InferenceEngine::new(variables, rules).is_err());
    }

    #[test]
    fn rule_strength_aggregates_with_min_and_max() {
        // One input variable graded by a rising and a falling set: at
        // x = 3 the grades are 0.3 and 0.7.
        let variables = vec![
            FuzzyVariable::new(
                "x",
                vec![set("rise", 0.0, 10.0, 10.0), set("fall", 0.0, 0.0, 10.0)],
            ),
            FuzzyVariable::new("out", vec![set("level", 0.0, 50.0, 100.0)]),
        ];
        let rules = vec![
            Rule::new(
                [SetRef::new(0, 0), SetRef::new(0, 1)],
                RuleOperator::And,
                SetRef::new(1, 0),
            ),
            Rule::new(
                [SetRef::new(0, 0), SetRef::new(0, 1)],
                RuleOperator::Or,
                SetRef::new(1, 0),
            ),
        ];
        let engine = InferenceEngine::new(variables, rules).unwrap();
        let record = TrackRecord::new(vec![3.0, 0.0]);
        assert_eq!(engine.rule_strength(0, &record).unwrap(), 0.3);
        assert_eq!(engine.rule_strength(1, &record).unwrap(), 0.7);
    }

    #[test]
    fn rule_strength_rejects_bad_rule_index() {
        let engine = speed_threat_engine();
        let record = TrackRecord::new(vec![0.0, 0.0]);
        assert!(matches!(
            engine.rule_strength(5, &record).unwrap_err(),
            EngineError::RuleOutOfRange { index: 5, .. }
        ));
    }

    #[test]
    fn score_rejects_arity_mismatch() {
        let engine = speed_threat_engine();
        let record = TrackRecord::new(vec![0.0]);
        assert!(matches!(
            engine.score(&record).unwrap_err(),
            EngineError::RecordArity {
                expected: 2,
                got: 1
            }
        ));
    }

    #[test]
    fn step_boundary_fires_fully_and_scores_the_consequent_peak() {
        // speed = 0 sits on the collapsed side of low(0, 0, 50): the rule
        // fires at 1.0 and the score is the consequent representative.
        let engine = speed_threat_engine();
        let record = TrackRecord::new(vec![0.0, 0.0]);
        assert_eq!(engine.rule_strength(0, &record).unwrap(), 1.0);
        assert_eq!(engine.score(&record).unwrap(), 10.0);
    }

    #[test]
    fn score_is_zero_when_no_rule_fires() {
        let engine = speed_threat_engine();
        // speed = 50 is outside low's support and exactly on high's left
        // boundary, but no rule references high.
        let record = TrackRecord::new(vec![50.0, 0.0]);
        assert_eq!(engine.score(&record).unwrap(), 0.0);
    }

    #[test]
    fn score_is_the_strength_weighted_average_of_consequent_peaks() {
        // Grades 0.3 and 0.7 against consequent peaks 10 and 90:
        // (0.3 * 10 + 0.7 * 90) / (0.3 + 0.7) = 66.
        let variables = vec![
            FuzzyVariable::new(
                "x",
                vec![set("rise", 0.0, 10.0, 10.0), set("fall", 0.0, 0.0, 10.0)],
            ),
            FuzzyVariable::new(
                "out",
                vec![set("low", 0.0, 10.0, 35.0), set("high", 65.0, 90.0, 100.0)],
            ),
        ];
        let rules = vec![
            Rule::new(
                [SetRef::new(0, 0), SetRef::new(0, 0)],
                RuleOperator::And,
                SetRef::new(1, 0),
            ),
            Rule::new(
                [SetRef::new(0, 1), SetRef::new(0, 1)],
                RuleOperator::And,
                SetRef::new(1, 1),
            ),
        ];
        let engine = InferenceEngine::new(variables, rules).unwrap();
        let score = engine.score(&TrackRecord::new(vec![3.0, 0.0])).unwrap();
        assert!((score - 66.0).abs() < 1e-9);
    }

    fn three_band_engine() -> InferenceEngine {
        let variables = vec![
            FuzzyVariable::new(
                "x",
                vec![
                    set("a", 0.0, 1.0, 2.0),
                    set("b", 2.0, 3.0, 4.0),
                    set("c", 4.0, 5.0, 6.0),
                ],
            ),
            FuzzyVariable::new(
                "out",
                vec![
                    set("low", 5.0, 10.0, 15.0),
                    set("mid", 15.0, 20.0, 25.0),
                    set("high", 25.0, 30.0, 35.0),
                ],
            ),
        ];
        let rules = (0..3)
            .map(|band| {
                Rule::new(
                    [SetRef::new(0, band), SetRef::new(0, band)],
                    RuleOperator::And,
                    SetRef::new(1, band),
                )
            })
            .collect();
        InferenceEngine::new(variables, rules).unwrap()
    }

    #[test]
    fn batch_reports_scores_in_input_order_with_their_mean() {
        let engine = three_band_engine();
        let records = vec![
            TrackRecord::new(vec![1.0, 0.0]),
            TrackRecord::new(vec![3.0, 0.0]),
            TrackRecord::new(vec![5.0, 0.0]),
        ];
        let report = engine.score_batch(&records).unwrap();
        assert_eq!(report.profile(), vec![10.0, 20.0, 30.0]);
        assert_eq!(report.average, 20.0);
        assert_eq!(
            report.scores.iter().map(|s| s.record_index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert_eq!(engine.metrics().records_scored, 3);
    }

    #[test]
    fn empty_batch_reports_zero_average() {
        let engine = three_band_engine();
        let report = engine.score_batch(&[]).unwrap();
        assert!(report.scores.is_empty());
        assert_eq!(report.average, 0.0);
    }

    #[test]
    fn batch_fails_before_scoring_when_any_record_is_malformed() {
        let engine = three_band_engine();
        let records = vec![
            TrackRecord::new(vec![1.0, 0.0]),
            TrackRecord::new(vec![3.0]),
        ];
        assert!(engine.score_batch(&records).is_err());
        assert_eq!(engine.metrics().records_scored, 0);
        assert_eq!(engine.metrics().batch_errors, 1);
    }
}
