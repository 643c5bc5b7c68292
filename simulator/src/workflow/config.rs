use anyhow::{bail, Context};
use fiscore::fuzzy::{FuzzyVariable, MembershipFunction, Rule, RuleOperator, SetRef};
use fiscore::inference::InferenceEngine;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Declarative scenario: the fuzzy variables and the rule base, with all
/// cross-references by name. Variable order defines the data column order
/// consumed by the engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub name: String,
    pub variables: Vec<VariableConfig>,
    pub rules: Vec<RuleConfig>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VariableConfig {
    pub name: String,
    pub sets: Vec<SetConfig>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SetConfig {
    pub name: String,
    pub left: f64,
    pub peak: f64,
    pub right: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RuleConfig {
    pub when: [ClauseConfig; 2],
    pub op: OperatorConfig,
    pub then: ClauseConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClauseConfig {
    pub variable: String,
    pub set: String,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OperatorConfig {
    And,
    Or,
}

impl From<OperatorConfig> for RuleOperator {
    fn from(op: OperatorConfig) -> Self {
        match op {
            OperatorConfig::And => RuleOperator::And,
            OperatorConfig::Or => RuleOperator::Or,
        }
    }
}

impl ScenarioConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading scenario config {}", path_ref.display()))?;
        let config: ScenarioConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing scenario config {}", path_ref.display()))?;
        Ok(config)
    }

    /// Reference air-track scenario recovered from the legacy deployment:
    /// four observed quantities plus a threat output variable.
    pub fn builtin() -> Self {
        Self {
            name: "air-track-threat".into(),
            variables: vec![
                VariableConfig {
                    name: "speed".into(),
                    sets: vec![
                        SetConfig::new("low", 0.0, 0.0, 300.0),
                        SetConfig::new("medium", 150.0, 450.0, 750.0),
                        SetConfig::new("high", 600.0, 900.0, 900.0),
                    ],
                },
                VariableConfig {
                    name: "altitude".into(),
                    sets: vec![
                        SetConfig::new("low", 0.0, 0.0, 3000.0),
                        SetConfig::new("medium", 1500.0, 5000.0, 8500.0),
                        SetConfig::new("high", 7000.0, 12000.0, 12000.0),
                    ],
                },
                VariableConfig {
                    name: "cpa".into(),
                    sets: vec![
                        SetConfig::new("near", 0.0, 0.0, 20.0),
                        SetConfig::new("far", 15.0, 60.0, 60.0),
                    ],
                },
                VariableConfig {
                    name: "tbh".into(),
                    sets: vec![
                        SetConfig::new("short", 0.0, 0.0, 120.0),
                        SetConfig::new("long", 90.0, 600.0, 600.0),
                    ],
                },
                VariableConfig {
                    name: "threat".into(),
                    sets: vec![
                        SetConfig::new("low", 0.0, 10.0, 35.0),
                        SetConfig::new("medium", 25.0, 50.0, 75.0),
                        SetConfig::new("high", 65.0, 90.0, 100.0),
                    ],
                },
            ],
            rules: vec![
                RuleConfig::new(("speed", "high"), ("cpa", "near"), OperatorConfig::And, ("threat", "high")),
                RuleConfig::new(("tbh", "short"), ("cpa", "near"), OperatorConfig::And, ("threat", "high")),
                RuleConfig::new(("speed", "high"), ("tbh", "short"), OperatorConfig::And, ("threat", "high")),
                RuleConfig::new(("speed", "medium"), ("altitude", "medium"), OperatorConfig::And, ("threat", "medium")),
                RuleConfig::new(("altitude", "high"), ("cpa", "far"), OperatorConfig::And, ("threat", "low")),
                RuleConfig::new(("speed", "low"), ("tbh", "long"), OperatorConfig::Or, ("threat", "low")),
            ],
        }
    }

    /// Resolves all name references to column/set indices and builds the
    /// validated engine. The lookup is built once here so a rule written
    /// against a different variable schema fails with the offending name
    /// rather than scoring against the wrong column.
    pub fn to_engine(&self) -> anyhow::Result<InferenceEngine> {
        let mut columns = HashMap::new();
        for (index, variable) in self.variables.iter().enumerate() {
            if columns.insert(variable.name.as_str(), index).is_some() {
                bail!(
                    "duplicate variable {} in scenario {}",
                    variable.name,
                    self.name
                );
            }
        }

        let mut variables = Vec::with_capacity(self.variables.len());
        for variable in &self.variables {
            let mut sets = Vec::with_capacity(variable.sets.len());
            for set in &variable.sets {
                let function =
                    MembershipFunction::triangle(set.name.clone(), set.left, set.peak, set.right)
                        .with_context(|| format!("variable {}", variable.name))?;
                sets.push(function);
            }
            variables.push(FuzzyVariable::new(variable.name.clone(), sets));
        }

        let mut rules = Vec::with_capacity(self.rules.len());
        for (index, rule) in self.rules.iter().enumerate() {
            rules.push(Rule::new(
                [
                    self.resolve_clause(&columns, index, &rule.when[0])?,
                    self.resolve_clause(&columns, index, &rule.when[1])?,
                ],
                rule.op.into(),
                self.resolve_clause(&columns, index, &rule.then)?,
            ));
        }

        InferenceEngine::new(variables, rules)
            .with_context(|| format!("building engine for scenario {}", self.name))
    }

    fn resolve_clause(
        &self,
        columns: &HashMap<&str, usize>,
        rule_index: usize,
        clause: &ClauseConfig,
    ) -> anyhow::Result<SetRef> {
        let column = *columns.get(clause.variable.as_str()).with_context(|| {
            format!("rule {}: unknown variable {}", rule_index, clause.variable)
        })?;
        let set = self.variables[column]
            .sets
            .iter()
            .position(|set| set.name == clause.set)
            .with_context(|| {
                format!(
                    "rule {}: variable {} has no set {}",
                    rule_index, clause.variable, clause.set
                )
            })?;
        Ok(SetRef::new(column, set))
    }
}

impl SetConfig {
    fn new(name: &str, left: f64, peak: f64, right: f64) -> Self {
        Self {
            name: name.into(),
            left,
            peak,
            right,
        }
    }
}

impl RuleConfig {
    fn new(
        first: (&str, &str),
        second: (&str, &str),
        op: OperatorConfig,
        then: (&str, &str),
    ) -> Self {
        let clause = |(variable, set): (&str, &str)| ClauseConfig {
            variable: variable.into(),
            set: set.into(),
        };
        Self {
            when: [clause(first), clause(second)],
            op,
            then: clause(then),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn builtin_scenario_builds_a_valid_engine() {
        let engine = ScenarioConfig::builtin().to_engine().unwrap();
        assert_eq!(engine.variables().len(), 5);
        assert_eq!(engine.rules().len(), 6);
    }

    const MINIMAL_YAML: &str = "\
name: minimal
variables:
  - name: x
    sets:
      - { name: low, left: 0.0, peak: 0.0, right: 10.0 }
  - name: out
    sets:
      - { name: calm, left: 0.0, peak: 5.0, right: 10.0 }
rules:
  - when:
      - { variable: x, set: low }
      - { variable: x, set: low }
    op: and
    then: { variable: out, set: calm }
";

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(MINIMAL_YAML.as_bytes()).unwrap();
        let path = temp.into_temp_path();
        let config = ScenarioConfig::load(&path).unwrap();
        assert_eq!(config.name, "minimal");
        assert_eq!(config.variables.len(), 2);
        assert!(config.to_engine().is_ok());
    }

    #[test]
    fn unknown_set_name_is_rejected_with_the_rule_index() {
        let mut config = ScenarioConfig::builtin();
        config.rules[2].then.set = "extreme".into();
        let err = config.to_engine().unwrap_err();
        assert!(format!("{err:#}").contains("rule 2"));
    }

    #[test]
    fn duplicate_variable_names_are_rejected() {
        let mut config = ScenarioConfig::builtin();
        config.variables[1].name = "speed".into();
        assert!(config.to_engine().is_err());
    }
}
