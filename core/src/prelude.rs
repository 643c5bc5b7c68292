/// Common error type for engine construction and scoring.
///
/// Configuration errors carry the offending rule/variable/index so an
/// inconsistent deployment can be diagnosed without re-running.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error("variable index {index} out of range ({count} variables)")]
    VariableOutOfRange { index: usize, count: usize },
    #[error("set index {index} out of range for variable {variable} ({count} sets)")]
    SetOutOfRange {
        variable: String,
        index: usize,
        count: usize,
    },
    #[error("rule index {index} out of range ({count} rules)")]
    RuleOutOfRange { index: usize, count: usize },
    #[error("membership function {name} is not ordered: left {left}, peak {peak}, right {right}")]
    MalformedTriangle {
        name: String,
        left: f64,
        peak: f64,
        right: f64,
    },
    #[error("rule {rule}: {source}")]
    InvalidRule {
        rule: usize,
        #[source]
        source: Box<EngineError>,
    },
    #[error("record has {got} inputs, expected {expected}")]
    RecordArity { expected: usize, got: usize },
}

pub type EngineResult<T> = Result<T, EngineError>;
