use crate::fuzzy::membership::MembershipFunction;
use crate::prelude::{EngineError, EngineResult};

/// A measured quantity partitioned into ordered linguistic sets.
///
/// Declaration order is load-bearing: a variable's position in the engine
/// table selects which record column it reads.
#[derive(Debug, Clone)]
pub struct FuzzyVariable {
    name: String,
    sets: Vec<MembershipFunction>,
}

impl FuzzyVariable {
    pub fn new(name: impl Into<String>, sets: Vec<MembershipFunction>) -> Self {
        Self {
            name: name.into(),
            sets,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sets(&self) -> &[MembershipFunction] {
        &self.sets
    }

    /// Looks up a set by declaration index.
    pub fn get(&self, index: usize) -> EngineResult<&MembershipFunction> {
        self.sets.get(index).ok_or_else(|| EngineError::SetOutOfRange {
            variable: self.name.clone(),
            index,
            count: self.sets.len(),
        })
    }

    /// Hull of all set supports. Generators use this to draw plausible
    /// observation values for the variable.
    pub fn span(&self) -> (f64, f64) {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for set in &self.sets {
            lo = lo.min(set.left());
            hi = hi.max(set.right());
        }
        if lo > hi {
            (0.0, 0.0)
        } else {
            (lo, hi)
        }
    }
}
