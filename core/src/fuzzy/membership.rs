use crate::prelude::{EngineError, EngineResult};

/// Shapes the engine can evaluate. Triangles are the only shape the rule
/// bases use today; further variants slot in without touching the
/// evaluator or the defuzzifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipShape {
    Triangle,
}

/// One linguistic partition of a fuzzy variable, immutable once built.
#[derive(Debug, Clone)]
pub struct MembershipFunction {
    name: String,
    left: f64,
    peak: f64,
    right: f64,
    shape: MembershipShape,
}

impl MembershipFunction {
    /// Builds a triangular set over `left..right` peaking at `peak`.
    ///
    /// The parameters must satisfy `left <= peak <= right`; anything else
    /// could never describe a triangle and is rejected. A collapsed side
    /// (`left == peak` or `peak == right`) is accepted and evaluates as a
    /// step at the peak.
    pub fn triangle(
        name: impl Into<String>,
        left: f64,
        peak: f64,
        right: f64,
    ) -> EngineResult<Self> {
        let name = name.into();
        if !(left <= peak && peak <= right) {
            return Err(EngineError::MalformedTriangle {
                name,
                left,
                peak,
                right,
            });
        }
        Ok(Self {
            name,
            left,
            peak,
            right,
            shape: MembershipShape::Triangle,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> MembershipShape {
        self.shape
    }

    pub fn left(&self) -> f64 {
        self.left
    }

    pub fn peak(&self) -> f64 {
        self.peak
    }

    pub fn right(&self) -> f64 {
        self.right
    }

    /// Degree of membership of `x`, total over all of f64.
    pub fn evaluate(&self, x: f64) -> f64 {
        match self.shape {
            MembershipShape::Triangle => self.triangle_grade(x),
        }
    }

    fn triangle_grade(&self, x: f64) -> f64 {
        // Peak first: a collapsed side must grade 1.0 at the peak instead
        // of dividing by its zero-width segment.
        if x == self.peak {
            return 1.0;
        }
        if x <= self.left || x >= self.right {
            return 0.0;
        }
        if x < self.peak {
            (x - self.left) / (self.peak - self.left)
        } else {
            (self.right - x) / (self.right - self.peak)
        }
    }

    /// Representative output level used for height defuzzification.
    pub fn representative(&self) -> f64 {
        self.peak
    }

    /// Inclusive test over the set's support interval.
    pub fn contains(&self, x: f64) -> bool {
        x >= self.left && x <= self.right
    }
}
