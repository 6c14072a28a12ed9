//! Membership - Fuzzy variables and their labelled membership functions
//!
//! Holds the fixed catalog used by the racing controller: two inputs
//! (hand angle, hand count) and two outputs (steering, speed).

use serde::{Deserialize, Serialize};

/// Shape of a single fuzzy label
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum MembershipFunction {
    /// Rises from `a` to a peak at `b`, falls to zero at `c`
    Triangular { a: f64, b: f64, c: f64 },
    /// Rises from `a` to `b`, flat at 1 until `c`, falls to zero at `d`
    Trapezoidal { a: f64, b: f64, c: f64, d: f64 },
}

impl MembershipFunction {
    pub const fn triangular(a: f64, b: f64, c: f64) -> Self {
        Self::Triangular { a, b, c }
    }

    pub const fn trapezoidal(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self::Trapezoidal { a, b, c, d }
    }

    /// Degree of truth of `x` for this label, always in [0, 1].
    ///
    /// A side whose two control points coincide is a vertical edge, so the
    /// shared point itself evaluates to 1. Non-finite inputs belong nowhere.
    pub fn evaluate(&self, x: f64) -> f64 {
        if !x.is_finite() {
            return 0.0;
        }
        let degree = match *self {
            Self::Triangular { a, b, c } => {
                if x < a || x > c {
                    0.0
                } else if x < b {
                    (x - a) / (b - a)
                } else if x > b {
                    (c - x) / (c - b)
                } else {
                    1.0
                }
            }
            Self::Trapezoidal { a, b, c, d } => {
                if x < a || x > d {
                    0.0
                } else if x < b {
                    (x - a) / (b - a)
                } else if x > c {
                    (d - x) / (d - c)
                } else {
                    1.0
                }
            }
        };
        degree.clamp(0.0, 1.0)
    }

    /// Closed interval outside of which the degree is zero
    pub fn support(&self) -> (f64, f64) {
        match *self {
            Self::Triangular { a, c, .. } => (a, c),
            Self::Trapezoidal { a, d, .. } => (a, d),
        }
    }
}

/// A labelled fuzzy set inside a variable
#[derive(Debug, Clone, Serialize)]
pub struct FuzzyLabel {
    pub name: &'static str,
    pub function: MembershipFunction,
}

/// Named scalar universe partitioned by overlapping labels
#[derive(Debug, Clone, Serialize)]
pub struct FuzzyVariable {
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
    labels: Vec<FuzzyLabel>,
}

impl FuzzyVariable {
    pub fn new(name: &'static str, min: f64, max: f64) -> Self {
        Self {
            name,
            min,
            max,
            labels: Vec::new(),
        }
    }

    /// Add a label; a label that already exists is replaced so names stay unique
    pub fn with_label(mut self, name: &'static str, function: MembershipFunction) -> Self {
        match self.labels.iter_mut().find(|l| l.name == name) {
            Some(existing) => existing.function = function,
            None => self.labels.push(FuzzyLabel { name, function }),
        }
        self
    }

    pub fn labels(&self) -> &[FuzzyLabel] {
        &self.labels
    }

    pub fn label(&self, name: &str) -> Option<&MembershipFunction> {
        self.labels.iter().find(|l| l.name == name).map(|l| &l.function)
    }

    /// Degree of `x` for a label, zero for unknown labels
    pub fn degree(&self, name: &str, x: f64) -> f64 {
        self.label(name).map_or(0.0, |f| f.evaluate(x))
    }

    /// Clamp a raw value into this variable's universe
    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.min, self.max)
    }

    /// Degrees of every label for `x`, in catalog order
    pub fn fuzzify(&self, x: f64) -> Vec<(&'static str, f64)> {
        self.labels
            .iter()
            .map(|l| (l.name, l.function.evaluate(x)))
            .collect()
    }
}

pub const ANGLE: &str = "angle";
pub const HANDS: &str = "hands";
pub const STEERING: &str = "steering";
pub const SPEED: &str = "speed";

/// The fixed variable set of the racing controller
#[derive(Debug, Clone, Serialize)]
pub struct MembershipCatalog {
    pub angle: FuzzyVariable,
    pub hands: FuzzyVariable,
    pub steering: FuzzyVariable,
    pub speed: FuzzyVariable,
}

impl MembershipCatalog {
    pub fn new() -> Self {
        use MembershipFunction as Mf;

        let angle = FuzzyVariable::new(ANGLE, -90.0, 90.0)
            .with_label("far_left", Mf::trapezoidal(-90.0, -90.0, -45.0, -20.0))
            .with_label("left", Mf::triangular(-30.0, -15.0, 0.0))
            .with_label("center", Mf::triangular(-10.0, 0.0, 10.0))
            .with_label("right", Mf::triangular(0.0, 15.0, 30.0))
            .with_label("far_right", Mf::trapezoidal(20.0, 45.0, 90.0, 90.0));

        let hands = FuzzyVariable::new(HANDS, 0.0, 2.0)
            .with_label("zero", Mf::triangular(0.0, 0.0, 0.5))
            .with_label("one", Mf::triangular(0.5, 1.0, 1.5))
            .with_label("two", Mf::triangular(1.5, 2.0, 2.0));

        let steering = FuzzyVariable::new(STEERING, -100.0, 100.0)
            .with_label("far_left", Mf::trapezoidal(-100.0, -100.0, -60.0, -30.0))
            .with_label("left", Mf::triangular(-50.0, -25.0, 0.0))
            .with_label("straight", Mf::triangular(-5.0, 0.0, 5.0))
            .with_label("right", Mf::triangular(0.0, 25.0, 50.0))
            .with_label("far_right", Mf::trapezoidal(30.0, 60.0, 100.0, 100.0));

        let speed = FuzzyVariable::new(SPEED, 0.0, 100.0)
            .with_label("stop", Mf::triangular(0.0, 0.0, 20.0))
            .with_label("slow", Mf::triangular(20.0, 50.0, 80.0))
            .with_label("fast", Mf::triangular(70.0, 100.0, 100.0));

        Self {
            angle,
            hands,
            steering,
            speed,
        }
    }

    pub fn variable(&self, name: &str) -> Option<&FuzzyVariable> {
        match name {
            ANGLE => Some(&self.angle),
            HANDS => Some(&self.hands),
            STEERING => Some(&self.steering),
            SPEED => Some(&self.speed),
            _ => None,
        }
    }
}

impl Default for MembershipCatalog {
    fn default() -> Self {
        Self::new()
    }
}
