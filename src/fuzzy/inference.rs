//! Inference - Mamdani rule evaluation and centroid defuzzification
//!
//! AND is the minimum of antecedent degrees, rules sharing a consequent
//! are aggregated by maximum, and each output is reduced to a crisp value
//! by sampling its clipped aggregate set across the universe.

use std::collections::HashMap;

use serde::Serialize;

use crate::fuzzy::membership::{FuzzyVariable, MembershipCatalog, ANGLE, HANDS, SPEED, STEERING};

/// Sampling step used when integrating the aggregate output sets
pub const DEFAULT_RESOLUTION: f64 = 1.0;

/// A (variable, label) pair
pub type Term = (&'static str, &'static str);

/// Conjunctive rule with a single consequent and implicit weight 1
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    pub antecedents: Vec<Term>,
    pub consequent: Term,
}

impl Rule {
    pub fn new(antecedent: Term, consequent: Term) -> Self {
        Self {
            antecedents: vec![antecedent],
            consequent,
        }
    }

    /// Add another antecedent joined by AND
    pub fn and(mut self, antecedent: Term) -> Self {
        self.antecedents.push(antecedent);
        self
    }
}

/// Outcome of one inference pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Inference {
    Crisp { steer: f64, speed: f64 },
    /// No rule fired for at least one output, so its centroid is undefined
    Degenerate,
}

/// Linear mapping used in place of a degenerate inference
pub fn fallback(angle: f64, hand_count: f64) -> (f64, f64) {
    let steer = (angle * 1.1).clamp(-100.0, 100.0);
    let speed = if hand_count > 0.0 { 50.0 } else { 0.0 };
    (steer, speed)
}

/// Per-label degree of one input
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelDegree {
    pub label: &'static str,
    pub degree: f64,
}

/// Fuzzified view of both inputs for telemetry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activations {
    pub angle: Vec<LabelDegree>,
    pub hands: Vec<LabelDegree>,
}

pub struct InferenceEngine {
    catalog: MembershipCatalog,
    rules: Vec<Rule>,
    resolution: f64,
}

impl InferenceEngine {
    /// Engine over the standard catalog with the identity rule base
    pub fn new() -> Self {
        Self::with_rules(MembershipCatalog::new(), Self::default_rules())
    }

    pub fn with_rules(catalog: MembershipCatalog, rules: Vec<Rule>) -> Self {
        Self {
            catalog,
            rules,
            resolution: DEFAULT_RESOLUTION,
        }
    }

    /// Angle labels steer through their mirrored steering label, hand
    /// counts pick the matching speed band.
    pub fn default_rules() -> Vec<Rule> {
        vec![
            Rule::new((ANGLE, "far_left"), (STEERING, "far_left")),
            Rule::new((ANGLE, "left"), (STEERING, "left")),
            Rule::new((ANGLE, "center"), (STEERING, "straight")),
            Rule::new((ANGLE, "right"), (STEERING, "right")),
            Rule::new((ANGLE, "far_right"), (STEERING, "far_right")),
            Rule::new((HANDS, "zero"), (SPEED, "stop")),
            Rule::new((HANDS, "one"), (SPEED, "slow")),
            Rule::new((HANDS, "two"), (SPEED, "fast")),
        ]
    }

    pub fn catalog(&self) -> &MembershipCatalog {
        &self.catalog
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Run the rule base against crisp inputs
    pub fn infer(&self, angle: f64, hand_count: f64) -> Inference {
        let levels = self.fire(angle, hand_count);

        let steer = self.centroid(&self.catalog.steering, &levels);
        let speed = self.centroid(&self.catalog.speed, &levels);

        match (steer, speed) {
            (Some(steer), Some(speed)) => Inference::Crisp { steer, speed },
            _ => Inference::Degenerate,
        }
    }

    /// Membership degrees of every input label
    pub fn activations(&self, angle: f64, hand_count: f64) -> Activations {
        let to_degrees = |var: &FuzzyVariable, x: f64| {
            var.fuzzify(x)
                .into_iter()
                .map(|(label, degree)| LabelDegree { label, degree })
                .collect()
        };

        Activations {
            angle: to_degrees(&self.catalog.angle, angle),
            hands: to_degrees(&self.catalog.hands, hand_count),
        }
    }

    /// Firing level per consequent term, aggregated by maximum
    fn fire(&self, angle: f64, hand_count: f64) -> HashMap<Term, f64> {
        let input = |name: &str| match name {
            ANGLE => Some(angle),
            HANDS => Some(hand_count),
            _ => None,
        };

        let mut levels: HashMap<Term, f64> = HashMap::new();
        for rule in &self.rules {
            let strength = rule
                .antecedents
                .iter()
                .map(|&(var, label)| {
                    match (self.catalog.variable(var), input(var)) {
                        (Some(variable), Some(x)) => variable.degree(label, x),
                        _ => 0.0,
                    }
                })
                .fold(1.0, f64::min);

            let level = levels.entry(rule.consequent).or_insert(0.0);
            *level = level.max(strength);
        }
        levels
    }

    /// Centroid of the union of clipped consequent sets, `None` when empty
    fn centroid(&self, output: &FuzzyVariable, levels: &HashMap<Term, f64>) -> Option<f64> {
        let clipped: Vec<_> = output
            .labels()
            .iter()
            .filter_map(|l| {
                levels
                    .get(&(output.name, l.name))
                    .filter(|&&level| level > 0.0)
                    .map(|&level| (l.function, level))
            })
            .collect();

        if clipped.is_empty() {
            return None;
        }

        let samples = ((output.max - output.min) / self.resolution).round() as usize;
        let mut weighted = 0.0;
        let mut total = 0.0;

        for i in 0..=samples {
            let x = output.min + i as f64 * self.resolution;
            let degree = clipped
                .iter()
                .map(|(f, level)| f.evaluate(x).min(*level))
                .fold(0.0, f64::max);
            weighted += x * degree;
            total += degree;
        }

        if total <= 0.0 {
            return None;
        }
        Some(output.clamp(weighted / total))
    }
}

impl Default for InferenceEngine {
    fn default() -> Self {
        Self::new()
    }
}
