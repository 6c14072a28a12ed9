//! Fuzzy Module
//!
//! Maps hand angle and hand count to steering and speed through a small
//! Mamdani rule base, then smooths the result into a control command.

pub mod membership;
pub mod inference;
pub mod controller;

pub use membership::{FuzzyVariable, MembershipCatalog, MembershipFunction};
pub use inference::{Activations, Inference, InferenceEngine, Rule};
pub use controller::{ControlCommand, ControlSmoother, FuzzyController, Gesture, PerceptionFrame};
