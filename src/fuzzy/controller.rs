//! Controller - Turns perception readings into control commands
//!
//! Runs fuzzy inference, smooths the crisp outputs across ticks and
//! applies the brake / nitro gesture overrides.

use serde::{Deserialize, Serialize};

use crate::fuzzy::inference::{self, Activations, Inference, InferenceEngine};

pub const MAX_INPUT_ANGLE: f64 = 89.0;
pub const MAX_HANDS: i32 = 2;

const STEER_BLEND: f64 = 0.8;
const SPEED_BLEND: f64 = 0.7;
const BRAKE_FACTOR: f64 = 0.3;
const NITRO_FULL: f64 = 100.0;

/// Discrete hand gesture reported by perception
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gesture {
    #[default]
    None,
    /// Closed fist, brakes
    Fist,
    /// Open palm, fires nitro
    OpenHand,
    /// Recognised but carries no control meaning
    ThumbsUp,
}

impl Gesture {
    /// Unknown codes read as no gesture
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Gesture::Fist,
            2 => Gesture::OpenHand,
            3 => Gesture::ThumbsUp,
            _ => Gesture::None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Gesture::None => 0,
            Gesture::Fist => 1,
            Gesture::OpenHand => 2,
            Gesture::ThumbsUp => 3,
        }
    }
}

/// One reading from the perception collaborator
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerceptionFrame {
    pub angle: f64,
    pub hand_count: i32,
    #[serde(default)]
    pub gesture: i32,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default = "default_openness")]
    pub openness: f64,
}

fn default_openness() -> f64 {
    0.5
}

/// Control values for one tick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlCommand {
    /// -100 (full left) .. 100 (full right)
    pub steering: f64,
    /// 0 .. 100, percent of max speed
    pub speed: f64,
    /// 0 or 100
    pub nitro: f64,
    pub gesture: u8,
    pub hand_count: u8,
}

/// Exponential smoothing state carried between ticks
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlSmoother {
    last_steer: f64,
    last_speed: f64,
}

impl ControlSmoother {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blend fresh values with the previous tick's and remember the result
    pub fn smooth(&mut self, steer: f64, speed: f64) -> (f64, f64) {
        let steer = STEER_BLEND * steer + (1.0 - STEER_BLEND) * self.last_steer;
        let speed = SPEED_BLEND * speed + (1.0 - SPEED_BLEND) * self.last_speed;
        self.last_steer = steer;
        self.last_speed = speed;
        (steer, speed)
    }

    pub fn reset(&mut self) {
        self.last_steer = 0.0;
        self.last_speed = 0.0;
    }

    pub fn last(&self) -> (f64, f64) {
        (self.last_steer, self.last_speed)
    }
}

/// Fuzzy controller for one session
pub struct FuzzyController {
    engine: InferenceEngine,
    smoother: ControlSmoother,
}

impl FuzzyController {
    pub fn new() -> Self {
        Self::with_engine(InferenceEngine::new())
    }

    pub fn with_engine(engine: InferenceEngine) -> Self {
        Self {
            engine,
            smoother: ControlSmoother::new(),
        }
    }

    /// Compute the control command for one perception reading
    pub fn compute(&mut self, angle: f64, hand_count: i32, gesture: i32) -> ControlCommand {
        let angle = clamp_angle(angle);
        let hands = hand_count.clamp(0, MAX_HANDS);
        let gesture = Gesture::from_code(gesture);

        let (steer, speed) = match self.engine.infer(angle, hands as f64) {
            Inference::Crisp { steer, speed } => (steer, speed),
            Inference::Degenerate => {
                log::warn!(
                    "No fuzzy rule fired for angle={:.1} hands={}, using linear fallback",
                    angle,
                    hands
                );
                inference::fallback(angle, hands as f64)
            }
        };

        let (steer, mut speed) = self.smoother.smooth(steer, speed);

        let nitro = match gesture {
            Gesture::Fist => {
                speed *= BRAKE_FACTOR;
                0.0
            }
            Gesture::OpenHand => NITRO_FULL,
            Gesture::None | Gesture::ThumbsUp => 0.0,
        };

        ControlCommand {
            steering: steer.clamp(-100.0, 100.0),
            speed: speed.clamp(0.0, 100.0),
            nitro,
            gesture: gesture.code(),
            hand_count: hands as u8,
        }
    }

    pub fn compute_frame(&mut self, frame: &PerceptionFrame) -> ControlCommand {
        self.compute(frame.angle, frame.hand_count, frame.gesture)
    }

    /// Membership degrees for the clamped inputs of a frame
    pub fn activations(&self, frame: &PerceptionFrame) -> Activations {
        let hands = frame.hand_count.clamp(0, MAX_HANDS);
        self.engine.activations(clamp_angle(frame.angle), hands as f64)
    }

    /// Drop smoothing history so a new session starts unbiased
    pub fn reset(&mut self) {
        self.smoother.reset();
    }

    pub fn smoother(&self) -> &ControlSmoother {
        &self.smoother
    }
}

impl Default for FuzzyController {
    fn default() -> Self {
        Self::new()
    }
}

fn clamp_angle(angle: f64) -> f64 {
    if angle.is_finite() {
        angle.clamp(-MAX_INPUT_ANGLE, MAX_INPUT_ANGLE)
    } else {
        0.0
    }
}
