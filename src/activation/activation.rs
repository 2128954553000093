use serde::{Serialize, Deserialize};
use std::f64::consts::E;

/// Element-wise activation, selected per layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActivationFunction {
    Identity,
    Square,
    Abs,
    Sign,
    Sigmoid,
    /// σ(x)·(1 − σ(x)) used as an activation in its own right.
    SigmoidPrime,
    /// σ(scale·x); `scale` controls the steepness around zero.
    ScaledSigmoid { scale: f64 },
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + E.powf(-x))
}

impl ActivationFunction {
    pub fn apply(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Identity => x,
            ActivationFunction::Square => x * x,
            ActivationFunction::Abs => x.abs(),
            ActivationFunction::Sign => sign(x),
            ActivationFunction::Sigmoid => sigmoid(x),
            ActivationFunction::SigmoidPrime => {
                let s = sigmoid(x);
                s * (1.0 - s)
            }
            ActivationFunction::ScaledSigmoid { scale } => sigmoid(scale * x),
        }
    }

    /// Derivative with respect to the pre-activation input `x`.
    ///
    /// `Abs` and `Sign` use the subgradient 0 at the origin.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Identity => 1.0,
            ActivationFunction::Square => 2.0 * x,
            ActivationFunction::Abs => sign(x),
            ActivationFunction::Sign => 0.0,
            ActivationFunction::Sigmoid => {
                let s = sigmoid(x);
                s * (1.0 - s)
            }
            ActivationFunction::SigmoidPrime => {
                let s = sigmoid(x);
                s * (1.0 - s) * (1.0 - 2.0 * s)
            }
            ActivationFunction::ScaledSigmoid { scale } => {
                let s = sigmoid(scale * x);
                scale * s * (1.0 - s)
            }
        }
    }
}

fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}
