use crate::math::matrix::Matrix;

/// Quadratic cost `C = ½ · ‖output − label‖²`.
///
/// This is the only cost used for training: `derivative` seeds the output
/// delta in `Network::backprop`, and `loss` is what `EpochStats::train_cost`
/// averages.
pub struct QuadraticCost;

impl QuadraticCost {
    pub fn loss(output: &Matrix, label: &Matrix) -> f64 {
        0.5 * output.sub(label).accumulate(|x| x * x)
    }

    /// ∂C/∂output = output − label
    pub fn derivative(output: &Matrix, label: &Matrix) -> Matrix {
        output.sub(label)
    }
}
