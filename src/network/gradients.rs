use crate::{layers::dense::Layer, math::matrix::Matrix};

/// Per-layer weight and bias gradients, shaped like the parameters they
/// belong to.
///
/// The trainer keeps one instance as a minibatch accumulator: `reset` at the
/// start of every batch, `accumulate` once per sample.
#[derive(Debug, Clone)]
pub struct Gradients {
    weights: Vec<Matrix>,
    biases: Vec<Matrix>,
}

impl Gradients {
    pub fn new(weights: Vec<Matrix>, biases: Vec<Matrix>) -> Gradients {
        assert_eq!(weights.len(), biases.len(), "one bias gradient per weight gradient");
        Gradients { weights, biases }
    }

    /// Zero gradients matching the shapes of `layers`.
    pub fn zeros_like(layers: &[Layer]) -> Gradients {
        let (weights, biases) = layers.iter()
            .map(|layer| (
                Matrix::zeros(layer.weights.row_count(), layer.weights.col_count()),
                Matrix::zeros(layer.biases.row_count(), layer.biases.col_count()),
            ))
            .unzip();
        Gradients { weights, biases }
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn weights(&self) -> &[Matrix] {
        &self.weights
    }

    pub fn biases(&self) -> &[Matrix] {
        &self.biases
    }

    /// `(weight_grad, bias_grad)` per layer, input side first.
    pub fn iter(&self) -> impl Iterator<Item = (&Matrix, &Matrix)> {
        self.weights.iter().zip(self.biases.iter())
    }

    pub fn reset(&mut self) {
        for m in self.weights.iter_mut().chain(self.biases.iter_mut()) {
            m.reset();
        }
    }

    /// Adds `other` into `self`, layer by layer.
    pub fn accumulate(&mut self, other: &Gradients) {
        assert_eq!(self.len(), other.len(), "gradient layer count mismatch");
        for (acc, g) in self.weights.iter_mut().zip(other.weights.iter()) {
            acc.add_with(g);
        }
        for (acc, g) in self.biases.iter_mut().zip(other.biases.iter()) {
            acc.add_with(g);
        }
    }
}
