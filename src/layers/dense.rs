use rand::Rng;

use crate::{math::matrix::Matrix, activation::activation::ActivationFunction};

/// One fully-connected layer: `a = activation(W · x + b)`.
///
/// `weights` is `output_size x input_size`, `biases` is `output_size x 1`;
/// inputs and outputs are column vectors.
#[derive(Debug, Clone)]
pub struct Layer {
    pub weights: Matrix,
    pub biases: Matrix,
    pub activator: ActivationFunction,
}

impl Layer {
    /// Weights and biases drawn uniformly from `[-init_range, init_range)`.
    pub fn new<R: Rng + ?Sized>(
        input_size: usize,
        output_size: usize,
        activation: ActivationFunction,
        init_range: f64,
        rng: &mut R,
    ) -> Layer {
        let weights = Matrix::random(output_size, input_size, -init_range, init_range, rng);
        let biases = Matrix::random(output_size, 1, -init_range, init_range, rng);

        Layer {
            weights,
            biases,
            activator: activation,
        }
    }

    pub fn input_size(&self) -> usize {
        self.weights.col_count()
    }

    pub fn output_size(&self) -> usize {
        self.weights.row_count()
    }

    /// z = W · x + b
    pub fn pre_activation(&self, input: &Matrix) -> Matrix {
        let mut z = self.weights.multiply(input);
        z.add_with(&self.biases);
        z
    }

    pub fn activate(&self, z: &Matrix) -> Matrix {
        z.map(|x| self.activator.apply(x))
    }

    /// σ'(z), element-wise.
    pub fn activation_derivative(&self, z: &Matrix) -> Matrix {
        z.map(|x| self.activator.derivative(x))
    }

    pub fn feed_from(&self, input: &Matrix) -> Matrix {
        let mut z = self.pre_activation(input);
        z.map_with(|x| self.activator.apply(x));
        z
    }

    /// Subtracts `rate * grad` from weights and biases.
    pub fn apply_gradients(&mut self, weights_grad: &Matrix, biases_grad: &Matrix, rate: f64) {
        self.weights.sub_with(&weights_grad.scale(rate));
        self.biases.sub_with(&biases_grad.scale(rate));
    }
}
