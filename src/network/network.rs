use rand::Rng;

use crate::data::sample::Sample;
use crate::error::Result;
use crate::layers::dense::Layer;
use crate::loss::quadratic::QuadraticCost;
use crate::math::matrix::Matrix;
use crate::network::gradients::Gradients;
use crate::network::spec::NetworkSpec;

#[derive(Debug, Clone)]
pub struct Network {
    pub layers: Vec<Layer>,
}

impl Network {
    /// Builds a network from a validated spec, drawing every weight and bias
    /// uniformly from `[-init_range, init_range)`.
    pub fn from_spec<R: Rng + ?Sized>(spec: &NetworkSpec, init_range: f64, rng: &mut R) -> Result<Network> {
        spec.validate()?;
        let layers = spec.layers.iter()
            .map(|l| Layer::new(l.input_size, l.size, l.activation, init_range, &mut *rng))
            .collect();
        Ok(Network { layers })
    }

    /// Wraps pre-built layers. Panics if consecutive layers do not chain.
    pub fn from_layers(layers: Vec<Layer>) -> Network {
        for pair in layers.windows(2) {
            assert_eq!(
                pair[0].output_size(),
                pair[1].input_size(),
                "consecutive layers must chain"
            );
        }
        Network { layers }
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map(Layer::input_size).unwrap_or(0)
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map(Layer::output_size).unwrap_or(0)
    }

    /// Forward pass over a column-vector input.
    pub fn feedforward(&self, input: &Matrix) -> Matrix {
        let mut current = input.clone();
        for layer in &self.layers {
            current = layer.feed_from(&current);
        }
        current
    }

    /// Index of the strongest output (first one on ties).
    pub fn predict(&self, input: &Matrix) -> usize {
        self.feedforward(input).max_element().map(|e| e.row).unwrap_or(0)
    }

    /// Gradients of the quadratic cost for one sample.
    pub fn backprop(&self, sample: &Sample) -> Gradients {
        self.backprop_with_cost(sample).0
    }

    /// Like `backprop`, also returning the sample's cost from the same
    /// forward pass.
    pub fn backprop_with_cost(&self, sample: &Sample) -> (Gradients, f64) {
        let n = self.layers.len();
        assert!(n > 0, "cannot backprop through an empty network");

        // Forward pass, keeping z (pre-activation) and a (activation) per layer.
        let mut activations = Vec::with_capacity(n + 1);
        let mut zs = Vec::with_capacity(n);
        activations.push(sample.input().clone());
        for layer in &self.layers {
            let z = layer.pre_activation(&activations[activations.len() - 1]);
            activations.push(layer.activate(&z));
            zs.push(z);
        }

        let mut weights = vec![Matrix::default(); n];
        let mut biases = vec![Matrix::default(); n];

        let cost = QuadraticCost::loss(&activations[n], sample.label());

        // δ_L = C'(a_L) ⊙ σ'(z_L)
        let mut delta = QuadraticCost::derivative(&activations[n], sample.label());
        delta.hadamard_with(&self.layers[n - 1].activation_derivative(&zs[n - 1]));
        weights[n - 1] = delta.multiply(&activations[n - 1].t());
        biases[n - 1] = delta.clone();

        // δ_i = (W_{i+1}ᵀ · δ_{i+1}) ⊙ σ'(z_i)
        for i in (0..n - 1).rev() {
            let mut next = self.layers[i + 1].weights.t().multiply(&delta);
            next.hadamard_with(&self.layers[i].activation_derivative(&zs[i]));
            delta = next;
            weights[i] = delta.multiply(&activations[i].t());
            biases[i] = delta.clone();
        }

        (Gradients::new(weights, biases), cost)
    }

    /// Quadratic cost of the current parameters on one sample.
    pub fn cost(&self, sample: &Sample) -> f64 {
        QuadraticCost::loss(&self.feedforward(sample.input()), sample.label())
    }

    /// Fraction of `samples` whose predicted class matches the label, in
    /// `[0, 1]`. Empty input yields 0.
    pub fn evaluate(&self, samples: &[Sample]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        let correct = samples.iter()
            .filter(|s| self.predict(s.input()) == s.class())
            .count();
        correct as f64 / samples.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::ActivationFunction;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn gradient_shapes_match_parameters() {
        let mut rng = StdRng::seed_from_u64(11);
        let spec = NetworkSpec::from_sizes(&[4, 5, 3], ActivationFunction::Sigmoid);
        let net = Network::from_spec(&spec, 0.5, &mut rng).unwrap();
        let sample = Sample::with_class(vec![0.1, 0.2, 0.3, 0.4], 2, 3);

        let grads = net.backprop(&sample);
        assert_eq!(grads.len(), 2);
        for (layer, (w, b)) in net.layers.iter().zip(grads.iter()) {
            assert_eq!((w.row_count(), w.col_count()), (layer.weights.row_count(), layer.weights.col_count()));
            assert_eq!((b.row_count(), b.col_count()), (layer.biases.row_count(), 1));
        }
    }

    #[test]
    fn feedforward_has_no_side_effects() {
        let mut rng = StdRng::seed_from_u64(5);
        let net = Network::from_spec(&NetworkSpec::from_sizes(&[2, 3, 1], ActivationFunction::Sigmoid), 1.0, &mut rng).unwrap();
        let input = Matrix::from_column_vector(vec![0.3, -0.7]);
        let first = net.feedforward(&input);
        let second = net.feedforward(&input);
        assert_eq!(first, second);
        assert_eq!(first.row_count(), 1);
    }

    #[test]
    fn evaluate_counts_matches() {
        let net = Network::from_layers(vec![Layer {
            weights: Matrix::identity(2),
            biases: Matrix::zeros(2, 1),
            activator: ActivationFunction::Identity,
        }]);
        let samples = vec![
            Sample::with_class(vec![1.0, 0.0], 0, 2),
            Sample::with_class(vec![0.0, 1.0], 1, 2),
            Sample::with_class(vec![1.0, 0.0], 1, 2),
            Sample::with_class(vec![0.2, 0.9], 0, 2),
        ];
        assert_eq!(net.evaluate(&samples), 0.5);
        assert_eq!(net.evaluate(&[]), 0.0);
    }
}
