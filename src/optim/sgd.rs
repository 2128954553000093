use crate::{layers::dense::Layer, network::gradients::Gradients};

/// Plain minibatch SGD: `param -= (eta / batch_size) * summed_grad`.
pub struct Sgd {
    pub eta: f64,
}

impl Sgd {
    pub fn new(eta: f64) -> Sgd {
        Sgd { eta }
    }

    /// Applies one update to every layer from gradients summed over
    /// `batch_size` samples.
    pub fn step(&self, layers: &mut [Layer], summed: &Gradients, batch_size: usize) {
        let rate = self.eta / batch_size as f64;
        for (layer, (w_grad, b_grad)) in layers.iter_mut().zip(summed.iter()) {
            layer.apply_gradients(w_grad, b_grad, rate);
        }
    }
}
