use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{Error, Result};

/// Describes one layer in a network specification.
///
/// Fields:
/// - `size`       — number of neurons in this layer
/// - `input_size` — number of neurons feeding into this layer (the output
///                  size of the previous layer, or the raw input dimension
///                  for the first layer)
/// - `activation` — activation applied after the affine transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub size: usize,
    pub input_size: usize,
    pub activation: ActivationFunction,
}

/// Serializable description of a network's topology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Ordered list of layer descriptions (input → output).
    pub layers: Vec<LayerSpec>,
}

impl NetworkSpec {
    /// Builds a spec from node counts, e.g. `[784, 24, 10]` gives two layers,
    /// all using `activation`.
    pub fn from_sizes(sizes: &[usize], activation: ActivationFunction) -> NetworkSpec {
        let layers = sizes.windows(2)
            .map(|w| LayerSpec { size: w[1], input_size: w[0], activation })
            .collect();
        NetworkSpec { layers }
    }

    /// The sigmoid `784 → 24 → 10` topology used for MNIST.
    pub fn mnist() -> NetworkSpec {
        NetworkSpec::from_sizes(&[28 * 28, 24, 10], ActivationFunction::Sigmoid)
    }

    /// Node counts, input first.
    pub fn sizes(&self) -> Vec<usize> {
        let mut sizes: Vec<usize> = self.layers.first().map(|l| l.input_size).into_iter().collect();
        sizes.extend(self.layers.iter().map(|l| l.size));
        sizes
    }

    pub fn input_size(&self) -> Option<usize> {
        self.layers.first().map(|l| l.input_size)
    }

    pub fn output_size(&self) -> Option<usize> {
        self.layers.last().map(|l| l.size)
    }

    /// Checks that there is at least one layer, no layer is empty, and each
    /// layer's `input_size` equals the previous layer's `size`.
    pub fn validate(&self) -> Result<()> {
        if self.layers.is_empty() {
            return Err(Error::InvalidConfig("network needs at least one layer".into()));
        }
        for (i, layer) in self.layers.iter().enumerate() {
            if layer.size == 0 || layer.input_size == 0 {
                return Err(Error::InvalidConfig(format!(
                    "layer {} has zero width ({} -> {})",
                    i, layer.input_size, layer.size
                )));
            }
        }
        for (i, pair) in self.layers.windows(2).enumerate() {
            if pair[0].size != pair[1].input_size {
                return Err(Error::InvalidConfig(format!(
                    "layer {} outputs {} values but layer {} expects {}",
                    i, pair[0].size, i + 1, pair[1].input_size
                )));
            }
        }
        Ok(())
    }
}

impl Default for NetworkSpec {
    fn default() -> Self {
        NetworkSpec::mnist()
    }
}
