//! Fully connected layer: `output = input · weights + bias`

use ndarray::{Array1, Array2, Axis};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Dense layer parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayer {
    /// Weight matrix (input_size × output_size)
    pub weights: Array2<f64>,
    /// Bias vector (output_size)
    pub biases: Array1<f64>,
}

/// Gradients produced by one backward step through a layer.
#[derive(Debug, Clone)]
pub struct LayerGradients {
    pub weights: Array2<f64>,
    pub biases: Array1<f64>,
    /// Gradient with respect to the layer input, fed to the previous layer
    pub input: Array2<f64>,
}

impl DenseLayer {
    /// Xavier/Glorot uniform initialization with zero biases.
    pub fn new<R: Rng + ?Sized>(input_size: usize, output_size: usize, rng: &mut R) -> Self {
        let limit = (6.0 / (input_size + output_size) as f64).sqrt();
        let weights = Array2::from_shape_fn((input_size, output_size), |_| rng.gen_range(-limit..limit));
        Self { weights, biases: Array1::zeros(output_size) }
    }

    pub fn input_size(&self) -> usize {
        self.weights.nrows()
    }

    pub fn output_size(&self) -> usize {
        self.weights.ncols()
    }

    /// Affine transform of a batch (one sample per row).
    pub fn forward(&self, input: &Array2<f64>) -> Array2<f64> {
        input.dot(&self.weights) + &self.biases
    }

    /// Gradients given the batch input and the loss gradient at this layer's output.
    pub fn gradients(&self, input: &Array2<f64>, delta: &Array2<f64>) -> LayerGradients {
        LayerGradients {
            weights: input.t().dot(delta),
            biases: delta.sum_axis(Axis(0)),
            input: delta.dot(&self.weights.t()),
        }
    }

    pub fn num_parameters(&self) -> usize {
        self.weights.len() + self.biases.len()
    }
}
