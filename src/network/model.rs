//! Three-layer feed-forward classifier
//!
//! `Linear → ReLU → Dropout → Linear → ReLU → Dropout → Linear`. The last layer
//! yields raw logits; softmax is folded into the loss.

use ndarray::{Array2, Axis};
use rand::Rng;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::layer::{DenseLayer, LayerGradients};
use super::optimizer::Optimizer;
use super::ModelError;
use crate::tweet::Sentiment;

/// Feed-forward network with two hidden layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedForwardNetwork {
    hidden1: DenseLayer,
    hidden2: DenseLayer,
    output: DenseLayer,
    dropout: f64,
}

/// Activations kept from a training forward pass.
struct ForwardCache {
    input: Array2<f64>,
    z1: Array2<f64>,
    a1: Array2<f64>,
    mask1: Option<Array2<f64>>,
    z2: Array2<f64>,
    a2: Array2<f64>,
    mask2: Option<Array2<f64>>,
    logits: Array2<f64>,
}

impl FeedForwardNetwork {
    /// Build a network with Xavier-initialized weights drawn from `seed`.
    pub fn new(
        input: usize,
        hidden1: usize,
        hidden2: usize,
        output: usize,
        dropout: f64,
        seed: u64,
    ) -> Result<Self, ModelError> {
        if input == 0 || hidden1 == 0 || hidden2 == 0 || output == 0 {
            return Err(ModelError::InvalidArchitecture(format!(
                "layer sizes must be positive, got {input}-{hidden1}-{hidden2}-{output}"
            )));
        }
        if !(0.0..1.0).contains(&dropout) {
            return Err(ModelError::InvalidArchitecture(format!(
                "dropout must be in [0, 1), got {dropout}"
            )));
        }
        let mut rng = StdRng::seed_from_u64(seed);
        Ok(Self {
            hidden1: DenseLayer::new(input, hidden1, &mut rng),
            hidden2: DenseLayer::new(hidden1, hidden2, &mut rng),
            output: DenseLayer::new(hidden2, output, &mut rng),
            dropout,
        })
    }

    pub fn input_size(&self) -> usize {
        self.hidden1.input_size()
    }

    pub fn output_size(&self) -> usize {
        self.output.output_size()
    }

    /// Layer widths from input to output.
    pub fn layer_sizes(&self) -> [usize; 4] {
        [self.input_size(), self.hidden1.output_size(), self.hidden2.output_size(), self.output_size()]
    }

    pub fn dropout(&self) -> f64 {
        self.dropout
    }

    pub fn num_parameters(&self) -> usize {
        self.layers().iter().map(|l| l.num_parameters()).sum()
    }

    fn layers(&self) -> [&DenseLayer; 3] {
        [&self.hidden1, &self.hidden2, &self.output]
    }

    /// Logits for a batch in evaluation mode (dropout disabled).
    pub fn logits(&self, input: &Array2<f64>) -> Result<Array2<f64>, ModelError> {
        self.check_width(input.ncols())?;
        let a1 = self.hidden1.forward(input).mapv(relu);
        let a2 = self.hidden2.forward(&a1).mapv(relu);
        Ok(self.output.forward(&a2))
    }

    /// Predicted class index per row.
    pub fn predict_batch(&self, input: &Array2<f64>) -> Result<Vec<usize>, ModelError> {
        Ok(self.logits(input)?.rows().into_iter().map(|row| argmax(row.iter().copied())).collect())
    }

    /// Sentiment for a single pooled tweet vector.
    pub fn predict(&self, vector: &[f32]) -> Result<Sentiment, ModelError> {
        let input = Array2::from_shape_fn((1, vector.len()), |(_, j)| f64::from(vector[j]));
        let class = self.predict_batch(&input)?.first().copied().unwrap_or_default();
        Sentiment::from_index(class).ok_or(ModelError::InvalidLabel(class))
    }

    /// One optimization step on a mini-batch; returns the mean cross-entropy.
    pub(crate) fn train_batch<R: Rng + ?Sized>(
        &mut self,
        input: &Array2<f64>,
        targets: &[usize],
        optimizers: &mut [Box<dyn Optimizer>; 3],
        rng: &mut R,
    ) -> Result<f64, ModelError> {
        self.check_width(input.ncols())?;
        let cache = self.forward_train(input, rng);
        let (loss, delta) = softmax_cross_entropy(&cache.logits, targets)?;

        let [g1, g2, g3] = self.backward(&cache, &delta);
        let [o1, o2, o3] = optimizers;
        o1.step(&mut self.hidden1, &g1);
        o2.step(&mut self.hidden2, &g2);
        o3.step(&mut self.output, &g3);
        Ok(loss)
    }

    fn forward_train<R: Rng + ?Sized>(&self, input: &Array2<f64>, rng: &mut R) -> ForwardCache {
        let z1 = self.hidden1.forward(input);
        let mask1 = self.dropout_mask(z1.dim(), rng);
        let a1 = apply_mask(z1.mapv(relu), mask1.as_ref());
        let z2 = self.hidden2.forward(&a1);
        let mask2 = self.dropout_mask(z2.dim(), rng);
        let a2 = apply_mask(z2.mapv(relu), mask2.as_ref());
        let logits = self.output.forward(&a2);
        ForwardCache { input: input.clone(), z1, a1, mask1, z2, a2, mask2, logits }
    }

    fn backward(&self, cache: &ForwardCache, delta: &Array2<f64>) -> [LayerGradients; 3] {
        let g3 = self.output.gradients(&cache.a2, delta);
        let d2 = relu_backward(apply_mask(g3.input.clone(), cache.mask2.as_ref()), &cache.z2);
        let g2 = self.hidden2.gradients(&cache.a1, &d2);
        let d1 = relu_backward(apply_mask(g2.input.clone(), cache.mask1.as_ref()), &cache.z1);
        let g1 = self.hidden1.gradients(&cache.input, &d1);
        [g1, g2, g3]
    }

    /// Inverted dropout mask, or `None` when dropout is off.
    fn dropout_mask<R: Rng + ?Sized>(&self, dim: (usize, usize), rng: &mut R) -> Option<Array2<f64>> {
        if self.dropout <= 0.0 {
            return None;
        }
        let keep = 1.0 - self.dropout;
        Some(Array2::from_shape_fn(dim, |_| if rng.gen::<f64>() < keep { 1.0 / keep } else { 0.0 }))
    }

    fn check_width(&self, found: usize) -> Result<(), ModelError> {
        let expected = self.input_size();
        if found != expected {
            return Err(ModelError::DimensionMismatch { expected, found });
        }
        Ok(())
    }
}

fn relu(x: f64) -> f64 {
    x.max(0.0)
}

fn relu_backward(mut grad: Array2<f64>, z: &Array2<f64>) -> Array2<f64> {
    ndarray::Zip::from(&mut grad).and(z).for_each(|g, &z| {
        if z <= 0.0 {
            *g = 0.0;
        }
    });
    grad
}

fn apply_mask(values: Array2<f64>, mask: Option<&Array2<f64>>) -> Array2<f64> {
    match mask {
        Some(mask) => values * mask,
        None => values,
    }
}

/// First index of the maximum; `0` for an empty iterator.
pub(crate) fn argmax(values: impl Iterator<Item = f64>) -> usize {
    let mut best = (0, f64::NEG_INFINITY);
    for (i, v) in values.enumerate() {
        if v > best.1 {
            best = (i, v);
        }
    }
    best.0
}

/// Row-wise softmax.
pub fn softmax(logits: &Array2<f64>) -> Array2<f64> {
    let mut out = logits.clone();
    for mut row in out.rows_mut() {
        let max = row.fold(f64::NEG_INFINITY, |m, &v| m.max(v));
        row.mapv_inplace(|v| (v - max).exp());
        let sum = row.sum();
        row.mapv_inplace(|v| v / sum);
    }
    out
}

/// Mean cross-entropy of softmax(logits) and its gradient with respect to the logits.
fn softmax_cross_entropy(logits: &Array2<f64>, targets: &[usize]) -> Result<(f64, Array2<f64>), ModelError> {
    let classes = logits.ncols();
    let n = targets.len();
    if let Some(&bad) = targets.iter().find(|&&t| t >= classes) {
        return Err(ModelError::InvalidLabel(bad));
    }
    let mut grad = softmax(logits);
    let mut loss = 0.0;
    for (mut row, &target) in grad.axis_iter_mut(Axis(0)).zip(targets) {
        loss -= row[target].max(1e-12).ln();
        row[target] -= 1.0;
    }
    let scale = 1.0 / n.max(1) as f64;
    grad.mapv_inplace(|g| g * scale);
    Ok((loss * scale, grad))
}

/// Build a feature matrix from pooled vectors.
pub(crate) fn feature_matrix(vectors: &[&[f32]], width: usize) -> Array2<f64> {
    Array2::from_shape_fn((vectors.len(), width), |(i, j)| f64::from(vectors[i][j]))
}
