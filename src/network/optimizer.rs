//! Parameter update rules
//!
//! One optimizer instance per layer; Adam keeps its moment estimates per
//! parameter tensor.

use clap::ValueEnum;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use super::layer::{DenseLayer, LayerGradients};

/// Optimizer selection for training.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OptimizerKind {
    #[default]
    Adam,
    Sgd,
}

impl OptimizerKind {
    pub fn build(self, learning_rate: f64) -> Box<dyn Optimizer> {
        match self {
            OptimizerKind::Adam => Box::new(Adam::new(learning_rate)),
            OptimizerKind::Sgd => Box::new(Sgd::new(learning_rate)),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            OptimizerKind::Adam => "adam",
            OptimizerKind::Sgd => "sgd",
        }
    }
}

/// Applies gradients to a layer.
pub trait Optimizer: Send {
    fn step(&mut self, layer: &mut DenseLayer, gradients: &LayerGradients);
}

/// Plain stochastic gradient descent.
#[derive(Debug, Clone)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Self {
        Self { learning_rate }
    }
}

impl Optimizer for Sgd {
    fn step(&mut self, layer: &mut DenseLayer, gradients: &LayerGradients) {
        layer.weights.scaled_add(-self.learning_rate, &gradients.weights);
        layer.biases.scaled_add(-self.learning_rate, &gradients.biases);
    }
}

/// Adam (adaptive moment estimation).
#[derive(Debug, Clone)]
pub struct Adam {
    pub learning_rate: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub epsilon: f64,
    t: i32,
    m_w: Option<Array2<f64>>,
    v_w: Option<Array2<f64>>,
    m_b: Option<Array1<f64>>,
    v_b: Option<Array1<f64>>,
}

impl Adam {
    pub fn new(learning_rate: f64) -> Self {
        Self {
            learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
            t: 0,
            m_w: None,
            v_w: None,
            m_b: None,
            v_b: None,
        }
    }
}

impl Optimizer for Adam {
    fn step(&mut self, layer: &mut DenseLayer, gradients: &LayerGradients) {
        self.t += 1;
        let (beta1, beta2) = (self.beta1, self.beta2);
        let correction1 = 1.0 - beta1.powi(self.t);
        let correction2 = 1.0 - beta2.powi(self.t);
        let step = self.learning_rate;
        let eps = self.epsilon;

        let m = self.m_w.get_or_insert_with(|| Array2::zeros(layer.weights.dim()));
        let v = self.v_w.get_or_insert_with(|| Array2::zeros(layer.weights.dim()));
        *m = &*m * beta1 + &gradients.weights * (1.0 - beta1);
        *v = &*v * beta2 + &gradients.weights.mapv(|g| g * g) * (1.0 - beta2);
        ndarray::Zip::from(&mut layer.weights).and(&*m).and(&*v).for_each(|w, &m, &v| {
            *w -= step * (m / correction1) / ((v / correction2).sqrt() + eps);
        });

        let m = self.m_b.get_or_insert_with(|| Array1::zeros(layer.biases.len()));
        let v = self.v_b.get_or_insert_with(|| Array1::zeros(layer.biases.len()));
        *m = &*m * beta1 + &gradients.biases * (1.0 - beta1);
        *v = &*v * beta2 + &gradients.biases.mapv(|g| g * g) * (1.0 - beta2);
        ndarray::Zip::from(&mut layer.biases).and(&*m).and(&*v).for_each(|b, &m, &v| {
            *b -= step * (m / correction1) / ((v / correction2).sqrt() + eps);
        });
    }
}
