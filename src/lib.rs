//! tweetsent - Tweet sentiment analysis pipeline
//!
//! This library provides functionality to:
//! - Embed tweets with fastText vectors and pool them per tweet
//! - Train and evaluate a feed-forward sentiment classifier
//! - Rank frequencies and compute corpus statistics over predictions
//! - Render statistics as PNG charts
//! - Measure inter-annotator agreement with Krippendorff's alpha

pub mod agreement;
pub mod analyze;
pub mod chart;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod embeddings;
pub mod error;
pub mod frequency;
pub mod logging;
pub mod network;
pub mod output;
pub mod pipeline;
pub mod preprocess;
pub mod shapes;
pub mod tokenizer;
pub mod tweet;

pub use error::{Error, Result};
