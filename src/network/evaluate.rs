//! Classification metrics

use serde::Serialize;

use super::model::FeedForwardNetwork;
use super::train::Samples;
use super::ModelError;
use crate::tweet::Sentiment;

/// Per-class counts and scores of one evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    /// Gold label count per class
    pub gold: Vec<u64>,
    /// Predicted label count per class
    pub predicted: Vec<u64>,
    /// Correct predictions per class
    pub true_positive: Vec<u64>,
    pub precision: Vec<f64>,
    pub recall: Vec<f64>,
    pub f1: Vec<f64>,
    pub correct: u64,
    pub total: u64,
    /// Percent of correct predictions
    pub accuracy: f64,
}

impl Evaluation {
    /// Score predictions against gold labels over `classes` classes.
    ///
    /// Precision, recall and F1 of a class with no true positives are 0.
    pub fn from_predictions(gold: &[usize], predicted: &[usize], classes: usize) -> Result<Self, ModelError> {
        if gold.is_empty() {
            return Err(ModelError::EmptyDataset);
        }
        if gold.len() != predicted.len() {
            return Err(ModelError::SampleMismatch { rows: predicted.len(), labels: gold.len() });
        }

        let mut eval = Self {
            gold: vec![0; classes],
            predicted: vec![0; classes],
            true_positive: vec![0; classes],
            precision: vec![0.0; classes],
            recall: vec![0.0; classes],
            f1: vec![0.0; classes],
            correct: 0,
            total: gold.len() as u64,
            accuracy: 0.0,
        };

        for (&g, &p) in gold.iter().zip(predicted) {
            if g >= classes {
                return Err(ModelError::InvalidLabel(g));
            }
            if p >= classes {
                return Err(ModelError::InvalidLabel(p));
            }
            eval.gold[g] += 1;
            eval.predicted[p] += 1;
            if g == p {
                eval.true_positive[g] += 1;
                eval.correct += 1;
            }
        }

        for c in 0..classes {
            let tp = eval.true_positive[c];
            if tp == 0 {
                continue;
            }
            let precision = tp as f64 / eval.predicted[c] as f64;
            let recall = tp as f64 / eval.gold[c] as f64;
            eval.precision[c] = precision;
            eval.recall[c] = recall;
            eval.f1[c] = 2.0 * precision * recall / (precision + recall);
        }
        eval.accuracy = 100.0 * eval.correct as f64 / eval.total as f64;
        Ok(eval)
    }
}

/// Run the network over the samples and score its predictions.
pub fn evaluate(network: &FeedForwardNetwork, samples: &Samples) -> Result<Evaluation, ModelError> {
    if samples.is_empty() {
        return Err(ModelError::EmptyDataset);
    }
    let predicted = network.predict_batch(&samples.features)?;
    Evaluation::from_predictions(&samples.labels, &predicted, network.output_size())
}

/// Render an evaluation as a console table.
pub fn format_evaluation_text(eval: &Evaluation) -> String {
    let mut output = String::new();
    output.push_str("EVALUATION\n");
    output.push_str("──────────\n");
    output.push_str(&format!(
        "  {:10} {:>6} {:>6} {:>6} {:>9} {:>7} {:>6}\n",
        "class", "gold", "pred", "tp", "precision", "recall", "f1"
    ));
    for c in 0..eval.gold.len() {
        let label = Sentiment::from_index(c).map_or_else(|| c.to_string(), |s| s.label().to_string());
        output.push_str(&format!(
            "  {:10} {:>6} {:>6} {:>6} {:>9.3} {:>7.3} {:>6.3}\n",
            label, eval.gold[c], eval.predicted[c], eval.true_positive[c], eval.precision[c], eval.recall[c], eval.f1[c]
        ));
    }
    output.push('\n');
    output.push_str(&format!("  Correct:  {} of {}\n", eval.correct, eval.total));
    output.push_str(&format!("  Accuracy: {:.1}%\n", eval.accuracy));
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_scores() {
        let gold = [0, 0, 1, 1, 2, 2];
        let pred = [0, 1, 1, 1, 2, 0];
        let eval = Evaluation::from_predictions(&gold, &pred, 3).unwrap();
        assert_eq!(eval.gold, vec![2, 2, 2]);
        assert_eq!(eval.predicted, vec![2, 3, 1]);
        assert_eq!(eval.true_positive, vec![1, 2, 1]);
        assert_eq!(eval.correct, 4);
        assert!((eval.precision[1] - 2.0 / 3.0).abs() < 1e-12);
        assert!((eval.recall[1] - 1.0).abs() < 1e-12);
        assert!((eval.f1[1] - 0.8).abs() < 1e-12);
        assert!((eval.accuracy - 400.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_undefined_scores_are_zero() {
        let eval = Evaluation::from_predictions(&[0, 0], &[1, 1], 3).unwrap();
        assert_eq!(eval.precision, vec![0.0; 3]);
        assert_eq!(eval.recall, vec![0.0; 3]);
        assert_eq!(eval.f1, vec![0.0; 3]);
        assert_eq!(eval.accuracy, 0.0);
    }

    #[test]
    fn test_empty_is_error() {
        assert!(matches!(Evaluation::from_predictions(&[], &[], 3), Err(ModelError::EmptyDataset)));
    }

    #[test]
    fn test_label_out_of_range() {
        assert!(matches!(Evaluation::from_predictions(&[3], &[0], 3), Err(ModelError::InvalidLabel(3))));
    }

    #[test]
    fn test_format_text() {
        let eval = Evaluation::from_predictions(&[0, 1, 2], &[0, 1, 1], 3).unwrap();
        let text = format_evaluation_text(&eval);
        assert!(text.starts_with("EVALUATION\n"));
        assert!(text.contains("Negative"));
        assert!(text.contains("Correct:  2 of 3"));
        assert!(text.contains("Accuracy: 66.7%"));
    }
}
