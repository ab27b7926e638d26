//! Error types for agreement computation

use thiserror::Error;

/// Why a coefficient cannot be computed from a matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Degeneracy {
    /// No unit carries two or more judgments
    #[error("no unit has two or more judgments")]
    NoPairableJudgments,
    /// Every pooled judgment is at distance zero from every other
    #[error("expected disagreement is zero (all pooled judgments identical)")]
    NoExpectedDisagreement,
    /// Distances between the judgments overflow `f64`
    #[error("disagreement is not finite (judgments too far apart)")]
    NonFiniteDisagreement,
}

/// Error when building an annotation matrix or computing alpha.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IaaError {
    /// The matrix carries no information about agreement
    #[error("degenerate input: {0}")]
    DegenerateInput(Degeneracy),
    /// Rows of different lengths
    #[error("annotator row {row} has {found} units, expected {expected}")]
    RaggedMatrix { row: usize, found: usize, expected: usize },
    /// A cell that is neither a finite number nor the missing marker
    #[error("invalid judgment '{value}' for annotator {row}, unit {unit}")]
    InvalidJudgment { value: String, row: usize, unit: usize },
}

impl From<Degeneracy> for IaaError {
    fn from(d: Degeneracy) -> Self {
        IaaError::DegenerateInput(d)
    }
}
