//! Inter-annotator agreement
//!
//! Krippendorff's alpha over an annotation matrix with missing cells, plus
//! loading of the word-sense disambiguation dataset the exercise measures.

mod alpha;
mod disambiguation;
mod error;
mod matrix;
mod metric;

pub use alpha::krippendorff_alpha;
pub use disambiguation::{
    alpha_by_word_class, annotation_matrix, load_items, AnnotatedItem, Annotation, ClassAgreement,
    Judgment, WordClass,
};
pub use error::{Degeneracy, IaaError};
pub use matrix::AnnotationMatrix;
pub use metric::{Distance, Metric};
