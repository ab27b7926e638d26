//! Word-sense disambiguation dataset
//!
//! Each item names a target word (under `verb`, `noun` or `adjective`) and
//! lists the judgments of the annotators who labeled it. Judgment values come
//! either as plain numbers or as MongoDB extended JSON
//! (`{"$numberLong": "3"}`).

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::alpha::krippendorff_alpha;
use super::error::IaaError;
use super::matrix::AnnotationMatrix;
use super::metric::Distance;
use crate::dataset::{read_json, DatasetError};

/// A judgment value as stored in the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Judgment {
    Number(f64),
    Long {
        #[serde(rename = "$numberLong")]
        number_long: String,
    },
    Text(String),
}

impl Judgment {
    /// Numeric value of the judgment.
    pub fn value(&self) -> Option<f64> {
        let v = match self {
            Judgment::Number(n) => *n,
            Judgment::Long { number_long } => number_long.trim().parse::<i64>().ok()? as f64,
            Judgment::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        v.is_finite().then_some(v)
    }

    fn raw(&self) -> String {
        match self {
            Judgment::Number(n) => n.to_string(),
            Judgment::Long { number_long } => number_long.clone(),
            Judgment::Text(s) => s.clone(),
        }
    }
}

/// One annotator's entry for an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub value: Judgment,
}

/// Grammatical class of the disambiguated word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordClass {
    Verb,
    Noun,
    Adjective,
}

impl WordClass {
    pub const ALL: [WordClass; 3] = [WordClass::Noun, WordClass::Verb, WordClass::Adjective];

    pub fn name(&self) -> &'static str {
        match self {
            WordClass::Verb => "verbs",
            WordClass::Noun => "nouns",
            WordClass::Adjective => "adjectives",
        }
    }
}

/// A disambiguation item: target word plus annotator judgments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedItem {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub verb: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub noun: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub adjective: Option<String>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl AnnotatedItem {
    /// Target word and its class, checking `verb`, `noun`, `adjective` in order.
    pub fn word(&self) -> Option<(WordClass, &str)> {
        if let Some(w) = &self.verb {
            return Some((WordClass::Verb, w));
        }
        if let Some(w) = &self.noun {
            return Some((WordClass::Noun, w));
        }
        self.adjective.as_deref().map(|w| (WordClass::Adjective, w))
    }

    /// Numeric judgments in annotator order.
    ///
    /// `unit` is the item's column, used in error messages.
    pub fn values(&self, unit: usize) -> Result<Vec<f64>, IaaError> {
        self.annotations
            .iter()
            .enumerate()
            .map(|(row, a)| {
                a.value.value().ok_or_else(|| IaaError::InvalidJudgment { value: a.value.raw(), row, unit })
            })
            .collect()
    }
}

/// Load the disambiguation dataset (a JSON array of items).
pub fn load_items(path: &Path) -> Result<Vec<AnnotatedItem>, DatasetError> {
    read_json(path)
}

/// Build the annotation matrix with one column per item.
///
/// The number of annotator slots is the largest annotator count of any item;
/// items with fewer annotators are padded with missing cells.
pub fn annotation_matrix<'a, I>(items: I) -> Result<AnnotationMatrix, IaaError>
where
    I: IntoIterator<Item = &'a AnnotatedItem>,
{
    let units = items.into_iter().enumerate().map(|(u, item)| item.values(u)).collect::<Result<Vec<_>, _>>()?;
    AnnotationMatrix::from_units(units)
}

/// Agreement for one slice of the dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassAgreement {
    /// "all", "nouns", "verbs" or "adjectives"
    pub label: String,
    /// Items in the slice
    pub units: usize,
    /// Non-missing judgments in the slice
    pub judgments: usize,
    /// Alpha, if computable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
    /// Reason alpha could not be computed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ClassAgreement {
    fn compute<'a, D: Distance + ?Sized>(
        label: &str,
        items: impl IntoIterator<Item = &'a AnnotatedItem>,
        metric: &D,
    ) -> Result<Self, IaaError> {
        let matrix = annotation_matrix(items)?;
        let (alpha, error) = match krippendorff_alpha(&matrix, metric) {
            Ok(a) => (Some(a), None),
            Err(e @ IaaError::DegenerateInput(_)) => (None, Some(e.to_string())),
            Err(e) => return Err(e),
        };
        Ok(Self {
            label: label.to_string(),
            units: matrix.units(),
            judgments: matrix.judgments(),
            alpha,
            error,
        })
    }
}

/// Alpha over the whole dataset, then for nouns, verbs and adjectives.
///
/// Degenerate slices report their reason in `error` instead of failing the
/// whole computation; malformed judgments are still errors.
pub fn alpha_by_word_class<D: Distance + ?Sized>(
    items: &[AnnotatedItem],
    metric: &D,
) -> Result<Vec<ClassAgreement>, IaaError> {
    let mut result = vec![ClassAgreement::compute("all", items, metric)?];
    for class in WordClass::ALL {
        let slice = items.iter().filter(|item| item.word().map(|(c, _)| c) == Some(class));
        result.push(ClassAgreement::compute(class.name(), slice, metric)?);
    }
    Ok(result)
}
