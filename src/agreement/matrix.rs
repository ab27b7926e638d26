//! Annotation matrix: annotator slots by annotated units

use super::error::IaaError;

/// Judgments of several annotators over a set of units.
///
/// Row `r` holds the judgments of annotator slot `r`, column `u` the judgments
/// given to unit `u`. `None` marks a missing judgment. The matrix is
/// rectangular and immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationMatrix {
    rows: Vec<Vec<Option<f64>>>,
    units: usize,
}

impl AnnotationMatrix {
    /// Build from annotator rows.
    ///
    /// # Errors
    ///
    /// Returns [`IaaError::RaggedMatrix`] if rows differ in length and
    /// [`IaaError::InvalidJudgment`] for non-finite values.
    pub fn from_rows(rows: Vec<Vec<Option<f64>>>) -> Result<Self, IaaError> {
        let units = rows.first().map(Vec::len).unwrap_or(0);
        for (r, row) in rows.iter().enumerate() {
            if row.len() != units {
                return Err(IaaError::RaggedMatrix { row: r, found: row.len(), expected: units });
            }
            for (u, cell) in row.iter().enumerate() {
                if let Some(v) = cell {
                    if !v.is_finite() {
                        return Err(IaaError::InvalidJudgment { value: v.to_string(), row: r, unit: u });
                    }
                }
            }
        }
        Ok(Self { rows, units })
    }

    /// Build from text rows, where `missing` marks an absent judgment.
    ///
    /// ```
    /// use tweetsent::agreement::AnnotationMatrix;
    ///
    /// let m = AnnotationMatrix::from_text_rows(&[vec!["1", "*"], vec!["2", "3"]], "*").unwrap();
    /// assert_eq!(m.get(0, 1), None);
    /// assert_eq!(m.get(1, 1), Some(3.0));
    /// ```
    pub fn from_text_rows<S: AsRef<str>>(rows: &[Vec<S>], missing: &str) -> Result<Self, IaaError> {
        let mut parsed = Vec::with_capacity(rows.len());
        for (r, row) in rows.iter().enumerate() {
            let mut cells = Vec::with_capacity(row.len());
            for (u, cell) in row.iter().enumerate() {
                let text = cell.as_ref().trim();
                if text == missing {
                    cells.push(None);
                    continue;
                }
                let value = text.parse::<f64>().map_err(|_| IaaError::InvalidJudgment {
                    value: text.to_string(),
                    row: r,
                    unit: u,
                })?;
                cells.push(Some(value));
            }
            parsed.push(cells);
        }
        Self::from_rows(parsed)
    }

    /// Build from per-unit judgment lists (one column per unit).
    ///
    /// The number of annotator slots is the largest list; shorter units are
    /// padded with missing cells.
    pub fn from_units<I>(units: I) -> Result<Self, IaaError>
    where
        I: IntoIterator<Item = Vec<f64>>,
    {
        let columns: Vec<Vec<f64>> = units.into_iter().collect();
        let slots = columns.iter().map(Vec::len).max().unwrap_or(0);

        let mut rows = vec![Vec::with_capacity(columns.len()); slots];
        for column in &columns {
            for (slot, row) in rows.iter_mut().enumerate() {
                row.push(column.get(slot).copied());
            }
        }

        if rows.is_empty() {
            return Ok(Self { rows, units: columns.len() });
        }
        Self::from_rows(rows)
    }

    /// Number of annotator slots (rows).
    pub fn annotators(&self) -> usize {
        self.rows.len()
    }

    /// Number of units (columns).
    pub fn units(&self) -> usize {
        self.units
    }

    /// Judgment of one annotator slot for one unit.
    pub fn get(&self, annotator: usize, unit: usize) -> Option<f64> {
        self.rows.get(annotator).and_then(|row| row.get(unit)).copied().flatten()
    }

    /// Non-missing judgments of a unit.
    pub fn unit_values(&self, unit: usize) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().filter_map(move |row| row.get(unit).copied().flatten())
    }

    /// Total number of non-missing judgments.
    pub fn judgments(&self) -> usize {
        self.rows.iter().flatten().filter(|c| c.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_units_pads_missing() {
        let m = AnnotationMatrix::from_units(vec![vec![1.0, 2.0, 3.0], vec![4.0]]).unwrap();
        assert_eq!(m.annotators(), 3);
        assert_eq!(m.units(), 2);
        assert_eq!(m.get(0, 1), Some(4.0));
        assert_eq!(m.get(1, 1), None);
        assert_eq!(m.get(2, 1), None);
        assert_eq!(m.judgments(), 4);
    }

    #[test]
    fn test_from_units_empty() {
        let m = AnnotationMatrix::from_units(Vec::<Vec<f64>>::new()).unwrap();
        assert_eq!(m.annotators(), 0);
        assert_eq!(m.units(), 0);
    }

    #[test]
    fn test_unit_values_skip_missing() {
        let m = AnnotationMatrix::from_text_rows(&[vec!["1", "*"], vec!["*", "2"], vec!["3", "4"]], "*")
            .unwrap();
        assert_eq!(m.unit_values(0).collect::<Vec<_>>(), vec![1.0, 3.0]);
        assert_eq!(m.unit_values(1).collect::<Vec<_>>(), vec![2.0, 4.0]);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = AnnotationMatrix::from_rows(vec![vec![Some(1.0)], vec![Some(1.0), None]]);
        assert_eq!(err, Err(IaaError::RaggedMatrix { row: 1, found: 2, expected: 1 }));
    }

    #[test]
    fn test_invalid_text_rejected() {
        let err = AnnotationMatrix::from_text_rows(&[vec!["1", "x"]], "*").unwrap_err();
        assert!(matches!(err, IaaError::InvalidJudgment { unit: 1, .. }));

        let err = AnnotationMatrix::from_text_rows(&[vec!["NaN"]], "*").unwrap_err();
        assert!(matches!(err, IaaError::InvalidJudgment { unit: 0, .. }));
    }
}
