//! Krippendorff's alpha
//!
//! `alpha = 1 - Do / De`, where
//!
//! - `Do` (observed disagreement) averages the pairwise distances inside each
//!   unit that received two or more judgments, weighted by `1 / (m_u - 1)` and
//!   normalized by `n`, the number of judgments in those units;
//! - `De` (expected disagreement) averages the pairwise distances over the pool
//!   of every non-missing judgment in the matrix.
//!
//! Units with a single judgment add nothing to `Do` but still feed the pool.
//! Both sums run over value histograms, so the cost grows with the number of
//! distinct values rather than with the square of the number of judgments.

use super::error::{Degeneracy, IaaError};
use super::matrix::AnnotationMatrix;
use super::metric::Distance;

/// Compute Krippendorff's alpha for a matrix under a distance metric.
///
/// # Examples
///
/// ```
/// use tweetsent::agreement::{krippendorff_alpha, AnnotationMatrix, Metric};
///
/// let m = AnnotationMatrix::from_text_rows(
///     &[vec!["1", "2", "3", "4"], vec!["1", "2", "3", "5"]],
///     "*",
/// ).unwrap();
/// let alpha = krippendorff_alpha(&m, &Metric::Interval).unwrap();
/// assert!(alpha > 0.9 && alpha < 1.0);
/// ```
///
/// # Errors
///
/// Returns [`IaaError::DegenerateInput`] when no unit has two judgments, when
/// the expected disagreement is zero, or when the distances overflow.
pub fn krippendorff_alpha<D: Distance + ?Sized>(
    matrix: &AnnotationMatrix,
    metric: &D,
) -> Result<f64, IaaError> {
    let mut pool: Vec<f64> = Vec::with_capacity(matrix.judgments());
    let mut pairable = 0usize;
    let mut observed = 0.0f64;

    for unit in 0..matrix.units() {
        let values: Vec<f64> = matrix.unit_values(unit).collect();
        if values.len() >= 2 {
            pairable += values.len();
            let hist = histogram(values.iter().copied());
            observed += pair_sum(&hist, metric) / (values.len() - 1) as f64;
        }
        pool.extend(values);
    }

    if pairable == 0 {
        return Err(Degeneracy::NoPairableJudgments.into());
    }

    let total = pool.len();
    let expected = pair_sum(&histogram(pool.into_iter()), metric) / (total * (total - 1)) as f64;
    let observed = observed / pairable as f64;
    if !observed.is_finite() || !expected.is_finite() {
        return Err(Degeneracy::NonFiniteDisagreement.into());
    }
    if expected == 0.0 {
        return Err(Degeneracy::NoExpectedDisagreement.into());
    }

    Ok(1.0 - observed / expected)
}

/// Distinct values with their multiplicities, sorted ascending.
fn histogram(values: impl Iterator<Item = f64>) -> Vec<(f64, usize)> {
    let mut sorted: Vec<f64> = values.collect();
    sorted.sort_by(f64::total_cmp);

    let mut hist: Vec<(f64, usize)> = Vec::new();
    for v in sorted {
        match hist.last_mut() {
            Some((last, count)) if *last == v => *count += 1,
            _ => hist.push((v, 1)),
        }
    }
    hist
}

/// Sum of `distance(v_i, v_j)` over all ordered pairs `i != j`.
fn pair_sum<D: Distance + ?Sized>(hist: &[(f64, usize)], metric: &D) -> f64 {
    let mut sum = 0.0;
    for (i, &(a, na)) in hist.iter().enumerate() {
        // Same value: na * (na - 1) ordered pairs
        sum += (na * (na - 1)) as f64 * metric.distance(a, a);
        for &(b, nb) in &hist[i + 1..] {
            sum += 2.0 * (na * nb) as f64 * metric.distance(a, b);
        }
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agreement::Metric;

    fn matrix(rows: &[&[&str]]) -> AnnotationMatrix {
        let rows: Vec<Vec<&str>> = rows.iter().map(|r| r.to_vec()).collect();
        AnnotationMatrix::from_text_rows(&rows, "*").unwrap()
    }

    /// Naive O(N^2) reference following the textbook definition.
    fn reference_alpha(m: &AnnotationMatrix, metric: &Metric) -> f64 {
        let units: Vec<Vec<f64>> = (0..m.units()).map(|u| m.unit_values(u).collect()).collect();
        let pool: Vec<f64> = units.iter().flatten().copied().collect();
        let n: usize = units.iter().filter(|u| u.len() > 1).map(Vec::len).sum();

        let mut d_o = 0.0;
        for u in units.iter().filter(|u| u.len() > 1) {
            let mut du = 0.0;
            for (i, a) in u.iter().enumerate() {
                for (j, b) in u.iter().enumerate() {
                    if i != j {
                        du += metric.distance(*a, *b);
                    }
                }
            }
            d_o += du / (u.len() - 1) as f64;
        }
        d_o /= n as f64;

        let mut d_e = 0.0;
        for (i, a) in pool.iter().enumerate() {
            for (j, b) in pool.iter().enumerate() {
                if i != j {
                    d_e += metric.distance(*a, *b);
                }
            }
        }
        d_e /= (pool.len() * (pool.len() - 1)) as f64;

        1.0 - d_o / d_e
    }

    #[test]
    fn test_perfect_agreement_is_one() {
        let m = matrix(&[&["1", "2", "3", "1"], &["1", "2", "3", "1"], &["1", "2", "*", "1"]]);
        assert_eq!(krippendorff_alpha(&m, &Metric::Interval).unwrap(), 1.0);
        assert_eq!(krippendorff_alpha(&m, &Metric::Nominal).unwrap(), 1.0);
    }

    #[test]
    fn test_near_perfect_agreement() {
        let m = matrix(&[&["1", "2", "3", "4"], &["1", "2", "3", "5"]]);
        let alpha = krippendorff_alpha(&m, &Metric::Interval).unwrap();
        // Do = 2/8, De = 222/56
        let expected = 1.0 - (2.0 / 8.0) / (222.0 / 56.0);
        assert!((alpha - expected).abs() < 1e-12);
        assert!(alpha > 0.0 && alpha < 1.0);
    }

    #[test]
    fn test_single_disagreement_among_constant_values() {
        // Five 1s and one 2: the lone disagreement is exactly what chance predicts
        let m = matrix(&[&["1", "1", "1"], &["1", "1", "2"]]);
        let alpha = krippendorff_alpha(&m, &Metric::Interval).unwrap();
        assert!(alpha < 1.0);
        assert!(alpha.abs() < 1e-12);
    }

    #[test]
    fn test_systematic_disagreement_is_negative() {
        let m = matrix(&[&["1", "2", "1", "2"], &["2", "1", "2", "1"]]);
        let alpha = krippendorff_alpha(&m, &Metric::Nominal).unwrap();
        assert!(alpha < 0.0);
    }

    #[test]
    fn test_matches_reference() {
        let m = matrix(&[
            &["1", "2", "3", "3", "2", "1", "4", "1", "2", "*", "*", "*"],
            &["1", "2", "3", "3", "2", "2", "4", "1", "2", "5", "*", "3"],
            &["*", "3", "3", "3", "2", "3", "4", "2", "2", "5", "1", "*"],
            &["1", "2", "3", "3", "2", "4", "4", "1", "2", "5", "1", "*"],
        ]);
        for metric in [Metric::Nominal, Metric::Interval, Metric::Ratio] {
            let fast = krippendorff_alpha(&m, &metric).unwrap();
            let slow = reference_alpha(&m, &metric);
            assert!((fast - slow).abs() < 1e-9, "{metric}: {fast} vs {slow}");
        }
    }

    #[test]
    fn test_singletons_feed_expected_pool() {
        // Unit 2 has a single judgment; it widens the pool but not Do
        let with_singleton = matrix(&[&["1", "2", "9"], &["1", "3", "*"]]);
        let without = matrix(&[&["1", "2"], &["1", "3"]]);
        let a = krippendorff_alpha(&with_singleton, &Metric::Interval).unwrap();
        let b = krippendorff_alpha(&without, &Metric::Interval).unwrap();
        assert!(a > b);
    }

    #[test]
    fn test_only_singletons_is_degenerate() {
        let m = matrix(&[&["1", "*", "3"], &["*", "2", "*"]]);
        assert_eq!(
            krippendorff_alpha(&m, &Metric::Interval),
            Err(IaaError::DegenerateInput(Degeneracy::NoPairableJudgments))
        );
    }

    #[test]
    fn test_empty_matrix_is_degenerate() {
        let m = AnnotationMatrix::from_units(Vec::<Vec<f64>>::new()).unwrap();
        assert_eq!(
            krippendorff_alpha(&m, &Metric::Interval),
            Err(IaaError::DegenerateInput(Degeneracy::NoPairableJudgments))
        );
    }

    #[test]
    fn test_one_pairable_unit() {
        let differing = matrix(&[&["1", "*", "*"], &["2", "*", "*"]]);
        assert!(krippendorff_alpha(&differing, &Metric::Interval).is_ok());

        let identical = matrix(&[&["2", "*", "*"], &["2", "*", "*"]]);
        assert_eq!(
            krippendorff_alpha(&identical, &Metric::Interval),
            Err(IaaError::DegenerateInput(Degeneracy::NoExpectedDisagreement))
        );
    }

    #[test]
    fn test_huge_judgments_are_rejected() {
        let m = AnnotationMatrix::from_rows(vec![
            vec![Some(1e200), Some(-1e200)],
            vec![Some(1e200), Some(1e200)],
        ])
        .unwrap();
        assert_eq!(
            krippendorff_alpha(&m, &Metric::Interval),
            Err(IaaError::DegenerateInput(Degeneracy::NonFiniteDisagreement))
        );
        // Nominal distances stay bounded
        assert!(krippendorff_alpha(&m, &Metric::Nominal).unwrap().is_finite());
    }

    #[test]
    fn test_random_judgments_near_zero() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(11);
        let rows: Vec<Vec<Option<f64>>> = (0..3)
            .map(|_| (0..2000).map(|_| Some(rng.gen_range(1..=5) as f64)).collect())
            .collect();
        let m = AnnotationMatrix::from_rows(rows).unwrap();
        for metric in [Metric::Nominal, Metric::Interval] {
            let alpha = krippendorff_alpha(&m, &metric).unwrap();
            assert!(alpha.abs() < 0.05, "{metric}: {alpha}");
        }
    }

    #[test]
    fn test_does_not_mutate_and_is_deterministic() {
        let m = matrix(&[&["1", "2", "3"], &["1", "3", "3"]]);
        let before = m.clone();
        let a = krippendorff_alpha(&m, &Metric::Interval).unwrap();
        let b = krippendorff_alpha(&m, &Metric::Interval).unwrap();
        assert_eq!(a, b);
        assert_eq!(m, before);
    }
}
