//! Synthetic minority oversampling (SMOTE).
//!
//! New minority rows are interpolated between a random minority row and one
//! of its `k` nearest minority neighbors:
//!
//! ```text
//! x_new = x + u * (x_nn - x),   u ~ U[0, 1)
//! ```
//!
//! Neighbor search runs in parallel; each row's neighbors are computed
//! independently, so the result does not depend on scheduling.

use std::cmp::Ordering;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::error::Result;
use crate::ml::{FeatureMatrix, MLError};

/// SMOTE oversampler for binary labels.
///
/// # Examples
///
/// ```
/// use spamkit::ml::FeatureMatrix;
/// use spamkit::ml::sampling::Smote;
///
/// let rows: Vec<Vec<f32>> = (0..20).map(|i| vec![i as f32, 0.0]).collect();
/// let labels: Vec<usize> = (0..20).map(|i| usize::from(i >= 14)).collect();
/// let x = FeatureMatrix::from_rows(rows).unwrap();
///
/// let (x_res, y_res) = Smote::new(0.5).fit_resample(&x, &labels).unwrap();
/// assert_eq!(y_res.iter().filter(|&&y| y == 1).count(), 7);
/// assert_eq!(x_res.n_rows(), 21);
/// ```
#[derive(Debug, Clone)]
pub struct Smote {
    sampling_ratio: f64,
    k_neighbors: usize,
    seed: u64,
}

impl Smote {
    /// Create an oversampler targeting `minority / majority = sampling_ratio`.
    pub fn new(sampling_ratio: f64) -> Self {
        Smote {
            sampling_ratio,
            k_neighbors: 5,
            seed: 42,
        }
    }

    /// Set the number of nearest neighbors to interpolate towards.
    pub fn with_k_neighbors(mut self, k_neighbors: usize) -> Self {
        self.k_neighbors = k_neighbors;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Target ratio.
    pub fn sampling_ratio(&self) -> f64 {
        self.sampling_ratio
    }

    /// Return `x` and `y` followed by the synthetic minority rows.
    ///
    /// Original rows keep their order and values. The less frequent label
    /// is the minority class.
    pub fn fit_resample(&self, x: &FeatureMatrix, y: &[usize]) -> Result<(FeatureMatrix, Vec<usize>)> {
        if x.n_rows() != y.len() {
            return Err(MLError::LengthMismatch {
                expected: x.n_rows(),
                actual: y.len(),
            }
            .into());
        }
        if !(self.sampling_ratio > 0.0 && self.sampling_ratio <= 1.0) {
            return Err(MLError::invalid_ratio(format!(
                "ratio must be in (0, 1], got {}",
                self.sampling_ratio
            ))
            .into());
        }
        if self.k_neighbors == 0 {
            return Err(MLError::invalid_ratio("k_neighbors must be positive").into());
        }

        let (minority, n_minority, n_majority) = class_counts(y)?;
        let target = (self.sampling_ratio * n_majority as f64).floor() as usize;
        if target < n_minority {
            return Err(MLError::invalid_ratio(format!(
                "ratio {} would require removing minority samples ({} present, target {})",
                self.sampling_ratio, n_minority, target
            ))
            .into());
        }

        let n_generate = target - n_minority;
        let mut x_res = x.clone();
        let mut y_res = y.to_vec();
        if n_generate == 0 {
            log::debug!("Minority class already at target ratio; nothing generated");
            return Ok((x_res, y_res));
        }

        if n_minority < self.k_neighbors + 1 {
            return Err(MLError::InsufficientMinoritySamples {
                required: self.k_neighbors + 1,
                actual: n_minority,
            }
            .into());
        }

        let minority_rows: Vec<usize> = (0..y.len()).filter(|&i| y[i] == minority).collect();
        let samples = x.select_rows(&minority_rows)?;
        let neighbors = nearest_neighbors(&samples, self.k_neighbors);

        let mut rng = StdRng::seed_from_u64(self.seed);
        let picks: Vec<usize> = (0..n_generate)
            .map(|_| rng.random_range(0..n_minority * self.k_neighbors))
            .collect();
        let steps: Vec<f32> = (0..n_generate).map(|_| rng.random::<f32>()).collect();

        let mut synthetic = vec![0.0f32; samples.n_cols()];
        for (&pick, &step) in picks.iter().zip(&steps) {
            let row = pick / self.k_neighbors;
            let neighbor = neighbors[row][pick % self.k_neighbors];
            let base = samples.row(row);
            let other = samples.row(neighbor);
            for ((value, &a), &b) in synthetic.iter_mut().zip(base).zip(other) {
                *value = a + step * (b - a);
            }
            x_res.push_row(&synthetic)?;
            y_res.push(minority);
        }

        log::info!(
            "SMOTE generated {} synthetic rows for class {} ({} -> {}, majority {})",
            n_generate,
            minority,
            n_minority,
            target,
            n_majority
        );
        Ok((x_res, y_res))
    }
}

/// Minority label, minority count and majority count of a binary label set.
fn class_counts(y: &[usize]) -> Result<(usize, usize, usize)> {
    let mut classes: Vec<(usize, usize)> = Vec::new();
    for &label in y {
        match classes.iter_mut().find(|(class, _)| *class == label) {
            Some((_, count)) => *count += 1,
            None => classes.push((label, 1)),
        }
    }
    classes.sort_unstable();

    match classes.as_slice() {
        [(a, n_a), (b, n_b)] => {
            if n_b < n_a {
                Ok((*b, *n_b, *n_a))
            } else {
                Ok((*a, *n_a, *n_b))
            }
        }
        [] | [_] => Err(MLError::InsufficientMinoritySamples {
            required: 1,
            actual: 0,
        }
        .into()),
        _ => Err(MLError::invalid_ratio(format!(
            "a single ratio needs exactly two classes, got {}",
            classes.len()
        ))
        .into()),
    }
}

/// Indices of the `k` nearest other rows of every row, closest first.
///
/// Ties are broken by row index.
fn nearest_neighbors(samples: &FeatureMatrix, k: usize) -> Vec<Vec<usize>> {
    (0..samples.n_rows())
        .into_par_iter()
        .map(|i| {
            let row = samples.row(i);
            let mut distances: Vec<(f64, usize)> = (0..samples.n_rows())
                .filter(|&j| j != i)
                .map(|j| (squared_distance(row, samples.row(j)), j))
                .collect();
            distances.sort_unstable_by(|a, b| {
                a.0.partial_cmp(&b.0)
                    .unwrap_or(Ordering::Equal)
                    .then(a.1.cmp(&b.1))
            });
            distances.into_iter().take(k).map(|(_, j)| j).collect()
        })
        .collect()
}

fn squared_distance(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| {
            let d = f64::from(x) - f64::from(y);
            d * d
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(n_majority: usize, n_minority: usize) -> (FeatureMatrix, Vec<usize>) {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for i in 0..n_majority {
            rows.push(vec![i as f32, 0.0]);
            labels.push(0);
        }
        for i in 0..n_minority {
            rows.push(vec![100.0 + i as f32, 10.0 + (i % 3) as f32]);
            labels.push(1);
        }
        (FeatureMatrix::from_rows(rows).unwrap(), labels)
    }

    fn count(labels: &[usize], class: usize) -> usize {
        labels.iter().filter(|&&y| y == class).count()
    }

    #[test]
    fn test_reaches_target_ratio() {
        let (x, y) = dataset(100, 10);
        let (x_res, y_res) = Smote::new(0.25).fit_resample(&x, &y).unwrap();

        assert_eq!(count(&y_res, 0), 100);
        assert_eq!(count(&y_res, 1), 25);
        assert_eq!(x_res.n_rows(), 125);
    }

    #[test]
    fn test_originals_come_first_unchanged() {
        let (x, y) = dataset(50, 8);
        let (x_res, y_res) = Smote::new(0.5).fit_resample(&x, &y).unwrap();

        assert_eq!(&y_res[..y.len()], y.as_slice());
        for i in 0..x.n_rows() {
            assert_eq!(x_res.row(i), x.row(i));
        }
        assert!(y_res[y.len()..].iter().all(|&label| label == 1));
    }

    #[test]
    fn test_synthetic_rows_lie_in_minority_hull() {
        let (x, y) = dataset(50, 8);
        let (x_res, _) = Smote::new(0.6).fit_resample(&x, &y).unwrap();

        for i in x.n_rows()..x_res.n_rows() {
            let row = x_res.row(i);
            assert!(row[0] >= 100.0 && row[0] <= 107.0);
            assert!(row[1] >= 10.0 && row[1] <= 12.0);
        }
    }

    #[test]
    fn test_minority_label_may_be_zero() {
        let (x, y) = dataset(8, 50);
        let (_, y_res) = Smote::new(0.5).fit_resample(&x, &y).unwrap();

        assert_eq!(count(&y_res, 0), 25);
        assert_eq!(count(&y_res, 1), 50);
    }

    #[test]
    fn test_insufficient_minority_samples() {
        let (x, y) = dataset(100, 3);
        let error = Smote::new(0.5).fit_resample(&x, &y).unwrap_err();
        assert!(error.to_string().contains("need at least 6, got 3"));
    }

    #[test]
    fn test_ratio_below_current_balance() {
        let (x, y) = dataset(20, 10);
        assert!(Smote::new(0.2).fit_resample(&x, &y).is_err());
    }

    #[test]
    fn test_ratio_out_of_range() {
        let (x, y) = dataset(20, 10);
        assert!(Smote::new(0.0).fit_resample(&x, &y).is_err());
        assert!(Smote::new(1.5).fit_resample(&x, &y).is_err());
    }

    #[test]
    fn test_exact_ratio_generates_nothing() {
        let (x, y) = dataset(20, 5);
        let (x_res, y_res) = Smote::new(0.25).fit_resample(&x, &y).unwrap();
        assert_eq!(x_res, x);
        assert_eq!(y_res, y);
    }

    #[test]
    fn test_single_class_rejected() {
        let (x, y) = dataset(20, 0);
        assert!(Smote::new(0.5).fit_resample(&x, &y).is_err());
    }

    #[test]
    fn test_three_classes_rejected() {
        let (x, mut y) = dataset(20, 10);
        y[0] = 2;
        assert!(Smote::new(0.9).fit_resample(&x, &y).is_err());
    }

    #[test]
    fn test_length_mismatch() {
        let (x, y) = dataset(20, 10);
        assert!(Smote::new(0.9).fit_resample(&x, &y[1..]).is_err());
    }

    #[test]
    fn test_same_seed_same_output() {
        let (x, y) = dataset(60, 9);
        let first = Smote::new(0.4).with_seed(7).fit_resample(&x, &y).unwrap();
        let second = Smote::new(0.4).with_seed(7).fit_resample(&x, &y).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_nearest_neighbors_order() {
        let samples =
            FeatureMatrix::from_rows(vec![vec![0.0], vec![1.0], vec![3.0], vec![10.0]]).unwrap();
        let neighbors = nearest_neighbors(&samples, 2);

        assert_eq!(neighbors[0], vec![1, 2]);
        assert_eq!(neighbors[3], vec![2, 1]);
    }
}
