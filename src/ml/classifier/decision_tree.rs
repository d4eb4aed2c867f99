//! CART decision tree classifier with Gini impurity.
//!
//! Nodes live in a flat arena and are grown from an explicit work stack, so
//! unbounded depth never recurses.

use std::cmp::Ordering;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::Result;
use crate::ml::classifier::{Classifier, argmax_lowest, check_training_data};
use crate::ml::{FeatureMatrix, MLError};

/// Values closer than this are treated as equal when placing thresholds.
const FEATURE_THRESHOLD: f32 = 1e-7;

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        class: usize,
    },
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature: usize,
    threshold: f32,
    impurity: f64,
}

/// Binary classification tree grown greedily on Gini impurity.
///
/// Rows with `x[feature] <= threshold` go left. With `max_features` set,
/// each node draws features without replacement until that many
/// non-constant features were examined.
#[derive(Debug, Clone)]
pub struct DecisionTreeClassifier {
    max_depth: Option<usize>,
    max_features: Option<usize>,
    seed: u64,
    nodes: Vec<Node>,
    n_features: usize,
}

impl DecisionTreeClassifier {
    /// Create an unfitted tree with unbounded depth using every feature.
    pub fn new() -> Self {
        DecisionTreeClassifier {
            max_depth: None,
            max_features: None,
            seed: 0,
            nodes: Vec::new(),
            n_features: 0,
        }
    }

    /// Limit the depth of the tree.
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Examine at most this many non-constant features per node.
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = Some(max_features.max(1));
        self
    }

    /// Seed for feature sampling.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Number of nodes, leaves included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Depth of the deepest leaf; a single leaf has depth 0.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = Vec::new();
        if !self.nodes.is_empty() {
            stack.push((0, 0));
        }
        while let Some((id, depth)) = stack.pop() {
            match self.nodes[id] {
                Node::Leaf { .. } => max_depth = max_depth.max(depth),
                Node::Split { left, right, .. } => {
                    stack.push((left, depth + 1));
                    stack.push((right, depth + 1));
                }
            }
        }
        max_depth
    }

    /// Fit on the rows listed in `sample`; repeated indices count repeatedly.
    pub fn fit_sample(&mut self, x: &FeatureMatrix, y: &[usize], sample: &[usize]) -> Result<()> {
        check_training_data(x, y)?;
        if sample.is_empty() {
            return Err(MLError::invalid_features("cannot grow a tree from an empty sample").into());
        }
        if let Some(&bad) = sample.iter().find(|&&i| i >= y.len()) {
            return Err(MLError::invalid_features(format!(
                "sample index {} out of bounds for {} rows",
                bad,
                y.len()
            ))
            .into());
        }

        let n_classes = y.iter().copied().max().unwrap_or(0) + 1;
        let n_features = x.n_cols();
        let max_features = self.max_features.unwrap_or(n_features).min(n_features);
        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut nodes = vec![Node::Leaf { class: 0 }];
        let mut stack: Vec<(usize, Vec<usize>, usize)> = vec![(0, sample.to_vec(), 0)];
        let mut features: Vec<usize> = (0..n_features).collect();
        let mut column: Vec<(f32, usize)> = Vec::with_capacity(sample.len());

        while let Some((id, rows, depth)) = stack.pop() {
            let counts = class_counts(y, &rows, n_classes);
            let leaf = Node::Leaf {
                class: argmax_lowest(&counts),
            };

            let pure = counts.iter().filter(|&&c| c > 0).count() <= 1;
            let depth_reached = self.max_depth.is_some_and(|max| depth >= max);
            if pure || rows.len() < 2 || depth_reached {
                nodes[id] = leaf;
                continue;
            }

            let best = best_split(
                x,
                y,
                &rows,
                n_classes,
                max_features,
                &mut features,
                &mut column,
                &mut rng,
            );
            let Some(split) = best else {
                nodes[id] = leaf;
                continue;
            };

            let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
                .into_iter()
                .partition(|&row| x.get(row, split.feature) <= split.threshold);
            if left_rows.is_empty() || right_rows.is_empty() {
                nodes[id] = leaf;
                continue;
            }

            let left = nodes.len();
            let right = left + 1;
            nodes.push(Node::Leaf { class: 0 });
            nodes.push(Node::Leaf { class: 0 });
            nodes[id] = Node::Split {
                feature: split.feature,
                threshold: split.threshold,
                left,
                right,
            };
            stack.push((right, right_rows, depth + 1));
            stack.push((left, left_rows, depth + 1));
        }

        self.nodes = nodes;
        self.n_features = n_features;
        Ok(())
    }

    /// Walk from the root to the leaf reached by `row` and return its class.
    fn leaf(&self, row: &[f32]) -> usize {
        let mut id = 0;
        loop {
            match self.nodes[id] {
                Node::Leaf { class } => return class,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => id = if row[feature] <= threshold { left } else { right },
            }
        }
    }
}

impl Default for DecisionTreeClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for DecisionTreeClassifier {
    fn fit(&mut self, x: &FeatureMatrix, y: &[usize]) -> Result<()> {
        let sample: Vec<usize> = (0..y.len()).collect();
        self.fit_sample(x, y, &sample)
    }

    fn predict(&self, x: &FeatureMatrix) -> Result<Vec<usize>> {
        if self.nodes.is_empty() {
            return Err(MLError::not_trained("DecisionTreeClassifier").into());
        }
        x.check_width(self.n_features)?;
        Ok(x.rows().map(|row| self.leaf(row)).collect())
    }

    fn name(&self) -> &'static str {
        "decision_tree"
    }
}

fn class_counts(y: &[usize], rows: &[usize], n_classes: usize) -> Vec<usize> {
    let mut counts = vec![0; n_classes];
    for &row in rows {
        counts[y[row]] += 1;
    }
    counts
}

/// Gini impurity of a class histogram holding `total` samples.
fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            p * p
        })
        .sum::<f64>()
}

/// Best Gini split over a random subset of features, or `None` when every
/// examined feature is constant on `rows`.
#[allow(clippy::too_many_arguments)]
fn best_split(
    x: &FeatureMatrix,
    y: &[usize],
    rows: &[usize],
    n_classes: usize,
    max_features: usize,
    features: &mut [usize],
    column: &mut Vec<(f32, usize)>,
    rng: &mut StdRng,
) -> Option<SplitCandidate> {
    let n_features = features.len();
    let n = rows.len();
    let total_counts = class_counts(y, rows, n_classes);
    let mut best: Option<SplitCandidate> = None;
    let mut visited = 0;

    for drawn in 0..n_features {
        if visited >= max_features {
            break;
        }
        let pick = rng.random_range(drawn..n_features);
        features.swap(drawn, pick);
        let feature = features[drawn];

        column.clear();
        column.extend(rows.iter().map(|&row| (x.get(row, feature), y[row])));
        column.sort_unstable_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

        if column[n - 1].0 <= column[0].0 + FEATURE_THRESHOLD {
            continue;
        }
        visited += 1;

        let mut left_counts = vec![0usize; n_classes];
        let mut right_counts = total_counts.clone();
        for i in 0..n - 1 {
            let (value, label) = column[i];
            left_counts[label] += 1;
            right_counts[label] -= 1;

            let next = column[i + 1].0;
            if next <= value + FEATURE_THRESHOLD {
                continue;
            }

            let n_left = i + 1;
            let n_right = n - n_left;
            let impurity = (n_left as f64 * gini(&left_counts, n_left)
                + n_right as f64 * gini(&right_counts, n_right))
                / n as f64;

            if best.is_none_or(|b| impurity < b.impurity) {
                let mut threshold = value / 2.0 + next / 2.0;
                if threshold == next || !threshold.is_finite() {
                    threshold = value;
                }
                best = Some(SplitCandidate {
                    feature,
                    threshold,
                    impurity,
                });
            }
        }
    }

    best
}
