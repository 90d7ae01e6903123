//! Random forest regression
//!
//! Each tree is a CART regressor grown on a bootstrap resample of the
//! training rows. Splits minimize the summed squared error of the two
//! children over every feature; thresholds sit halfway between adjacent
//! distinct values. The forest predicts the mean of its trees.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::Result;

use super::{check_training_data, FittedRegressor, Regressor};

/// Bootstrap-aggregated regression trees, deterministic per seed
#[derive(Debug, Clone)]
pub struct RandomForestRegressor {
    n_estimators: usize,
    max_depth: usize,
    min_samples_split: usize,
    seed: u64,
}

impl RandomForestRegressor {
    pub fn new(n_estimators: usize, max_depth: usize, min_samples_split: usize, seed: u64) -> Self {
        Self {
            n_estimators: n_estimators.max(1),
            max_depth,
            // A split needs at least two samples regardless of config
            min_samples_split: min_samples_split.max(2),
            seed,
        }
    }
}

impl Default for RandomForestRegressor {
    fn default() -> Self {
        Self::new(100, 8, 3, 42)
    }
}

impl Regressor for RandomForestRegressor {
    fn name(&self) -> &'static str {
        "random_forest"
    }

    fn fit(&self, features: &[Vec<f64>], targets: &[f64]) -> Result<Box<dyn FittedRegressor>> {
        let width = check_training_data(features, targets)?;
        let n = features.len();
        let mut rng = StdRng::seed_from_u64(self.seed);

        let trees = (0..self.n_estimators)
            .map(|_| {
                let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                let grower = TreeGrower {
                    features,
                    targets,
                    max_depth: self.max_depth,
                    min_samples_split: self.min_samples_split,
                };
                grower.grow(sample, 0)
            })
            .collect();

        Ok(Box::new(FittedForest { trees, width }))
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf(f64),
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn predict(&self, row: &[f64]) -> f64 {
        let mut node = self;
        loop {
            match node {
                Node::Leaf(value) => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    error: f64,
}

struct TreeGrower<'a> {
    features: &'a [Vec<f64>],
    targets: &'a [f64],
    max_depth: usize,
    min_samples_split: usize,
}

impl TreeGrower<'_> {
    fn grow(&self, sample: Vec<usize>, depth: usize) -> Node {
        let n = sample.len() as f64;
        let sum: f64 = sample.iter().map(|&i| self.targets[i]).sum();
        let mean = sum / n;

        if depth >= self.max_depth || sample.len() < self.min_samples_split {
            return Node::Leaf(mean);
        }

        let sum_sq: f64 = sample.iter().map(|&i| self.targets[i].powi(2)).sum();
        let node_error = sum_sq - sum * sum / n;

        let best = match self.best_split(&sample) {
            Some(best) if best.error < node_error - 1e-9 => best,
            _ => return Node::Leaf(mean),
        };

        let (left, right): (Vec<usize>, Vec<usize>) = sample
            .into_iter()
            .partition(|&i| self.features[i][best.feature] <= best.threshold);

        Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            left: Box::new(self.grow(left, depth + 1)),
            right: Box::new(self.grow(right, depth + 1)),
        }
    }

    fn best_split(&self, sample: &[usize]) -> Option<SplitCandidate> {
        let width = self.features[sample[0]].len();
        let total: f64 = sample.iter().map(|&i| self.targets[i]).sum();
        let total_sq: f64 = sample.iter().map(|&i| self.targets[i].powi(2)).sum();
        let n = sample.len();

        let mut best: Option<SplitCandidate> = None;
        let mut order = sample.to_vec();

        for feature in 0..width {
            order.sort_by(|&a, &b| self.features[a][feature].total_cmp(&self.features[b][feature]));

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;
            for k in 1..n {
                let y = self.targets[order[k - 1]];
                left_sum += y;
                left_sq += y * y;

                let lo = self.features[order[k - 1]][feature];
                let hi = self.features[order[k]][feature];
                if lo >= hi {
                    continue;
                }

                let left_n = k as f64;
                let right_n = (n - k) as f64;
                let right_sum = total - left_sum;
                let right_sq = total_sq - left_sq;
                let error = (left_sq - left_sum * left_sum / left_n)
                    + (right_sq - right_sum * right_sum / right_n);

                if best.as_ref().map_or(true, |b| error < b.error) {
                    best = Some(SplitCandidate {
                        feature,
                        threshold: lo + (hi - lo) / 2.0,
                        error,
                    });
                }
            }
        }

        best
    }
}

#[derive(Debug)]
struct FittedForest {
    trees: Vec<Node>,
    width: usize,
}

impl FittedRegressor for FittedForest {
    fn predict(&self, features: &[Vec<f64>]) -> Vec<f64> {
        features
            .iter()
            .map(|row| {
                debug_assert_eq!(row.len(), self.width);
                let sum: f64 = self.trees.iter().map(|tree| tree.predict(row)).sum();
                sum / self.trees.len() as f64
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_data() -> (Vec<Vec<f64>>, Vec<f64>) {
        let features: Vec<Vec<f64>> = (0..20).map(|i| vec![i as f64, 1.0]).collect();
        let targets = (0..20).map(|i| if i < 10 { 10.0 } else { 50.0 }).collect();
        (features, targets)
    }

    #[test]
    fn test_single_tree_learns_step_function() {
        let (features, targets) = step_data();
        let tree = Node::Split {
            feature: 0,
            threshold: 9.5,
            left: Box::new(Node::Leaf(10.0)),
            right: Box::new(Node::Leaf(50.0)),
        };
        assert_eq!(tree.predict(&[3.0, 1.0]), 10.0);
        assert_eq!(tree.predict(&[12.0, 1.0]), 50.0);

        let grower = TreeGrower {
            features: &features,
            targets: &targets,
            max_depth: 8,
            min_samples_split: 2,
        };
        let grown = grower.grow((0..20).collect(), 0);
        assert_eq!(grown.predict(&[2.0, 1.0]), 10.0);
        assert_eq!(grown.predict(&[17.0, 1.0]), 50.0);
    }

    #[test]
    fn test_forest_predictions_stay_within_target_range() {
        let (features, targets) = step_data();
        let model = RandomForestRegressor::default()
            .fit(&features, &targets)
            .unwrap();

        let predictions = model.predict(&[vec![0.0, 1.0], vec![19.0, 1.0], vec![100.0, 1.0]]);
        assert!(predictions.iter().all(|p| (10.0..=50.0).contains(p)));
        assert!(predictions[0] < 20.0);
        assert!(predictions[1] > 40.0);
    }

    #[test]
    fn test_forest_is_deterministic_per_seed() {
        let (features, targets) = step_data();
        let a = RandomForestRegressor::new(25, 4, 3, 7)
            .fit(&features, &targets)
            .unwrap();
        let b = RandomForestRegressor::new(25, 4, 3, 7)
            .fit(&features, &targets)
            .unwrap();

        let queries = vec![vec![4.5, 1.0], vec![9.7, 1.0], vec![14.0, 1.0]];
        assert_eq!(a.predict(&queries), b.predict(&queries));
    }

    #[test]
    fn test_constant_targets_give_constant_predictions() {
        let features: Vec<Vec<f64>> = (0..6).map(|i| vec![i as f64]).collect();
        let model = RandomForestRegressor::default()
            .fit(&features, &[0.0; 6])
            .unwrap();

        assert_eq!(model.predict(&[vec![3.0], vec![42.0]]), vec![0.0, 0.0]);
    }

    #[test]
    fn test_single_training_row() {
        let model = RandomForestRegressor::default()
            .fit(&[vec![1.0, 2.0]], &[100.0])
            .unwrap();
        assert_eq!(model.predict(&[vec![5.0, 5.0]]), vec![100.0]);
    }
}
