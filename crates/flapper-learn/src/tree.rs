//! CART decision trees with Gini impurity.
//!
//! Trees are grown depth-first. At every node the candidate thresholds of a
//! feature are the midpoints between consecutive distinct sorted values; the
//! split with the lowest weighted child impurity wins. Sample weights enter
//! every class count, which is how balanced class weighting is applied.

use rand::{Rng, seq::index};
use serde::{Deserialize, Serialize};

use crate::dataset::{CLASS_COUNT, FEATURE_COUNT, Sample};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    /// `None` grows until leaves are pure or too small to split.
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features considered per split; `None` means all of them.
    pub max_features: Option<usize>,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Leaf {
        /// Weighted class distribution, normalized to sum to 1.
        probabilities: [f32; CLASS_COUNT],
    },
    Split {
        feature: usize,
        threshold: f32,
        /// Index of the subtree for `value <= threshold`.
        left: usize,
        right: usize,
    },
}

/// A fitted tree; node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

struct Builder<'a, R: ?Sized> {
    samples: &'a [Sample],
    weights: &'a [f32],
    params: &'a TreeParams,
    rng: &'a mut R,
    nodes: Vec<Node>,
}

struct BestSplit {
    feature: usize,
    threshold: f32,
    impurity: f32,
}

fn gini(counts: &[f32; CLASS_COUNT]) -> f32 {
    let total = counts.iter().sum::<f32>();
    if total <= 0.0 {
        return 0.0;
    }
    1.0 - counts.iter().map(|c| (c / total).powi(2)).sum::<f32>()
}

impl<R> Builder<'_, R>
where
    R: Rng + ?Sized,
{
    fn class_weights(&self, indices: &[usize]) -> [f32; CLASS_COUNT] {
        let mut counts = [0.0; CLASS_COUNT];
        for &i in indices {
            counts[usize::from(self.samples[i].label)] += self.weights[i];
        }
        counts
    }

    fn leaf(&mut self, counts: &[f32; CLASS_COUNT]) -> usize {
        let total = counts.iter().sum::<f32>();
        let probabilities = if total > 0.0 {
            counts.map(|c| c / total)
        } else {
            [1.0 / 2.0; CLASS_COUNT]
        };
        self.nodes.push(Node::Leaf { probabilities });
        self.nodes.len() - 1
    }

    fn build(&mut self, indices: &mut [usize], depth: usize) -> usize {
        let counts = self.class_weights(indices);
        let is_pure = counts.iter().filter(|&&c| c > 0.0).count() <= 1;
        let depth_reached = self.params.max_depth.is_some_and(|max| depth >= max);
        let too_small = indices.len() < self.params.min_samples_split.max(2)
            || indices.len() < 2 * self.params.min_samples_leaf.max(1);
        if is_pure || depth_reached || too_small {
            return self.leaf(&counts);
        }

        let Some(best) = self.best_split(indices, &counts) else {
            return self.leaf(&counts);
        };

        let (feature, threshold) = (best.feature, best.threshold);
        let split_at = partition(indices, |&i| self.samples[i].features[feature] <= threshold);
        let index = self.nodes.len();
        self.nodes.push(Node::Split {
            feature,
            threshold,
            left: 0,
            right: 0,
        });
        let (left_indices, right_indices) = indices.split_at_mut(split_at);
        let left = self.build(left_indices, depth + 1);
        let right = self.build(right_indices, depth + 1);
        if let Node::Split {
            left: l, right: r, ..
        } = &mut self.nodes[index]
        {
            *l = left;
            *r = right;
        }
        index
    }

    #[expect(clippy::cast_precision_loss)]
    fn best_split(&mut self, indices: &[usize], counts: &[f32; CLASS_COUNT]) -> Option<BestSplit> {
        let total_weight = counts.iter().sum::<f32>();
        let n = indices.len();
        let min_leaf = self.params.min_samples_leaf.max(1);
        let parent_impurity = gini(counts);

        let feature_count = self
            .params
            .max_features
            .map_or(FEATURE_COUNT, |m| m.clamp(1, FEATURE_COUNT));
        // Random feature order; keep looking past `feature_count` until some
        // valid split exists.
        let features = index::sample(self.rng, FEATURE_COUNT, FEATURE_COUNT).into_vec();

        let mut best: Option<BestSplit> = None;
        let mut order = indices.to_vec();
        for (visited, feature) in features.into_iter().enumerate() {
            if visited >= feature_count && best.is_some() {
                break;
            }
            let value = |i: usize| self.samples[i].features[feature];
            order.sort_by(|&a, &b| value(a).total_cmp(&value(b)));

            let mut left = [0.0; CLASS_COUNT];
            for (pos, pair) in order.windows(2).enumerate() {
                let i = pair[0];
                left[usize::from(self.samples[i].label)] += self.weights[i];
                let left_n = pos + 1;
                let (lo, hi) = (value(pair[0]), value(pair[1]));
                if lo >= hi || left_n < min_leaf || n - left_n < min_leaf {
                    continue;
                }
                let right = [counts[0] - left[0], counts[1] - left[1]];
                let left_weight = left.iter().sum::<f32>();
                let right_weight = total_weight - left_weight;
                let impurity = if total_weight > 0.0 {
                    (left_weight * gini(&left) + right_weight * gini(&right)) / total_weight
                } else {
                    (left_n as f32 * gini(&left) + (n - left_n) as f32 * gini(&right)) / n as f32
                };
                if best.as_ref().is_none_or(|b| impurity < b.impurity) {
                    let mut threshold = f32::midpoint(lo, hi);
                    if threshold >= hi {
                        threshold = lo;
                    }
                    best = Some(BestSplit {
                        feature,
                        threshold,
                        impurity,
                    });
                }
            }
        }
        best.filter(|b| b.impurity < parent_impurity)
    }
}

/// Moves elements matching `pred` to the front; returns how many matched.
fn partition<F>(indices: &mut [usize], mut pred: F) -> usize
where
    F: FnMut(&usize) -> bool,
{
    let mut split = 0;
    for i in 0..indices.len() {
        if pred(&indices[i]) {
            indices.swap(split, i);
            split += 1;
        }
    }
    split
}

impl DecisionTree {
    /// Fits a tree on `samples[indices]` (indices may repeat).
    ///
    /// `weights` holds one weight per entry of `samples`.
    ///
    /// # Panics
    ///
    /// Panics if `weights.len() != samples.len()`.
    pub fn fit<R>(
        samples: &[Sample],
        weights: &[f32],
        indices: &[usize],
        params: &TreeParams,
        rng: &mut R,
    ) -> Self
    where
        R: Rng + ?Sized,
    {
        assert_eq!(samples.len(), weights.len());
        let mut builder = Builder {
            samples,
            weights,
            params,
            rng,
            nodes: vec![],
        };
        let mut indices = indices.to_vec();
        builder.build(&mut indices, 0);
        Self {
            nodes: builder.nodes,
        }
    }

    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], index: usize) -> usize {
            match nodes.get(index) {
                Some(Node::Split { left, right, .. }) => {
                    1 + usize::max(walk(nodes, *left), walk(nodes, *right))
                }
                _ => 0,
            }
        }
        walk(&self.nodes, 0)
    }

    #[must_use]
    pub fn predict_proba(&self, features: &[f32; FEATURE_COUNT]) -> [f32; CLASS_COUNT] {
        let mut index = 0;
        loop {
            match self.nodes.get(index) {
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    index = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                Some(Node::Leaf { probabilities }) => return *probabilities,
                None => return [1.0 / 2.0; CLASS_COUNT],
            }
        }
    }

    #[must_use]
    pub fn predict(&self, features: &[f32; FEATURE_COUNT]) -> u8 {
        argmax(&self.predict_proba(features))
    }
}

/// Index of the largest probability; ties go to the lower class.
#[must_use]
pub fn argmax(probabilities: &[f32; CLASS_COUNT]) -> u8 {
    let mut best = 0;
    for (i, &p) in probabilities.iter().enumerate() {
        if p > probabilities[best] {
            best = i;
        }
    }
    u8::try_from(best).unwrap_or_default()
}
