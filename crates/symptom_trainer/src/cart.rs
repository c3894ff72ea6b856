//! CART (Classification and Regression Tree) builder
//!
//! Implements deterministic exact-greedy classification tree construction
//! with Gini impurity computed in integer arithmetic only.

use std::collections::BTreeSet;
use symptom_core::{Node, Tree};

use crate::deterministic::{LcgRng, SplitTieBreaker};

/// Fixed-point scale for impurity values (parts per million)
const GINI_SCALE: i128 = 1_000_000;

/// Training parameters for a single tree
#[derive(Clone, Debug)]
pub struct TreeConfig {
    pub max_depth: usize,
    pub min_samples_leaf: usize,
    /// Features considered at each split (0 means all)
    pub max_features: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 16,
            min_samples_leaf: 1,
            max_features: 0,
        }
    }
}

/// Split candidate with weighted gain and tie-breaker
#[derive(Debug, Clone)]
struct SplitCandidate {
    feature_idx: usize,
    threshold: i64,
    gain: i128,
    tie_breaker: SplitTieBreaker,
}

impl SplitCandidate {
    fn new(feature_idx: usize, threshold: i64, gain: i128, node_id: usize) -> Self {
        Self {
            feature_idx,
            threshold,
            gain,
            tie_breaker: SplitTieBreaker::new(feature_idx, threshold, node_id),
        }
    }

    fn beats(&self, other: &SplitCandidate) -> bool {
        self.gain > other.gain || (self.gain == other.gain && self.tie_breaker < other.tie_breaker)
    }
}

/// Gini impurity of a class histogram, scaled by `GINI_SCALE`
fn gini(counts: &[usize], total: usize) -> i128 {
    if total == 0 {
        return 0;
    }
    let total = total as i128;
    let sum_sq: i128 = counts.iter().map(|&c| (c as i128) * (c as i128)).sum();
    GINI_SCALE - (sum_sq * GINI_SCALE) / (total * total)
}

/// Most frequent class; ties go to the lowest code
fn majority_class(counts: &[usize]) -> u32 {
    let mut best = 0usize;
    for (class, &count) in counts.iter().enumerate() {
        if count > counts[best] {
            best = class;
        }
    }
    best as u32
}

/// Build a classification tree using exact-greedy CART
pub struct CartBuilder<'a> {
    config: TreeConfig,
    features: &'a [Vec<u8>],
    labels: &'a [usize],
    n_classes: usize,
    feature_count: usize,
}

impl<'a> CartBuilder<'a> {
    pub fn new(
        features: &'a [Vec<u8>],
        labels: &'a [usize],
        n_classes: usize,
        config: TreeConfig,
    ) -> Self {
        debug_assert_eq!(features.len(), labels.len());

        let feature_count = features.first().map_or(0, Vec::len);

        Self {
            config,
            features,
            labels,
            n_classes,
            feature_count,
        }
    }

    /// Build a tree over `samples` (row indices, repeats allowed)
    pub fn build(&self, samples: &[usize], rng: &mut LcgRng) -> Tree {
        let mut nodes = Vec::new();
        self.build_node(samples, 0, &mut nodes, rng);
        Tree::new(nodes)
    }

    fn class_counts(&self, indices: &[usize]) -> Vec<usize> {
        let mut counts = vec![0usize; self.n_classes];
        for &idx in indices {
            counts[self.labels[idx]] += 1;
        }
        counts
    }

    /// Recursively build tree nodes, returning the index of the new node
    fn build_node(
        &self,
        indices: &[usize],
        depth: usize,
        nodes: &mut Vec<Node>,
        rng: &mut LcgRng,
    ) -> i32 {
        let current_idx = nodes.len();
        let counts = self.class_counts(indices);
        let leaf_class = majority_class(&counts);
        let is_pure = counts.iter().filter(|&&c| c > 0).count() <= 1;

        // Check stopping conditions
        if depth >= self.config.max_depth
            || is_pure
            || indices.len() < 2 * self.config.min_samples_leaf.max(1)
        {
            nodes.push(Node::leaf(current_idx as i32, leaf_class));
            return current_idx as i32;
        }

        let split = match self.find_best_split(indices, &counts, current_idx, rng) {
            Some(s) => s,
            None => {
                // No split improves impurity, create leaf
                nodes.push(Node::leaf(current_idx as i32, leaf_class));
                return current_idx as i32;
            }
        };

        let (left_indices, right_indices) =
            self.split_samples(indices, split.feature_idx, split.threshold);

        // Reserve space for current node
        nodes.push(Node::internal(
            current_idx as i32,
            split.feature_idx as i32,
            split.threshold,
            -1,
            -1,
        ));

        let left_idx = self.build_node(&left_indices, depth + 1, nodes, rng);
        let right_idx = self.build_node(&right_indices, depth + 1, nodes, rng);

        nodes[current_idx].left = left_idx;
        nodes[current_idx].right = right_idx;

        current_idx as i32
    }

    /// Number of features to examine per node before settling
    fn features_per_node(&self) -> usize {
        match self.config.max_features {
            0 => self.feature_count,
            k => k.min(self.feature_count),
        }
    }

    /// Feature visiting order for one node
    fn candidate_features(&self, rng: &mut LcgRng) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.feature_count).collect();
        if self.features_per_node() < self.feature_count {
            rng.shuffle(&mut order);
        }
        order
    }

    /// Find best split using exact-greedy search
    ///
    /// Features are visited in random order; the search stops once
    /// `max_features` have been examined and a valid split exists, so a node
    /// only becomes a leaf when no feature at all can split it.
    fn find_best_split(
        &self,
        indices: &[usize],
        parent_counts: &[usize],
        node_id: usize,
        rng: &mut LcgRng,
    ) -> Option<SplitCandidate> {
        let n = indices.len();
        let parent_weighted = gini(parent_counts, n) * n as i128;
        let mut best_split: Option<SplitCandidate> = None;

        let budget = self.features_per_node();

        for (examined, feature_idx) in self.candidate_features(rng).into_iter().enumerate() {
            if examined >= budget && best_split.is_some() {
                break;
            }

            for threshold in self.thresholds(indices, feature_idx) {
                let mut left_counts = vec![0usize; self.n_classes];
                let mut left_n = 0usize;
                for &idx in indices {
                    if i64::from(self.features[idx][feature_idx]) <= threshold {
                        left_counts[self.labels[idx]] += 1;
                        left_n += 1;
                    }
                }
                let right_n = n - left_n;

                if left_n < self.config.min_samples_leaf.max(1)
                    || right_n < self.config.min_samples_leaf.max(1)
                {
                    continue;
                }

                let right_counts: Vec<usize> = parent_counts
                    .iter()
                    .zip(&left_counts)
                    .map(|(p, l)| p - l)
                    .collect();

                // Impurity decrease weighted by node size
                let gain = parent_weighted
                    - gini(&left_counts, left_n) * left_n as i128
                    - gini(&right_counts, right_n) * right_n as i128;

                if gain <= 0 {
                    continue;
                }

                let candidate = SplitCandidate::new(feature_idx, threshold, gain, node_id);
                if best_split.as_ref().map_or(true, |current| candidate.beats(current)) {
                    best_split = Some(candidate);
                }
            }
        }

        best_split
    }

    /// Distinct values of a feature at this node, excluding the largest
    fn thresholds(&self, indices: &[usize], feature_idx: usize) -> Vec<i64> {
        let values: BTreeSet<i64> = indices
            .iter()
            .map(|&idx| i64::from(self.features[idx][feature_idx]))
            .collect();
        let mut thresholds: Vec<i64> = values.into_iter().collect();
        thresholds.pop();
        thresholds
    }

    /// Split samples based on threshold
    fn split_samples(
        &self,
        indices: &[usize],
        feature_idx: usize,
        threshold: i64,
    ) -> (Vec<usize>, Vec<usize>) {
        indices
            .iter()
            .copied()
            .partition(|&idx| i64::from(self.features[idx][feature_idx]) <= threshold)
    }
}
