//! Classification tree structures
//!
//! Trees are flat node arrays with node 0 as the root. Traversal compares
//! the feature value against an integer threshold and goes left on `<=`.

use serde::{Deserialize, Serialize};

/// A decision tree node (internal or leaf)
///
/// For internal nodes:
/// - `feature_idx >= 0`: index into the feature vector
/// - `left` and `right` point to child node indices
/// - `class` is `None`
///
/// For leaf nodes:
/// - `feature_idx == -1`
/// - `class` holds the predicted class code
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Node {
    /// Node ID (for reference, not used in traversal)
    pub id: i32,

    /// Left child index (-1 for leaf nodes)
    pub left: i32,

    /// Right child index (-1 for leaf nodes)
    pub right: i32,

    /// Feature index to split on (-1 for leaf nodes)
    pub feature_idx: i32,

    /// Split threshold; values `<= threshold` go left
    pub threshold: i64,

    /// Majority class code (Some for leaf nodes)
    pub class: Option<u32>,
}

impl Node {
    /// Create a new internal (split) node
    pub fn internal(id: i32, feature_idx: i32, threshold: i64, left: i32, right: i32) -> Self {
        Self {
            id,
            left,
            right,
            feature_idx,
            threshold,
            class: None,
        }
    }

    /// Create a new leaf node
    pub fn leaf(id: i32, class: u32) -> Self {
        Self {
            id,
            left: -1,
            right: -1,
            feature_idx: -1,
            threshold: 0,
            class: Some(class),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.feature_idx == -1 || self.class.is_some()
    }
}

/// A single classification tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Tree {
    /// Tree nodes (node 0 is the root)
    pub nodes: Vec<Node>,
}

impl Tree {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Walk the tree for a feature vector and return the leaf class.
    ///
    /// Returns `None` if the walk leaves the node array or indexes past the
    /// feature vector; validated trees never do.
    pub fn evaluate(&self, features: &[u8]) -> Option<u32> {
        let mut idx = 0usize;

        // A valid tree reaches a leaf in at most `nodes.len()` steps
        for _ in 0..self.nodes.len() {
            let node = self.nodes.get(idx)?;

            if node.is_leaf() {
                return node.class;
            }

            let value = i64::from(*features.get(usize::try_from(node.feature_idx).ok()?)?);
            let next = if value <= node.threshold {
                node.left
            } else {
                node.right
            };
            idx = usize::try_from(next).ok()?;
        }

        None
    }

    /// Maximum root-to-leaf depth (a lone leaf has depth 0)
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], idx: usize, budget: usize) -> usize {
            match nodes.get(idx) {
                Some(node) if !node.is_leaf() && budget > 0 => {
                    let left = walk(nodes, node.left as usize, budget - 1);
                    let right = walk(nodes, node.right as usize, budget - 1);
                    1 + left.max(right)
                }
                _ => 0,
            }
        }
        walk(&self.nodes, 0, self.nodes.len())
    }

    /// Validate tree structure against the feature and class counts
    pub fn validate(&self, feature_count: usize, n_classes: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("Tree has no nodes".to_string());
        }

        for (i, node) in self.nodes.iter().enumerate() {
            if node.is_leaf() {
                match node.class {
                    None => return Err(format!("Leaf node {i} has no class")),
                    Some(class) if class as usize >= n_classes => {
                        return Err(format!(
                            "Leaf node {i} predicts class {class}, model has {n_classes}"
                        ))
                    }
                    Some(_) => {}
                }
                continue;
            }

            // Children must come after their parent, which also rules out cycles
            for (side, child) in [("left", node.left), ("right", node.right)] {
                if child <= i as i32 || child as usize >= self.nodes.len() {
                    return Err(format!("Node {i} has invalid {side} child: {child}"));
                }
            }

            if node.feature_idx < 0 || node.feature_idx as usize >= feature_count {
                return Err(format!(
                    "Internal node {i} has invalid feature index: {}",
                    node.feature_idx
                ));
            }
        }

        Ok(())
    }
}
