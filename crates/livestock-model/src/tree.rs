//! Compiled regression tree.

use crate::artifact::{TreeArtifact, TREE_LEAF};

/// A node in a compiled tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Go left when `row[feature] <= threshold`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Offset of this leaf's outputs in the tree's value buffer.
    Leaf(usize),
}

/// Regression tree with multi-output leaves.
#[derive(Debug, Clone)]
pub struct RegressionTree {
    nodes: Vec<Node>,
    leaf_values: Vec<f64>,
    n_outputs: usize,
}

impl RegressionTree {
    /// Build from a validated artifact tree.
    pub(crate) fn from_artifact(tree: &TreeArtifact, n_outputs: usize) -> Self {
        let mut nodes = Vec::with_capacity(tree.node_count());
        let mut leaf_values = Vec::new();

        for i in 0..tree.node_count() {
            if tree.children_left[i] == TREE_LEAF {
                nodes.push(Node::Leaf(leaf_values.len()));
                leaf_values.extend_from_slice(&tree.value[i][..n_outputs]);
            } else {
                nodes.push(Node::Split {
                    feature: tree.feature[i] as usize,
                    threshold: tree.threshold[i],
                    left: tree.children_left[i] as usize,
                    right: tree.children_right[i] as usize,
                });
            }
        }

        Self {
            nodes,
            leaf_values,
            n_outputs,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn n_outputs(&self) -> usize {
        self.n_outputs
    }

    /// Walk the tree for one row and return the leaf outputs.
    ///
    /// Features are stored as `f32` and widened for the comparison, matching
    /// how the thresholds were chosen during fitting.
    #[inline]
    pub fn predict_row(&self, row: &[f32]) -> &[f64] {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf(offset) => return &self.leaf_values[offset..offset + self.n_outputs],
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if f64::from(row[feature]) <= threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// x0 <= 0.5 ? (x1 <= 10 ? [1, 10] : [2, 20]) : [3, 30]
    fn two_level() -> RegressionTree {
        let artifact = TreeArtifact {
            children_left: vec![1, 2, -1, -1, -1],
            children_right: vec![4, 3, -1, -1, -1],
            feature: vec![0, 1, -2, -2, -2],
            threshold: vec![0.5, 10.0, -2.0, -2.0, -2.0],
            value: vec![
                vec![0.0, 0.0],
                vec![0.0, 0.0],
                vec![1.0, 10.0],
                vec![2.0, 20.0],
                vec![3.0, 30.0],
            ],
        };
        artifact.validate(2, 2).unwrap();
        RegressionTree::from_artifact(&artifact, 2)
    }

    #[test]
    fn test_predict_row_paths() {
        let tree = two_level();
        assert_eq!(tree.predict_row(&[0.0, 5.0]), &[1.0, 10.0]);
        assert_eq!(tree.predict_row(&[0.0, 11.0]), &[2.0, 20.0]);
        assert_eq!(tree.predict_row(&[1.0, 0.0]), &[3.0, 30.0]);
    }

    #[test]
    fn test_threshold_is_inclusive_left() {
        let tree = two_level();
        assert_eq!(tree.predict_row(&[0.5, 10.0]), &[1.0, 10.0]);
    }

    #[test]
    fn test_single_leaf_tree() {
        let artifact = TreeArtifact {
            children_left: vec![-1],
            children_right: vec![-1],
            feature: vec![-2],
            threshold: vec![-2.0],
            value: vec![vec![7.0]],
        };
        let tree = RegressionTree::from_artifact(&artifact, 1);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.predict_row(&[123.0]), &[7.0]);
    }
}
