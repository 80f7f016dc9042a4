//! Binary split trees over named, scaled features
//!
//! Shared by the forest and isolation variants. `L` is the leaf payload
//! (a probability for classification trees, a sample count for isolation
//! trees).

use crate::logic::features::FeatureVector;

#[derive(Debug, Clone, PartialEq)]
pub enum TreeNode<L> {
    Leaf(L),
    /// Goes left when `value <= threshold`
    Split {
        feature: String,
        threshold: f64,
        left: Box<TreeNode<L>>,
        right: Box<TreeNode<L>>,
    },
}

impl<L> TreeNode<L> {
    pub fn leaf(payload: L) -> Self {
        TreeNode::Leaf(payload)
    }

    pub fn split(feature: &str, threshold: f64, left: TreeNode<L>, right: TreeNode<L>) -> Self {
        TreeNode::Split {
            feature: feature.to_string(),
            threshold,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Walk to a leaf. Returns the leaf payload and its depth (root = 0).
    /// Features missing from the vector read as 0.0 (the scaled mean).
    pub fn descend(&self, vector: &FeatureVector) -> (&L, usize) {
        let mut node = self;
        let mut depth = 0;
        loop {
            match node {
                TreeNode::Leaf(payload) => return (payload, depth),
                TreeNode::Split { feature, threshold, left, right } => {
                    node = if vector.get_or_mean(feature) <= *threshold { left } else { right };
                    depth += 1;
                }
            }
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf(_) => 0,
            TreeNode::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descend() {
        let tree = TreeNode::split(
            "port",
            0.0,
            TreeNode::leaf("low"),
            TreeNode::split("packet_size", 1.0, TreeNode::leaf("mid"), TreeNode::leaf("high")),
        );

        let v = FeatureVector::from_named(&[("port", -1.0), ("packet_size", 5.0)]);
        assert_eq!(tree.descend(&v), (&"low", 1));

        let v = FeatureVector::from_named(&[("port", 1.0), ("packet_size", 5.0)]);
        assert_eq!(tree.descend(&v), (&"high", 2));

        // missing feature reads as 0.0
        let v = FeatureVector::from_named(&[("packet_size", 5.0)]);
        assert_eq!(tree.descend(&v), (&"low", 1));

        assert_eq!(tree.depth(), 2);
    }
}
