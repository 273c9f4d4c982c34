//! Random forest evaluator over exported decision trees.
//!
//! Tree layout follows the usual array encoding: node `i` is a leaf when
//! `children_left[i] == -1`; otherwise go left when `x[feature[i]] <= threshold[i]`.
//! `value[i]` holds per-class weights at the node.

use serde::Deserialize;

use super::SparseCounts;

#[derive(Debug, Deserialize)]
pub struct DecisionTree {
    children_left: Vec<i64>,
    children_right: Vec<i64>,
    feature: Vec<i64>,
    threshold: Vec<f64>,
    value: Vec<Vec<f64>>,
}

impl DecisionTree {
    fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        let n = self.children_left.len();
        if n == 0 {
            return Err("empty tree".into());
        }
        if [
            self.children_right.len(),
            self.feature.len(),
            self.threshold.len(),
            self.value.len(),
        ]
        .iter()
        .any(|len| *len != n)
        {
            return Err("node arrays differ in length".into());
        }
        for i in 0..n {
            let (l, r) = (self.children_left[i], self.children_right[i]);
            if self.value[i].len() != n_classes {
                return Err(format!("node {i}: expected {n_classes} class values"));
            }
            if l == -1 {
                if self.value[i].iter().any(|v| !v.is_finite() || *v < 0.0) {
                    return Err(format!("leaf {i}: invalid class weights"));
                }
                continue;
            }
            // Children always come after their parent, which rules out cycles.
            let child_ok = |c: i64| c > i as i64 && (c as usize) < n;
            if !child_ok(l) || !child_ok(r) {
                return Err(format!("node {i}: bad children ({l}, {r})"));
            }
            let f = self.feature[i];
            if f < 0 || f as usize >= n_features {
                return Err(format!("node {i}: feature {f} out of range"));
            }
        }
        Ok(())
    }

    /// Normalized class distribution at the leaf reached by `x`.
    fn leaf_distribution(&self, x: &SparseCounts) -> &[f64] {
        let mut node = 0usize;
        while self.children_left[node] != -1 {
            let f = self.feature[node] as usize;
            let v = x.get(&f).copied().unwrap_or(0.0);
            node = if v <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        &self.value[node]
    }
}

#[derive(Debug, Deserialize)]
pub struct RandomForest {
    n_features: usize,
    classes: Vec<i64>,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.trees.is_empty() {
            return Err("forest has no trees".into());
        }
        if self.classes.len() < 2 {
            return Err("need at least two classes".into());
        }
        self.positive_index()?;
        for (i, t) in self.trees.iter().enumerate() {
            t.validate(self.n_features, self.classes.len())
                .map_err(|e| format!("tree {i}: {e}"))?;
        }
        Ok(())
    }

    /// Index of class label 1, or the second class when no label 1 exists.
    fn positive_index(&self) -> Result<usize, String> {
        match self.classes.iter().position(|c| *c == 1) {
            Some(i) => Ok(i),
            None if self.classes.len() >= 2 => Ok(1),
            None => Err("no positive class".into()),
        }
    }

    /// Mean over trees of the positive-class share at each reached leaf.
    pub fn positive_probability(&self, x: &SparseCounts) -> f64 {
        let pos = self.positive_index().unwrap_or(1);
        if self.trees.is_empty() {
            return 0.0;
        }
        let sum: f64 = self
            .trees
            .iter()
            .map(|t| {
                let dist = t.leaf_distribution(x);
                let total: f64 = dist.iter().sum();
                if total > 0.0 {
                    dist.get(pos).copied().unwrap_or(0.0) / total
                } else {
                    0.0
                }
            })
            .sum();
        (sum / self.trees.len() as f64).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(feature: i64, threshold: f64, left: [f64; 2], right: [f64; 2]) -> DecisionTree {
        DecisionTree {
            children_left: vec![1, -1, -1],
            children_right: vec![2, -1, -1],
            feature: vec![feature, -2, -2],
            threshold: vec![threshold, -2.0, -2.0],
            value: vec![vec![1.0, 1.0], left.to_vec(), right.to_vec()],
        }
    }

    fn forest(trees: Vec<DecisionTree>) -> RandomForest {
        RandomForest {
            n_features: 2,
            classes: vec![0, 1],
            trees,
        }
    }

    #[test]
    fn averages_leaf_probabilities() {
        let f = forest(vec![
            stump(0, 0.5, [1.0, 1.0], [0.0, 4.0]),
            stump(1, 1.5, [3.0, 1.0], [1.0, 0.0]),
        ]);
        f.validate().unwrap();

        let mut x = SparseCounts::new();
        // feature 0 absent -> 0.5; feature 1 absent -> 0.25
        assert!((f.positive_probability(&x) - 0.375).abs() < 1e-12);

        x.insert(0, 1.0);
        x.insert(1, 2.0);
        // 1.0 and 0.0
        assert!((f.positive_probability(&x) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn rejects_backward_children() {
        let mut t = stump(0, 0.5, [1.0, 1.0], [0.0, 1.0]);
        t.children_left[0] = 0;
        assert!(forest(vec![t]).validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_feature() {
        let t = stump(7, 0.5, [1.0, 1.0], [0.0, 1.0]);
        assert!(forest(vec![t]).validate().is_err());
    }

    #[test]
    fn rejects_empty_forest() {
        assert!(forest(vec![]).validate().is_err());
    }
}
