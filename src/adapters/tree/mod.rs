//! Decision tree adapter: Implementation of SymptomClassifier.
//!
//! A small CART tree using Gini impurity, trained once on the symptom
//! pattern table. Capacity is deliberately bounded (see [`TreeParams`]) so
//! the tree maps symptom sets to coarse disease groups instead of memorizing
//! the table.
//!
//! The tree is stored as a flat arena of nodes with index 0 as the root.
//! Leaves keep their per-class training counts, which become the class
//! probabilities at prediction time.

mod split;

use std::collections::BTreeSet;

pub use split::{DatasetSplit, DEFAULT_SEED, TEST_FRACTION, VALIDATION_FRACTION};

use crate::domain::{ClassProbabilities, PatternRow, PatternTable};
use crate::ports::SymptomClassifier;
use crate::AyurdxError;

/// Capacity limits for tree growth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeParams {
    /// Maximum depth (0 = single leaf)
    pub max_depth: usize,
    /// A node needs at least this many samples to be split
    pub min_samples_split: usize,
    /// Each side of a split must keep at least this many samples
    pub min_samples_leaf: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: 3,
            min_samples_split: 4,
            min_samples_leaf: 2,
        }
    }
}

#[derive(Debug, Clone)]
enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        /// Training samples per class, indexed like `labels`
        counts: Vec<usize>,
    },
}

/// Outcome of [`train`]: partition sizes and held-out accuracy.
///
/// Purely observational; nothing here feeds back into the model.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    pub seed: u64,
    pub labels: usize,
    pub train_size: usize,
    pub validation_size: usize,
    pub test_size: usize,
    /// `None` when the partition is empty
    pub validation_accuracy: Option<f64>,
    pub test_accuracy: Option<f64>,
    pub depth: usize,
}

/// Trained decision tree classifier.
#[derive(Debug, Clone)]
pub struct DecisionTreeClassifier {
    /// Training-time labels, sorted
    labels: Vec<String>,
    nodes: Vec<TreeNode>,
    n_features: usize,
}

/// Split the pattern table, fit a tree on the training partition, and score
/// it on the validation and test partitions.
///
/// # Errors
/// Returns `Training` if the training partition is empty.
pub fn train(
    table: &PatternTable,
    seed: u64,
    params: &TreeParams,
) -> Result<(DecisionTreeClassifier, TrainingReport), AyurdxError> {
    let split = DatasetSplit::new(table.len(), seed);
    let train_rows = select(table, &split.train);
    let validation_rows = select(table, &split.validation);
    let test_rows = select(table, &split.test);

    let model = DecisionTreeClassifier::fit(&train_rows, table.vocabulary().len(), params)?;

    let report = TrainingReport {
        seed,
        labels: model.labels.len(),
        train_size: train_rows.len(),
        validation_size: validation_rows.len(),
        test_size: test_rows.len(),
        validation_accuracy: model.accuracy(&validation_rows),
        test_accuracy: model.accuracy(&test_rows),
        depth: model.depth(),
    };

    tracing::info!(
        "Trained decision tree: {} labels, depth {}, split {}/{}/{} (seed {})",
        report.labels,
        report.depth,
        report.train_size,
        report.validation_size,
        report.test_size,
        seed
    );
    tracing::info!(
        "Validation accuracy: {}",
        format_accuracy(report.validation_accuracy)
    );
    tracing::info!("Test accuracy: {}", format_accuracy(report.test_accuracy));

    Ok((model, report))
}

fn select<'t>(table: &'t PatternTable, indices: &[usize]) -> Vec<&'t PatternRow> {
    indices.iter().map(|&i| &table.rows()[i]).collect()
}

/// Render an accuracy for logs and the dashboard.
#[must_use]
pub fn format_accuracy(accuracy: Option<f64>) -> String {
    match accuracy {
        Some(a) => format!("{a:.2}"),
        None => "n/a".to_string(),
    }
}

impl DecisionTreeClassifier {
    /// Fit a tree on the given rows.
    ///
    /// # Errors
    /// Returns `Training` if `rows` is empty or a row is narrower than
    /// `n_features`.
    pub fn fit(rows: &[&PatternRow], n_features: usize, params: &TreeParams) -> Result<Self, AyurdxError> {
        if rows.is_empty() {
            return Err(AyurdxError::Training(
                "training partition is empty".to_string(),
            ));
        }
        if let Some(bad) = rows.iter().find(|r| r.features.len() < n_features) {
            return Err(AyurdxError::Training(format!(
                "row {} has {} features, expected {}",
                bad.label,
                bad.features.len(),
                n_features
            )));
        }

        let labels: Vec<String> = rows
            .iter()
            .map(|r| r.label.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let targets: Vec<usize> = rows
            .iter()
            .map(|r| labels.binary_search(&r.label).unwrap_or(0))
            .collect();

        let mut builder = TreeBuilder {
            rows,
            targets: &targets,
            n_classes: labels.len(),
            n_features,
            params,
            nodes: Vec::new(),
        };
        let indices: Vec<usize> = (0..rows.len()).collect();
        builder.build(&indices, 0);
        let nodes = builder.nodes;

        Ok(Self {
            labels,
            nodes,
            n_features,
        })
    }

    /// Fraction of `rows` whose label is predicted exactly.
    ///
    /// # Returns
    /// `None` for an empty slice.
    #[must_use]
    pub fn accuracy(&self, rows: &[&PatternRow]) -> Option<f64> {
        if rows.is_empty() {
            return None;
        }
        let correct = rows
            .iter()
            .filter(|r| self.predict_label(&r.features).as_deref() == Some(r.label.as_str()))
            .count();
        Some(correct as f64 / rows.len() as f64)
    }

    /// Number of feature columns the tree was trained on.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Depth of the deepest leaf (0 for a single leaf).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth_from(0)
    }

    fn depth_from(&self, idx: usize) -> usize {
        match &self.nodes[idx] {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Split { left, right, .. } => 1 + self.depth_from(*left).max(self.depth_from(*right)),
        }
    }

    /// Training sample count of every leaf.
    #[cfg(test)]
    fn leaf_sizes(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .filter_map(|n| match n {
                TreeNode::Leaf { counts } => Some(counts.iter().sum()),
                TreeNode::Split { .. } => None,
            })
            .collect()
    }

    fn leaf_for(&self, features: &[u8]) -> &[usize] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { counts } => return counts,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = f64::from(features.get(*feature).copied().unwrap_or(0));
                    idx = if value <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

impl SymptomClassifier for DecisionTreeClassifier {
    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn predict_probabilities(&self, features: &[u8]) -> ClassProbabilities {
        let counts = self.leaf_for(features);
        let total: usize = counts.iter().sum();
        let entries = self
            .labels
            .iter()
            .zip(counts)
            .map(|(label, &c)| {
                let p = if total == 0 { 0.0 } else { c as f64 / total as f64 };
                (label.clone(), p)
            })
            .collect();
        ClassProbabilities::new(entries)
    }
}

/// Recursive tree construction over sample indices.
struct TreeBuilder<'a> {
    rows: &'a [&'a PatternRow],
    targets: &'a [usize],
    n_classes: usize,
    n_features: usize,
    params: &'a TreeParams,
    nodes: Vec<TreeNode>,
}

impl TreeBuilder<'_> {
    /// Build the subtree for `indices`, returning its arena index.
    fn build(&mut self, indices: &[usize], depth: usize) -> usize {
        let counts = self.class_counts(indices);
        let pure = counts.iter().filter(|&&c| c > 0).count() <= 1;

        if depth >= self.params.max_depth || indices.len() < self.params.min_samples_split || pure {
            return self.push_leaf(counts);
        }

        let Some((feature, threshold)) = self.best_split(indices, &counts) else {
            return self.push_leaf(counts);
        };

        let (left_idx, right_idx) = self.partition(indices, feature, threshold);

        // Reserve the slot so the split precedes its children.
        let node_idx = self.nodes.len();
        self.nodes.push(TreeNode::Leaf { counts: Vec::new() });

        let left = self.build(&left_idx, depth + 1);
        let right = self.build(&right_idx, depth + 1);
        self.nodes[node_idx] = TreeNode::Split {
            feature,
            threshold,
            left,
            right,
        };
        node_idx
    }

    fn push_leaf(&mut self, counts: Vec<usize>) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(TreeNode::Leaf { counts });
        idx
    }

    fn value(&self, sample: usize, feature: usize) -> f64 {
        f64::from(self.rows[sample].features[feature])
    }

    fn class_counts(&self, indices: &[usize]) -> Vec<usize> {
        let mut counts = vec![0usize; self.n_classes];
        for &i in indices {
            counts[self.targets[i]] += 1;
        }
        counts
    }

    /// Best (feature, threshold) by Gini gain, honoring `min_samples_leaf`.
    ///
    /// The first strictly better candidate wins, scanning features in order.
    fn best_split(&self, indices: &[usize], counts: &[usize]) -> Option<(usize, f64)> {
        let n = indices.len() as f64;
        let parent = gini(counts);
        let mut best: Option<(usize, f64, f64)> = None;

        for feature in 0..self.n_features {
            let mut values: Vec<f64> = indices.iter().map(|&i| self.value(i, feature)).collect();
            values.sort_by(f64::total_cmp);
            values.dedup();

            for w in values.windows(2) {
                let threshold = (w[0] + w[1]) / 2.0;
                let (left, right) = self.partition(indices, feature, threshold);
                if left.len() < self.params.min_samples_leaf || right.len() < self.params.min_samples_leaf {
                    continue;
                }

                let weighted = (left.len() as f64 * gini(&self.class_counts(&left))
                    + right.len() as f64 * gini(&self.class_counts(&right)))
                    / n;
                let gain = parent - weighted;

                if gain > best.map_or(0.0, |(_, _, g)| g) {
                    best = Some((feature, threshold, gain));
                }
            }
        }

        best.map(|(feature, threshold, _)| (feature, threshold))
    }

    fn partition(&self, indices: &[usize], feature: usize, threshold: f64) -> (Vec<usize>, Vec<usize>) {
        indices
            .iter()
            .copied()
            .partition(|&i| self.value(i, feature) <= threshold)
    }
}

/// Gini impurity of a class histogram.
fn gini(counts: &[usize]) -> f64 {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let n = total as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / n;
            p * p
        })
        .sum::<f64>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SymptomVocabulary;
    use crate::test_support::sample_records;

    fn row(features: &[u8], label: &str) -> PatternRow {
        PatternRow {
            features: features.to_vec(),
            label: label.to_string(),
        }
    }

    #[test]
    fn test_separable_rows() {
        let rows = vec![
            row(&[1, 0], "A"),
            row(&[1, 1], "A"),
            row(&[1, 0], "A"),
            row(&[0, 1], "B"),
            row(&[0, 0], "B"),
            row(&[0, 1], "B"),
        ];
        let refs: Vec<&PatternRow> = rows.iter().collect();
        let tree = DecisionTreeClassifier::fit(&refs, 2, &TreeParams::default()).expect("Should fit");

        assert_eq!(tree.labels(), &["A".to_string(), "B".to_string()]);
        assert_eq!(tree.predict_label(&[1, 0]).as_deref(), Some("A"));
        assert_eq!(tree.predict_label(&[0, 0]).as_deref(), Some("B"));
        assert_eq!(tree.accuracy(&refs), Some(1.0));
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    fn test_capacity_limits() {
        // Every 4-bit pattern with its own label: an unbounded tree would
        // memorize all sixteen.
        let rows: Vec<PatternRow> = (0u8..16)
            .map(|m| row(&[m & 1, (m >> 1) & 1, (m >> 2) & 1, (m >> 3) & 1], &format!("L{m:02}")))
            .collect();
        let refs: Vec<&PatternRow> = rows.iter().collect();
        let tree = DecisionTreeClassifier::fit(&refs, 4, &TreeParams::default()).expect("Should fit");

        assert!(tree.depth() <= 3);
        let sizes = tree.leaf_sizes();
        assert!(sizes.iter().all(|&s| s >= 2), "leaf sizes {sizes:?}");
        assert_eq!(sizes.iter().sum::<usize>(), 16);
    }

    #[test]
    fn test_small_node_is_not_split() {
        let rows = vec![row(&[1], "A"), row(&[0], "B"), row(&[1], "A")];
        let refs: Vec<&PatternRow> = rows.iter().collect();
        let tree = DecisionTreeClassifier::fit(&refs, 1, &TreeParams::default()).expect("Should fit");

        assert_eq!(tree.depth(), 0);
        let probs = tree.predict_probabilities(&[0]);
        assert!((probs.get("A") - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(tree.predict_label(&[0]).as_deref(), Some("A"));
    }

    #[test]
    fn test_probabilities_are_distribution() {
        let vocab = SymptomVocabulary::standard();
        let table = PatternTable::derive(&sample_records(), &vocab).expect("Should derive");
        let (tree, _) = train(&table, DEFAULT_SEED, &TreeParams::default()).expect("Should train");

        for row in table.rows() {
            let probs = tree.predict_probabilities(&row.features);
            assert_eq!(probs.len(), tree.labels().len());
            assert!((probs.total() - 1.0).abs() < 1e-9);
            assert!(probs.iter().all(|(_, p)| (0.0..=1.0).contains(&p)));
        }
        let labels: Vec<&str> = tree.labels().iter().map(String::as_str).collect();
        let mut sorted = labels.clone();
        sorted.sort_unstable();
        assert_eq!(labels, sorted);
    }

    #[test]
    fn test_training_is_reproducible() {
        let vocab = SymptomVocabulary::standard();
        let table = PatternTable::derive(&sample_records(), &vocab).expect("Should derive");
        let (a, report_a) = train(&table, 7, &TreeParams::default()).expect("Should train");
        let (b, report_b) = train(&table, 7, &TreeParams::default()).expect("Should train");

        assert_eq!(report_a, report_b);
        assert_eq!(a.labels(), b.labels());
        for row in table.rows() {
            assert_eq!(a.predict_probabilities(&row.features), b.predict_probabilities(&row.features));
            assert_eq!(a.predict_label(&row.features), b.predict_label(&row.features));
        }
    }

    #[test]
    fn test_report_partition_sizes() {
        let vocab = SymptomVocabulary::standard();
        let table = PatternTable::derive(&sample_records(), &vocab).expect("Should derive");
        let (_, report) = train(&table, DEFAULT_SEED, &TreeParams::default()).expect("Should train");

        assert_eq!(report.train_size + report.validation_size + report.test_size, table.len());
        assert_eq!(report.test_size, 3);
        assert_eq!(report.labels, report.train_size);
        assert!(report.validation_accuracy.is_some());
    }

    #[test]
    fn test_unseen_label_has_zero_probability() {
        let rows = vec![row(&[1], "A"), row(&[0], "B")];
        let refs: Vec<&PatternRow> = rows.iter().collect();
        let tree = DecisionTreeClassifier::fit(&refs, 1, &TreeParams::default()).expect("Should fit");
        assert_eq!(tree.predict_probabilities(&[1]).get("Z"), 0.0);
    }

    #[test]
    fn test_empty_training_set() {
        let refs: Vec<&PatternRow> = Vec::new();
        assert!(DecisionTreeClassifier::fit(&refs, 1, &TreeParams::default()).is_err());

        let vocab = SymptomVocabulary::new(["a"]).expect("Should build");
        let table = PatternTable::from_rows(vocab, vec![row(&[1], "A")]).expect("Should build");
        assert!(matches!(
            train(&table, DEFAULT_SEED, &TreeParams::default()),
            Err(AyurdxError::Training(_))
        ));
    }

    #[test]
    fn test_gini() {
        assert!(gini(&[3, 0]).abs() < 1e-12);
        assert!((gini(&[2, 2]) - 0.5).abs() < 1e-12);
        assert_eq!(gini(&[]), 0.0);
    }

    #[test]
    fn test_format_accuracy() {
        assert_eq!(format_accuracy(Some(0.5)), "0.50");
        assert_eq!(format_accuracy(None), "n/a");
    }
}
