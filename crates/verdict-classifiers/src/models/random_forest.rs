//! Bagged decision-tree ensemble built on linfa-trees.
//!
//! Each tree is grown on a bootstrap resample of the training rows and a
//! random subset of the feature columns, the two standard diversity sources
//! of a random forest. The ensemble label is the majority vote and the
//! reported probability is the malignant vote fraction. Trees fit in
//! parallel; every tree derives its own RNG from the configured seed, so
//! results do not depend on thread scheduling.

use linfa::traits::{Fit, Predict};
use linfa::Dataset;
use linfa_trees::{DecisionTree, SplitQuality};
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::config::RandomForestParams;
use crate::data_handling::Diagnosis;
use crate::error::PipelineError;
use crate::models::classifier_trait::{check_fit_shapes, not_fitted, Classifier};

const MODEL_NAME: &str = "random-forest";

struct BaggedTree {
    tree: DecisionTree<f32, usize>,
    /// Column indices this tree was grown on, sorted ascending.
    features: Vec<usize>,
}

pub struct RandomForestClassifier {
    params: RandomForestParams,
    trees: Option<Vec<BaggedTree>>,
}

impl RandomForestClassifier {
    pub fn new(params: RandomForestParams) -> Self {
        RandomForestClassifier { params, trees: None }
    }

    /// Features drawn per tree: the configured count, defaulting to
    /// ceil(sqrt(d)), never more than d and never less than one.
    fn features_per_tree(&self, n_features: usize) -> usize {
        self.params
            .max_features
            .unwrap_or_else(|| (n_features as f64).sqrt().ceil() as usize)
            .clamp(1, n_features)
    }

    fn fit_one_tree(
        &self,
        x: &Array2<f32>,
        y: &[usize],
        tree_idx: usize,
        n_subset: usize,
    ) -> Result<BaggedTree, String> {
        let mut rng = StdRng::seed_from_u64(self.params.seed.wrapping_add(tree_idx as u64));
        let n_rows = x.nrows();

        let rows: Vec<usize> = (0..n_rows).map(|_| rng.gen_range(0..n_rows)).collect();
        let mut features = rand::seq::index::sample(&mut rng, x.ncols(), n_subset).into_vec();
        features.sort_unstable();

        let sub_x = x.select(Axis(0), &rows).select(Axis(1), &features);
        let sub_y: Array1<usize> = rows.iter().map(|&r| y[r]).collect();
        let dataset = Dataset::new(sub_x, sub_y);

        let tree = DecisionTree::<f32, usize>::params()
            .split_quality(SplitQuality::Gini)
            .max_depth(self.params.max_depth)
            .fit(&dataset)
            .map_err(|e| format!("tree {} failed to fit: {}", tree_idx, e))?;

        Ok(BaggedTree { tree, features })
    }

    fn model_failure(&self, cause: impl ToString) -> PipelineError {
        PipelineError::ModelFailure { model: MODEL_NAME.to_string(), cause: cause.to_string() }
    }
}

impl Classifier for RandomForestClassifier {
    fn fit(&mut self, x: &Array2<f32>, y: &[Diagnosis]) -> Result<(), PipelineError> {
        check_fit_shapes(MODEL_NAME, x, y)?;
        if self.params.n_trees == 0 {
            return Err(self.model_failure("n_trees must be positive"));
        }

        let labels: Vec<usize> = y.iter().map(|d| d.index()).collect();
        let n_subset = self.features_per_tree(x.ncols());

        log::info!(
            "training {} with {} trees on {} records ({} of {} features per tree)",
            MODEL_NAME,
            self.params.n_trees,
            x.nrows(),
            n_subset,
            x.ncols()
        );

        let trees: Vec<BaggedTree> = (0..self.params.n_trees)
            .into_par_iter()
            .map(|tree_idx| self.fit_one_tree(x, &labels, tree_idx, n_subset))
            .collect::<Result<_, _>>()
            .map_err(|cause| self.model_failure(cause))?;

        self.trees = Some(trees);
        Ok(())
    }

    fn predict_proba(&self, x: &Array2<f32>) -> Result<Vec<f32>, PipelineError> {
        let trees = self.trees.as_ref().ok_or_else(|| not_fitted(MODEL_NAME))?;
        if x.nrows() == 0 {
            return Ok(Vec::new());
        }

        let mut votes = vec![0usize; x.nrows()];
        for bagged in trees {
            let sub = x.select(Axis(1), &bagged.features);
            let predicted = bagged.tree.predict(&sub);
            for (row, &label) in predicted.iter().enumerate() {
                if label == Diagnosis::Malignant.index() {
                    votes[row] += 1;
                }
            }
        }

        let n_trees = trees.len() as f32;
        Ok(votes.into_iter().map(|v| v as f32 / n_trees).collect())
    }

    fn name(&self) -> &'static str {
        MODEL_NAME
    }
}
