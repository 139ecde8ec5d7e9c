use std::path::PathBuf;

use bon::Builder;
use tracing::info;

use crate::data::split::DatasetSplit;
use crate::evaluate::metric::CountMetric;
use crate::optimizer::spec::{PredictorSpec, SpecPersistError};
use crate::optimizer::{Optimizer, SearchBudget, SearchParams};

#[derive(Debug, thiserror::Error)]
pub enum OptimizeError {
    #[error("training split is empty; optimization cannot proceed")]
    EmptyTrainSet,

    #[error("validation split is empty; optimization cannot proceed")]
    EmptyValSet,

    /// The external search procedure failed. Search runs are expensive, so
    /// the driver never retries on its own.
    #[error("search procedure failed: {0}")]
    Search(String),

    #[error(transparent)]
    Persist(#[from] SpecPersistError),
}

/// Configures and invokes an external [`Optimizer`], then persists the result.
///
/// The driver's whole job is preflight validation (non-empty splits), wiring
/// the feedback metric and budget through to the optimizer, and writing the
/// returned spec to `output_path` — atomically, and only after the optimizer
/// returns successfully. An optimizer failure leaves nothing on disk.
#[derive(Builder, Debug)]
pub struct OptimizationDriver {
    #[builder(default = 1)]
    pub num_threads: usize,

    #[builder(default)]
    pub search_budget: SearchBudget,

    #[builder(default = 3)]
    pub reflection_minibatch_size: usize,

    pub reflection_model: Option<String>,

    #[builder(into)]
    pub output_path: PathBuf,
}

impl OptimizationDriver {
    pub async fn optimize<O, M>(
        &self,
        optimizer: &O,
        spec: &PredictorSpec,
        split: &DatasetSplit,
        metric: &M,
    ) -> Result<PredictorSpec, OptimizeError>
    where
        O: Optimizer,
        M: CountMetric,
    {
        if split.train.is_empty() {
            return Err(OptimizeError::EmptyTrainSet);
        }
        if split.dev.is_empty() {
            return Err(OptimizeError::EmptyValSet);
        }

        let params = SearchParams {
            num_threads: self.num_threads,
            budget: self.search_budget,
            reflection_minibatch_size: self.reflection_minibatch_size,
            reflection_model: self.reflection_model.clone(),
        };

        info!(
            train = split.train.len(),
            val = split.dev.len(),
            budget = ?params.budget,
            "starting optimization"
        );

        let optimized = optimizer
            .compile(spec, &split.train, &split.dev, metric, &params)
            .await
            .map_err(|err| OptimizeError::Search(format!("{err:#}")))?;

        optimized.save(&self.output_path)?;
        info!(path = %self.output_path.display(), "optimized predictor saved");
        Ok(optimized)
    }
}
