pub mod driver;
pub mod spec;

pub use driver::*;
pub use spec::*;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::data::example::CountExample;
use crate::evaluate::metric::CountMetric;

/// How much compute the external search procedure may spend per run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchBudget {
    #[default]
    Light,
    Medium,
    Heavy,
}

/// Knobs forwarded verbatim to the external optimizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchParams {
    pub num_threads: usize,
    pub budget: SearchBudget,
    /// Examples per reflection step; lower this when feedback overruns the
    /// reflection model's context.
    pub reflection_minibatch_size: usize,
    /// Handle of the model used for reflection, when the optimizer uses one.
    pub reflection_model: Option<String>,
}

/// The external search procedure that revises a predictor's instructions.
///
/// Implementations own the search strategy entirely; the harness supplies the
/// splits, a feedback-capable metric, and the budget, and takes back an
/// improved [`PredictorSpec`]. Alternative strategies can be swapped in
/// without touching the evaluation code.
#[allow(async_fn_in_trait)]
pub trait Optimizer {
    async fn compile<M>(
        &self,
        spec: &PredictorSpec,
        trainset: &[CountExample],
        valset: &[CountExample],
        metric: &M,
        params: &SearchParams,
    ) -> Result<PredictorSpec>
    where
        M: CountMetric;
}
