use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::data::example::CountExample;
use crate::evaluate::feedback::FeedbackMetric;
use crate::predict::CountPrediction;

/// Result of scoring one `(example, prediction)` pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricOutcome {
    /// 1.0 for a correct prediction, 0.0 otherwise.
    pub score: f32,

    /// Textual feedback, present only for feedback-capable metrics.
    pub feedback: Option<FeedbackMetric>,
}

impl MetricOutcome {
    pub fn score(score: f32) -> Self {
        Self {
            score,
            feedback: None,
        }
    }

    pub fn with_feedback(score: f32, feedback: FeedbackMetric) -> Self {
        Self {
            score,
            feedback: Some(feedback),
        }
    }

    pub fn is_correct(&self) -> bool {
        self.score > 0.5
    }
}

/// Mean score across outcomes; 0.0 for an empty slice.
pub fn average_score(outcomes: &[MetricOutcome]) -> f32 {
    if outcomes.is_empty() {
        return 0.0;
    }
    outcomes.iter().map(|o| o.score).sum::<f32>() / outcomes.len() as f32
}

/// Compares a prediction against an example's ground truth.
#[allow(async_fn_in_trait)]
pub trait CountMetric {
    async fn evaluate(
        &self,
        example: &CountExample,
        prediction: &CountPrediction,
    ) -> Result<MetricOutcome>;
}

/// Exact integer match on the count. No tolerance band, no partial credit,
/// and the reasoning text is never consulted.
pub struct CountExactMatch;

impl CountMetric for CountExactMatch {
    async fn evaluate(
        &self,
        example: &CountExample,
        prediction: &CountPrediction,
    ) -> Result<MetricOutcome> {
        let score = (example.number_of_people == prediction.number_of_people) as u8 as f32;
        Ok(MetricOutcome::score(score))
    }
}
