use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::data::example::CountExample;
use crate::evaluate::metric::{CountMetric, MetricOutcome};
use crate::predict::CountPrediction;

/// The dataset's label space tops out here: any crowd of this size or larger
/// is labeled exactly [`COUNT_CEILING`], and the feedback text tells the
/// predictor so whenever it guesses at or above it.
pub const COUNT_CEILING: u32 = 10;

/// A score paired with a textual explanation of why the score is what it is.
///
/// The feedback string is consumed by an external instruction-search
/// optimizer, so it should tell the predictor how to do better — not just
/// restate the score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedbackMetric {
    pub score: f32,
    pub feedback: String,
}

impl FeedbackMetric {
    pub fn new(score: f32, feedback: impl Into<String>) -> Self {
        Self {
            score,
            feedback: feedback.into(),
        }
    }
}

/// Exact-match metric that also explains each outcome.
///
/// The feedback always contains the ground truth, the predicted count, the
/// predictor's reasoning verbatim (when supplied), and a correctness
/// statement. When the prediction is at or above [`COUNT_CEILING`] it
/// additionally instructs the predictor to report exactly 10 for any such
/// crowd.
pub struct CountExactMatchWithFeedback;

impl CountMetric for CountExactMatchWithFeedback {
    async fn evaluate(
        &self,
        example: &CountExample,
        prediction: &CountPrediction,
    ) -> Result<MetricOutcome> {
        let correct = example.number_of_people == prediction.number_of_people;

        let mut feedback = format!(
            "Correct answer is {}. Your answer is {}.",
            example.number_of_people, prediction.number_of_people
        );
        if let Some(reasoning) = &prediction.reasoning {
            feedback.push_str(&format!(" Your reasoning is: {reasoning}."));
        }
        if correct {
            feedback.push_str(" Your answer is correct!");
        } else {
            feedback.push_str(
                " Your answer is incorrect. Think about how you could have reached the correct answer.",
            );
        }
        if prediction.number_of_people >= COUNT_CEILING {
            feedback.push_str(
                " If the number of people in the image is 10 or more, answer exactly 10.",
            );
        }

        let score = correct as u8 as f32;
        Ok(MetricOutcome::with_feedback(
            score,
            FeedbackMetric::new(score, feedback),
        ))
    }
}
