use std::fmt::Write as _;

use anyhow::Result;
use bon::Builder;
use futures::stream::{self, StreamExt};
use kdam::{BarExt, tqdm};
use tracing::{debug, warn};

use crate::data::example::CountExample;
use crate::evaluate::metric::CountMetric;
use crate::predict::Predictor;
use crate::utils::truncate;

const TABLE_NOTE_CHARS: usize = 60;

/// Outcome for one example, keyed back to its position in the input dataset.
#[derive(Debug, Clone)]
pub struct ScoreRecord {
    pub index: usize,
    pub expected: u32,
    /// `None` when the predictor call failed.
    pub predicted: Option<u32>,
    pub score: f32,
    pub feedback: Option<String>,
    pub error: Option<String>,
}

impl ScoreRecord {
    pub fn is_correct(&self) -> bool {
        self.score > 0.5
    }
}

/// Aggregate of one evaluation run. `records` is in dataset order regardless
/// of the completion order under concurrency.
#[derive(Debug, Default)]
pub struct EvaluationReport {
    pub records: Vec<ScoreRecord>,
}

impl EvaluationReport {
    pub fn total(&self) -> usize {
        self.records.len()
    }

    pub fn correct(&self) -> usize {
        self.records.iter().filter(|r| r.is_correct()).count()
    }

    /// Predictor calls that failed; these are scored as incorrect.
    pub fn failures(&self) -> usize {
        self.records.iter().filter(|r| r.error.is_some()).count()
    }

    pub fn accuracy(&self) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        self.correct() as f64 / self.total() as f64
    }

    /// Renders at most `limit` records as a plain-text table for inspection.
    /// Error notes are truncated so one noisy provider message cannot blow
    /// up the table.
    pub fn table(&self, limit: usize) -> String {
        let mut out = String::from("idx  expected  predicted  ok  note\n");
        for record in self.records.iter().take(limit) {
            let predicted = record
                .predicted
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".to_string());
            let note = truncate(record.error.as_deref().unwrap_or(""), TABLE_NOTE_CHARS);
            let _ = writeln!(
                out,
                "{:<4} {:<9} {:<10} {:<3} {}",
                record.index,
                record.expected,
                predicted,
                if record.is_correct() { "y" } else { "n" },
                note,
            );
        }
        out
    }
}

/// Runs a predictor over a dataset and scores every example.
///
/// Predictor calls are issued with at most `concurrency` in flight. Each
/// completion is re-keyed to its originating example index before aggregation,
/// so the reported accuracy is identical across concurrency levels for a
/// deterministic predictor; only progress output order varies. A failed
/// predictor call is recorded as incorrect (with the error captured in the
/// record) and evaluation continues — a metric failure, by contrast, is a bug
/// and aborts the run.
#[derive(Builder, Debug)]
pub struct Evaluator {
    /// Maximum predictor calls in flight. Clamped to at least 1.
    #[builder(default = 1)]
    pub concurrency: usize,

    #[builder(default = true)]
    pub show_progress: bool,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Evaluator {
    pub async fn evaluate<P, M>(
        &self,
        predictor: &P,
        examples: &[CountExample],
        metric: &M,
    ) -> Result<EvaluationReport>
    where
        P: Predictor,
        M: CountMetric,
    {
        let concurrency = self.concurrency.max(1);
        let mut bar = self
            .show_progress
            .then(|| tqdm!(total = examples.len(), desc = "evaluating"));

        let completed: Vec<Result<(usize, ScoreRecord)>> =
            stream::iter(examples.iter().enumerate())
                .map(|(index, example)| async move {
                    let record = score_example(predictor, metric, index, example).await?;
                    Ok((index, record))
                })
                .buffer_unordered(concurrency)
                .inspect(|_| {
                    if let Some(bar) = bar.as_mut() {
                        let _ = bar.update(1);
                    }
                })
                .collect()
                .await;

        let mut keyed = Vec::with_capacity(completed.len());
        for result in completed {
            keyed.push(result?);
        }
        keyed.sort_by_key(|(index, _)| *index);

        let report = EvaluationReport {
            records: keyed.into_iter().map(|(_, record)| record).collect(),
        };
        debug!(
            total = report.total(),
            correct = report.correct(),
            failures = report.failures(),
            accuracy = report.accuracy(),
            "evaluation finished"
        );
        Ok(report)
    }
}

async fn score_example<P, M>(
    predictor: &P,
    metric: &M,
    index: usize,
    example: &CountExample,
) -> Result<ScoreRecord>
where
    P: Predictor,
    M: CountMetric,
{
    match predictor.predict(&example.image).await {
        Ok(prediction) => {
            let outcome = metric.evaluate(example, &prediction).await?;
            Ok(ScoreRecord {
                index,
                expected: example.number_of_people,
                predicted: Some(prediction.number_of_people),
                score: outcome.score,
                feedback: outcome.feedback.map(|f| f.feedback),
                error: None,
            })
        }
        Err(err) => {
            warn!(index, error = %err, "predictor call failed; scoring as incorrect");
            Ok(ScoreRecord {
                index,
                expected: example.number_of_people,
                predicted: None,
                score: 0.0,
                feedback: None,
                error: Some(err.to_string()),
            })
        }
    }
}
