//! Scoring a predictor over a dataset.
//!
//! Two kinds of metrics:
//! - **Score-only** — return [`MetricOutcome::score`]. Enough for the
//!   [`Evaluator`], which only aggregates correctness.
//! - **Score + feedback** — return [`MetricOutcome::with_feedback`]. Required
//!   by feedback-driven optimizers, which read the textual explanation to
//!   revise the predictor's instructions.

pub mod evaluator;
pub mod feedback;
pub mod metric;

pub use evaluator::*;
pub use feedback::*;
pub use metric::*;
