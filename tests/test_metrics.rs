use headcount::{
    COUNT_CEILING, CountExactMatch, CountExactMatchWithFeedback, CountExample, CountMetric,
    CountPrediction, ImagePayload, MetricOutcome, average_score,
};
use rstest::rstest;

fn example(label: u32) -> CountExample {
    CountExample::new(
        ImagePayload::new(vec![label as u8], 1, 1, "image/png"),
        label,
    )
}

#[rstest]
#[case(0, 0, true)]
#[case(10, 10, true)]
#[case(11, 11, true)]
#[case(3, 4, false)]
#[case(10, 9, false)]
#[case(0, 1, false)]
#[tokio::test]
async fn test_exact_match_scores_equality_only(
    #[case] label: u32,
    #[case] predicted: u32,
    #[case] expected_correct: bool,
) {
    let outcome = CountExactMatch
        .evaluate(&example(label), &CountPrediction::new(predicted))
        .await
        .unwrap();

    assert_eq!(outcome.is_correct(), expected_correct);
    assert_eq!(outcome.score, if expected_correct { 1.0 } else { 0.0 });
    assert!(outcome.feedback.is_none());
}

#[tokio::test]
async fn test_exact_match_ignores_reasoning() {
    let prediction = CountPrediction::with_reasoning(4, "I counted three heads");
    let outcome = CountExactMatch
        .evaluate(&example(4), &prediction)
        .await
        .unwrap();
    assert!(outcome.is_correct());
    assert!(outcome.feedback.is_none());
}

#[rstest]
#[case(9, false)]
#[case(10, true)]
#[case(11, true)]
#[case(100, true)]
#[tokio::test]
async fn test_clamp_hint_triggers_at_ceiling(#[case] predicted: u32, #[case] hint_expected: bool) {
    assert_eq!(COUNT_CEILING, 10);

    let outcome = CountExactMatchWithFeedback
        .evaluate(&example(5), &CountPrediction::new(predicted))
        .await
        .unwrap();

    let feedback = outcome.feedback.expect("feedback metric always set");
    assert_eq!(feedback.feedback.contains("10 or more"), hint_expected);
}

#[tokio::test]
async fn test_feedback_reports_truth_prediction_and_reasoning() {
    let prediction = CountPrediction::with_reasoning(4, "I see four faces near the fountain");
    let outcome = CountExactMatchWithFeedback
        .evaluate(&example(7), &prediction)
        .await
        .unwrap();

    assert!(!outcome.is_correct());
    let feedback = outcome.feedback.unwrap().feedback;
    assert!(feedback.contains("Correct answer is 7"));
    assert!(feedback.contains("Your answer is 4"));
    assert!(feedback.contains("I see four faces near the fountain"));
    assert!(feedback.contains("incorrect"));
    assert!(feedback.contains("reached the correct answer"));
}

#[tokio::test]
async fn test_feedback_omits_reasoning_when_absent() {
    let outcome = CountExactMatchWithFeedback
        .evaluate(&example(2), &CountPrediction::new(2))
        .await
        .unwrap();

    assert!(outcome.is_correct());
    let feedback = outcome.feedback.unwrap().feedback;
    assert!(!feedback.contains("reasoning"));
    assert!(feedback.contains("correct!"));
    assert!(!feedback.contains("10 or more"));
}

#[tokio::test]
async fn test_feedback_score_matches_outcome_score() {
    let outcome = CountExactMatchWithFeedback
        .evaluate(&example(10), &CountPrediction::new(10))
        .await
        .unwrap();

    assert_eq!(outcome.score, 1.0);
    assert_eq!(outcome.feedback.unwrap().score, 1.0);
}

#[test]
fn test_average_score() {
    assert_eq!(average_score(&[]), 0.0);

    let outcomes = vec![
        MetricOutcome::score(1.0),
        MetricOutcome::score(0.0),
        MetricOutcome::score(1.0),
    ];
    let avg = average_score(&outcomes);
    assert!((avg - 2.0 / 3.0).abs() < 1e-6);
}
