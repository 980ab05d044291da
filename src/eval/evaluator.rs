//! Averages per-query metrics over every query in the qrels.

use crate::error::{format_err, Result};
use crate::eval::metric::{Metric, MetricSpec};
use crate::eval::predictions::{Predictions, RankedList};
use crate::eval::qrels::Qrels;
use crate::eval::report::MetricsReport;

/// Evaluate `predictions` against `qrels` for each metric specifier in `metrics`.
///
/// The average for each metric runs over all qrels queries. A query with no
/// submitted predictions is scored as an empty ranking, so it pulls the average
/// down instead of dropping out of it. Prediction queries without qrels are ignored.
/// All specifiers are parsed before any is resolved to a metric.
/// A per-query score that is not finite (gains overflowing `f64`) aborts the run.
pub fn evaluate<S: AsRef<str>>(
    predictions: &Predictions,
    qrels: &Qrels,
    metrics: &[S],
) -> Result<MetricsReport> {
    let specs = metrics
        .iter()
        .map(|m| MetricSpec::parse(m.as_ref()))
        .collect::<Result<Vec<_>>>()?;

    log_coverage(predictions, qrels);
    log::info!(
        "Evaluating {} queries on {}",
        qrels.len(),
        specs.iter().map(MetricSpec::label).collect::<Vec<_>>().join(", ")
    );

    let empty = RankedList::default();
    let mut report = MetricsReport::new();
    for spec in &specs {
        let metric = Metric::from_name(&spec.name)?;
        let mut total = 0.0;
        for (query_id, judgments) in qrels.iter() {
            let ranked = predictions.get(query_id).unwrap_or(&empty);
            let value = metric.compute(ranked.as_slice(), judgments, spec.k);
            if !value.is_finite() {
                return Err(format_err(format!(
                    "{} is not finite for query_id={}; relevance grades are too large",
                    spec.label(),
                    query_id
                )));
            }
            total += value;
        }
        let mean = if qrels.is_empty() {
            0.0
        } else {
            total / qrels.len() as f64
        };
        log::debug!("{} = {:.6}", spec.label(), mean);
        report.insert(spec.label(), mean);
    }
    Ok(report)
}

fn log_coverage(predictions: &Predictions, qrels: &Qrels) {
    let missing = qrels
        .iter()
        .filter(|(query_id, _)| !predictions.contains(query_id))
        .count();
    if missing > 0 {
        log::warn!(
            "{} of {} qrels queries have no predictions; they score 0",
            missing,
            qrels.len()
        );
    }
    let unjudged = predictions
        .query_ids()
        .filter(|query_id| !qrels.contains(query_id))
        .count();
    if unjudged > 0 {
        log::warn!(
            "{} predicted queries have no qrels and are ignored",
            unjudged
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RankevalError;
    use crate::eval::predictions::Candidate;
    use crate::eval::qrels::QrelsEntry;

    fn qrels(rows: &[(&str, &str, u32)]) -> Qrels {
        let mut qrels = Qrels::new();
        for (q, d, rel) in rows {
            qrels.insert(QrelsEntry {
                query_id: q.to_string(),
                doc_id: d.to_string(),
                relevance: *rel,
            });
        }
        qrels
    }

    fn predictions(rows: &[(&str, Vec<(&str, f64)>)]) -> Predictions {
        let mut predictions = Predictions::new();
        for (q, cands) in rows {
            let list = RankedList::from_candidates(
                cands.iter().map(|(d, s)| Candidate::new(*d, *s)).collect(),
            );
            predictions.insert(q.to_string(), list).unwrap();
        }
        predictions
    }

    fn assert_close(report: &MetricsReport, label: &str, expected: f64) {
        let value = report.get(label).unwrap_or_else(|| panic!("missing {}", label));
        assert!(
            (value - expected).abs() < 1e-9,
            "{}: expected {}, got {}",
            label,
            expected,
            value
        );
    }

    #[test]
    fn perfect_ranking() {
        let qrels = qrels(&[("q1", "a", 2), ("q1", "b", 0)]);
        let preds = predictions(&[("q1", vec![("a", 0.9), ("b", 0.5)])]);
        let report = evaluate(&preds, &qrels, &["ndcg@10", "mrr@10", "recall@10"]).unwrap();
        assert_close(&report, "ndcg@10", 1.0);
        assert_close(&report, "mrr@10", 1.0);
        assert_close(&report, "recall@10", 1.0);
    }

    #[test]
    fn relevant_doc_ranked_second() {
        let qrels = qrels(&[("q1", "a", 2), ("q1", "b", 0)]);
        let preds = predictions(&[("q1", vec![("b", 0.9), ("a", 0.5)])]);
        let report = evaluate(&preds, &qrels, &["ndcg@10", "mrr@10"]).unwrap();
        assert_close(&report, "mrr@10", 0.5);
        let ndcg = report.get("ndcg@10").unwrap();
        assert!(ndcg > 0.0 && ndcg < 1.0);
    }

    #[test]
    fn missing_predictions_count_in_denominator() {
        let qrels = qrels(&[("q1", "a", 1), ("q2", "b", 1)]);
        let preds = predictions(&[("q1", vec![("a", 1.0)])]);
        let report = evaluate(&preds, &qrels, &["ndcg@10", "mrr@10", "recall@10"]).unwrap();
        assert_close(&report, "ndcg@10", 0.5);
        assert_close(&report, "mrr@10", 0.5);
        assert_close(&report, "recall@10", 0.5);
    }

    #[test]
    fn zero_relevant_query_counts_as_zero() {
        let qrels = qrels(&[("q1", "a", 1), ("q2", "b", 0)]);
        let preds = predictions(&[("q1", vec![("a", 1.0)]), ("q2", vec![("b", 1.0)])]);
        let report = evaluate(&preds, &qrels, &["recall@10", "ndcg@10"]).unwrap();
        assert_close(&report, "recall@10", 0.5);
        assert_close(&report, "ndcg@10", 0.5);
    }

    #[test]
    fn overflowing_gains_abort_instead_of_nan() {
        let qrels = qrels(&[("q1", "a", 1023), ("q1", "b", 1023), ("q1", "c", 1023)]);
        let preds = predictions(&[("q1", vec![("a", 0.9), ("b", 0.8), ("c", 0.7)])]);
        let err = evaluate(&preds, &qrels, &["ndcg@10"]).unwrap_err();
        assert!(matches!(err, RankevalError::Format(_)));
        assert!(err.to_string().contains("ndcg@10 is not finite for query_id=q1"));

        // Recall and MRR never touch the gains
        let report = evaluate(&preds, &qrels, &["mrr@10", "recall@10"]).unwrap();
        assert_close(&report, "mrr@10", 1.0);
        assert_close(&report, "recall@10", 1.0);
    }

    #[test]
    fn unjudged_predictions_are_ignored() {
        let qrels = qrels(&[("q1", "a", 1)]);
        let preds = predictions(&[("q1", vec![("a", 1.0)]), ("q9", vec![("z", 1.0)])]);
        let report = evaluate(&preds, &qrels, &["mrr"]).unwrap();
        assert_close(&report, "mrr@10", 1.0);
    }

    #[test]
    fn empty_qrels_average_to_zero() {
        let preds = predictions(&[("q1", vec![("a", 1.0)])]);
        let report = evaluate(&preds, &Qrels::new(), &["ndcg@10"]).unwrap();
        assert_eq!(report.get("ndcg@10"), Some(0.0));
    }

    #[test]
    fn report_follows_request_order() {
        let qrels = qrels(&[("q1", "a", 1)]);
        let preds = predictions(&[("q1", vec![("a", 1.0)])]);
        let report = evaluate(&preds, &qrels, &["recall@50", "NDCG", "mrr@5"]).unwrap();
        let labels: Vec<&str> = report.iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["recall@50", "ndcg@10", "mrr@5"]);
    }

    #[test]
    fn unsupported_metric_is_rejected() {
        let qrels = qrels(&[("q1", "a", 1)]);
        let err = evaluate(&Predictions::new(), &qrels, &["ndcg@10", "map@10"]).unwrap_err();
        assert!(matches!(err, RankevalError::Format(_)));
        assert!(err.to_string().contains("Unsupported metric: map"));
    }

    #[test]
    fn malformed_specifier_is_rejected_before_evaluation() {
        let qrels = qrels(&[("q1", "a", 1)]);
        let err = evaluate(&Predictions::new(), &qrels, &["map@10", "ndcg@"]).unwrap_err();
        assert!(err.to_string().contains("Invalid metric specifier"));
    }

    #[test]
    fn no_metrics_gives_empty_report() {
        let qrels = qrels(&[("q1", "a", 1)]);
        let metrics: Vec<String> = Vec::new();
        let report = evaluate(&Predictions::new(), &qrels, metrics.as_slice()).unwrap();
        assert!(report.is_empty());
    }
}
