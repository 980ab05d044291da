//! Evaluation engine: qrels and predictions loaders, metric specifiers,
//! NDCG@K / MRR@K / Recall@K, the evaluator, and the submission checker.

pub mod evaluator;
pub mod metric;
pub mod metrics;
pub mod predictions;
pub mod qrels;
pub mod report;
pub mod verify;

pub use evaluator::evaluate;
pub use metric::{Metric, MetricSpec, DEFAULT_CUTOFF, DEFAULT_METRICS};
pub use metrics::{dcg_at_k, ideal_dcg_at_k, mrr_at_k, ndcg_at_k, recall_at_k};
pub use predictions::{Candidate, Predictions, RankedList};
pub use qrels::{Judgments, Qrels, QrelsEntry, MAX_RELEVANCE};
pub use report::MetricsReport;
pub use verify::{verify_predictions, verify_reader};
