//! Metric specifiers (`ndcg@10`, `mrr`, `recall@50`) and the supported metric set.

use crate::error::{format_err, Result};
use crate::eval::metrics::{mrr_at_k, ndcg_at_k, recall_at_k};
use crate::eval::predictions::Candidate;
use crate::eval::qrels::Judgments;
use std::fmt;

/// Cutoff used when a specifier has no `@k` suffix.
pub const DEFAULT_CUTOFF: usize = 10;

/// Metrics reported when none are requested.
pub const DEFAULT_METRICS: &[&str] = &["ndcg@10", "mrr@10", "recall@50"];

/// A parsed `name@k` specifier.
///
/// Only the syntax is checked here; whether `name` is a metric we know is
/// decided by [`Metric::from_name`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSpec {
    /// Lower-cased metric name
    pub name: String,
    pub k: usize,
}

impl MetricSpec {
    pub fn parse(spec: &str) -> Result<Self> {
        let (name, k) = match spec.split_once('@') {
            Some((name, cutoff)) => {
                if cutoff.is_empty() {
                    return Err(format_err(format!("Invalid metric specifier: {}", spec)));
                }
                let k = cutoff
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| format_err(format!("Invalid cutoff in metric: {}", spec)))?;
                if k == 0 {
                    return Err(format_err(format!(
                        "Invalid cutoff in metric: {} (cutoff must be positive)",
                        spec
                    )));
                }
                (name, k)
            }
            None => (spec, DEFAULT_CUTOFF),
        };
        Ok(Self {
            name: name.to_lowercase(),
            k,
        })
    }

    /// Report label, e.g. `ndcg@10`.
    pub fn label(&self) -> String {
        format!("{}@{}", self.name, self.k)
    }
}

impl fmt::Display for MetricSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.k)
    }
}

/// Supported ranking metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Ndcg,
    Mrr,
    Recall,
}

impl Metric {
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "ndcg" => Ok(Metric::Ndcg),
            "mrr" => Ok(Metric::Mrr),
            "recall" => Ok(Metric::Recall),
            other => Err(format_err(format!("Unsupported metric: {}", other))),
        }
    }

    /// Score one query's ranked list against its judgments at cutoff `k`.
    pub fn compute(&self, ranked: &[Candidate], judgments: &Judgments, k: usize) -> f64 {
        match self {
            Metric::Ndcg => ndcg_at_k(ranked, judgments, k),
            Metric::Mrr => mrr_at_k(ranked, judgments, k),
            Metric::Recall => recall_at_k(ranked, judgments, k),
        }
    }
}
