//! Per-query ranking metrics: NDCG@K, MRR@K, Recall@K.
//!
//! All functions take one query's ranked candidates (highest score first), the
//! query's relevance judgments, and a cutoff `k`. Documents without a judgment
//! count as irrelevant. A query with no relevant documents scores 0.0 on every
//! metric.

use crate::eval::predictions::Candidate;
use crate::eval::qrels::Judgments;

/// Exponential gain divided by the log2 position discount, for 1-based `position`.
fn discounted_gain(relevance: u32, position: usize) -> f64 {
    if relevance == 0 {
        return 0.0;
    }
    let gain = 2f64.powf(relevance as f64) - 1.0;
    gain / (position as f64 + 1.0).log2()
}

/// DCG@K of the system ranking.
///
/// DCG@K = Σ (2^rel_i - 1) / log2(i + 1) for i in 1..=K
pub fn dcg_at_k(ranked: &[Candidate], judgments: &Judgments, k: usize) -> f64 {
    ranked
        .iter()
        .take(k)
        .enumerate()
        .map(|(i, cand)| {
            let rel = judgments.get(&cand.doc_id).copied().unwrap_or(0);
            discounted_gain(rel, i + 1)
        })
        .sum()
}

/// DCG@K of the ideal ordering of the judged grades. Independent of the system ranking.
pub fn ideal_dcg_at_k(judgments: &Judgments, k: usize) -> f64 {
    let mut ideal: Vec<u32> = judgments.values().copied().collect();
    ideal.sort_unstable_by(|a, b| b.cmp(a));
    ideal
        .iter()
        .take(k)
        .enumerate()
        .map(|(i, &rel)| discounted_gain(rel, i + 1))
        .sum()
}

/// NDCG@K = DCG@K / IDCG@K, or exactly 0.0 when IDCG@K is 0.
pub fn ndcg_at_k(ranked: &[Candidate], judgments: &Judgments, k: usize) -> f64 {
    let idcg = ideal_dcg_at_k(judgments, k);
    if idcg == 0.0 {
        return 0.0;
    }
    dcg_at_k(ranked, judgments, k) / idcg
}

/// Reciprocal rank of the first relevant document within the top K, 0.0 if there is none.
pub fn mrr_at_k(ranked: &[Candidate], judgments: &Judgments, k: usize) -> f64 {
    ranked
        .iter()
        .take(k)
        .position(|cand| judgments.get(&cand.doc_id).copied().unwrap_or(0) > 0)
        .map(|i| 1.0 / (i + 1) as f64)
        .unwrap_or(0.0)
}

/// Recall@K = |relevant ∩ top K| / |relevant|, 0.0 if the query has no relevant documents.
pub fn recall_at_k(ranked: &[Candidate], judgments: &Judgments, k: usize) -> f64 {
    let num_relevant = judgments.values().filter(|&&rel| rel > 0).count();
    if num_relevant == 0 {
        return 0.0;
    }
    let retrieved = ranked
        .iter()
        .take(k)
        .filter(|cand| judgments.get(&cand.doc_id).copied().unwrap_or(0) > 0)
        .count();
    retrieved as f64 / num_relevant as f64
}
