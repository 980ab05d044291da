//! Predictions loader: line-delimited JSON, one ranked candidate list per query.
//!
//! Each line looks like
//! `{"query_id": "q1", "candidates": [{"restaurant_id": "r1", "score": 0.9}, ...]}`.
//! Candidate-generator exports carry `bm25_score` instead of `score`; both are accepted here.
//! The stricter submission contract lives in [`crate::eval::verify`].

use crate::error::{format_err, read_line, Result};
use serde_json::Value as JsonValue;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A scored document for one query.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub doc_id: String,
    pub score: f64,
}

impl Candidate {
    pub fn new(doc_id: impl Into<String>, score: f64) -> Self {
        Self {
            doc_id: doc_id.into(),
            score,
        }
    }

    /// Build a candidate from one element of a `candidates` array.
    ///
    /// If the `score` key is present it must be numeric; only when it is absent
    /// does `bm25_score` get a look.
    pub fn from_json(value: &JsonValue, line_num: usize) -> Result<Self> {
        let map = match value {
            JsonValue::Object(map) => map,
            _ => {
                return Err(format_err(format!(
                    "Line {}: candidate entries must be objects",
                    line_num
                )))
            }
        };

        let doc_id = match map.get("restaurant_id") {
            Some(JsonValue::String(id)) => id.clone(),
            _ => {
                return Err(format_err(format!(
                    "Line {}: invalid restaurant_id in candidate",
                    line_num
                )))
            }
        };

        let raw_score = map.get("score").or_else(|| map.get("bm25_score"));
        let score = match raw_score {
            Some(JsonValue::Number(n)) => n.as_f64(),
            _ => None,
        };
        let score = score.ok_or_else(|| {
            let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
            keys.sort_unstable();
            format_err(format!(
                "Line {}: invalid score for restaurant_id={}; expected numeric 'score' or 'bm25_score'. Keys: {}",
                line_num,
                doc_id,
                keys.join(",")
            ))
        })?;

        Ok(Self { doc_id, score })
    }
}

/// Candidates for one query, highest score first.
///
/// Equal scores keep their input order. NaN scores rank after every number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankedList {
    candidates: Vec<Candidate>,
}

impl RankedList {
    /// Rank an arbitrary list of scored candidates (e.g. re-ranker output).
    pub fn from_candidates(mut candidates: Vec<Candidate>) -> Self {
        // sort_by is stable, so ties stay in first-seen order
        candidates.sort_by(|a, b| descending_score(a.score, b.score));
        Self { candidates }
    }

    /// The first `k` candidates, or all of them if there are fewer.
    pub fn top_k(&self, k: usize) -> &[Candidate] {
        &self.candidates[..k.min(self.candidates.len())]
    }

    pub fn as_slice(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Total order on scores, highest first. `0.0` and `-0.0` tie; NaN sorts last.
fn descending_score(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

/// Ranked lists keyed by query id. At most one list per query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predictions {
    lists: HashMap<String, RankedList>,
}

impl Predictions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load predictions from a JSONL file.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let predictions = Self::from_reader(BufReader::new(file))?;
        log::info!(
            "Loaded predictions for {} queries from {}",
            predictions.len(),
            path.display()
        );
        Ok(predictions)
    }

    /// Parse predictions from any buffered reader. Fails on the first malformed record.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut predictions = Self::new();
        for (i, line) in reader.lines().enumerate() {
            let line_num = i + 1;
            let line = read_line(line, line_num)?;
            let (query_id, ranked) = parse_record(&line, line_num)?;
            predictions.insert(query_id, ranked)?;
        }
        Ok(predictions)
    }

    /// Add the ranked list for a query. A second list for the same query is an error.
    pub fn insert(&mut self, query_id: String, ranked: RankedList) -> Result<()> {
        if self.lists.contains_key(&query_id) {
            return Err(format_err(format!(
                "Duplicate predictions for query_id={}",
                query_id
            )));
        }
        self.lists.insert(query_id, ranked);
        Ok(())
    }

    pub fn get(&self, query_id: &str) -> Option<&RankedList> {
        self.lists.get(query_id)
    }

    pub fn contains(&self, query_id: &str) -> bool {
        self.lists.contains_key(query_id)
    }

    pub fn query_ids(&self) -> impl Iterator<Item = &String> {
        self.lists.keys()
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}

fn parse_record(line: &str, line_num: usize) -> Result<(String, RankedList)> {
    let record: JsonValue = serde_json::from_str(line)
        .map_err(|e| format_err(format!("Line {}: invalid JSON: {}", line_num, e)))?;
    let map = match record {
        JsonValue::Object(map) => map,
        _ => {
            return Err(format_err(format!(
                "Line {}: record must be a JSON object",
                line_num
            )))
        }
    };

    let query_id = match map.get("query_id") {
        Some(JsonValue::String(id)) => id.clone(),
        _ => return Err(format_err(format!("Line {}: missing query_id", line_num))),
    };

    let raw_candidates = match map.get("candidates") {
        Some(JsonValue::Array(items)) => items,
        _ => {
            return Err(format_err(format!(
                "Line {}: candidates must be a list",
                line_num
            )))
        }
    };

    let candidates = raw_candidates
        .iter()
        .map(|value| Candidate::from_json(value, line_num))
        .collect::<Result<Vec<_>>>()?;

    Ok((query_id, RankedList::from_candidates(candidates)))
}
