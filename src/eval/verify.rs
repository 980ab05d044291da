//! Submission format checker for prediction files.
//!
//! Structural only, no qrels needed. Stricter than the loader: every query
//! must carry a non-empty candidate list and every candidate a numeric `score`
//! (`bm25_score` is not accepted).

use crate::error::{format_err, read_line, Result};
use serde_json::Value as JsonValue;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Validate a predictions file and return the number of queries in it.
pub fn verify_predictions(path: &Path) -> Result<usize> {
    let file = File::open(path)?;
    let count = verify_reader(BufReader::new(file))?;
    log::info!("Verified {} queries in {}", count, path.display());
    Ok(count)
}

/// Validate predictions from any buffered reader. Stops at the first violation.
pub fn verify_reader<R: BufRead>(reader: R) -> Result<usize> {
    let mut seen_queries: HashSet<String> = HashSet::new();

    for (i, line) in reader.lines().enumerate() {
        let line_num = i + 1;
        let line = read_line(line, line_num)?;
        let record: JsonValue = serde_json::from_str(&line)
            .map_err(|e| format_err(format!("Line {}: invalid JSON ({})", line_num, e)))?;
        let record = record
            .as_object()
            .ok_or_else(|| format_err(format!("Line {}: record must be a JSON object", line_num)))?;

        let query_id = match record.get("query_id") {
            Some(JsonValue::String(id)) if !id.is_empty() => id,
            _ => {
                return Err(format_err(format!(
                    "Line {}: query_id must be a non-empty string",
                    line_num
                )))
            }
        };
        if !seen_queries.insert(query_id.clone()) {
            return Err(format_err(format!(
                "Line {}: duplicate query_id {}",
                line_num, query_id
            )));
        }

        let candidates = match record.get("candidates") {
            Some(JsonValue::Array(items)) if !items.is_empty() => items,
            _ => {
                return Err(format_err(format!(
                    "Line {}: candidates must be a non-empty list",
                    line_num
                )))
            }
        };

        for (idx, cand) in candidates.iter().enumerate() {
            verify_candidate(cand, line_num, idx + 1)?;
        }
    }

    if seen_queries.is_empty() {
        return Err(format_err("No predictions found in file"));
    }
    Ok(seen_queries.len())
}

/// `position` is the 1-based index of the candidate within its list.
fn verify_candidate(cand: &JsonValue, line_num: usize, position: usize) -> Result<()> {
    let cand = cand.as_object().ok_or_else(|| {
        format_err(format!(
            "Line {}: candidate #{} must be an object",
            line_num, position
        ))
    })?;
    let doc_id = match cand.get("restaurant_id") {
        Some(JsonValue::String(id)) => id,
        _ => {
            return Err(format_err(format!(
                "Line {}: missing restaurant_id for candidate #{}",
                line_num, position
            )))
        }
    };
    match cand.get("score") {
        Some(JsonValue::Number(_)) => Ok(()),
        _ => Err(format_err(format!(
            "Line {}: invalid score for restaurant_id {}",
            line_num, doc_id
        ))),
    }
}
