//! Qrels loader: tab-separated relevance judgments (`query_id\tdoc_id\tgrade`).

use crate::error::{format_err, read_line, Result};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Relevance grades for one query, keyed by doc id.
pub type Judgments = HashMap<String, u32>;

/// Largest grade whose NDCG gain `2^grade - 1` is a finite `f64`.
pub const MAX_RELEVANCE: u32 = 1023;

/// One parsed qrels line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrelsEntry {
    pub query_id: String,
    pub doc_id: String,
    /// 0 = irrelevant, higher = more relevant
    pub relevance: u32,
}

impl QrelsEntry {
    /// Parse a single raw qrels line. `line_num` is 1-based and only used for error context.
    pub fn parse_line(line: &str, line_num: usize) -> Result<Self> {
        let fields: Vec<&str> = line.trim().split('\t').collect();
        if fields.len() != 3 {
            return Err(format_err(format!(
                "Line {}: malformed qrels line: {:?}",
                line_num,
                line.trim()
            )));
        }
        let relevance = fields[2].trim().parse::<u32>().map_err(|_| {
            format_err(format!(
                "Line {}: invalid relevance grade {:?} in qrels line: {:?}",
                line_num,
                fields[2],
                line.trim()
            ))
        })?;
        if relevance > MAX_RELEVANCE {
            return Err(format_err(format!(
                "Line {}: relevance grade {} exceeds the maximum of {} in qrels line: {:?}",
                line_num,
                relevance,
                MAX_RELEVANCE,
                line.trim()
            )));
        }
        Ok(Self {
            query_id: fields[0].to_string(),
            doc_id: fields[1].to_string(),
            relevance,
        })
    }
}

/// Ground-truth relevance judgments for a set of queries.
///
/// Queries iterate in id order so that averages are reproducible run to run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Qrels {
    queries: BTreeMap<String, Judgments>,
}

impl Qrels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load qrels from a TSV file.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let qrels = Self::from_reader(BufReader::new(file))?;
        log::info!(
            "Loaded qrels for {} queries ({} judgments) from {}",
            qrels.len(),
            qrels.num_judgments(),
            path.display()
        );
        Ok(qrels)
    }

    /// Parse qrels from any buffered reader. Fails on the first malformed line.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut qrels = Self::new();
        for (i, line) in reader.lines().enumerate() {
            let line = read_line(line, i + 1)?;
            qrels.insert(QrelsEntry::parse_line(&line, i + 1)?);
        }
        Ok(qrels)
    }

    /// Record a judgment. A repeated (query, doc) pair overwrites the earlier grade.
    pub fn insert(&mut self, entry: QrelsEntry) {
        self.queries
            .entry(entry.query_id)
            .or_default()
            .insert(entry.doc_id, entry.relevance);
    }

    pub fn get(&self, query_id: &str) -> Option<&Judgments> {
        self.queries.get(query_id)
    }

    pub fn contains(&self, query_id: &str) -> bool {
        self.queries.contains_key(query_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Judgments)> {
        self.queries.iter()
    }

    /// Number of queries
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    /// Total number of (query, doc) judgments
    pub fn num_judgments(&self) -> usize {
        self.queries.values().map(HashMap::len).sum()
    }
}
