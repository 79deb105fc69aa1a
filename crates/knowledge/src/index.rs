//! In-memory TF-IDF index over the FAQ corpus.
//!
//! Each record is indexed as `question + " " + answer`. Terms are lowercased
//! runs of two or more word characters with English stop words removed.
//! Weights are raw term counts times the smoothed IDF
//! `ln((1 + n) / (1 + df)) + 1`, and every document vector is L2-normalized.
//! The vocabulary is sorted, so the same corpus always yields the same
//! dimensions and weights.

use crate::stopwords::is_stop_word;
use crate::types::{Corpus, FaqId};
use aurora_core::{AppError, AppResult};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashMap};

const TOKEN_PATTERN: &str = r"\b\w\w+\b";

/// Sparse vector: `(dimension, weight)` pairs sorted by dimension.
pub type SparseVector = Vec<(usize, f64)>;

/// Splits text into index terms.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    pattern: Regex,
}

impl Tokenizer {
    pub fn new() -> AppResult<Self> {
        let pattern = Regex::new(TOKEN_PATTERN)
            .map_err(|e| AppError::Index(format!("Invalid token pattern: {}", e)))?;
        Ok(Self { pattern })
    }

    /// Lowercased, stop-word-filtered terms of `text`, in order of appearance.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        self.pattern
            .find_iter(&lower)
            .map(|m| m.as_str())
            .filter(|token| !is_stop_word(token))
            .map(str::to_string)
            .collect()
    }
}

/// TF-IDF vectors for every corpus record, built once and read-only.
#[derive(Debug, Clone)]
pub struct FaqIndex {
    tokenizer: Tokenizer,
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
    vectors: Vec<SparseVector>,
    doc_ids: Vec<FaqId>,
}

/// Fit the vocabulary and IDF weights on `corpus` and vectorize every record.
pub fn build_index(corpus: &Corpus) -> AppResult<FaqIndex> {
    let tokenizer = Tokenizer::new()?;

    let documents: Vec<Vec<String>> = corpus
        .records()
        .iter()
        .map(|record| tokenizer.tokenize(&record.document_text()))
        .collect();

    let vocabulary: BTreeMap<String, usize> = documents
        .iter()
        .flatten()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .enumerate()
        .map(|(dim, term)| (term.clone(), dim))
        .collect();

    let mut document_frequency = vec![0usize; vocabulary.len()];
    for tokens in &documents {
        let unique: BTreeSet<usize> = tokens
            .iter()
            .filter_map(|token| vocabulary.get(token).copied())
            .collect();
        for dim in unique {
            document_frequency[dim] += 1;
        }
    }

    let n = corpus.len() as f64;
    let idf: Vec<f64> = document_frequency
        .iter()
        .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
        .collect();

    if vocabulary.is_empty() {
        tracing::warn!(
            "TF-IDF vocabulary is empty ({} records); every query will miss",
            corpus.len()
        );
    }

    let mut index = FaqIndex {
        tokenizer,
        vocabulary,
        idf,
        vectors: Vec::with_capacity(documents.len()),
        doc_ids: corpus.ids().collect(),
    };
    let vectors = documents
        .iter()
        .map(|tokens| index.weigh(tokens))
        .collect();
    index.vectors = vectors;

    tracing::debug!(
        "Built TF-IDF index: {} records, {} terms",
        index.doc_ids.len(),
        index.vocabulary.len()
    );

    Ok(index)
}

impl FaqIndex {
    /// Ids of the records this index was built from, in corpus order.
    pub fn doc_ids(&self) -> &[FaqId] {
        &self.doc_ids
    }

    pub fn len(&self) -> usize {
        self.doc_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc_ids.is_empty()
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// Dimension of `term` in the fitted vocabulary.
    pub fn dimension(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// Project `query` onto the fitted vocabulary; unknown terms are dropped.
    pub fn vectorize_query(&self, query: &str) -> SparseVector {
        self.weigh(&self.tokenizer.tokenize(query))
    }

    /// Cosine similarity of `query` against every record, in corpus order.
    pub fn scores(&self, query: &str) -> Vec<f64> {
        let query_vector = self.vectorize_query(query);
        self.vectors
            .iter()
            .map(|doc| sparse_dot(&query_vector, doc))
            .collect()
    }

    fn weigh(&self, tokens: &[String]) -> SparseVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for token in tokens {
            if let Some(&dim) = self.vocabulary.get(token) {
                *counts.entry(dim).or_insert(0.0) += 1.0;
            }
        }

        let mut vector: SparseVector = counts
            .into_iter()
            .map(|(dim, count)| (dim, count * self.idf[dim]))
            .collect();
        vector.sort_by_key(|&(dim, _)| dim);

        let norm = vector.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut vector {
                *w /= norm;
            }
        }

        vector
    }
}

/// Dot product of two dimension-sorted sparse vectors.
fn sparse_dot(a: &[(usize, f64)], b: &[(usize, f64)]) -> f64 {
    let (mut i, mut j) = (0, 0);
    let mut sum = 0.0;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                sum += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    sum
}
