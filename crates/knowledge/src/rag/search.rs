//! Top-k retrieval over the TF-IDF index.

use crate::corpus::load_corpus;
use crate::index::{build_index, FaqIndex};
use crate::types::{Corpus, RetrievedPassage};
use aurora_core::{AppError, AppResult};
use std::path::Path;

/// Rank corpus records against `query` and keep the best `k` scoring at least
/// `min_score`.
///
/// Results are ordered by descending score, ties by ascending id. A miss is
/// an empty vector, not an error; the only error is an index built from a
/// different corpus.
pub fn retrieve(
    query: &str,
    index: &FaqIndex,
    corpus: &Corpus,
    k: usize,
    min_score: f32,
) -> AppResult<Vec<RetrievedPassage>> {
    ensure_lockstep(index, corpus)?;

    if k == 0 {
        return Ok(Vec::new());
    }

    let mut ranked: Vec<(usize, f64)> = index.scores(query).into_iter().enumerate().collect();
    ranked.sort_by(|(a_pos, a_score), (b_pos, b_score)| {
        b_score
            .total_cmp(a_score)
            .then_with(|| index.doc_ids()[*a_pos].cmp(&index.doc_ids()[*b_pos]))
    });

    let passages: Vec<RetrievedPassage> = ranked
        .into_iter()
        .take(k)
        .map(|(position, score)| (position, score as f32))
        .filter(|&(_, score)| score >= min_score)
        .filter_map(|(position, score)| {
            corpus.get(position).map(|record| RetrievedPassage {
                record: record.clone(),
                score,
            })
        })
        .collect();

    tracing::debug!(
        query,
        k,
        min_score,
        scores = ?passages.iter().map(|p| (p.record.id, p.score)).collect::<Vec<_>>(),
        "Retrieved {} passage(s)",
        passages.len()
    );

    Ok(passages)
}

fn ensure_lockstep(index: &FaqIndex, corpus: &Corpus) -> AppResult<()> {
    if index.len() != corpus.len() {
        return Err(AppError::Index(format!(
            "Index covers {} records but the corpus has {}",
            index.len(),
            corpus.len()
        )));
    }

    if !index.doc_ids().iter().copied().eq(corpus.ids()) {
        return Err(AppError::Index(
            "Index record ids do not match the corpus; rebuild the index".to_string(),
        ));
    }

    Ok(())
}

/// A corpus and the index built from it, kept together so they cannot drift.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    corpus: Corpus,
    index: FaqIndex,
}

impl KnowledgeBase {
    pub fn new(corpus: Corpus) -> AppResult<Self> {
        let index = build_index(&corpus)?;
        Ok(Self { corpus, index })
    }

    /// Load the corpus at `path` (or the default set) and index it.
    pub fn load(path: &Path) -> AppResult<Self> {
        Self::new(load_corpus(path)?)
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn index(&self) -> &FaqIndex {
        &self.index
    }

    pub fn retrieve(&self, query: &str, k: usize, min_score: f32) -> AppResult<Vec<RetrievedPassage>> {
        retrieve(query, &self.index, &self.corpus, k, min_score)
    }
}
