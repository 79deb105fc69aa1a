//! Cross-module tests over the default corpus.

mod retrieval_ranking;
