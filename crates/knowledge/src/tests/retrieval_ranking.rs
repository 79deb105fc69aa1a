//! Tests for retrieval ranking over the default corpus.

use crate::corpus::default_corpus;
use crate::rag::search::KnowledgeBase;

const MIN_SCORE: f32 = 0.15;
const TOP_K: usize = 4;

fn knowledge_base() -> KnowledgeBase {
    KnowledgeBase::new(default_corpus()).unwrap()
}

#[test]
fn test_stored_question_ranks_its_record_first() {
    let kb = knowledge_base();

    for record in kb.corpus().records() {
        let passages = kb.retrieve(&record.question, TOP_K, MIN_SCORE).unwrap();
        assert!(!passages.is_empty(), "no passages for {:?}", record.question);
        assert_eq!(passages[0].record.id, record.id, "query {:?}", record.question);
        assert!(passages[0].score > MIN_SCORE);
    }
}

#[test]
fn test_paraphrased_refund_question_hits_refund_policy() {
    let kb = knowledge_base();
    let passages = kb
        .retrieve("Can I cancel and get my money back right away?", TOP_K, MIN_SCORE)
        .unwrap();

    assert_eq!(passages.len(), 1);
    assert_eq!(passages[0].record.id, 1);
}

#[test]
fn test_greeting_retrieves_nothing() {
    let kb = knowledge_base();
    assert!(kb.retrieve("hello", TOP_K, MIN_SCORE).unwrap().is_empty());
}

#[test]
fn test_off_topic_question_retrieves_nothing() {
    let kb = knowledge_base();
    assert!(kb
        .retrieve("what is the capital of France", TOP_K, MIN_SCORE)
        .unwrap()
        .is_empty());
}

#[test]
fn test_scores_descend_and_respect_bounds() {
    let kb = knowledge_base();
    let passages = kb
        .retrieve("refund for unused tickets after a schedule change", TOP_K, 0.0)
        .unwrap();

    assert!(passages.len() <= TOP_K);
    assert!(passages.windows(2).all(|w| w[0].score >= w[1].score));
    assert!(passages.iter().all(|p| (0.0..=1.0).contains(&p.score)));
}

#[test]
fn test_retrieval_is_deterministic() {
    let query = "Are non-refundable fares changeable for a fee?";
    let first = knowledge_base().retrieve(query, TOP_K, MIN_SCORE).unwrap();
    let second = knowledge_base().retrieve(query, TOP_K, MIN_SCORE).unwrap();
    assert_eq!(first, second);
}
