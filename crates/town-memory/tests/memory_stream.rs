use std::rc::Rc;

use proptest::prelude::*;
use town_core::{Embedder, HashEmbedder};
use town_memory::{cosine_similarity, min_max_normalize, MemoryKind, MemoryStream};

struct Constant;

impl Embedder for Constant {
    fn embed(&self, _text: &str) -> Vec<f32> {
        vec![1.0, 0.0, 0.0]
    }
}

fn constant_stream() -> MemoryStream {
    MemoryStream::new("ada", Rc::new(Constant))
}

#[test]
fn append_assigns_sequential_ids_and_access_tick() {
    let mut stream = constant_stream();
    let a = stream.append("first", 3, 2, MemoryKind::Observation, Vec::new());
    let b = stream.append("second", 4, 3, MemoryKind::Action, vec![a.id.clone()]);

    assert_eq!(a.id, "ada-m1");
    assert_eq!(b.id, "ada-m2");
    assert_eq!(b.last_accessed_at, 4);
    assert_eq!(b.links, vec!["ada-m1".to_string()]);
    assert_eq!(stream.len(), 2);
    assert_eq!(stream.get("ada-m1").map(|r| r.description.as_str()), Some("first"));
    assert_eq!(stream.latest(5).len(), 2);
    assert_eq!(stream.latest(1)[0].id, "ada-m2");
}

#[test]
fn retrieval_ties_keep_insertion_order() {
    let mut stream = constant_stream();
    for text in ["a", "b", "c", "d"] {
        stream.append(text, 1, 5, MemoryKind::Observation, Vec::new());
    }
    let hits = stream.retrieve("anything", 1, 3);
    let ids: Vec<_> = hits.iter().map(|h| h.record.id.as_str()).collect();
    assert_eq!(ids, vec!["ada-m1", "ada-m2", "ada-m3"]);
    assert!(hits.iter().all(|h| h.score == 0.0));
}

#[test]
fn retrieval_refreshes_access_tick_and_recency() {
    let mut stream = constant_stream();
    for text in ["a", "b", "c"] {
        stream.append(text, 1, 5, MemoryKind::Observation, Vec::new());
    }

    let first = stream.retrieve("q", 10, 1);
    assert_eq!(first[0].record.id, "ada-m1");
    assert_eq!(stream.get("ada-m1").unwrap().last_accessed_at, 10);
    assert_eq!(stream.get("ada-m2").unwrap().last_accessed_at, 1);

    // m1 now has the freshest access, so it wins on recency alone.
    let later = stream.retrieve("q", 20, 3);
    assert_eq!(later[0].record.id, "ada-m1");
    assert!(later[0].score > later[1].score);
    assert_eq!(later[1].record.id, "ada-m2");
}

#[test]
fn importance_breaks_otherwise_equal_records() {
    let mut stream = constant_stream();
    stream.append("low", 1, 1, MemoryKind::Plan, Vec::new());
    stream.append("high", 1, 9, MemoryKind::Reflection, Vec::new());
    stream.append("mid", 1, 5, MemoryKind::Action, Vec::new());

    let hits = stream.retrieve("q", 1, 3);
    let texts: Vec<_> = hits.iter().map(|h| h.record.description.as_str()).collect();
    assert_eq!(texts, vec!["high", "mid", "low"]);
}

#[test]
fn relevance_prefers_matching_text() {
    let mut stream = MemoryStream::new("ada", Rc::new(HashEmbedder::new(16)));
    stream.append("Ada is at the cafe.", 1, 2, MemoryKind::Observation, Vec::new());
    stream.append("Ada sees Byron nearby.", 1, 2, MemoryKind::Observation, Vec::new());
    stream.append("Ada notices the lamp.", 1, 2, MemoryKind::Observation, Vec::new());

    let hits = stream.retrieve("Ada sees Byron nearby.", 1, 1);
    assert_eq!(hits[0].record.id, "ada-m2");
}

#[test]
fn empty_stream_and_zero_k_return_nothing() {
    let mut stream = constant_stream();
    assert!(stream.retrieve("q", 1, 3).is_empty());
    stream.append("a", 1, 1, MemoryKind::Observation, Vec::new());
    assert!(stream.retrieve("q", 1, 0).is_empty());
}

#[test]
fn cosine_handles_degenerate_vectors() {
    assert_eq!(cosine_similarity(&[], &[1.0]), 0.0);
    assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    assert!((cosine_similarity(&[1.0, 0.0, 5.0], &[1.0, 0.0]) - 1.0).abs() < 1e-9);
    assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-9);
}

#[test]
fn record_serializes_without_embedding() {
    let mut stream = constant_stream();
    let record = stream.append("a", 2, 4, MemoryKind::Reflection, Vec::new());
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["type"], "reflection");
    assert_eq!(json["importance"], 4);
    assert!(json.get("embedding").is_none());
}

proptest! {
    #[test]
    fn normalized_columns_stay_in_unit_range(values in prop::collection::vec(-1e6f64..1e6, 0..32)) {
        let out = min_max_normalize(&values);
        prop_assert_eq!(out.len(), values.len());
        for v in out {
            prop_assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn retrieval_is_bounded_and_sorted(
        importances in prop::collection::vec(1u8..=10, 1..12),
        k in 0usize..15,
    ) {
        let mut stream = MemoryStream::new("p", Rc::new(HashEmbedder::default()));
        for (i, imp) in importances.iter().enumerate() {
            stream.append(format!("memory {i}"), i as u64, *imp, MemoryKind::Observation, Vec::new());
        }
        let hits = stream.retrieve("memory 0", 20, k);
        prop_assert_eq!(hits.len(), k.min(importances.len()));
        for pair in hits.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }
}
