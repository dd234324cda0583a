use std::rc::Rc;

use town_core::HashEmbedder;
use town_memory::{fallback_insights, MemoryKind, MemoryStream, ReflectionTrigger};

#[test]
fn trigger_fires_at_threshold_and_resets() {
    let mut trigger = ReflectionTrigger::new(10);
    trigger.record_importance(3);
    assert!(!trigger.should_reflect());
    trigger.record_importance(7);
    assert!(trigger.should_reflect());

    trigger.reset();
    assert_eq!(trigger.accumulated(), 0);
    assert!(!trigger.should_reflect());
}

#[test]
fn default_threshold_is_ten() {
    let trigger = ReflectionTrigger::default();
    assert_eq!(trigger.threshold(), 10);
}

#[test]
fn fallback_insights_link_slices_of_support() {
    let mut stream = MemoryStream::new("ada", Rc::new(HashEmbedder::default()));
    for i in 0..5 {
        stream.append(format!("m{i}"), 1, 2, MemoryKind::Observation, Vec::new());
    }
    let insights = fallback_insights("Ada", stream.records());

    assert_eq!(insights.len(), 3);
    assert_eq!(insights[0].text, "Ada noticed a pattern in recent events.");
    assert_eq!(insights[0].links, vec!["ada-m1", "ada-m2"]);
    assert_eq!(insights[1].links, vec!["ada-m3", "ada-m4"]);
    assert_eq!(insights[2].links, vec!["ada-m4", "ada-m5"]);
}

#[test]
fn fallback_insights_handle_short_support() {
    let mut stream = MemoryStream::new("ada", Rc::new(HashEmbedder::default()));
    assert!(fallback_insights("Ada", stream.records()).is_empty());

    stream.append("only", 1, 2, MemoryKind::Observation, Vec::new());
    let insights = fallback_insights("Ada", stream.records());
    assert_eq!(insights[0].links, vec!["ada-m1"]);
    assert!(insights[1].links.is_empty());
    assert_eq!(insights[2].links, vec!["ada-m1"]);
}
