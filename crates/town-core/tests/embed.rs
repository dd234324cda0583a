use town_core::{Embedder, HashEmbedder};

#[test]
fn same_text_same_vector() {
    let embedder = HashEmbedder::new(16);
    let a = embedder.embed("Ada is at the cafe.");
    assert_eq!(a.len(), 16);
    assert_eq!(a, embedder.embed("Ada is at the cafe."));
    assert_ne!(a, embedder.embed("Bo is at the market."));
}

#[test]
fn components_stay_in_range() {
    let embedder = HashEmbedder::default();
    assert_eq!(embedder.dim(), 8);
    for text in ["", "x", "a much longer sentence about the park"] {
        assert!(embedder
            .embed(text)
            .iter()
            .all(|v| (-1.0..1.0).contains(v)));
    }
}

#[test]
fn zero_width_is_empty() {
    assert!(HashEmbedder::new(0).embed("anything").is_empty());
}
