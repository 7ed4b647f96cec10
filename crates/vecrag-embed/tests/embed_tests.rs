use vecrag_embed::{get_default_embedder, Embedder, MODEL_DIM};

#[test]
fn fake_embedder_shapes_and_determinism() {
    // Force the fake embedder to avoid loading the real model.
    std::env::set_var("APP_USE_FAKE_EMBEDDINGS", "1");

    let embedder = get_default_embedder().expect("embedder");
    assert_eq!(embedder.dim(), MODEL_DIM);

    let texts = vec![
        "hello world".to_string(),
        "hello world".to_string(),
        "an entirely different sentence".to_string(),
    ];
    let embs = embedder.embed_batch(&texts).expect("embed_batch");
    assert_eq!(embs.len(), 3);

    let v1 = &embs[0];
    let v2 = &embs[1];
    let v3 = &embs[2];
    assert_eq!(v1.len(), MODEL_DIM, "embedding dim is {MODEL_DIM}");

    // Norm approximately 1.0
    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");

    // Deterministic for same input
    for (a, b) in v1.iter().zip(v2.iter()) {
        assert!((a - b).abs() <= 1e-6);
    }

    // Different inputs land on different vectors
    assert!(v1.iter().zip(v3.iter()).any(|(a, b)| (a - b).abs() > 1e-6));
}
