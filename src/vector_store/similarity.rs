//! Cosine similarity calculations

/// Cosine similarity between two vectors of equal length.
///
/// Returns a value in [-1.0, 1.0], higher is more similar. A zero vector has
/// no direction and scores 0.0 against everything.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0) as f32
}

/// Rank `candidates` against `query` and keep the best `k`.
///
/// Returns `(index, score)` pairs sorted by score descending. The sort is
/// stable, so equal scores keep insertion order.
pub fn top_k<'a, I>(query: &[f32], candidates: I, k: usize) -> Vec<(usize, f32)>
where
    I: IntoIterator<Item = &'a [f32]>,
{
    let mut scored: Vec<(usize, f32)> = candidates
        .into_iter()
        .enumerate()
        .map(|(index, vector)| {
            let score = cosine_similarity(query, vector);
            (index, if score.is_nan() { f32::NEG_INFINITY } else { score })
        })
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(k);
    scored
}
