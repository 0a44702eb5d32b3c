//! Top-K sentence selection with document order restored.

use super::scorer::ScoredSentence;
use super::segmenter::Sentence;

/// Pick the `k` highest-scoring sentences and return them in document order.
///
/// Ranking uses a stable sort, so equal scores keep their original relative
/// order and the result is reproducible. `k` is not validated here; the engine
/// clamps it before calling.
pub fn select(scored: &[ScoredSentence], k: usize) -> Vec<Sentence> {
    if scored.len() <= k {
        return scored.iter().map(|s| s.sentence.clone()).collect();
    }

    let mut ranked: Vec<&ScoredSentence> = scored.iter().collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut chosen: Vec<Sentence> = ranked
        .into_iter()
        .take(k)
        .map(|s| s.sentence.clone())
        .collect();
    chosen.sort_by_key(|s| s.index);
    chosen
}
