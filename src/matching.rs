use crate::counts::NgramCounts;
use crate::ngram::{extract_ngrams, NgramMultiset};
use crate::types::Token;

/// Clipped n-gram statistics of `hyp` against a single reference.
pub fn ngram_counts(hyp: &[Token], reference: &[Token], max_order: usize) -> NgramCounts {
    multi_ref_ngram_counts(hyp, &[reference], max_order)
}

/// Clipped n-gram statistics of `hyp` against several references.
///
/// Each hypothesis n-gram is clipped at the largest count it has in any one
/// reference. With no references nothing matches, but totals still count.
pub fn multi_ref_ngram_counts<R: AsRef<[Token]>>(
    hyp: &[Token],
    references: &[R],
    max_order: usize,
) -> NgramCounts {
    let hyp_ngrams = extract_ngrams(hyp, max_order);
    let ref_ngrams: Vec<Vec<NgramMultiset<'_>>> = references
        .iter()
        .map(|r| extract_ngrams(r.as_ref(), max_order))
        .collect();

    let mut counts = NgramCounts::new(max_order);
    for (i, multiset) in hyp_ngrams.iter().enumerate() {
        for (ngram, &count) in multiset {
            let ref_count = ref_ngrams
                .iter()
                .filter_map(|orders| orders[i].get(*ngram))
                .copied()
                .max()
                .unwrap_or(0);
            counts.add(count, ref_count, i);
        }
    }
    counts
}
