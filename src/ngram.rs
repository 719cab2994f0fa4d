use std::collections::HashMap;

use crate::types::Token;

/// Occurrence counts of every n-gram of a single order in one sequence.
pub type NgramMultiset<'a> = HashMap<&'a [Token], usize>;

/// Counts the contiguous `order`-token windows of `seq`.
///
/// A sequence shorter than `order` simply has no n-grams of that order.
pub fn get_ngram_counts(seq: &[Token], order: usize) -> NgramMultiset<'_> {
    let mut counts = NgramMultiset::new();
    if order == 0 {
        return counts;
    }
    for ngram in seq.windows(order) {
        *counts.entry(ngram).or_insert(0) += 1;
    }
    counts
}

/// One multiset per order: element `n - 1` holds the n-grams of order `n`,
/// for every `n` in `1..=max_order`.
pub fn extract_ngrams(seq: &[Token], max_order: usize) -> Vec<NgramMultiset<'_>> {
    (1..=max_order)
        .map(|order| get_ngram_counts(seq, order))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unigrams() {
        let seq = [1, 2, 1, 3];
        let counts = get_ngram_counts(&seq, 1);
        assert_eq!(counts.len(), 3);
        assert_eq!(counts[&[1][..]], 2);
        assert_eq!(counts[&[3][..]], 1);
    }

    #[test]
    fn test_bigrams_with_repeats() {
        let seq = [5, 5, 5, 5];
        let counts = get_ngram_counts(&seq, 2);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[&[5, 5][..]], 3);
    }

    #[test]
    fn test_all_orders() {
        let seq = [1, 2, 3, 4, 5];
        let ngrams = extract_ngrams(&seq, 4);
        assert_eq!(ngrams.len(), 4);
        for (i, multiset) in ngrams.iter().enumerate() {
            let total: usize = multiset.values().sum();
            assert_eq!(total, seq.len() - i);
        }
        assert_eq!(ngrams[3][&[2, 3, 4, 5][..]], 1);
    }

    #[test]
    fn test_sequence_shorter_than_order() {
        let seq = [1, 2];
        let ngrams = extract_ngrams(&seq, 4);
        assert_eq!(ngrams.len(), 4);
        assert_eq!(ngrams[1].len(), 1);
        assert!(ngrams[2].is_empty());
        assert!(ngrams[3].is_empty());
    }

    #[test]
    fn test_empty_sequence() {
        let ngrams = extract_ngrams(&[], 3);
        assert!(ngrams.iter().all(|m| m.is_empty()));
    }
}
