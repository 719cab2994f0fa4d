use std::fmt;
use std::str::FromStr;

use crate::counts::NgramCounts;
use crate::error::ScoreError;

/// Numerator of the precision stupid BLEU gives an order with no clipped
/// matches: such an order scores `floor / total`. Any floor up to 1 keeps
/// every precision, and so the score, within [0, 1]; larger floors can push
/// short hypotheses above 1 and are left unclamped.
pub const DEFAULT_STUPID_FLOOR: f64 = 0.5;

/// The four reward functions derived from clipped n-gram counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreVariant {
    Bleu,
    StupidBleu,
    SmoothBleu,
    ApproxBleu,
}

impl ScoreVariant {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bleu => "bleu",
            Self::StupidBleu => "stupid_bleu",
            Self::SmoothBleu => "smooth_bleu",
            Self::ApproxBleu => "approx_bleu",
        }
    }

    /// Scores `counts` with this variant. `floor` only matters for stupid BLEU.
    pub fn score(
        &self,
        counts: &NgramCounts,
        hyp_len: usize,
        ref_len: usize,
        weights: Option<&[f64]>,
        floor: f64,
    ) -> f64 {
        match self {
            Self::Bleu => bleu(counts, hyp_len, ref_len, weights),
            Self::StupidBleu => stupid_bleu_with_floor(counts, hyp_len, ref_len, weights, floor),
            Self::SmoothBleu => smooth_bleu(counts, hyp_len, ref_len, weights),
            Self::ApproxBleu => approx_bleu(counts, hyp_len as f64, ref_len as f64, weights),
        }
    }
}

impl FromStr for ScoreVariant {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bleu" => Ok(Self::Bleu),
            "stupid_bleu" => Ok(Self::StupidBleu),
            "smooth_bleu" => Ok(Self::SmoothBleu),
            "approx_bleu" => Ok(Self::ApproxBleu),
            _ => Err(ScoreError::UnknownVariant(s.to_string())),
        }
    }
}

impl fmt::Display for ScoreVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 0 for an empty hypothesis, 1 once the hypothesis is at least as long as
/// the reference, `exp(1 - ref_len / hyp_len)` in between.
pub fn brevity_penalty(hyp_len: usize, ref_len: usize) -> f64 {
    length_penalty(hyp_len as f64, ref_len as f64)
}

pub(crate) fn length_penalty(hyp_len: f64, ref_len: f64) -> f64 {
    if hyp_len <= 0.0 {
        return 0.0;
    }
    if hyp_len >= ref_len {
        1.0
    } else {
        (1.0 - ref_len / hyp_len).exp()
    }
}

fn order_weights(weights: Option<&[f64]>, max_order: usize) -> Vec<f64> {
    match weights {
        Some(w) => {
            assert_eq!(
                w.len(),
                max_order,
                "expected one weight per n-gram order"
            );
            w.to_vec()
        }
        None => vec![1.0 / max_order as f64; max_order],
    }
}

/// Weighted geometric mean of `(weight, precision)` pairs. Zero-weight
/// entries are ignored; any remaining zero precision gives 0.
fn geometric_mean(values: &[(f64, f64)]) -> f64 {
    let mut log_sum = 0.0;
    let mut weight_sum = 0.0;
    for &(weight, precision) in values.iter().filter(|(w, _)| *w > 0.0) {
        if precision == 0.0 {
            return 0.0;
        }
        log_sum += weight * precision.ln();
        weight_sum += weight;
    }
    if weight_sum == 0.0 {
        return 0.0;
    }
    (log_sum / weight_sum).exp()
}

/// Plain precisions of the orders that have at least one hypothesis n-gram.
fn present_precisions(counts: &NgramCounts, weights: &[f64]) -> Vec<(f64, f64)> {
    (0..counts.max_order())
        .filter(|&i| counts.total(i) > 0.0)
        .map(|i| (weights[i], counts.clipped(i) / counts.total(i)))
        .collect()
}

fn bleu_with_lengths(
    counts: &NgramCounts,
    hyp_len: f64,
    ref_len: f64,
    weights: Option<&[f64]>,
) -> f64 {
    if hyp_len <= 0.0 {
        return 0.0;
    }
    let weights = order_weights(weights, counts.max_order());
    length_penalty(hyp_len, ref_len) * geometric_mean(&present_precisions(counts, &weights))
}

/// Standard BLEU. Orders without any hypothesis n-gram are left out of the
/// mean together with their weight; an order with n-grams but no match
/// zeroes the score.
pub fn bleu(counts: &NgramCounts, hyp_len: usize, ref_len: usize, weights: Option<&[f64]>) -> f64 {
    bleu_with_lengths(counts, hyp_len as f64, ref_len as f64, weights)
}

/// Stupid BLEU with the default floor.
pub fn stupid_bleu(
    counts: &NgramCounts,
    hyp_len: usize,
    ref_len: usize,
    weights: Option<&[f64]>,
) -> f64 {
    stupid_bleu_with_floor(counts, hyp_len, ref_len, weights, DEFAULT_STUPID_FLOOR)
}

/// Sentence-level BLEU that never collapses to 0 on a missing match: an
/// order with n-grams but nothing clipped gets precision `floor / total`.
pub fn stupid_bleu_with_floor(
    counts: &NgramCounts,
    hyp_len: usize,
    ref_len: usize,
    weights: Option<&[f64]>,
    floor: f64,
) -> f64 {
    if hyp_len == 0 {
        return 0.0;
    }
    let weights = order_weights(weights, counts.max_order());
    let precisions: Vec<(f64, f64)> = (0..counts.max_order())
        .filter(|&i| counts.total(i) > 0.0)
        .map(|i| {
            let clipped = counts.clipped(i);
            let total = counts.total(i);
            if clipped == 0.0 {
                (weights[i], floor / total)
            } else {
                (weights[i], clipped / total)
            }
        })
        .collect();
    brevity_penalty(hyp_len, ref_len) * geometric_mean(&precisions)
}

/// BLEU with add-one smoothing on every order above unigrams.
pub fn smooth_bleu(
    counts: &NgramCounts,
    hyp_len: usize,
    ref_len: usize,
    weights: Option<&[f64]>,
) -> f64 {
    if hyp_len == 0 {
        return 0.0;
    }
    let weights = order_weights(weights, counts.max_order());
    let mut precisions = Vec::with_capacity(counts.max_order());
    for i in 0..counts.max_order() {
        if i == 0 {
            if counts.total(0) > 0.0 {
                precisions.push((weights[0], counts.clipped(0) / counts.total(0)));
            }
        } else {
            precisions.push((
                weights[i],
                (counts.clipped(i) + 1.0) / (counts.total(i) + 1.0),
            ));
        }
    }
    brevity_penalty(hyp_len, ref_len) * geometric_mean(&precisions)
}

/// BLEU over a running aggregate of counts and lengths, as kept by
/// `OnlineBleu`. Lengths are fractional because the history decays.
pub fn approx_bleu(
    counts: &NgramCounts,
    hyp_len: f64,
    ref_len: f64,
    weights: Option<&[f64]>,
) -> f64 {
    bleu_with_lengths(counts, hyp_len, ref_len, weights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::ngram_counts;
    use crate::types::{Token, Vocabulary};

    fn close_enough(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    fn pair(pred: &str, gold: &str) -> (Vec<Token>, Vec<Token>) {
        let mut vocab = Vocabulary::new();
        let pred = vocab.encode(pred).tokens().to_vec();
        let gold = vocab.encode(gold).tokens().to_vec();
        (pred, gold)
    }

    fn sentence_bleu(pred: &str, gold: &str, max_order: usize) -> f64 {
        let (pred, gold) = pair(pred, gold);
        let counts = ngram_counts(&pred, &gold, max_order);
        bleu(&counts, pred.len(), gold.len(), None)
    }

    #[test]
    fn test_brevity_penalty() {
        assert_eq!(brevity_penalty(0, 4), 0.0);
        assert_eq!(brevity_penalty(0, 0), 0.0);
        assert_eq!(brevity_penalty(4, 4), 1.0);
        assert_eq!(brevity_penalty(5, 4), 1.0);
        assert!(close_enough(brevity_penalty(3, 4), (-1.0f64 / 3.0).exp(), 1e-12));
    }

    #[test]
    fn test_brevity_penalty_decreases_with_shorter_hypothesis() {
        let ref_len = 20;
        let mut prev = brevity_penalty(ref_len, ref_len);
        for hyp_len in (1..ref_len).rev() {
            let bp = brevity_penalty(hyp_len, ref_len);
            assert!(bp > 0.0 && bp < 1.0, "bp({}) = {}", hyp_len, bp);
            assert!(bp < prev);
            prev = bp;
        }
    }

    #[test]
    fn test_bleu_perfect_match() {
        let score = sentence_bleu("the quick brown fox", "the quick brown fox", 4);
        assert_eq!(score, 1.0, "Expected BLEU 1.0, got {}", score);
    }

    #[test]
    fn test_bleu_the_cat_sat() {
        let score = sentence_bleu("the cat sat", "the cat sat down", 2);
        assert!(
            close_enough(score, 0.7165, 1e-4),
            "Expected BLEU 0.7165, got {}",
            score
        );
    }

    // No trigram of the prediction appears in the reference, and BLEU
    // punishes this severely with the geometric mean
    #[test]
    fn test_bleu_partial_match() {
        let score = sentence_bleu("the quick brown fox", "the quick fox", 4);
        assert_eq!(score, 0.0, "Expected BLEU 0.0, got {}", score);
    }

    #[test]
    fn test_bleu_no_match() {
        let score = sentence_bleu("cats sleep all day", "the quick brown fox", 4);
        assert_eq!(score, 0.0, "Expected BLEU 0.0, got {}", score);
    }

    #[test]
    fn test_bleu_repeated_pred() {
        // BLEU-1 is 0.5 due to clipped count: min(4, 2) / 4
        let score = sentence_bleu("the the the the", "the the", 1);
        assert!(
            close_enough(score, 0.5, 1e-12),
            "Expected BLEU 0.5, got {}",
            score
        );
    }

    #[test]
    fn test_bleu_empty_pred() {
        let score = sentence_bleu("", "the quick brown fox", 4);
        assert_eq!(score, 0.0, "Expected BLEU 0.0 for empty prediction, got {}", score);
    }

    #[test]
    fn test_bleu_empty_gold() {
        let score = sentence_bleu("the quick brown fox", "", 4);
        assert_eq!(score, 0.0, "Expected BLEU 0.0 for empty gold, got {}", score);
    }

    #[test]
    fn test_bleu_skips_orders_longer_than_hypothesis() {
        // only unigrams and bigrams exist; both match fully
        let score = sentence_bleu("the cat", "the cat", 4);
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_bleu_custom_weights() {
        let (pred, gold) = pair("a b c d", "a b x d");
        let counts = ngram_counts(&pred, &gold, 2);
        // unigram 3/4, bigram 1/3
        let unigram_only = bleu(&counts, 4, 4, Some(&[1.0, 0.0]));
        assert!(close_enough(unigram_only, 0.75, 1e-12));
        let skewed = bleu(&counts, 4, 4, Some(&[0.25, 0.75]));
        let expected = (0.25 * 0.75f64.ln() + 0.75 * (1.0f64 / 3.0).ln()).exp();
        assert!(close_enough(skewed, expected, 1e-12));
    }

    #[test]
    #[should_panic]
    fn test_bleu_wrong_weight_count() {
        let counts = NgramCounts::new(4);
        bleu(&counts, 1, 1, Some(&[1.0]));
    }

    #[test]
    fn test_stupid_bleu_no_match_is_finite() {
        let (pred, gold) = pair("cats sleep all day", "the quick brown fox");
        let counts = ngram_counts(&pred, &gold, 4);
        let score = stupid_bleu(&counts, pred.len(), gold.len(), None);
        assert!(score.is_finite());
        assert!(score > 0.0 && score < 1.0, "got {}", score);
        let expected = ((0.125f64).ln() + (0.5f64 / 3.0).ln() + 0.25f64.ln() + 0.5f64.ln()) / 4.0;
        assert!(close_enough(score, expected.exp(), 1e-12));
    }

    #[test]
    fn test_stupid_bleu_rewards_partial_matches() {
        let (pred, gold) = pair("the quick brown fox", "the quick fox");
        let counts = ngram_counts(&pred, &gold, 4);
        assert_eq!(bleu(&counts, 4, 3, None), 0.0);
        let score = stupid_bleu(&counts, 4, 3, None);
        assert!(score > 0.0 && score < 1.0);
    }

    #[test]
    fn test_stupid_bleu_perfect_match() {
        let (pred, gold) = pair("the quick brown fox", "the quick brown fox");
        let counts = ngram_counts(&pred, &gold, 4);
        assert_eq!(stupid_bleu(&counts, 4, 4, None), 1.0);
    }

    #[test]
    fn test_stupid_bleu_empty_pred() {
        let counts = NgramCounts::new(4);
        assert_eq!(stupid_bleu(&counts, 0, 5, None), 0.0);
    }

    #[test]
    fn test_stupid_bleu_large_floor_is_not_clamped() {
        let counts = ngram_counts(&[1], &[2], 4);
        let score = stupid_bleu_with_floor(&counts, 1, 1, None, 2.0);
        assert!(close_enough(score, 2.0, 1e-12), "got {}", score);
    }

    #[test]
    fn test_smooth_bleu_keeps_sparse_high_orders() {
        let (pred, gold) = pair("the cat on the mat", "the cat sat on the mat");
        let counts = ngram_counts(&pred, &gold, 4);
        assert_eq!(counts.clipped(3), 0.0);
        assert_eq!(bleu(&counts, 5, 6, None), 0.0);
        let score = smooth_bleu(&counts, 5, 6, None);
        assert!(score > 0.0 && score < 1.0, "got {}", score);
    }

    #[test]
    fn test_smooth_bleu_unsmoothed_unigrams() {
        let (pred, gold) = pair("cats sleep", "the fox");
        let counts = ngram_counts(&pred, &gold, 4);
        assert_eq!(smooth_bleu(&counts, 2, 2, None), 0.0);
    }

    #[test]
    fn test_smooth_bleu_short_perfect_hypothesis() {
        let score = {
            let (pred, gold) = pair("the cat sat", "the cat sat down");
            let counts = ngram_counts(&pred, &gold, 4);
            smooth_bleu(&counts, 3, 4, None)
        };
        assert!(close_enough(score, brevity_penalty(3, 4), 1e-12));
    }

    #[test]
    fn test_approx_bleu_matches_bleu_on_one_sentence() {
        let (pred, gold) = pair("the cat sat on the mat", "the cat sat on a mat");
        let counts = ngram_counts(&pred, &gold, 4);
        let exact = bleu(&counts, pred.len(), gold.len(), None);
        let approx = approx_bleu(&counts, pred.len() as f64, gold.len() as f64, None);
        assert_eq!(exact, approx);
    }

    #[test]
    fn test_scores_in_unit_range() {
        let samples = [
            ("the cat sat", "the cat sat down"),
            ("a b c d e", "e d c b a"),
            ("x", "x y z"),
            ("the the the", "the cat"),
        ];
        for (pred, gold) in samples {
            let (pred, gold) = pair(pred, gold);
            let counts = ngram_counts(&pred, &gold, 4);
            for variant in [
                ScoreVariant::Bleu,
                ScoreVariant::StupidBleu,
                ScoreVariant::SmoothBleu,
                ScoreVariant::ApproxBleu,
            ] {
                let s = variant.score(&counts, pred.len(), gold.len(), None, DEFAULT_STUPID_FLOOR);
                assert!((0.0..=1.0).contains(&s), "{} gave {}", variant, s);
            }
        }
    }

    #[test]
    fn test_variant_names() {
        for name in ["bleu", "stupid_bleu", "smooth_bleu", "approx_bleu"] {
            let variant: ScoreVariant = name.parse().unwrap();
            assert_eq!(variant.to_string(), name);
        }
        assert_eq!(
            "meteor".parse::<ScoreVariant>(),
            Err(ScoreError::UnknownVariant("meteor".to_string()))
        );
    }
}
