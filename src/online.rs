use log::{debug, trace};

use crate::bleu::approx_bleu;
use crate::counts::NgramCounts;

/// Running corpus statistics for approximate BLEU.
///
/// Sentences are scored in the context of everything committed so far, so a
/// sentence-level reward tracks corpus-level BLEU without rescoring the whole
/// corpus. Before each commit the history is multiplied by `decay`; a decay
/// of 1 keeps a plain cumulative sum.
#[derive(Debug, Clone)]
pub struct OnlineBleu {
    history: NgramCounts,
    hyp_len: f64,
    ref_len: f64,
    decay: f64,
    weights: Option<Vec<f64>>,
    n_updates: usize,
}

impl OnlineBleu {
    pub fn new(max_order: usize, decay: f64) -> Self {
        assert!(
            decay > 0.0 && decay <= 1.0,
            "history decay must be in (0, 1], got {}",
            decay
        );
        OnlineBleu {
            history: NgramCounts::new(max_order),
            hyp_len: 0.0,
            ref_len: 0.0,
            decay,
            weights: None,
            n_updates: 0,
        }
    }

    pub fn with_weights(mut self, weights: Option<Vec<f64>>) -> Self {
        self.weights = weights;
        self
    }

    pub fn history(&self) -> &NgramCounts {
        &self.history
    }

    pub fn lengths(&self) -> (f64, f64) {
        (self.hyp_len, self.ref_len)
    }

    pub fn n_updates(&self) -> usize {
        self.n_updates
    }

    /// Approximate BLEU of the history with this sentence added to it.
    /// An empty hypothesis scores 0 whatever the history holds.
    pub fn score(&self, counts: &NgramCounts, hyp_len: usize, ref_len: usize) -> f64 {
        if hyp_len == 0 {
            return 0.0;
        }
        let mut combined = self.history.clone();
        combined += counts;
        approx_bleu(
            &combined,
            self.hyp_len + hyp_len as f64,
            self.ref_len + ref_len as f64,
            self.weights.as_deref(),
        )
    }

    /// Approximate BLEU of the history alone.
    pub fn history_score(&self) -> f64 {
        approx_bleu(
            &self.history,
            self.hyp_len,
            self.ref_len,
            self.weights.as_deref(),
        )
    }

    /// How much adding this sentence would move the history's BLEU.
    pub fn gain(&self, counts: &NgramCounts, hyp_len: usize, ref_len: usize) -> f64 {
        self.score(counts, hyp_len, ref_len) - self.history_score()
    }

    /// Decays the history, then folds this sentence into it.
    pub fn update(&mut self, counts: &NgramCounts, hyp_len: usize, ref_len: usize) {
        self.history = self.history.scaled(self.decay);
        self.history += counts;
        self.hyp_len = self.hyp_len * self.decay + hyp_len as f64;
        self.ref_len = self.ref_len * self.decay + ref_len as f64;
        self.n_updates += 1;
        debug!(
            "approx bleu history after {} updates: hyp_len={:.2} ref_len={:.2} score={:.4}",
            self.n_updates,
            self.hyp_len,
            self.ref_len,
            self.history_score()
        );
        trace!("history counts:\n{}", self.history);
    }

    pub fn reset(&mut self) {
        self.history.reset();
        self.hyp_len = 0.0;
        self.ref_len = 0.0;
        self.n_updates = 0;
    }
}
