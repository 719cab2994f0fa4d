use futures::future::join_all;
use log::{debug, trace};
use once_cell::sync::Lazy;
use tokio::runtime::Runtime;

use crate::bleu::ScoreVariant;
use crate::config::ScoreConfig;
use crate::counts::NgramCounts;
use crate::error::ScoreError;
use crate::kbest::{KBestList, ScorePair, SequenceSource};
use crate::matching::multi_ref_ngram_counts;
use crate::online::OnlineBleu;
use crate::types::{Sequence, Token};

static RUNTIME: Lazy<Runtime> =
    Lazy::new(|| Runtime::new().expect("Failed to create async runtime"));

/// Length of the reference closest in length to the hypothesis, preferring
/// the shorter one on ties. 0 without references.
pub fn closest_ref_len<R: AsRef<[Token]>>(hyp_len: usize, references: &[R]) -> usize {
    references
        .iter()
        .map(|r| r.as_ref().len())
        .min_by_key(|&len| (len.abs_diff(hyp_len), len))
        .unwrap_or(0)
}

/// Turns hypotheses into rewards under one `ScoreConfig`.
///
/// For `approx_bleu` the scorer also owns the running history; everything
/// else is scored sentence by sentence.
#[derive(Debug, Clone)]
pub struct Scorer {
    config: ScoreConfig,
    online: OnlineBleu,
}

impl Scorer {
    pub fn new(config: ScoreConfig) -> Result<Self, ScoreError> {
        config.validate()?;
        let online =
            OnlineBleu::new(config.max_order, config.decay).with_weights(config.weights.clone());
        Ok(Scorer { config, online })
    }

    pub fn config(&self) -> &ScoreConfig {
        &self.config
    }

    pub fn online(&self) -> &OnlineBleu {
        &self.online
    }

    /// Clipped counts of `hyp` against `references`, with the hypothesis
    /// length and the closest reference length.
    pub fn sentence_counts<R: AsRef<[Token]>>(
        &self,
        hyp: &[Token],
        references: &[R],
    ) -> (NgramCounts, usize, usize) {
        let counts = multi_ref_ngram_counts(hyp, references, self.config.max_order);
        (counts, hyp.len(), closest_ref_len(hyp.len(), references))
    }

    pub fn score<R: AsRef<[Token]>>(&self, hyp: &[Token], references: &[R]) -> f64 {
        let (counts, hyp_len, ref_len) = self.sentence_counts(hyp, references);
        let score = match self.config.variant {
            ScoreVariant::ApproxBleu => self.online.score(&counts, hyp_len, ref_len),
            variant => variant.score(
                &counts,
                hyp_len,
                ref_len,
                self.config.weights(),
                self.config.stupid_floor,
            ),
        };
        trace!(
            "{} hyp_len={} ref_len={} score={:.4}",
            self.config.variant,
            hyp_len,
            ref_len,
            score
        );
        score
    }

    /// Adds the chosen hypothesis of a sentence to the approximate BLEU
    /// history. The other variants ignore the history.
    pub fn commit<R: AsRef<[Token]>>(&mut self, hyp: &[Token], references: &[R]) {
        let (counts, hyp_len, ref_len) = self.sentence_counts(hyp, references);
        self.online.update(&counts, hyp_len, ref_len);
    }

    pub fn reset_history(&mut self) {
        self.online.reset();
    }

    /// Scores every entry of a k-best list, each with its own counts.
    pub async fn score_kbest<R: AsRef<[Token]> + Sync>(
        &self,
        list: &KBestList,
        references: &[R],
    ) -> Vec<ScorePair> {
        let tasks = list.entries.iter().map(|entry| async move {
            ScorePair::new(entry.model_score, self.score(&entry.sentence, references))
        });
        let scores = join_all(tasks).await;
        if let Some(best) = scores.iter().map(|s| s.score).reduce(f64::max) {
            debug!("scored {} k-best entries, best {:.4}", scores.len(), best);
        }
        scores
    }

    /// Blocking form of `score_kbest` for synchronous training loops.
    ///
    /// Must not be called from inside a tokio runtime.
    pub fn score_kbest_blocking<R: AsRef<[Token]> + Sync>(
        &self,
        list: &KBestList,
        references: &[R],
    ) -> Vec<ScorePair> {
        RUNTIME.block_on(self.score_kbest(list, references))
    }

    /// Pulls the k-best list of `sentence_id` from `source` and scores it.
    pub fn rescore<S: SequenceSource, R: AsRef<[Token]> + Sync>(
        &self,
        source: &mut S,
        sentence_id: usize,
        references: &[R],
    ) -> Vec<ScorePair> {
        let list = source.kbest(sentence_id);
        self.score_kbest_blocking(&list, references)
    }

    /// Scores one hypothesis per reference set, pairwise.
    ///
    /// Panics if the batches differ in length.
    pub async fn score_batch(
        &self,
        hyp_batch: Vec<Sequence>,
        ref_batch: Vec<Vec<Sequence>>,
    ) -> Vec<f64> {
        assert_eq!(
            hyp_batch.len(),
            ref_batch.len(),
            "got {} hypotheses but {} reference sets",
            hyp_batch.len(),
            ref_batch.len()
        );
        let tasks = hyp_batch
            .iter()
            .zip(ref_batch.iter())
            .map(|(hyp, refs)| async move { self.score(hyp, refs) });
        join_all(tasks).await
    }

    /// Blocking form of `score_batch`.
    pub fn score_batch_blocking(
        &self,
        hyp_batch: Vec<Sequence>,
        ref_batch: Vec<Vec<Sequence>>,
    ) -> Vec<f64> {
        RUNTIME.block_on(self.score_batch(hyp_batch, ref_batch))
    }
}
