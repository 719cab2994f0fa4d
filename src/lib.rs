//! BLEU-family rewards for online training of a translation system.
//!
//! Hypotheses and references come in as token id sequences; clipped n-gram
//! counts are turned into standard, stupid, smoothed or approximate BLEU.

pub mod bleu;
pub mod config;
pub mod counts;
pub mod error;
pub mod kbest;
pub mod matching;
pub mod ngram;
pub mod online;
pub mod score;
pub mod types;

#[cfg(feature = "python")]
mod python;

pub use bleu::{
    approx_bleu, bleu, brevity_penalty, smooth_bleu, stupid_bleu, stupid_bleu_with_floor,
    ScoreVariant, DEFAULT_STUPID_FLOOR,
};
pub use config::ScoreConfig;
pub use counts::NgramCounts;
pub use error::ScoreError;
pub use kbest::{KBestEntry, KBestList, ScorePair, SequenceSource, StaticKBest};
pub use matching::{multi_ref_ngram_counts, ngram_counts};
pub use ngram::extract_ngrams;
pub use online::OnlineBleu;
pub use score::Scorer;
pub use types::{Sequence, Token, Vocabulary};
