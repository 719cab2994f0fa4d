use std::collections::HashMap;

use crate::types::Sequence;

/// Sparse feature vector of one derivation, keyed by feature id.
pub type FeatureVector = HashMap<usize, f64>;

/// One derivation from the decoder's k-best list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KBestEntry {
    pub sentence: Sequence,
    pub features: FeatureVector,
    /// Score the decoder assigned to this derivation.
    pub model_score: f64,
}

impl KBestEntry {
    pub fn new(sentence: Sequence, features: FeatureVector, model_score: f64) -> Self {
        KBestEntry {
            sentence,
            features,
            model_score,
        }
    }
}

/// Up to k derivations for one input sentence, best first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KBestList {
    pub entries: Vec<KBestEntry>,
}

impl KBestList {
    pub fn new(entries: Vec<KBestEntry>) -> Self {
        KBestList { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn sentences(&self) -> impl Iterator<Item = &Sequence> {
        self.entries.iter().map(|e| &e.sentence)
    }
}

/// Model score and reward of one k-best entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScorePair {
    pub model_score: f64,
    pub score: f64,
}

impl ScorePair {
    pub fn new(model_score: f64, score: f64) -> Self {
        ScorePair { model_score, score }
    }
}

/// Anything that can hand out the k-best derivations of a translated
/// sentence, typically an observer attached to the decoder.
pub trait SequenceSource {
    fn kbest(&mut self, sentence_id: usize) -> KBestList;
}

/// In-memory source holding precomputed lists.
#[derive(Debug, Clone, Default)]
pub struct StaticKBest {
    k: usize,
    lists: HashMap<usize, KBestList>,
}

impl StaticKBest {
    pub fn new(k: usize) -> Self {
        StaticKBest {
            k,
            lists: HashMap::new(),
        }
    }

    pub fn insert(&mut self, sentence_id: usize, list: KBestList) {
        self.lists.insert(sentence_id, list);
    }
}

impl SequenceSource for StaticKBest {
    /// Returns at most k entries; unknown sentences give an empty list.
    fn kbest(&mut self, sentence_id: usize) -> KBestList {
        let mut list = self.lists.get(&sentence_id).cloned().unwrap_or_default();
        list.entries.truncate(self.k);
        list
    }
}
