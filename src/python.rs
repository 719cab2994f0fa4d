use numpy::{IntoPyArray, PyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::bleu::{ScoreVariant, DEFAULT_STUPID_FLOOR};
use crate::config::{ScoreConfig, DEFAULT_DECAY, DEFAULT_MAX_ORDER};
use crate::error::ScoreError;
use crate::kbest::{FeatureVector, KBestEntry, KBestList};
use crate::score::Scorer;
use crate::types::{Sequence, Token};

impl From<ScoreError> for PyErr {
    fn from(e: ScoreError) -> PyErr {
        PyValueError::new_err(e.to_string())
    }
}

fn build_scorer(
    variant: &str,
    max_order: usize,
    weights: Option<Vec<f64>>,
    stupid_floor: f64,
    decay: f64,
) -> Result<Scorer, ScoreError> {
    let variant: ScoreVariant = variant.parse()?;
    let mut config = ScoreConfig::new(variant)
        .with_max_order(max_order)
        .with_stupid_floor(stupid_floor)
        .with_decay(decay);
    config.weights = weights;
    Scorer::new(config)
}

fn to_sequences(batch: Vec<Vec<Token>>) -> Vec<Sequence> {
    batch.into_iter().map(Sequence::from).collect()
}

/// Reward of one hypothesis against its references
#[pyfunction]
#[pyo3(signature = (hyp, refs, variant="stupid_bleu", max_order=DEFAULT_MAX_ORDER, weights=None))]
fn sentence_score(
    hyp: Vec<Token>,
    refs: Vec<Vec<Token>>,
    variant: &str,
    max_order: usize,
    weights: Option<Vec<f64>>,
) -> PyResult<f64> {
    let scorer = build_scorer(variant, max_order, weights, DEFAULT_STUPID_FLOOR, DEFAULT_DECAY)?;
    Ok(scorer.score(&hyp, &refs))
}

/// Rewards of hyps[i] against refs[i], as a numpy array
#[pyfunction]
#[pyo3(signature = (hyps, refs, variant="stupid_bleu", max_order=DEFAULT_MAX_ORDER, weights=None))]
fn score_batch<'py>(
    py: Python<'py>,
    hyps: Vec<Vec<Token>>,
    refs: Vec<Vec<Vec<Token>>>,
    variant: &str,
    max_order: usize,
    weights: Option<Vec<f64>>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    if hyps.len() != refs.len() {
        return Err(PyValueError::new_err(format!(
            "got {} hypotheses but {} reference sets",
            hyps.len(),
            refs.len()
        )));
    }
    let scorer = build_scorer(variant, max_order, weights, DEFAULT_STUPID_FLOOR, DEFAULT_DECAY)?;
    let hyps = to_sequences(hyps);
    let refs: Vec<Vec<Sequence>> = refs.into_iter().map(to_sequences).collect();

    let scores = py.allow_threads(|| scorer.score_batch_blocking(hyps, refs));
    Ok(scores.into_pyarray(py))
}

/// Stateful scorer for a Python-driven training loop.
#[pyclass(name = "Scorer")]
struct PyScorer {
    inner: Scorer,
}

#[pymethods]
impl PyScorer {
    #[new]
    #[pyo3(signature = (variant="stupid_bleu", max_order=DEFAULT_MAX_ORDER, weights=None, stupid_floor=DEFAULT_STUPID_FLOOR, decay=DEFAULT_DECAY))]
    fn new(
        variant: &str,
        max_order: usize,
        weights: Option<Vec<f64>>,
        stupid_floor: f64,
        decay: f64,
    ) -> PyResult<Self> {
        Ok(PyScorer {
            inner: build_scorer(variant, max_order, weights, stupid_floor, decay)?,
        })
    }

    #[getter]
    fn variant(&self) -> String {
        self.inner.config().variant.to_string()
    }

    fn score(&self, hyp: Vec<Token>, refs: Vec<Vec<Token>>) -> f64 {
        self.inner.score(&hyp, &refs)
    }

    /// Scores a k-best list; `model_scores[i]` belongs to `hyps[i]`.
    fn score_kbest<'py>(
        &self,
        py: Python<'py>,
        hyps: Vec<Vec<Token>>,
        model_scores: Vec<f64>,
        refs: Vec<Vec<Token>>,
    ) -> PyResult<Bound<'py, PyArray1<f64>>> {
        if hyps.len() != model_scores.len() {
            return Err(PyValueError::new_err(format!(
                "got {} hypotheses but {} model scores",
                hyps.len(),
                model_scores.len()
            )));
        }
        let list = KBestList::new(
            hyps.into_iter()
                .zip(model_scores)
                .map(|(h, s)| KBestEntry::new(Sequence::from(h), FeatureVector::new(), s))
                .collect(),
        );
        let scorer = &self.inner;
        let pairs = py.allow_threads(|| scorer.score_kbest_blocking(&list, &refs));
        let rewards: Vec<f64> = pairs.into_iter().map(|p| p.score).collect();
        Ok(rewards.into_pyarray(py))
    }

    fn commit(&mut self, hyp: Vec<Token>, refs: Vec<Vec<Token>>) {
        self.inner.commit(&hyp, &refs);
    }

    fn reset_history(&mut self) {
        self.inner.reset_history();
    }

    /// (clipped, total) per order, for debugging
    fn ngram_counts(&self, hyp: Vec<Token>, refs: Vec<Vec<Token>>) -> (Vec<f64>, Vec<f64>) {
        let (counts, _, _) = self.inner.sentence_counts(&hyp, &refs);
        (counts.clipped_counts().to_vec(), counts.total_counts().to_vec())
    }
}

#[pymodule]
fn bleureward(m: &Bound<'_, PyModule>) -> PyResult<()> {
    let _ = env_logger::try_init();
    m.add_function(wrap_pyfunction!(sentence_score, m)?)?;
    m.add_function(wrap_pyfunction!(score_batch, m)?)?;
    m.add_class::<PyScorer>()?;
    Ok(())
}
