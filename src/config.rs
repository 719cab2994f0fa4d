use crate::bleu::{ScoreVariant, DEFAULT_STUPID_FLOOR};
use crate::error::ScoreError;

pub const DEFAULT_MAX_ORDER: usize = 4;
pub const DEFAULT_DECAY: f64 = 0.9;

/// Everything a caller can tune about reward computation.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreConfig {
    /// Highest n-gram order counted.
    pub max_order: usize,
    /// Per-order weights; uniform when `None`.
    pub weights: Option<Vec<f64>>,
    pub variant: ScoreVariant,
    /// Numerator of the precision given to zero-match orders by stupid BLEU.
    pub stupid_floor: f64,
    /// Factor applied to the approximate BLEU history before each update.
    pub decay: f64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        ScoreConfig {
            max_order: DEFAULT_MAX_ORDER,
            weights: None,
            variant: ScoreVariant::StupidBleu,
            stupid_floor: DEFAULT_STUPID_FLOOR,
            decay: DEFAULT_DECAY,
        }
    }
}

impl ScoreConfig {
    pub fn new(variant: ScoreVariant) -> Self {
        ScoreConfig {
            variant,
            ..Self::default()
        }
    }

    pub fn with_max_order(mut self, max_order: usize) -> Self {
        self.max_order = max_order;
        self
    }

    pub fn with_weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn with_stupid_floor(mut self, floor: f64) -> Self {
        self.stupid_floor = floor;
        self
    }

    pub fn with_decay(mut self, decay: f64) -> Self {
        self.decay = decay;
        self
    }

    pub fn validate(&self) -> Result<(), ScoreError> {
        if self.max_order == 0 {
            return Err(ScoreError::ZeroOrder);
        }
        if let Some(weights) = &self.weights {
            if weights.len() != self.max_order {
                return Err(ScoreError::WeightCount {
                    expected: self.max_order,
                    found: weights.len(),
                });
            }
            for (i, &weight) in weights.iter().enumerate() {
                if !weight.is_finite() || weight < 0.0 {
                    return Err(ScoreError::InvalidWeight {
                        order: i + 1,
                        weight,
                    });
                }
            }
            if weights.iter().sum::<f64>() == 0.0 {
                return Err(ScoreError::ZeroWeights);
            }
        }
        if !self.stupid_floor.is_finite() || self.stupid_floor <= 0.0 {
            return Err(ScoreError::InvalidFloor(self.stupid_floor));
        }
        if !(self.decay > 0.0 && self.decay <= 1.0) {
            return Err(ScoreError::InvalidDecay(self.decay));
        }
        Ok(())
    }

    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }
}
