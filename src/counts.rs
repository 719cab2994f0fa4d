use std::fmt;
use std::ops::AddAssign;

/// Count type. Fractional so a decayed history can be held in the same shape.
pub type Count = f64;

/// Clipped and total n-gram counts for orders `1..=max_order`.
///
/// Index `i` holds order `i + 1`. Both arrays only grow until `reset`.
#[derive(Debug, Clone, PartialEq)]
pub struct NgramCounts {
    max_order: usize,
    clipped: Vec<Count>,
    total: Vec<Count>,
}

impl NgramCounts {
    pub fn new(max_order: usize) -> Self {
        NgramCounts {
            max_order,
            clipped: vec![0.0; max_order],
            total: vec![0.0; max_order],
        }
    }

    pub fn max_order(&self) -> usize {
        self.max_order
    }

    pub fn clipped(&self, i: usize) -> Count {
        self.clipped[i]
    }

    pub fn total(&self, i: usize) -> Count {
        self.total[i]
    }

    pub fn clipped_counts(&self) -> &[Count] {
        &self.clipped
    }

    pub fn total_counts(&self) -> &[Count] {
        &self.total
    }

    /// Records one n-gram type seen `count` times in the hypothesis and
    /// `ref_count` times in the reference, at order index `i`.
    pub fn add(&mut self, count: usize, ref_count: usize, i: usize) {
        assert!(
            i < self.max_order,
            "order index {} out of range for max order {}",
            i,
            self.max_order
        );
        self.clipped[i] += count.min(ref_count) as Count;
        self.total[i] += count as Count;
    }

    pub fn reset(&mut self) {
        self.clipped.iter_mut().for_each(|c| *c = 0.0);
        self.total.iter_mut().for_each(|c| *c = 0.0);
    }

    /// True when no n-gram of any order has been recorded.
    pub fn is_empty(&self) -> bool {
        self.total.iter().all(|&t| t == 0.0)
    }

    /// A copy with every count multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> NgramCounts {
        NgramCounts {
            max_order: self.max_order,
            clipped: self.clipped.iter().map(|c| c * factor).collect(),
            total: self.total.iter().map(|t| t * factor).collect(),
        }
    }
}

impl AddAssign<&NgramCounts> for NgramCounts {
    fn add_assign(&mut self, rhs: &NgramCounts) {
        assert_eq!(
            self.max_order, rhs.max_order,
            "cannot merge n-gram counts of different max order"
        );
        for i in 0..self.max_order {
            self.clipped[i] += rhs.clipped[i];
            self.total[i] += rhs.total[i];
        }
    }
}

impl AddAssign<NgramCounts> for NgramCounts {
    fn add_assign(&mut self, rhs: NgramCounts) {
        *self += &rhs;
    }
}

impl fmt::Display for NgramCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.max_order {
            writeln!(f, "{}grams (clipped):\t{}", i + 1, self.clipped[i])?;
            writeln!(f, "{}grams:\t\t\t{}", i + 1, self.total[i])?;
        }
        Ok(())
    }
}
