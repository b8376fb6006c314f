use crate::error::{MatrixError, Result};
use crate::rings::fraction::Fraction;
use itertools::Itertools;
use num_traits::Zero;
use rayon::prelude::*;
use std::fmt;
use std::ops::Index;

/// Rows at least this long are combined element-wise on the rayon pool.
pub const PARALLEL_ROW_THRESHOLD: usize = 256;

/// Fixed-length sequence of exact numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Row {
    nums: Vec<Fraction>,
}

impl Row {
    pub fn new(nums: Vec<Fraction>) -> Self {
        Row { nums }
    }

    pub fn len(&self) -> usize {
        self.nums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nums.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Fraction> {
        self.nums.iter()
    }

    pub fn to_vec(&self) -> Vec<Fraction> {
        self.nums.clone()
    }

    pub fn negate(&self) -> Row {
        self.map(|x| -x)
    }

    pub fn add(&self, other: &Row) -> Result<Row> {
        if self.len() != other.len() {
            return Err(MatrixError::LengthMismatch {
                left: self.len(),
                right: other.len(),
            });
        }
        Ok(self.zip_with(other, |a, b| a + b))
    }

    pub fn subtract(&self, other: &Row) -> Result<Row> {
        self.add(&other.negate())
    }

    pub fn scale(&self, k: &Fraction) -> Row {
        self.map(|x| x * k)
    }

    pub fn divide(&self, k: &Fraction) -> Result<Row> {
        Ok(self.scale(&k.checked_recip()?))
    }

    /// Index of the first non-zero entry.
    pub fn pivot(&self) -> Option<usize> {
        self.nums.iter().position(|x| !x.is_zero())
    }

    pub fn is_zero(&self) -> bool {
        self.pivot().is_none()
    }

    /// `self + other * factor`, the elimination step. Callers guarantee equal
    /// lengths (every row of a matrix has the same width).
    pub(crate) fn add_scaled(&self, other: &Row, factor: &Fraction) -> Row {
        debug_assert_eq!(self.len(), other.len());
        self.zip_with(other, |a, b| a + &(b * factor))
    }

    fn map<F>(&self, f: F) -> Row
    where
        F: Fn(&Fraction) -> Fraction + Sync + Send,
    {
        let nums = if self.len() >= PARALLEL_ROW_THRESHOLD {
            self.nums.par_iter().map(f).collect()
        } else {
            self.nums.iter().map(f).collect()
        };
        Row { nums }
    }

    fn zip_with<F>(&self, other: &Row, f: F) -> Row
    where
        F: Fn(&Fraction, &Fraction) -> Fraction + Sync + Send,
    {
        let nums = if self.len() >= PARALLEL_ROW_THRESHOLD {
            self.nums
                .par_iter()
                .zip(other.nums.par_iter())
                .map(|(a, b)| f(a, b))
                .collect()
        } else {
            self.nums
                .iter()
                .zip(other.nums.iter())
                .map(|(a, b)| f(a, b))
                .collect()
        };
        Row { nums }
    }
}

impl Index<usize> for Row {
    type Output = Fraction;

    fn index(&self, index: usize) -> &Fraction {
        &self.nums[index]
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = &'a Fraction;
    type IntoIter = std::slice::Iter<'a, Fraction>;

    fn into_iter(self) -> Self::IntoIter {
        self.nums.iter()
    }
}

impl FromIterator<Fraction> for Row {
    fn from_iter<I: IntoIterator<Item = Fraction>>(iter: I) -> Self {
        Row {
            nums: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.nums.iter().join(", "))
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
