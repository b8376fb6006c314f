use crate::error::{MatrixError, Result};
use crate::matrix::row::Row;
use crate::matrix::trace::{TraceEvent, TraceSink, Tracer, Verbosity};
use crate::rings::fraction::Fraction;
use itertools::Itertools;
use num_traits::{One, Zero};
use std::collections::BTreeSet;
use std::fmt;
use std::ops::Index;
use tracing::{debug, trace};

/// Non-empty sequence of equal-length rows of exact numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Matrix {
    rows: Vec<Row>,
    cols: usize,
}

impl Matrix {
    pub fn new<R, I, T>(lines: R) -> Result<Matrix>
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = T>,
        T: Into<Fraction>,
    {
        Matrix::from_rows(
            lines
                .into_iter()
                .map(|line| line.into_iter().map(Into::<Fraction>::into).collect())
                .collect(),
        )
    }

    /// Every finite float is taken at its exact binary value.
    pub fn from_f64(lines: Vec<Vec<f64>>) -> Result<Matrix> {
        Matrix::from_rows(
            lines
                .into_iter()
                .map(|line| line.into_iter().map(Fraction::try_from).collect())
                .collect::<Result<Vec<Row>>>()?,
        )
    }

    pub fn from_rows(rows: Vec<Row>) -> Result<Matrix> {
        if rows.is_empty() {
            return Err(MatrixError::EmptyMatrix);
        }

        let lengths: BTreeSet<usize> = rows.iter().map(Row::len).collect();
        if lengths.len() > 1 {
            return Err(MatrixError::RaggedRows(lengths.into_iter().collect()));
        }

        let cols = rows[0].len();
        Ok(Matrix { rows, cols })
    }

    pub fn to_list(&self) -> Vec<Vec<Fraction>> {
        self.rows.iter().map(Row::to_vec).collect()
    }

    pub fn dim(&self) -> (usize, usize) {
        (self.rows.len(), self.cols)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.cols
    }

    pub fn is_square(&self) -> bool {
        self.rows.len() == self.cols
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    pub fn row(&self, i: usize) -> Option<&Row> {
        self.rows.get(i)
    }

    pub fn set_row(&mut self, i: usize, row: Row) -> Result<()> {
        self.check_row_index(i)?;
        if row.len() != self.cols {
            return Err(MatrixError::LengthMismatch {
                left: self.cols,
                right: row.len(),
            });
        }
        self.rows[i] = row;
        Ok(())
    }

    pub fn swap_rows(&mut self, i: usize, j: usize) -> Result<()> {
        self.check_row_index(i)?;
        self.check_row_index(j)?;
        self.rows.swap(i, j);
        Ok(())
    }

    /// The `i`-th column, top to bottom.
    pub fn col(&self, i: usize) -> Result<Vec<Fraction>> {
        if i >= self.cols {
            return Err(MatrixError::IndexOutOfBounds {
                index: i,
                len: self.cols,
            });
        }
        Ok(self.rows.iter().map(|row| row[i].clone()).collect())
    }

    pub fn transpose(&self) -> Matrix {
        Matrix {
            rows: (0..self.cols)
                .map(|c| self.rows.iter().map(|row| row[c].clone()).collect())
                .collect(),
            cols: self.rows.len(),
        }
    }

    fn check_row_index(&self, i: usize) -> Result<()> {
        if i >= self.rows.len() {
            return Err(MatrixError::IndexOutOfBounds {
                index: i,
                len: self.rows.len(),
            });
        }
        Ok(())
    }

    /// Each non-zero row starts strictly right of the one above, with a
    /// leading 1, and zero rows come last.
    pub fn is_row_echelon(&self) -> bool {
        let mut lead: Option<usize> = None;
        let mut seen_zero = false;

        for row in &self.rows {
            match row.pivot() {
                None => seen_zero = true,
                Some(pivot_col) => {
                    if seen_zero || lead.is_some_and(|prev| pivot_col <= prev) {
                        return false;
                    }
                    if !row[pivot_col].is_one() {
                        return false;
                    }
                    lead = Some(pivot_col);
                }
            }
        }
        true
    }

    pub fn is_reduced_row_echelon(&self) -> bool {
        self.is_row_echelon()
            && self.rows.iter().enumerate().all(|(i, row)| match row.pivot() {
                None => true,
                Some(pivot_col) => self
                    .rows
                    .iter()
                    .enumerate()
                    .all(|(r, other)| r == i || other[pivot_col].is_zero()),
            })
    }

    /// Determinant by elimination to upper-triangular form. The pivot of
    /// column `i` is the first row at or below `i` with a non-zero entry
    /// there; each swap flips the sign.
    pub fn det<S>(&self, verbosity: Verbosity, sink: &mut S) -> Result<Fraction>
    where
        S: TraceSink + ?Sized,
    {
        if !self.is_square() {
            return Err(MatrixError::NotSquare(self.dim()));
        }
        debug!(dim = ?self.dim(), ?verbosity, "determinant");

        let n = self.rows.len();
        let mut tracer = Tracer::new(verbosity, sink);
        let mut new = self.clone();
        let mut negate = false;

        tracer.initial(&new);

        for i in 0..n {
            // Column with no pivot leaves a zero on the diagonal.
            let Some(k) = (i..n).find(|&k| !new.rows[k][i].is_zero()) else {
                trace!(column = i, "no pivot");
                continue;
            };
            trace!(column = i, pivot_row = k, "pivot");

            if k != i {
                new.rows.swap(i, k);
                negate = !negate;
                tracer.step(TraceEvent::Swap { a: i, b: k }, &new);
            }

            let pivot = new.rows[i][i].clone();

            for j in i + 1..n {
                let useful = !new.rows[j][i].is_zero() && !new.rows[i].is_zero();
                let factor = -(&new.rows[j][i] / &pivot);

                new.rows[j] = new.rows[j].add_scaled(&new.rows[i], &factor);

                if useful {
                    tracer.step(
                        TraceEvent::Combine {
                            target: j,
                            source: i,
                            factor,
                        },
                        &new,
                    );
                }
            }

            tracer.iteration_done(&new);
        }

        let product: Fraction = (0..n).map(|c| new.rows[c][c].clone()).product();
        let det = if negate { -product } else { product };
        debug!(%det, "determinant done");
        Ok(det)
    }

    /// Row-echelon form. The row brought to position `i` is the one among
    /// `i..` with the leftmost pivot, the earliest such row on ties; its
    /// pivot is then scaled to 1.
    pub fn echelon_form<S>(&self, verbosity: Verbosity, sink: &mut S) -> Matrix
    where
        S: TraceSink + ?Sized,
    {
        debug!(dim = ?self.dim(), ?verbosity, "row echelon form");

        let n = self.rows.len();
        let mut tracer = Tracer::new(verbosity, sink);
        let mut new = self.clone();

        tracer.initial(&new);

        for i in 0..n {
            let Some((pivot_ind, pivot_row)) = (i..n)
                .filter_map(|r| new.rows[r].pivot().map(|p| (p, r)))
                .min()
            else {
                continue;
            };
            trace!(row = i, pivot_row, pivot_ind, "pivot");

            let pivot = new.rows[pivot_row][pivot_ind].clone();
            new.rows.swap(i, pivot_row);

            if pivot_row != i {
                tracer.step(TraceEvent::Swap { a: i, b: pivot_row }, &new);
            }

            // `pivot` is the leading entry of a non-zero row.
            let inverse = &Fraction::one() / &pivot;
            new.rows[i] = new.rows[i].scale(&inverse);

            if !pivot.is_one() {
                tracer.step(
                    TraceEvent::Scale {
                        row: i,
                        factor: inverse,
                    },
                    &new,
                );
            }

            for j in i + 1..n {
                let useful = !new.rows[j][pivot_ind].is_zero() && !new.rows[i].is_zero();
                let factor = -&new.rows[j][pivot_ind];

                new.rows[j] = new.rows[j].add_scaled(&new.rows[i], &factor);

                if useful {
                    tracer.step(
                        TraceEvent::Combine {
                            target: j,
                            source: i,
                            factor,
                        },
                        &new,
                    );
                }
            }

            tracer.iteration_done(&new);
        }

        new
    }

    /// Reduced row-echelon form: `echelon_form` followed by clearing every
    /// pivot column above its pivot. Only this upward pass is traced here.
    pub fn rref<S>(&self, verbosity: Verbosity, sink: &mut S) -> Matrix
    where
        S: TraceSink + ?Sized,
    {
        let mut new = self.echelon_form(verbosity, &mut *sink);
        debug!(dim = ?self.dim(), ?verbosity, "back substitution");

        let n = new.rows.len();
        let mut tracer = Tracer::new(verbosity, sink);

        for i in 1..n {
            let Some(pivot_pos) = new.rows[i].pivot() else {
                continue;
            };
            let pivot = new.rows[i][pivot_pos].clone();

            for j in 0..i {
                let useful = !new.rows[j][pivot_pos].is_zero() && !new.rows[i].is_zero();
                let factor = -(&new.rows[j][pivot_pos] / &pivot);

                new.rows[j] = new.rows[j].add_scaled(&new.rows[i], &factor);

                if useful {
                    tracer.step(
                        TraceEvent::Combine {
                            target: j,
                            source: i,
                            factor,
                        },
                        &new,
                    );
                }
            }

            tracer.iteration_done(&new);
        }

        new
    }

    pub fn determinant(&self) -> Result<Fraction> {
        self.det(Verbosity::Silent, &mut ())
    }

    pub fn row_echelon(&self) -> Matrix {
        self.echelon_form(Verbosity::Silent, &mut ())
    }

    pub fn reduced_row_echelon(&self) -> Matrix {
        self.rref(Verbosity::Silent, &mut ())
    }
}

impl Index<usize> for Matrix {
    type Output = Row;

    fn index(&self, index: usize) -> &Row {
        &self.rows[index]
    }
}

impl<'a> IntoIterator for &'a Matrix {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

// Every cell is left-aligned and padded to the widest number.
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(|n| n.to_string()).collect())
            .collect();
        let max_len = cells.iter().flatten().map(String::len).max().unwrap_or(0);

        let lines: Vec<String> = cells
            .iter()
            .map(|row| {
                format!(
                    "| {} |",
                    row.iter()
                        .map(|s| format!("{:<width$}", s, width = max_len))
                        .join(" ")
                )
            })
            .collect();
        let header = "-".repeat(lines.iter().map(String::len).max().unwrap_or(0));

        write!(f, "{}\n{}\n{}", header, lines.join("\n"), header)
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
