use crate::error::{MatrixError, Result};
use crate::matrix::matrix::Matrix;
use crate::matrix::row::Row;
use crate::matrix::trace::{PrintSink, Verbosity};
use crate::rings::fraction::Fraction;
use num_bigint::BigInt;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyType;

impl From<MatrixError> for PyErr {
    fn from(error: MatrixError) -> PyErr {
        PyValueError::new_err(error.to_string())
    }
}

/// Anything exposing `numerator`/`denominator`, e.g. `fractions.Fraction`.
#[derive(FromPyObject)]
pub struct Rational {
    #[pyo3(attribute("numerator"))]
    numerator: BigInt,
    #[pyo3(attribute("denominator"))]
    denominator: BigInt,
}

/// A matrix cell as given from Python: `3`, `Fraction(1, 3)`, `0.5` or `"-2/3"`.
// Variants are tried in order; `Int` must come before `Float` so that large
// ints are never rounded.
#[derive(FromPyObject)]
pub enum Cell {
    Int(BigInt),
    Ratio(Rational),
    Float(f64),
    Text(String),
}

impl TryFrom<Cell> for Fraction {
    type Error = MatrixError;

    fn try_from(cell: Cell) -> Result<Fraction> {
        match cell {
            Cell::Int(value) => Ok(value.into()),
            Cell::Ratio(value) => Fraction::try_new(value.numerator, value.denominator),
            Cell::Float(value) => Fraction::try_from(value),
            Cell::Text(value) => value.parse(),
        }
    }
}

fn to_python_fraction(py: Python<'_>, value: &Fraction) -> PyResult<PyObject> {
    let fraction = py.import("fractions")?.getattr("Fraction")?;
    Ok(fraction
        .call1((value.numer().clone(), value.denom().clone()))?
        .unbind())
}

#[derive(Debug, Clone)]
#[pyclass(frozen, name = "Matrix")]
pub struct PyMatrix {
    inner: Matrix,
}

#[pymethods]
impl PyMatrix {
    #[classmethod]
    pub fn from_list(_cls: &Bound<PyType>, lines: Vec<Vec<Cell>>) -> PyResult<Self> {
        let rows = lines
            .into_iter()
            .map(|line| line.into_iter().map(Fraction::try_from).collect())
            .collect::<Result<Vec<Row>>>()?;
        Ok(PyMatrix {
            inner: Matrix::from_rows(rows)?,
        })
    }

    /// Cells in their canonical `n` / `n/d` string form.
    pub fn to_list(&self) -> Vec<Vec<String>> {
        self.inner
            .iter()
            .map(|row| row.iter().map(|n| n.to_string()).collect())
            .collect()
    }

    pub fn dim(&self) -> (usize, usize) {
        self.inner.dim()
    }

    /// The determinant as a `fractions.Fraction`.
    #[pyo3(signature = (verbose = 0))]
    pub fn det(&self, py: Python<'_>, verbose: u8) -> PyResult<PyObject> {
        let verbosity = Verbosity::try_from(verbose)?;
        let det = self.inner.det(verbosity, &mut PrintSink)?;
        to_python_fraction(py, &det)
    }

    #[pyo3(name = "ref", signature = (verbose = 0))]
    pub fn echelon_form(&self, verbose: u8) -> PyResult<PyMatrix> {
        let verbosity = Verbosity::try_from(verbose)?;
        Ok(PyMatrix {
            inner: self.inner.echelon_form(verbosity, &mut PrintSink),
        })
    }

    #[pyo3(signature = (verbose = 0))]
    pub fn rref(&self, verbose: u8) -> PyResult<PyMatrix> {
        let verbosity = Verbosity::try_from(verbose)?;
        Ok(PyMatrix {
            inner: self.inner.rref(verbosity, &mut PrintSink),
        })
    }

    pub fn __str__(&self) -> String {
        self.inner.to_string()
    }
}

/// Exact Gaussian elimination for Python.
#[pymodule]
fn gauss_exact(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyMatrix>()?;
    Ok(())
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
