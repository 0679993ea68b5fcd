//! Python bindings for the cochlear filterbank

use crate::filterbank::Filterbank;
use num_complex::Complex64;
use numpy::{PyArray1, PyReadonlyArray1, PyReadonlyArray2};
use pyo3::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;

/// Cochlear filterbank exposed to Python
///
/// Cheap to clone: the coefficient table is shared, so one loaded filterbank
/// can be passed to many `wav2aud` calls.
#[pyclass(name = "Filterbank")]
#[derive(Clone)]
pub struct PyFilterbank {
    pub(crate) inner: Arc<Filterbank>,
}

#[pymethods]
impl PyFilterbank {
    /// Load the filterbank named by the AUDSPEC_FILTERBANK environment variable
    #[staticmethod]
    fn load_default() -> PyResult<Self> {
        Ok(Self {
            inner: Filterbank::shared_default()?,
        })
    }

    /// Load a filterbank JSON file
    #[staticmethod]
    fn from_path(path: PathBuf) -> PyResult<Self> {
        Ok(Self {
            inner: Arc::new(Filterbank::from_path(path)?),
        })
    }

    /// Build from a packed complex COCHBA table and its center frequencies
    ///
    /// Args:
    ///     cochba: (L, M) complex array, row 0 holds each channel's order,
    ///         then feedforward (real) and feedback (imag) coefficients
    ///     cf: M center frequencies in Hz
    #[staticmethod]
    fn from_cochba(cochba: PyReadonlyArray2<Complex64>, cf: PyReadonlyArray1<f64>) -> PyResult<Self> {
        let cf = cf.as_array().to_vec();
        Ok(Self {
            inner: Arc::new(Filterbank::from_packed(cochba.as_array(), &cf)?),
        })
    }

    /// Synthesized 129-channel filterbank with the reference layout
    #[staticmethod]
    fn cochlear() -> PyResult<Self> {
        Ok(Self {
            inner: Arc::new(Filterbank::cochlear()?),
        })
    }

    /// Center frequencies of the output channels in Hz
    ///
    /// Args:
    ///     octave_shift: the shift used for the spectrogram (-1 gives the 8 kHz labels)
    #[pyo3(signature = (octave_shift=0))]
    fn center_frequencies<'py>(&self, py: Python<'py>, octave_shift: i32) -> &'py PyArray1<f64> {
        PyArray1::from_vec(py, self.inner.output_center_frequencies(octave_shift))
    }

    /// Total channel count, terminal channel included
    fn num_channels(&self) -> usize {
        self.inner.num_channels()
    }

    fn __len__(&self) -> usize {
        self.inner.num_output_channels()
    }
}
