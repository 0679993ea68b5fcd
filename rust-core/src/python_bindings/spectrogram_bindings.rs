//! Python bindings for the auditory spectrogram

use super::filterbank_bindings::PyFilterbank;
use crate::cochlea;
use crate::filterbank::Filterbank;
use numpy::{IntoPyArray, PyArray1, PyArray2, PyReadonlyArray1};
use pyo3::prelude::*;

/// Fast auditory spectrogram
///
/// Args:
///     x: acoustic input signal (1-D)
///     srate: sampling rate in Hz; resampled to 16 kHz if different
///     paras: [frmlen, tc, fac, shft], defaults to [8, 8, -2, -1]
///     srate_out: output row rate in Hz; None keeps one row per frame
///     filterbank: pre-loaded Filterbank; None loads the default
///
/// Returns:
///     (N, M-1) numpy array
#[pyfunction]
#[pyo3(signature = (x, srate, paras=vec![8.0, 8.0, -2.0, -1.0], srate_out=None, filterbank=None))]
pub fn wav2aud<'py>(
    py: Python<'py>,
    x: PyReadonlyArray1<f64>,
    srate: u32,
    paras: Vec<f64>,
    srate_out: Option<f64>,
    filterbank: Option<PyFilterbank>,
) -> PyResult<&'py PyArray2<f64>> {
    let signal = x.as_array().to_vec();
    let filterbank = match filterbank {
        Some(fb) => fb.inner,
        None => Filterbank::shared_default()?,
    };

    let spectrogram = py.allow_threads(move || {
        crate::wav2aud(&signal, srate, &paras, srate_out, Some(filterbank))
    })?;

    Ok(spectrogram.into_pyarray(py))
}

/// Hair-cell nonlinearity applied element-wise
///
/// Args:
///     y: input signal
///     fac: nonlinear factor (> 0 logistic, 0 hard limiter, -1 rectifier, else linear)
#[pyfunction]
pub fn sigmoid<'py>(py: Python<'py>, y: PyReadonlyArray1<f64>, fac: f64) -> &'py PyArray1<f64> {
    let y = y.as_array().to_vec();
    PyArray1::from_vec(py, cochlea::sigmoid(&y, fac))
}
