//! PyO3 bindings for Python integration

use crate::error::SpectrogramError;
use pyo3::exceptions::{PyArithmeticError, PyIOError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;

mod filterbank_bindings;
mod spectrogram_bindings;

impl From<SpectrogramError> for PyErr {
    fn from(err: SpectrogramError) -> Self {
        let message = err.to_string();
        match err {
            SpectrogramError::InvalidParameters(_) => PyValueError::new_err(message),
            SpectrogramError::DataUnavailable(_) => PyIOError::new_err(message),
            SpectrogramError::NumericDegeneracy { .. } => PyArithmeticError::new_err(message),
            SpectrogramError::Resample(_) => PyRuntimeError::new_err(message),
        }
    }
}

/// Python module definition
#[pymodule]
fn auditory_spectrogram(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<filterbank_bindings::PyFilterbank>()?;
    m.add_function(wrap_pyfunction!(spectrogram_bindings::wav2aud, m)?)?;
    m.add_function(wrap_pyfunction!(spectrogram_bindings::sigmoid, m)?)?;

    Ok(())
}
