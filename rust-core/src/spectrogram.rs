//! Auditory spectrogram entry point
//!
//! Wires preprocessing, the channel cascade and output-rate selection into a
//! single batch transform over an in-memory signal.

use crate::cochlea::{CascadeSettings, ChannelCascade};
use crate::config::{AuditoryParams, SpectrogramConfig};
use crate::error::{Result, SpectrogramError};
use crate::filterbank::Filterbank;
use crate::output::{resample_frames, MAX_OUTPUT_RATE};
use crate::preprocess::Preprocessor;
use ndarray::Array2;
use std::sync::Arc;
use tracing::debug;

/// Time × frequency response matrix, shape (frames × (M - 1))
#[derive(Debug, Clone, PartialEq)]
pub struct AuditorySpectrogram {
    data: Array2<f64>,
    frame_period_ms: f64,
    center_frequencies: Vec<f64>,
}

impl AuditorySpectrogram {
    /// Response matrix, frame-major
    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    pub fn into_array(self) -> Array2<f64> {
        self.data
    }

    pub fn num_frames(&self) -> usize {
        self.data.nrows()
    }

    pub fn num_channels(&self) -> usize {
        self.data.ncols()
    }

    /// Time between rows in ms
    pub fn frame_period_ms(&self) -> f64 {
        self.frame_period_ms
    }

    /// Center frequency of each column in Hz, adjusted for the octave shift
    pub fn center_frequencies(&self) -> &[f64] {
        &self.center_frequencies
    }
}

/// Reusable pipeline: parameters plus a shared filterbank
#[derive(Debug, Clone)]
pub struct AuditoryModel {
    params: AuditoryParams,
    output_rate: Option<f64>,
    filterbank: Arc<Filterbank>,
    parallel: bool,
}

impl AuditoryModel {
    /// Model with default parameters `[8, 8, -2, -1]`
    pub fn new(filterbank: Arc<Filterbank>) -> Self {
        Self {
            params: AuditoryParams::default(),
            output_rate: None,
            filterbank,
            parallel: false,
        }
    }

    /// Model from a loaded configuration, resolving its filterbank
    pub fn from_config(config: &SpectrogramConfig) -> Result<Self> {
        Ok(Self::new(config.filterbank()?)
            .with_params(config.params)?
            .with_output_rate(config.output_rate)
            .with_parallel(config.parallel))
    }

    pub fn with_params(mut self, params: AuditoryParams) -> Result<Self> {
        params.validate()?;
        self.params = params;
        Ok(self)
    }

    pub fn with_output_rate(mut self, output_rate: Option<f64>) -> Self {
        self.output_rate = output_rate;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn params(&self) -> &AuditoryParams {
        &self.params
    }

    pub fn filterbank(&self) -> &Arc<Filterbank> {
        &self.filterbank
    }

    /// Compute the auditory spectrogram of one signal
    pub fn compute(&self, signal: &[f64], sample_rate: u32) -> Result<AuditorySpectrogram> {
        if let Some(rate) = self.output_rate {
            if !(rate.is_finite() && rate > 0.0 && rate <= MAX_OUTPUT_RATE) {
                return Err(SpectrogramError::InvalidParameters(format!(
                    "output rate must be in (0, {MAX_OUTPUT_RATE}] Hz, got {rate}"
                )));
            }
        }

        let preprocessor = Preprocessor::new(self.params, self.filterbank.sample_rate());
        let x = preprocessor.prepare(signal, sample_rate)?;

        let settings = CascadeSettings::from_params(&self.params);
        debug!(
            samples = x.len(),
            compression = ?settings.compression,
            integration = ?settings.integration,
            "computing auditory spectrogram"
        );
        let frames = ChannelCascade::new(&self.filterbank, settings)
            .parallel(self.parallel)
            .run(&x)?;

        let data = resample_frames(frames, self.params.frame_length_ms, self.output_rate)?;
        let frame_period_ms = match self.output_rate {
            Some(rate) => 1000.0 / rate,
            None => self.params.frame_length_ms,
        };

        Ok(AuditorySpectrogram {
            data,
            frame_period_ms,
            center_frequencies: self
                .filterbank
                .output_center_frequencies(self.params.octave_shift),
        })
    }
}

/// Fast auditory spectrogram
///
/// # Arguments
/// * `signal` - Acoustic input samples
/// * `sample_rate` - Input rate in Hz; anything but 16 kHz is resampled
/// * `paras` - `[frame_length_ms, time_constant_ms, nonlinear_factor, octave_shift]`
/// * `output_rate` - Output row rate in Hz; `None` returns one row per frame
/// * `filterbank` - Pre-loaded filterbank; `None` loads the shared default
///
/// # Returns
/// Matrix of shape (frames × (M - 1))
pub fn wav2aud(
    signal: &[f64],
    sample_rate: u32,
    paras: &[f64],
    output_rate: Option<f64>,
    filterbank: Option<Arc<Filterbank>>,
) -> Result<Array2<f64>> {
    let params = AuditoryParams::from_slice(paras)?;
    let filterbank = match filterbank {
        Some(filterbank) => filterbank,
        None => Filterbank::shared_default()?,
    };

    AuditoryModel::new(filterbank)
        .with_params(params)?
        .with_output_rate(output_rate)
        .compute(signal, sample_rate)
        .map(AuditorySpectrogram::into_array)
}
