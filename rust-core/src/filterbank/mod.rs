//! Cochlear filterbank provider
//!
//! Holds the per-channel IIR coefficients the channel cascade runs on. A
//! filterbank is immutable once built and is meant to be loaded once and
//! shared (`Arc`) between pipeline runs.

pub mod coefficients;

pub use coefficients::FilterCoefficients;

use crate::error::{Result, SpectrogramError};
use crate::filters::{cochlear_center_frequencies, design_bandpass_iir, BandpassSpec};
use ndarray::ArrayView2;
use num_complex::Complex64;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Sample rate the reference coefficients were designed for
pub const NATIVE_SAMPLE_RATE: u32 = 16_000;

/// Channel count of the reference table (128 output channels)
pub const REFERENCE_CHANNELS: usize = 129;

/// Environment variable naming the default filterbank JSON file
pub const FILTERBANK_ENV: &str = "AUDSPEC_FILTERBANK";

static SHARED_DEFAULT: OnceCell<Arc<Filterbank>> = OnceCell::new();

/// Ordered cochlear filterbank, lowest to highest center frequency
///
/// The last channel is the terminal analysis channel: it only seeds lateral
/// inhibition and has no output column.
#[derive(Debug, Clone, PartialEq)]
pub struct Filterbank {
    sample_rate: u32,
    channels: Vec<FilterCoefficients>,
}

/// On-disk JSON layout
#[derive(Serialize, Deserialize)]
struct FilterbankFile {
    #[serde(default = "FilterbankFile::default_sample_rate")]
    sample_rate: u32,
    channels: Vec<FilterCoefficients>,
}

impl FilterbankFile {
    fn default_sample_rate() -> u32 {
        NATIVE_SAMPLE_RATE
    }
}

impl Filterbank {
    /// Build a filterbank from validated channels
    ///
    /// Needs at least two channels: one output channel plus the terminal one.
    pub fn new(sample_rate: u32, channels: Vec<FilterCoefficients>) -> Result<Self> {
        if sample_rate != NATIVE_SAMPLE_RATE {
            return Err(SpectrogramError::DataUnavailable(format!(
                "filterbank designed for {sample_rate} Hz, frame timing assumes {NATIVE_SAMPLE_RATE} Hz"
            )));
        }
        if channels.len() < 2 {
            return Err(SpectrogramError::DataUnavailable(format!(
                "filterbank needs at least 2 channels, got {}",
                channels.len()
            )));
        }
        for (index, channel) in channels.iter().enumerate() {
            channel.validate().map_err(|err| {
                SpectrogramError::DataUnavailable(format!("channel {index}: {err}"))
            })?;
        }
        Ok(Self {
            sample_rate,
            channels,
        })
    }

    /// Parse a packed complex coefficient table of shape (L, M)
    ///
    /// Column `m` describes channel `m`: `table[0, m].re` holds the order `p`,
    /// rows `1..=p+1` hold the feedforward coefficients in the real part and
    /// the feedback coefficients in the imaginary part.
    pub fn from_packed(table: ArrayView2<'_, Complex64>, center_hz: &[f64]) -> Result<Self> {
        let (rows, cols) = table.dim();
        if center_hz.len() != cols {
            return Err(SpectrogramError::DataUnavailable(format!(
                "{} center frequencies for {} channels",
                center_hz.len(),
                cols
            )));
        }

        let mut channels = Vec::with_capacity(cols);
        for (m, column) in table.columns().into_iter().enumerate() {
            let raw_order = column[0].re;
            if !(raw_order >= 0.0 && raw_order.fract() == 0.0) {
                return Err(SpectrogramError::DataUnavailable(format!(
                    "channel {m}: order {raw_order} is not a non-negative integer"
                )));
            }
            if raw_order + 2.0 > rows as f64 {
                return Err(SpectrogramError::DataUnavailable(format!(
                    "channel {m}: order {raw_order} needs {} rows, table has {rows}",
                    raw_order + 2.0
                )));
            }
            let order = raw_order as usize;

            let taps = column.slice(ndarray::s![1..order + 2]);
            let feedforward = taps.iter().map(|c| c.re).collect();
            let feedback = taps.iter().map(|c| c.im).collect();
            channels.push(FilterCoefficients::new(order, feedforward, feedback, center_hz[m])?);
        }

        Self::new(NATIVE_SAMPLE_RATE, channels)
    }

    /// Parse the JSON layout `{ "sample_rate", "channels": [...] }`
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let file: FilterbankFile = serde_json::from_reader(reader)
            .map_err(|err| SpectrogramError::DataUnavailable(format!("malformed JSON: {err}")))?;
        Self::new(file.sample_rate, file.channels)
    }

    /// Load a filterbank JSON file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| {
            SpectrogramError::DataUnavailable(format!("{}: {err}", path.display()))
        })?;
        let filterbank = Self::from_json_reader(BufReader::new(file))?;
        debug!(
            path = %path.display(),
            channels = filterbank.num_channels(),
            "loaded filterbank"
        );
        Ok(filterbank)
    }

    /// Load the filterbank named by `AUDSPEC_FILTERBANK`
    pub fn load_default() -> Result<Self> {
        let path = std::env::var_os(FILTERBANK_ENV).ok_or_else(|| {
            SpectrogramError::DataUnavailable(format!(
                "no filterbank supplied and {FILTERBANK_ENV} is not set"
            ))
        })?;
        Self::from_path(path)
    }

    /// Process-wide cached default filterbank
    ///
    /// Loaded on first success; failures are not cached, so a later call can
    /// succeed once the resource is available.
    pub fn shared_default() -> Result<Arc<Self>> {
        SHARED_DEFAULT
            .get_or_try_init(|| Self::load_default().map(Arc::new))
            .map(Arc::clone)
    }

    /// Synthesized filterbank with the reference channel layout
    ///
    /// 129 cascaded band-pass channels at 24 per octave, 180 Hz to 7246 Hz,
    /// designed at the native 16 kHz rate.
    pub fn cochlear() -> Result<Self> {
        Self::cochlear_with_channels(REFERENCE_CHANNELS)
    }

    /// Synthesized filterbank with the lowest `channels` reference channels
    pub fn cochlear_with_channels(channels: usize) -> Result<Self> {
        let sample_rate = NATIVE_SAMPLE_RATE as f64;
        let designed = cochlear_center_frequencies(channels)
            .into_iter()
            .map(|cf| design_bandpass_iir(&BandpassSpec::cochlear(cf, sample_rate)))
            .collect::<Result<Vec<_>>>()?;
        Self::new(NATIVE_SAMPLE_RATE, designed)
    }

    /// Serialize to the JSON layout read by `from_json_reader`
    pub fn to_json(&self) -> Result<String> {
        let file = FilterbankFile {
            sample_rate: self.sample_rate,
            channels: self.channels.clone(),
        };
        serde_json::to_string(&file)
            .map_err(|err| SpectrogramError::DataUnavailable(err.to_string()))
    }

    /// Coefficients of one channel
    pub fn channel(&self, index: usize) -> Option<&FilterCoefficients> {
        self.channels.get(index)
    }

    pub fn channels(&self) -> &[FilterCoefficients] {
        &self.channels
    }

    /// Total channel count M, terminal channel included
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Output column count M - 1
    pub fn num_output_channels(&self) -> usize {
        self.channels.len() - 1
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Center frequencies of all M channels at the native rate
    pub fn center_frequencies(&self) -> Vec<f64> {
        self.channels.iter().map(|c| c.center_hz()).collect()
    }

    /// Center frequencies labelling the M - 1 output columns
    ///
    /// An octave shift rescales the effective sample rate by `2^shift`, and
    /// with it every channel's center frequency.
    pub fn output_center_frequencies(&self, octave_shift: i32) -> Vec<f64> {
        let scale = 2f64.powi(octave_shift);
        self.channels[..self.num_output_channels()]
            .iter()
            .map(|c| c.center_hz() * scale)
            .collect()
    }
}
