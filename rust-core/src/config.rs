//! Pipeline parameters and file-based configuration

use crate::cochlea::Compression;
use crate::error::{Result, SpectrogramError};
use crate::filterbank::Filterbank;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Hair-cell membrane time constant in physical milliseconds
pub const HAIRCELL_TIME_CONSTANT_MS: f64 = 0.5;

/// Largest accepted octave shift magnitude
pub const MAX_OCTAVE_SHIFT: i32 = 8;

/// Largest accepted frame length in samples after the octave shift
pub const MAX_FRAME_LENGTH_SAMPLES: usize = 1 << 24;

/// `[frame_length_ms, time_constant_ms, nonlinear_factor, octave_shift]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AuditoryParams {
    /// Frame length in ms, typically 8, 16 or another power of two
    #[serde(default = "AuditoryParams::default_frame_length_ms")]
    pub frame_length_ms: f64,

    /// Leaky integration time constant in ms; 0 selects short-term averaging
    #[serde(default = "AuditoryParams::default_time_constant_ms")]
    pub time_constant_ms: f64,

    /// Hair-cell nonlinear factor (see `Compression`)
    #[serde(default = "AuditoryParams::default_nonlinear_factor")]
    pub nonlinear_factor: f64,

    /// Octave shift: 0 for 16 kHz, -1 for 8 kHz, ...
    #[serde(default = "AuditoryParams::default_octave_shift")]
    pub octave_shift: i32,
}

impl AuditoryParams {
    fn default_frame_length_ms() -> f64 {
        8.0
    }
    fn default_time_constant_ms() -> f64 {
        8.0
    }
    fn default_nonlinear_factor() -> f64 {
        -2.0
    }
    fn default_octave_shift() -> i32 {
        -1
    }

    /// Build from a 4-element parameter tuple and validate it
    pub fn from_slice(paras: &[f64]) -> Result<Self> {
        let [frame_length_ms, time_constant_ms, nonlinear_factor, shift] = paras else {
            return Err(SpectrogramError::InvalidParameters(format!(
                "expected 4 parameters [frame_length_ms, time_constant_ms, nonlinear_factor, octave_shift], got {}",
                paras.len()
            )));
        };
        if !(shift.is_finite() && shift.fract() == 0.0 && shift.abs() <= MAX_OCTAVE_SHIFT as f64) {
            return Err(SpectrogramError::InvalidParameters(format!(
                "octave shift must be an integer in [-{MAX_OCTAVE_SHIFT}, {MAX_OCTAVE_SHIFT}], got {shift}"
            )));
        }

        let params = Self {
            frame_length_ms: *frame_length_ms,
            time_constant_ms: *time_constant_ms,
            nonlinear_factor: *nonlinear_factor,
            octave_shift: *shift as i32,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.frame_length_ms.is_finite() && self.frame_length_ms > 0.0) {
            return Err(SpectrogramError::InvalidParameters(format!(
                "frame length must be positive, got {} ms",
                self.frame_length_ms
            )));
        }
        if !(self.time_constant_ms.is_finite() && self.time_constant_ms >= 0.0) {
            return Err(SpectrogramError::InvalidParameters(format!(
                "time constant must be non-negative, got {} ms",
                self.time_constant_ms
            )));
        }
        if !self.nonlinear_factor.is_finite() {
            return Err(SpectrogramError::InvalidParameters(format!(
                "nonlinear factor must be finite, got {}",
                self.nonlinear_factor
            )));
        }
        if self.octave_shift.abs() > MAX_OCTAVE_SHIFT {
            return Err(SpectrogramError::InvalidParameters(format!(
                "octave shift must be in [-{MAX_OCTAVE_SHIFT}, {MAX_OCTAVE_SHIFT}], got {}",
                self.octave_shift
            )));
        }
        let frame_len = (self.frame_length_ms * self.samples_per_ms()).round();
        if frame_len < 1.0 {
            return Err(SpectrogramError::InvalidParameters(format!(
                "frame length of {} ms is shorter than one sample at octave shift {}",
                self.frame_length_ms, self.octave_shift
            )));
        }
        if frame_len > MAX_FRAME_LENGTH_SAMPLES as f64 {
            return Err(SpectrogramError::InvalidParameters(format!(
                "frame length of {} ms exceeds {MAX_FRAME_LENGTH_SAMPLES} samples at octave shift {}",
                self.frame_length_ms, self.octave_shift
            )));
        }
        Ok(())
    }

    /// Samples per millisecond after the octave shift: `2^(4 + shift)`
    pub fn samples_per_ms(&self) -> f64 {
        2f64.powi(4 + self.octave_shift)
    }

    /// Frame length in samples: `round(frame_length_ms * 2^(4 + shift))`
    pub fn frame_length_samples(&self) -> usize {
        (self.frame_length_ms * self.samples_per_ms()).round() as usize
    }

    /// Leaky integrator pole, or `None` for short-term averaging
    pub fn integration_pole(&self) -> Option<f64> {
        if self.time_constant_ms > 0.0 {
            Some((-1.0 / (self.time_constant_ms * self.samples_per_ms())).exp())
        } else {
            None
        }
    }

    /// Hair-cell membrane low-pass pole
    pub fn haircell_pole(&self) -> f64 {
        (-1.0 / (HAIRCELL_TIME_CONSTANT_MS * self.samples_per_ms())).exp()
    }

    pub fn compression(&self) -> Compression {
        Compression::from_factor(self.nonlinear_factor)
    }

    pub fn to_array(&self) -> [f64; 4] {
        [
            self.frame_length_ms,
            self.time_constant_ms,
            self.nonlinear_factor,
            self.octave_shift as f64,
        ]
    }
}

impl Default for AuditoryParams {
    fn default() -> Self {
        Self {
            frame_length_ms: Self::default_frame_length_ms(),
            time_constant_ms: Self::default_time_constant_ms(),
            nonlinear_factor: Self::default_nonlinear_factor(),
            octave_shift: Self::default_octave_shift(),
        }
    }
}

/// Complete run configuration, loadable from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpectrogramConfig {
    #[serde(default)]
    pub params: AuditoryParams,

    /// Output rate in Hz; `None` keeps one row per frame
    #[serde(default)]
    pub output_rate: Option<f64>,

    /// Filterbank JSON file; `None` uses the shared default
    #[serde(default)]
    pub filterbank: Option<PathBuf>,

    /// Compute cochlear filtering for batches of channels in parallel
    #[serde(default)]
    pub parallel: bool,
}

impl SpectrogramConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)
            .map_err(|err| SpectrogramError::InvalidParameters(format!("config: {err}")))?;
        config.params.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| {
            SpectrogramError::InvalidParameters(format!("{}: {err}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    /// Resolve the configured filterbank
    pub fn filterbank(&self) -> Result<Arc<Filterbank>> {
        match &self.filterbank {
            Some(path) => Filterbank::from_path(path).map(Arc::new),
            None => Filterbank::shared_default(),
        }
    }
}
