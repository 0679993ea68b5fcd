//! Band-pass IIR design for synthetic cochlear filterbanks
//!
//! RBJ constant 0 dB peak band-pass biquads, optionally cascaded into one
//! higher-order transfer function so each channel stays a single (b, a) pair.

use crate::error::{Result, SpectrogramError};
use crate::filterbank::FilterCoefficients;
use std::f64::consts::PI;

/// Channels per octave of the reference cochlear layout
pub const CHANNELS_PER_OCTAVE: f64 = 24.0;

/// Band-pass specification for one cochlear channel
#[derive(Debug, Clone)]
pub struct BandpassSpec {
    /// Center frequency in Hz
    pub center_hz: f64,

    /// Quality factor of each biquad section
    pub q: f64,

    /// Number of cascaded biquad sections (order = 2 * sections)
    pub sections: usize,

    /// Sample rate in Hz
    pub sample_rate: f64,
}

impl BandpassSpec {
    /// Cochlear-like channel at the filterbank's native rate
    pub fn cochlear(center_hz: f64, sample_rate: f64) -> Self {
        Self {
            center_hz,
            q: 4.0,
            sections: 2,
            sample_rate,
        }
    }

    fn validate(&self) -> Result<()> {
        let nyquist = self.sample_rate / 2.0;
        if !(self.center_hz > 0.0 && self.center_hz < nyquist) {
            return Err(SpectrogramError::InvalidParameters(format!(
                "center frequency {} Hz outside (0, {}) Hz",
                self.center_hz, nyquist
            )));
        }
        if !(self.q > 0.0) || self.sections == 0 {
            return Err(SpectrogramError::InvalidParameters(format!(
                "band-pass needs q > 0 and at least one section (q = {}, sections = {})",
                self.q, self.sections
            )));
        }
        Ok(())
    }
}

/// Center frequencies of the reference layout: `440 * 2^((k - 31) / 24)`
///
/// With 129 channels this spans roughly 180 Hz to 7246 Hz.
pub fn cochlear_center_frequencies(channels: usize) -> Vec<f64> {
    (0..channels)
        .map(|k| 440.0 * 2f64.powf((k as f64 - 31.0) / CHANNELS_PER_OCTAVE))
        .collect()
}

/// Single RBJ band-pass biquad (b, a), normalized so a[0] == 1
fn bandpass_biquad(center_hz: f64, q: f64, sample_rate: f64) -> ([f64; 3], [f64; 3]) {
    let w0 = 2.0 * PI * center_hz / sample_rate;
    let (sin_w0, cos_w0) = w0.sin_cos();
    let alpha = sin_w0 / (2.0 * q);
    let a0 = 1.0 + alpha;

    let b = [alpha / a0, 0.0, -alpha / a0];
    let a = [1.0, -2.0 * cos_w0 / a0, (1.0 - alpha) / a0];
    (b, a)
}

/// Polynomial product of two coefficient sequences
fn convolve(x: &[f64], y: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; x.len() + y.len() - 1];
    for (i, &xi) in x.iter().enumerate() {
        for (j, &yj) in y.iter().enumerate() {
            out[i + j] += xi * yj;
        }
    }
    out
}

/// Design a cascaded band-pass IIR as a single transfer function
pub fn design_bandpass_iir(spec: &BandpassSpec) -> Result<FilterCoefficients> {
    spec.validate()?;

    let (b_section, a_section) = bandpass_biquad(spec.center_hz, spec.q, spec.sample_rate);

    let mut b = vec![1.0];
    let mut a = vec![1.0];
    for _ in 0..spec.sections {
        b = convolve(&b, &b_section);
        a = convolve(&a, &a_section);
    }

    FilterCoefficients::new(2 * spec.sections, b, a, spec.center_hz)
}
