//! Signal preparation before the channel cascade
//!
//! Rate normalization to the filterbank's native rate, the octave-shift
//! resample, and zero padding to whole frames.

pub mod resample;

pub use resample::{resample, Ratio};

use crate::config::AuditoryParams;
use crate::error::{Result, SpectrogramError};
use tracing::debug;

/// Resampling ratio applied for an octave shift
///
/// A negative shift decimates by `1 - shift` (shift -1 turns 16 kHz into
/// 8 kHz). A positive shift upsamples by `2^shift`, the rate that frame
/// lengths and time constants assume.
pub fn octave_shift_ratio(octave_shift: i32) -> Result<Ratio> {
    let magnitude = octave_shift.unsigned_abs();
    if octave_shift < 0 {
        Ratio::new(1, 1 + magnitude as usize)
    } else {
        let factor = 1usize.checked_shl(magnitude).ok_or_else(|| {
            SpectrogramError::InvalidParameters(format!(
                "octave shift {octave_shift} is out of range"
            ))
        })?;
        Ratio::new(factor, 1)
    }
}

/// Zero-pad at the end to a whole number of frames
pub fn pad_to_frames(mut signal: Vec<f64>, frame_len: usize) -> Result<Vec<f64>> {
    if frame_len == 0 {
        return Err(SpectrogramError::InvalidParameters(
            "frame length must be at least one sample".to_string(),
        ));
    }
    let padded = signal
        .len()
        .div_ceil(frame_len)
        .checked_mul(frame_len)
        .ok_or_else(|| {
            SpectrogramError::InvalidParameters(format!(
                "{} samples cannot be padded to {frame_len}-sample frames",
                signal.len()
            ))
        })?;
    signal.resize(padded, 0.0);
    Ok(signal)
}

/// Prepares raw input for one parameter set
#[derive(Debug, Clone)]
pub struct Preprocessor {
    params: AuditoryParams,
    native_rate: u32,
}

impl Preprocessor {
    pub fn new(params: AuditoryParams, native_rate: u32) -> Self {
        Self {
            params,
            native_rate,
        }
    }

    /// Rate-normalize, octave-shift and frame-pad a signal
    pub fn prepare(&self, signal: &[f64], sample_rate: u32) -> Result<Vec<f64>> {
        if sample_rate == 0 {
            return Err(SpectrogramError::InvalidParameters(
                "sample rate must be positive".to_string(),
            ));
        }

        let ratio = Ratio::between(sample_rate as usize, self.native_rate as usize)?;
        let normalized = if ratio.is_identity() {
            signal.to_vec()
        } else {
            debug!(
                from = sample_rate,
                to = self.native_rate,
                up = ratio.up,
                down = ratio.down,
                "resampling to native rate"
            );
            resample(signal, ratio)?
        };

        let shifted = if self.params.octave_shift != 0 {
            let ratio = octave_shift_ratio(self.params.octave_shift)?;
            debug!(
                octave_shift = self.params.octave_shift,
                up = ratio.up,
                down = ratio.down,
                "shifting by octaves"
            );
            resample(&normalized, ratio)?
        } else {
            normalized
        };

        pad_to_frames(shifted, self.params.frame_length_samples())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filterbank::NATIVE_SAMPLE_RATE;

    #[test]
    fn test_octave_shift_ratio() {
        assert_eq!(octave_shift_ratio(-1).unwrap(), Ratio { up: 1, down: 2 });
        assert_eq!(octave_shift_ratio(-2).unwrap(), Ratio { up: 1, down: 3 });
        assert_eq!(octave_shift_ratio(1).unwrap(), Ratio { up: 2, down: 1 });
        assert_eq!(octave_shift_ratio(2).unwrap(), Ratio { up: 4, down: 1 });
        assert_eq!(octave_shift_ratio(8).unwrap(), Ratio { up: 256, down: 1 });
        assert!(octave_shift_ratio(0).unwrap().is_identity());
    }

    #[test]
    fn test_pad_to_frames() {
        assert_eq!(pad_to_frames(vec![1.0; 10], 4).unwrap().len(), 12);
        assert_eq!(pad_to_frames(vec![1.0; 12], 4).unwrap().len(), 12);
        assert!(pad_to_frames(Vec::new(), 4).unwrap().is_empty());

        let padded = pad_to_frames(vec![1.0, 2.0, 3.0], 2).unwrap();
        assert_eq!(padded, vec![1.0, 2.0, 3.0, 0.0]);
    }

    #[test]
    fn test_pad_to_frames_overflow() {
        assert!(matches!(
            pad_to_frames(vec![1.0; 10], usize::MAX),
            Err(SpectrogramError::InvalidParameters(_))
        ));
        assert!(matches!(
            pad_to_frames(vec![1.0; 10], 0),
            Err(SpectrogramError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_positive_shift_keeps_frame_timing() {
        // 1 s at shift +2: 64 kHz, 512-sample frames of 8 ms
        let params = AuditoryParams {
            octave_shift: 2,
            ..AuditoryParams::default()
        };
        let pre = Preprocessor::new(params, NATIVE_SAMPLE_RATE);
        let prepared = pre.prepare(&vec![0.0; 16000], 16000).unwrap();

        assert_eq!(params.frame_length_samples(), 512);
        assert_eq!(prepared.len(), 64000);
        assert_eq!(prepared.len() / params.frame_length_samples(), 125);
    }

    #[test]
    fn test_prepare_default_shift() {
        let pre = Preprocessor::new(AuditoryParams::default(), NATIVE_SAMPLE_RATE);
        let prepared = pre.prepare(&vec![0.0; 16000], 16000).unwrap();

        // 16 kHz → 8 kHz, 64-sample frames: 125 whole frames
        assert_eq!(prepared.len(), 8000);
        assert_eq!(prepared.len() % 64, 0);
    }

    #[test]
    fn test_prepare_pads_partial_frame() {
        let params = AuditoryParams {
            octave_shift: 0,
            ..AuditoryParams::default()
        };
        let pre = Preprocessor::new(params, NATIVE_SAMPLE_RATE);
        let prepared = pre.prepare(&vec![0.5; 1000], 16000).unwrap();

        // 128-sample frames
        assert_eq!(prepared.len(), 1024);
        assert!(prepared[..1000].iter().all(|&x| x == 0.5));
        assert!(prepared[1000..].iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_prepare_rate_normalization() {
        let params = AuditoryParams {
            octave_shift: 0,
            ..AuditoryParams::default()
        };
        let pre = Preprocessor::new(params, NATIVE_SAMPLE_RATE);
        let prepared = pre.prepare(&vec![0.0; 8000], 8000).unwrap();
        assert_eq!(prepared.len(), 16000);
    }

    #[test]
    fn test_prepare_rejects_zero_rate() {
        let pre = Preprocessor::new(AuditoryParams::default(), NATIVE_SAMPLE_RATE);
        assert!(matches!(
            pre.prepare(&[0.0; 4], 0),
            Err(SpectrogramError::InvalidParameters(_))
        ));
    }
}
