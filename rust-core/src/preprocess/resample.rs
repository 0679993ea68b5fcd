//! Rational-ratio resampling on top of rubato
//!
//! Synchronous FFT resampler with an exact `up / down` ratio. Output is
//! delay-compensated and trimmed to `ceil(len * up / down)` samples so it
//! stays time-aligned with the input.

use crate::error::{Result, SpectrogramError};
use rubato::{FftFixedInOut, Resampler};

/// Input chunk size requested from the resampler
const CHUNK_SIZE: usize = 1024;

/// Reduced resampling ratio `up / down`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ratio {
    pub up: usize,
    pub down: usize,
}

impl Ratio {
    /// Ratio converting `from_rate` to `to_rate`, reduced by their gcd
    pub fn between(from_rate: usize, to_rate: usize) -> Result<Self> {
        Self::new(to_rate, from_rate)
    }

    pub fn new(up: usize, down: usize) -> Result<Self> {
        if up == 0 || down == 0 {
            return Err(SpectrogramError::InvalidParameters(format!(
                "resampling ratio {up}/{down} must be positive"
            )));
        }
        let g = gcd(up, down);
        Ok(Self {
            up: up / g,
            down: down / g,
        })
    }

    pub fn is_identity(&self) -> bool {
        self.up == self.down
    }

    /// Output length for `len` input samples
    pub fn output_len(&self, len: usize) -> usize {
        (len * self.up).div_ceil(self.down)
    }
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// Resample a mono signal by an exact rational ratio
pub fn resample(signal: &[f64], ratio: Ratio) -> Result<Vec<f64>> {
    if ratio.is_identity() || signal.is_empty() {
        return Ok(signal.to_vec());
    }

    let expected = ratio.output_len(signal.len());
    let mut resampler = FftFixedInOut::<f64>::new(ratio.down, ratio.up, CHUNK_SIZE, 1)?;
    let delay = resampler.output_delay();
    let needed = expected + delay;

    let mut output = Vec::with_capacity(needed + resampler.output_frames_max());
    let mut pos = 0;
    while output.len() < needed {
        let chunk = resampler.input_frames_next();
        let frames = if pos + chunk <= signal.len() {
            resampler.process(&[&signal[pos..pos + chunk]], None)?
        } else if pos < signal.len() {
            let tail = [&signal[pos..]];
            resampler.process_partial(Some(&tail[..]), None)?
        } else {
            resampler.process_partial::<&[f64]>(None, None)?
        };
        pos += chunk;
        output.extend_from_slice(&frames[0]);
    }

    output.drain(..delay);
    output.truncate(expected);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn sine(freq_hz: f64, sample_rate: f64, len: usize) -> Vec<f64> {
        (0..len)
            .map(|n| (2.0 * PI * freq_hz * n as f64 / sample_rate).sin())
            .collect()
    }

    fn rms(signal: &[f64]) -> f64 {
        (signal.iter().map(|x| x * x).sum::<f64>() / signal.len() as f64).sqrt()
    }

    fn zero_crossings(signal: &[f64]) -> usize {
        signal
            .windows(2)
            .filter(|w| (w[0] < 0.0) != (w[1] < 0.0))
            .count()
    }

    #[test]
    fn test_ratio_is_reduced() {
        assert_eq!(Ratio::between(44100, 16000).unwrap(), Ratio { up: 160, down: 441 });
        assert_eq!(Ratio::between(8000, 16000).unwrap(), Ratio { up: 2, down: 1 });
        assert!(Ratio::between(16000, 16000).unwrap().is_identity());
        assert!(Ratio::new(0, 3).is_err());
    }

    #[test]
    fn test_output_length() {
        let ratio = Ratio::new(1, 2).unwrap();
        assert_eq!(resample(&vec![0.0; 1001], ratio).unwrap().len(), 501);

        let ratio = Ratio::between(44100, 16000).unwrap();
        let output = resample(&vec![0.0; 44100], ratio).unwrap();
        assert_eq!(output.len(), 16000);
        assert!(output.iter().all(|&x| x.abs() < 1e-12));
    }

    #[test]
    fn test_identity_and_empty() {
        let signal = vec![1.0, 2.0, 3.0];
        assert_eq!(resample(&signal, Ratio::new(3, 3).unwrap()).unwrap(), signal);
        assert!(resample(&[], Ratio::new(1, 2).unwrap()).unwrap().is_empty());
    }

    #[test]
    fn test_decimation_preserves_tone() {
        let input = sine(500.0, 16000.0, 16000);
        let output = resample(&input, Ratio::new(1, 2).unwrap()).unwrap();

        assert_eq!(output.len(), 8000);
        let interior = &output[500..7500];
        assert!((rms(interior) - 1.0 / 2f64.sqrt()).abs() < 0.05);

        // 500 Hz over 7000 samples at 8 kHz: 437.5 periods
        let crossings = zero_crossings(interior);
        assert!((crossings as i64 - 875).abs() <= 4);
    }

    #[test]
    fn test_decimation_rejects_alias() {
        // 7 kHz is above the 4 kHz Nyquist of the decimated signal
        let input = sine(7000.0, 16000.0, 16000);
        let output = resample(&input, Ratio::new(1, 2).unwrap()).unwrap();
        assert!(rms(&output[500..7500]) < 0.1);
    }

    #[test]
    fn test_rate_normalization_preserves_tone() {
        let input = sine(1000.0, 44100.0, 44100);
        let output = resample(&input, Ratio::between(44100, 16000).unwrap()).unwrap();

        assert_eq!(output.len(), 16000);
        assert!((rms(&output[1000..15000]) - 1.0 / 2f64.sqrt()).abs() < 0.05);
    }
}
