//! Hair-cell transduction nonlinearity
//!
//! | factor    | mode                | f(y)                  | membrane low-pass |
//! |-----------|---------------------|-----------------------|-------------------|
//! | > 0       | `Logistic`          | 1 / (1 + e^(-y/fac))  | yes               |
//! | 0         | `HardLimiter`       | y > 0                 | yes               |
//! | -1        | `HalfWaveRectifier` | max(y, 0)             | yes               |
//! | -2        | `Linear`            | y                     | no                |
//! | otherwise | `Identity`          | y                     | yes               |

/// Nonlinear factor that selects linear ionic channels
pub const LINEAR_FACTOR: f64 = -2.0;

/// Compression mode derived from the nonlinear factor
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Compression {
    /// Transistor-like logistic curve; smaller factor compresses more
    Logistic(f64),

    /// Full compression to 0/1
    HardLimiter,

    HalfWaveRectifier,

    /// Linear ionic channels: no compression and no membrane low-pass
    Linear,

    /// Unrecognised factor: no compression, membrane low-pass still applied
    Identity,
}

impl Compression {
    pub fn from_factor(factor: f64) -> Self {
        if factor > 0.0 {
            Compression::Logistic(factor)
        } else if factor == 0.0 {
            Compression::HardLimiter
        } else if factor == -1.0 {
            Compression::HalfWaveRectifier
        } else if factor == LINEAR_FACTOR {
            Compression::Linear
        } else {
            Compression::Identity
        }
    }

    /// Transfer function for one sample
    #[inline]
    pub fn apply(&self, y: f64) -> f64 {
        match *self {
            Compression::Logistic(factor) => 1.0 / (1.0 + (-y / factor).exp()),
            Compression::HardLimiter => {
                if y > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Compression::HalfWaveRectifier => y.max(0.0),
            Compression::Linear | Compression::Identity => y,
        }
    }

    /// Apply in place to a whole channel signal
    pub fn apply_inplace(&self, signal: &mut [f64]) {
        if matches!(self, Compression::Linear | Compression::Identity) {
            return;
        }
        for sample in signal.iter_mut() {
            *sample = self.apply(*sample);
        }
    }

    /// Whether the hair-cell membrane low-pass follows this nonlinearity
    pub fn uses_membrane_lowpass(&self) -> bool {
        !matches!(self, Compression::Linear)
    }
}

/// Element-wise nonlinearity on a new sequence
pub fn sigmoid(signal: &[f64], factor: f64) -> Vec<f64> {
    let compression = Compression::from_factor(factor);
    signal.iter().map(|&y| compression.apply(y)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: [f64; 7] = [-3.0, -0.5, -1e-9, 0.0, 1e-9, 0.5, 3.0];

    #[test]
    fn test_case_table() {
        assert_eq!(Compression::from_factor(0.1), Compression::Logistic(0.1));
        assert_eq!(Compression::from_factor(0.0), Compression::HardLimiter);
        assert_eq!(Compression::from_factor(-1.0), Compression::HalfWaveRectifier);
        assert_eq!(Compression::from_factor(-2.0), Compression::Linear);
        assert_eq!(Compression::from_factor(-3.0), Compression::Identity);
        assert_eq!(Compression::from_factor(-0.5), Compression::Identity);
    }

    #[test]
    fn test_only_linear_skips_membrane() {
        for factor in [0.1, 1.0, 0.0, -1.0, -3.0, -0.5] {
            assert!(Compression::from_factor(factor).uses_membrane_lowpass());
        }
        assert!(!Compression::from_factor(LINEAR_FACTOR).uses_membrane_lowpass());
    }

    #[test]
    fn test_linear_is_identity() {
        assert_eq!(sigmoid(&SAMPLES, -2.0), SAMPLES.to_vec());
        assert_eq!(sigmoid(&SAMPLES, -7.0), SAMPLES.to_vec());
    }

    #[test]
    fn test_hard_limiter_is_binary() {
        let output = sigmoid(&SAMPLES, 0.0);
        assert!(output.iter().all(|&y| y == 0.0 || y == 1.0));
        assert_eq!(output, vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_rectifier_non_negative() {
        let output = sigmoid(&SAMPLES, -1.0);
        assert!(output.iter().all(|&y| y >= 0.0));
        assert_eq!(output[6], 3.0);
    }

    #[test]
    fn test_logistic() {
        let output = sigmoid(&SAMPLES, 0.1);

        assert!((output[3] - 0.5).abs() < 1e-12);
        assert!(output.windows(2).all(|w| w[0] <= w[1]));
        assert!(output.iter().all(|&y| y > 0.0 && y < 1.0));
        assert!((output[5] - 1.0 / (1.0 + (-5.0f64).exp())).abs() < 1e-12);
    }

    #[test]
    fn test_apply_inplace_matches_sigmoid() {
        for factor in [0.3, 0.0, -1.0, -2.0] {
            let mut buffer = SAMPLES.to_vec();
            Compression::from_factor(factor).apply_inplace(&mut buffer);
            assert_eq!(buffer, sigmoid(&SAMPLES, factor));
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(sigmoid(&[], 0.5).is_empty());
    }
}
