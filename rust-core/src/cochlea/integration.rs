//! Temporal integration of rectified channel responses into frames

use crate::config::AuditoryParams;
use crate::filters::IirFilter;

/// Frame integration mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Integration {
    /// Single-pole leaky integrator sampled at the last sample of each frame
    Leaky { pole: f64 },

    /// Mean over each frame
    ShortTermAverage,
}

impl Integration {
    pub fn from_params(params: &AuditoryParams) -> Self {
        match params.integration_pole() {
            Some(pole) => Integration::Leaky { pole },
            None => Integration::ShortTermAverage,
        }
    }

    /// One value per frame of `frame_len` samples
    ///
    /// `signal.len()` is a multiple of `frame_len` after frame padding; a
    /// trailing partial frame would be dropped.
    pub fn frames(&self, signal: &[f64], frame_len: usize) -> Vec<f64> {
        debug_assert!(frame_len > 0 && signal.len() % frame_len == 0);

        match *self {
            Integration::Leaky { pole } => {
                let mut integrator = IirFilter::one_pole(pole);
                let mut frames = Vec::with_capacity(signal.len() / frame_len);
                for frame in signal.chunks_exact(frame_len) {
                    let mut last = 0.0;
                    for &x in frame {
                        last = integrator.process_sample(x);
                    }
                    frames.push(last);
                }
                frames
            }
            Integration::ShortTermAverage if frame_len == 1 => signal.to_vec(),
            Integration::ShortTermAverage => signal
                .chunks_exact(frame_len)
                .map(|frame| frame.iter().sum::<f64>() / frame_len as f64)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::lfilter;

    #[test]
    fn test_average_per_frame() {
        let signal = [1.0, 3.0, 0.0, 0.0, 2.0, 2.0, 5.0, 7.0];
        let frames = Integration::ShortTermAverage.frames(&signal, 2);
        assert_eq!(frames, vec![2.0, 0.0, 2.0, 6.0]);
    }

    #[test]
    fn test_average_single_sample_frames() {
        let signal = [0.5, 0.25, 4.0];
        assert_eq!(Integration::ShortTermAverage.frames(&signal, 1), signal.to_vec());
    }

    #[test]
    fn test_leaky_samples_frame_ends() {
        let pole = 0.9;
        let signal: Vec<f64> = (0..12).map(|n| (n % 5) as f64).collect();

        let frames = Integration::Leaky { pole }.frames(&signal, 4);
        let full = lfilter(&[1.0], &[1.0, -pole], &signal);

        assert_eq!(frames.len(), 3);
        for (k, &value) in frames.iter().enumerate() {
            assert!((value - full[4 * (k + 1) - 1]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_modes_converge_for_short_time_constant() {
        // Constant within each frame: the sampled end value equals the mean
        let signal = [1.0, 1.0, 1.0, 4.0, 4.0, 4.0, 0.0, 0.0, 0.0];
        let params = AuditoryParams {
            time_constant_ms: 1e-6,
            ..AuditoryParams::default()
        };

        let leaky = Integration::from_params(&params).frames(&signal, 3);
        let average = Integration::ShortTermAverage.frames(&signal, 3);

        for (l, a) in leaky.iter().zip(&average) {
            assert!((l - a).abs() < 1e-9);
        }
    }

    #[test]
    fn test_mode_from_params() {
        let leaky = Integration::from_params(&AuditoryParams::default());
        assert!(matches!(leaky, Integration::Leaky { .. }));

        let params = AuditoryParams {
            time_constant_ms: 0.0,
            ..AuditoryParams::default()
        };
        assert_eq!(Integration::from_params(&params), Integration::ShortTermAverage);
    }
}
