//! Frame-rate to output-rate row selection

use crate::error::{Result, SpectrogramError};
use crate::filterbank::NATIVE_SAMPLE_RATE;
use ndarray::{Array2, Axis};

/// Highest accepted output rate in Hz: one row per native-rate sample
pub const MAX_OUTPUT_RATE: f64 = NATIVE_SAMPLE_RATE as f64;

/// Frame indices sampled at `output_rate` Hz
///
/// Steps `dt = (1000 / output_rate) / frame_length_ms` frames per output
/// sample; output sample `k` (from 1) takes frame `ceil(k * dt) - 1`, clipped
/// to the valid range. Sampling continues while `k * dt < frames + 0.1 * dt`.
pub fn output_frame_indices(
    num_frames: usize,
    frame_length_ms: f64,
    output_rate: f64,
) -> Result<Vec<usize>> {
    if !(output_rate.is_finite() && output_rate > 0.0 && output_rate <= MAX_OUTPUT_RATE) {
        return Err(SpectrogramError::InvalidParameters(format!(
            "output rate must be in (0, {MAX_OUTPUT_RATE}] Hz, got {output_rate}"
        )));
    }
    if !(frame_length_ms.is_finite() && frame_length_ms > 0.0) {
        return Err(SpectrogramError::InvalidParameters(format!(
            "frame length must be positive, got {frame_length_ms} ms"
        )));
    }
    if num_frames == 0 {
        return Ok(Vec::new());
    }

    let dt = (1000.0 / output_rate) / frame_length_ms;
    let stop = num_frames as f64 + 0.1 * dt;
    let count = ((stop - dt) / dt).ceil().max(0.0);
    let max_rows = num_frames as f64 * frame_length_ms * MAX_OUTPUT_RATE / 1000.0 + 1.0;
    if !(count <= max_rows && count < isize::MAX as f64) {
        return Err(SpectrogramError::InvalidParameters(format!(
            "{count} output rows for {num_frames} frames of {frame_length_ms} ms"
        )));
    }
    let count = count as usize;
    let last = num_frames - 1;

    Ok((0..count)
        .map(|i| {
            let position = dt + i as f64 * dt;
            (position.ceil() as usize).saturating_sub(1).min(last)
        })
        .collect())
}

/// Re-sample frame-rate rows to `output_rate`; `None` returns the input
pub fn resample_frames(
    spectrogram: Array2<f64>,
    frame_length_ms: f64,
    output_rate: Option<f64>,
) -> Result<Array2<f64>> {
    match output_rate {
        None => Ok(spectrogram),
        Some(rate) => {
            let indices = output_frame_indices(spectrogram.nrows(), frame_length_ms, rate)?;
            Ok(spectrogram.select(Axis(0), &indices))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_rate_is_identity() {
        // 8 ms frames are 125 Hz
        let indices = output_frame_indices(10, 8.0, 125.0).unwrap();
        assert_eq!(indices, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_downsample() {
        let indices = output_frame_indices(10, 8.0, 62.5).unwrap();
        assert_eq!(indices, vec![1, 3, 5, 7, 9]);
    }

    #[test]
    fn test_upsample_repeats_frames() {
        let indices = output_frame_indices(4, 8.0, 250.0).unwrap();
        assert_eq!(indices, vec![0, 0, 1, 1, 2, 2, 3, 3]);
    }

    #[test]
    fn test_audio_rate_output() {
        // 1 s of 8 ms frames at 16 kHz output
        let indices = output_frame_indices(125, 8.0, 16000.0).unwrap();
        assert_eq!(indices.len(), 16000);
        assert_eq!(indices[0], 0);
        assert_eq!(*indices.last().unwrap(), 124);
        assert!(indices.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_invalid_rate() {
        for rate in [0.0, -10.0, f64::NAN, f64::INFINITY, 1e300, MAX_OUTPUT_RATE * 2.0] {
            assert!(matches!(
                output_frame_indices(10, 8.0, rate),
                Err(SpectrogramError::InvalidParameters(_))
            ));
        }
    }

    #[test]
    fn test_row_count_bounded_by_native_rate() {
        // 100 frames of 8 ms at the highest rate: 16 rows per ms
        let indices = output_frame_indices(100, 8.0, MAX_OUTPUT_RATE).unwrap();
        assert_eq!(indices.len(), 12800);

        assert!(matches!(
            output_frame_indices(100, 0.0, 125.0),
            Err(SpectrogramError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_resample_frames_selects_rows() {
        let spectrogram = Array2::from_shape_fn((4, 2), |(r, c)| (10 * r + c) as f64);

        let unchanged = resample_frames(spectrogram.clone(), 8.0, None).unwrap();
        assert_eq!(unchanged, spectrogram);

        let halved = resample_frames(spectrogram, 8.0, Some(62.5)).unwrap();
        assert_eq!(halved.dim(), (2, 2));
        assert_eq!(halved[[0, 1]], 11.0);
        assert_eq!(halved[[1, 0]], 30.0);
    }
}
