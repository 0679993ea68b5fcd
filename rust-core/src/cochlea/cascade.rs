//! Channel cascade: cochlear filter → hair cell → lateral inhibition → frames
//!
//! Channels run from the highest center frequency down to the lowest. Each
//! channel's lateral inhibition subtracts the hair-cell response of the
//! channel just above it, so stages b-f form a sequential reduction; only the
//! cochlear filtering (stage a) is independent per channel.

use super::integration::Integration;
use super::nonlinearity::Compression;
use crate::config::AuditoryParams;
use crate::error::{ensure_finite, Result, Stage};
use crate::filterbank::{FilterCoefficients, Filterbank};
use crate::filters::IirFilter;
use ndarray::{aview1, Array2};
use rayon::prelude::*;
use tracing::{debug, trace};

/// Per-run constants shared by every channel
#[derive(Debug, Clone, Copy)]
pub struct CascadeSettings {
    pub compression: Compression,

    /// Membrane low-pass pole; `None` when the compression mode skips it
    pub membrane_pole: Option<f64>,

    pub integration: Integration,

    /// Samples per frame
    pub frame_len: usize,
}

impl CascadeSettings {
    pub fn from_params(params: &AuditoryParams) -> Self {
        let compression = params.compression();
        let membrane_pole = compression
            .uses_membrane_lowpass()
            .then(|| params.haircell_pole());

        Self {
            compression,
            membrane_pole,
            integration: Integration::from_params(params),
            frame_len: params.frame_length_samples(),
        }
    }
}

/// Output of one cascade step
#[derive(Debug, Clone)]
pub struct ChannelOutput {
    /// One integrated value per frame
    pub frames: Vec<f64>,

    /// Hair-cell response, inhibits the next lower channel
    pub haircell: Vec<f64>,
}

/// Stage a: basilar-membrane filtering with fresh state
pub fn cochlear_filter(coeffs: &FilterCoefficients, x: &[f64], channel: usize) -> Result<Vec<f64>> {
    let y1 = coeffs.to_filter().process_block(x);
    ensure_finite(&y1, channel, Stage::CochlearFilter)?;
    Ok(y1)
}

/// Stages b-c: ionic channel nonlinearity and membrane low-pass
pub fn haircell_response(
    mut y1: Vec<f64>,
    settings: &CascadeSettings,
    channel: usize,
) -> Result<Vec<f64>> {
    settings.compression.apply_inplace(&mut y1);

    if let Some(pole) = settings.membrane_pole {
        IirFilter::one_pole(pole).process_block_inplace(&mut y1);
        ensure_finite(&y1, channel, Stage::HairCellMembrane)?;
    }
    Ok(y1)
}

/// Stage d: subtract the higher neighbour's hair-cell response
///
/// Without a higher neighbour the response passes through unchanged.
pub fn lateral_inhibition(haircell: &[f64], higher: Option<&[f64]>) -> Vec<f64> {
    match higher {
        Some(higher) => haircell.iter().zip(higher).map(|(y, h)| y - h).collect(),
        None => haircell.to_vec(),
    }
}

/// Stage e
pub fn half_wave_rectify(signal: &mut [f64]) {
    for sample in signal.iter_mut() {
        *sample = sample.max(0.0);
    }
}

/// Stages b-f for one channel, given its cochlear-filtered signal
pub fn process_channel(
    channel: usize,
    y1: Vec<f64>,
    higher: Option<&[f64]>,
    settings: &CascadeSettings,
) -> Result<ChannelOutput> {
    let haircell = haircell_response(y1, settings, channel)?;

    let mut inhibited = lateral_inhibition(&haircell, higher);
    ensure_finite(&inhibited, channel, Stage::LateralInhibition)?;
    half_wave_rectify(&mut inhibited);

    let frames = settings.integration.frames(&inhibited, settings.frame_len);
    ensure_finite(&frames, channel, Stage::TemporalIntegration)?;

    Ok(ChannelOutput { frames, haircell })
}

/// Runs the cascade over a whole filterbank
pub struct ChannelCascade<'a> {
    filterbank: &'a Filterbank,
    settings: CascadeSettings,
    parallel: bool,
}

impl<'a> ChannelCascade<'a> {
    pub fn new(filterbank: &'a Filterbank, settings: CascadeSettings) -> Self {
        Self {
            filterbank,
            settings,
            parallel: false,
        }
    }

    /// Precompute stage a for batches of channels on the rayon pool
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    fn filter_batch(&self, batch: &[usize], x: &[f64]) -> Result<Vec<Vec<f64>>> {
        let channels = self.filterbank.channels();
        if self.parallel {
            batch
                .par_iter()
                .map(|&ch| cochlear_filter(&channels[ch], x, ch))
                .collect()
        } else {
            batch
                .iter()
                .map(|&ch| cochlear_filter(&channels[ch], x, ch))
                .collect()
        }
    }

    /// Process a frame-padded signal into an (N × (M-1)) matrix
    pub fn run(&self, x: &[f64]) -> Result<Array2<f64>> {
        let frame_len = self.settings.frame_len;
        let num_frames = x.len() / frame_len;
        let num_channels = self.filterbank.num_channels();
        let mut spectrogram = Array2::zeros((num_frames, num_channels - 1));

        // Seed pass: terminal channel through stages a-c only
        let seed_channel = num_channels - 1;
        let seed_y1 = cochlear_filter(&self.filterbank.channels()[seed_channel], x, seed_channel)?;
        let seed = haircell_response(seed_y1, &self.settings, seed_channel)?;

        let batch_size = if self.parallel {
            rayon::current_num_threads().max(1)
        } else {
            1
        };
        debug!(
            frames = num_frames,
            channels = num_channels - 1,
            frame_len,
            batch_size,
            "running channel cascade"
        );

        let order: Vec<usize> = (0..seed_channel).rev().collect();
        order.chunks(batch_size).try_fold(seed, |higher, batch| -> Result<Vec<f64>> {
            let filtered = self.filter_batch(batch, x)?;
            batch
                .iter()
                .zip(filtered)
                .try_fold(higher, |higher, (&ch, y1)| -> Result<Vec<f64>> {
                    let output = process_channel(ch, y1, Some(&higher), &self.settings)?;
                    trace!(channel = ch, "channel done");
                    spectrogram.column_mut(ch).assign(&aview1(&output.frames));
                    Ok(output.haircell)
                })
        })?;

        Ok(spectrogram)
    }
}
