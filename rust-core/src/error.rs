//! Error taxonomy for the auditory spectrogram pipeline

use std::fmt;
use thiserror::Error;

/// Processing stage in which a channel produced non-finite values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CochlearFilter,
    HairCellMembrane,
    LateralInhibition,
    TemporalIntegration,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::CochlearFilter => "cochlear filter",
            Stage::HairCellMembrane => "hair-cell membrane",
            Stage::LateralInhibition => "lateral inhibition",
            Stage::TemporalIntegration => "temporal integration",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum SpectrogramError {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Filterbank unavailable: {0}")]
    DataUnavailable(String),

    #[error("Non-finite values in channel {channel} after {stage}")]
    NumericDegeneracy { channel: usize, stage: Stage },

    #[error("Resampling failed: {0}")]
    Resample(String),
}

impl From<rubato::ResamplerConstructionError> for SpectrogramError {
    fn from(err: rubato::ResamplerConstructionError) -> Self {
        SpectrogramError::Resample(err.to_string())
    }
}

impl From<rubato::ResampleError> for SpectrogramError {
    fn from(err: rubato::ResampleError) -> Self {
        SpectrogramError::Resample(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SpectrogramError>;

/// Fail with `NumericDegeneracy` if any sample is NaN or infinite
pub(crate) fn ensure_finite(samples: &[f64], channel: usize, stage: Stage) -> Result<()> {
    if samples.iter().all(|s| s.is_finite()) {
        Ok(())
    } else {
        tracing::warn!(channel, %stage, "non-finite samples detected");
        Err(SpectrogramError::NumericDegeneracy { channel, stage })
    }
}
