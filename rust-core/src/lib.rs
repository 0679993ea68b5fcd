//! Auditory Spectrogram - cochlear model DSP core
//!
//! Computes an auditory spectrogram (frames × frequency channels) from a
//! waveform by simulating a cochlear filterbank, hair-cell transduction,
//! lateral inhibition and temporal integration.

// Suppress PyO3 non-local impl warnings (harmless macro-generated code)
#![allow(non_local_definitions)]

pub mod cochlea;
pub mod config;
pub mod error;
pub mod filterbank;
pub mod filters;
pub mod output;
pub mod preprocess;
pub mod spectrogram;
#[cfg(feature = "python")]
pub mod python_bindings;

pub use cochlea::{sigmoid, Compression};
pub use config::{AuditoryParams, SpectrogramConfig};
pub use error::{Result, SpectrogramError, Stage};
pub use filterbank::{FilterCoefficients, Filterbank};
pub use spectrogram::{wav2aud, AuditoryModel, AuditorySpectrogram};
