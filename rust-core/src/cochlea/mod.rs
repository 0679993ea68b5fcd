//! Cochlear model: hair-cell transduction, lateral inhibition, integration

pub mod nonlinearity;
pub mod integration;
pub mod cascade;

pub use nonlinearity::{Compression, sigmoid, LINEAR_FACTOR};
pub use integration::Integration;
pub use cascade::{CascadeSettings, ChannelCascade, ChannelOutput};
