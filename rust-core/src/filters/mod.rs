//! IIR filtering and cochlear band-pass design

pub mod iir;
pub mod design;

pub use iir::{IirFilter, lfilter};
pub use design::{BandpassSpec, design_bandpass_iir, cochlear_center_frequencies};
