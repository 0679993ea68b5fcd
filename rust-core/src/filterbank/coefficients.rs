//! Per-channel cochlear filter coefficients

use crate::error::{Result, SpectrogramError};
use crate::filters::IirFilter;
use serde::{Deserialize, Serialize};

/// IIR coefficients and nominal center frequency of one filterbank channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCoefficients {
    /// Filter order p
    order: usize,

    /// Feedforward coefficients b[0..=p]
    feedforward: Vec<f64>,

    /// Feedback coefficients a[0..=p]
    feedback: Vec<f64>,

    /// Nominal center frequency in Hz at the native sample rate
    center_hz: f64,
}

impl FilterCoefficients {
    /// Create channel coefficients, checking shape
    ///
    /// Fails with `DataUnavailable` if either coefficient sequence is not
    /// `order + 1` long, if a[0] is zero, or if any value is non-finite.
    pub fn new(
        order: usize,
        feedforward: Vec<f64>,
        feedback: Vec<f64>,
        center_hz: f64,
    ) -> Result<Self> {
        let coeffs = Self {
            order,
            feedforward,
            feedback,
            center_hz,
        };
        coeffs.validate()?;
        Ok(coeffs)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let order_of = |taps: &[f64]| taps.len().checked_sub(1);
        if order_of(&self.feedforward) != Some(self.order)
            || order_of(&self.feedback) != Some(self.order)
        {
            return Err(SpectrogramError::DataUnavailable(format!(
                "order {} needs one more coefficient than its order, got {} feedforward and {} feedback",
                self.order,
                self.feedforward.len(),
                self.feedback.len()
            )));
        }
        if self.feedback[0] == 0.0 {
            return Err(SpectrogramError::DataUnavailable(
                "leading feedback coefficient is zero".to_string(),
            ));
        }
        let all_finite = self
            .feedforward
            .iter()
            .chain(&self.feedback)
            .chain(std::iter::once(&self.center_hz))
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(SpectrogramError::DataUnavailable(
                "non-finite coefficient".to_string(),
            ));
        }
        Ok(())
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn feedforward(&self) -> &[f64] {
        &self.feedforward
    }

    pub fn feedback(&self) -> &[f64] {
        &self.feedback
    }

    pub fn center_hz(&self) -> f64 {
        self.center_hz
    }

    /// Fresh filter with zero state for one pipeline run
    pub fn to_filter(&self) -> IirFilter {
        IirFilter::new(&self.feedforward, &self.feedback)
    }
}
