//! IIR filter with externally owned state
//!
//! Direct-form II transposed recurrence, equivalent to `lfilter(b, a, x)`
//! started from zero state. Each filter instance owns its own delay line, so
//! one instance per channel per stage keeps channels independent.

/// Real-valued IIR filter processor
#[derive(Debug, Clone)]
pub struct IirFilter {
    /// Feedforward coefficients, normalized by a[0]
    b: Vec<f64>,

    /// Feedback coefficients, normalized by a[0] (a[0] == 1 after normalization)
    a: Vec<f64>,

    /// Transposed delay line z[0..order]
    state: Vec<f64>,
}

impl IirFilter {
    /// Create a new IIR filter
    ///
    /// # Arguments
    /// * `b` - Feedforward coefficients b[0..]
    /// * `a` - Feedback coefficients a[0..], a[0] must be non-zero
    ///
    /// Shorter coefficient vectors are zero-extended so both have length
    /// `order + 1`.
    pub fn new(b: &[f64], a: &[f64]) -> Self {
        let len = b.len().max(a.len()).max(1);
        let a0 = a.first().copied().unwrap_or(1.0);

        let mut b_norm = vec![0.0; len];
        let mut a_norm = vec![0.0; len];
        for (dst, &src) in b_norm.iter_mut().zip(b) {
            *dst = src / a0;
        }
        for (dst, &src) in a_norm.iter_mut().zip(a) {
            *dst = src / a0;
        }

        Self {
            b: b_norm,
            a: a_norm,
            state: vec![0.0; len - 1],
        }
    }

    /// Single-pole low-pass `y[n] = x[n] + pole * y[n-1]`
    pub fn one_pole(pole: f64) -> Self {
        Self::new(&[1.0], &[1.0, -pole])
    }

    /// Process single sample
    #[inline]
    pub fn process_sample(&mut self, input: f64) -> f64 {
        let order = self.state.len();
        if order == 0 {
            return self.b[0] * input;
        }

        let output = self.b[0] * input + self.state[0];
        for k in 1..order {
            self.state[k - 1] = self.b[k] * input - self.a[k] * output + self.state[k];
        }
        self.state[order - 1] = self.b[order] * input - self.a[order] * output;

        output
    }

    /// Process a block of samples
    pub fn process_block(&mut self, input: &[f64]) -> Vec<f64> {
        input.iter().map(|&x| self.process_sample(x)).collect()
    }

    /// Process a block in-place
    pub fn process_block_inplace(&mut self, buffer: &mut [f64]) {
        for sample in buffer.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }

    /// Reset filter state (clear delay line)
    pub fn reset(&mut self) {
        self.state.fill(0.0);
    }

    /// Filter order (length of the delay line)
    pub fn order(&self) -> usize {
        self.state.len()
    }
}

/// Filter a whole signal from zero state
pub fn lfilter(b: &[f64], a: &[f64], x: &[f64]) -> Vec<f64> {
    IirFilter::new(b, a).process_block(x)
}
