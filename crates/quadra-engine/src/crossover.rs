//! Two-way Linkwitz-Riley crossover stage.

use quadra_core::{
    Biquad, linkwitz_riley_highpass_coefficients, linkwitz_riley_lowpass_coefficients,
};

/// Output of one crossover stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct BandSplit {
    /// Content below the split frequency.
    pub low: f32,
    /// Content above the split frequency.
    pub high: f32,
}

/// One two-way crossover stage: an LR2 lowpass/highpass pair fed the same
/// input, with the highpass branch inverted so `low + high` reconstructs
/// the input with flat magnitude.
///
/// # Example
///
/// ```rust
/// use quadra_engine::CrossoverFilter;
///
/// let mut xover = CrossoverFilter::new(48000.0, 1000.0);
/// let split = xover.process(0.5);
/// assert!((split.low + split.high).is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct CrossoverFilter {
    lowpass: Biquad,
    highpass: Biquad,
    split_hz: f32,
    sample_rate: f32,
}

impl CrossoverFilter {
    /// Create a crossover stage at the given split frequency.
    pub fn new(sample_rate: f32, split_hz: f32) -> Self {
        let mut filter = Self {
            lowpass: Biquad::new(),
            highpass: Biquad::new(),
            split_hz,
            sample_rate,
        };
        filter.recook();
        filter
    }

    /// Change the split frequency.
    ///
    /// Recomputes both branch coefficients without touching delay memory,
    /// so it is safe to call between blocks while processing continues;
    /// the filters settle over a few samples.
    pub fn set_split_frequency(&mut self, split_hz: f32) {
        self.split_hz = split_hz;
        self.recook();
    }

    /// Current split frequency in Hz.
    pub fn split_frequency(&self) -> f32 {
        self.split_hz
    }

    /// Clear delay memory and recook coefficients for a new sample rate.
    ///
    /// Must be called before first use and on every sample-rate change.
    pub fn reset(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.lowpass.clear();
        self.highpass.clear();
        self.recook();
    }

    /// Split one sample into its low and high components.
    #[inline]
    pub fn process(&mut self, input: f32) -> BandSplit {
        BandSplit {
            low: self.lowpass.process(input),
            // Inverted so the branches sum back to flat magnitude
            high: -self.highpass.process(input),
        }
    }

    fn recook(&mut self) {
        let (b0, b1, b2, a0, a1, a2) =
            linkwitz_riley_lowpass_coefficients(self.split_hz, self.sample_rate);
        self.lowpass.set_coefficients(b0, b1, b2, a0, a1, a2);

        let (b0, b1, b2, a0, a1, a2) =
            linkwitz_riley_highpass_coefficients(self.split_hz, self.sample_rate);
        self.highpass.set_coefficients(b0, b1, b2, a0, a1, a2);
    }
}
