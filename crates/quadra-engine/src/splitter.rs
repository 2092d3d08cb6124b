//! Four-way band splitter built from cascaded crossover stages.

use crate::band::PRIMARY_BAND_COUNT;
use crate::crossover::CrossoverFilter;

/// Splits one channel into four frequency bands.
///
/// Three [`CrossoverFilter`] stages in cascade: the input splits at the
/// low frequency into (band 0, rest); the rest splits at the mid frequency
/// into (band 1, rest); the final stage splits at the high frequency into
/// (band 2, band 3).
///
/// The ordering invariant `low <= mid <= high` is enforced by clamping in
/// [`set_frequencies`](Self::set_frequencies); out-of-order requests are
/// never an error. Each stereo channel needs its own bank - there is no
/// cross-channel state here.
#[derive(Debug, Clone)]
pub struct BandSplitterBank {
    stages: [CrossoverFilter; 3],
}

impl BandSplitterBank {
    /// Create a bank with the given split frequencies (clamped to order).
    pub fn new(sample_rate: f32, low_hz: f32, mid_hz: f32, high_hz: f32) -> Self {
        let mut bank = Self {
            stages: [
                CrossoverFilter::new(sample_rate, low_hz),
                CrossoverFilter::new(sample_rate, mid_hz),
                CrossoverFilter::new(sample_rate, high_hz),
            ],
        };
        bank.set_frequencies(low_hz, mid_hz, high_hz);
        bank
    }

    /// Set the three split frequencies, clamping to keep `low <= mid <= high`.
    ///
    /// Clamping walks the triple twice: first pulling each frequency down
    /// to its upper neighbor, then pushing each up to its lower neighbor.
    /// The result is ordered and the call is idempotent.
    pub fn set_frequencies(&mut self, low_hz: f32, mid_hz: f32, high_hz: f32) {
        let mut f = [low_hz, mid_hz, high_hz];

        for i in 0..2 {
            if f[i] > f[i + 1] {
                f[i] = f[i + 1];
            }
        }
        for i in 1..3 {
            if f[i] < f[i - 1] {
                f[i] = f[i - 1];
            }
        }

        for (stage, freq) in self.stages.iter_mut().zip(f) {
            stage.set_split_frequency(freq);
        }
    }

    /// The stored (clamped) split frequencies as (low, mid, high).
    pub fn frequencies(&self) -> (f32, f32, f32) {
        (
            self.stages[0].split_frequency(),
            self.stages[1].split_frequency(),
            self.stages[2].split_frequency(),
        )
    }

    /// Clear all stage memory and recook for a new sample rate.
    pub fn reset(&mut self, sample_rate: f32) {
        for stage in &mut self.stages {
            stage.reset(sample_rate);
        }
    }

    /// Split one sample into its four bands, low to high.
    #[inline]
    pub fn process(&mut self, input: f32) -> [f32; PRIMARY_BAND_COUNT] {
        let first = self.stages[0].process(input);
        let second = self.stages[1].process(first.high);
        let third = self.stages[2].process(second.high);
        [first.low, second.low, third.low, third.high]
    }
}
