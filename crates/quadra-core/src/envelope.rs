//! Peak envelope follower for dynamics detection.

use libm::expf;

/// Peak envelope follower with independent attack and release times.
///
/// Rectifies the input and smooths it with a one-pole coefficient chosen
/// per sample: the attack coefficient while the signal is rising, the
/// release coefficient while it falls. Coefficients are cooked whenever a
/// time or the sample rate changes:
///
/// ```text
/// coeff = exp(-1 / (time_ms * sample_rate / 1000))
/// ```
///
/// # Example
///
/// ```rust
/// use quadra_core::EnvelopeFollower;
///
/// let mut env = EnvelopeFollower::new(48000.0);
/// env.set_attack_ms(5.0);
/// env.set_release_ms(200.0);
/// let level = env.process(0.5);
/// assert!(level > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct EnvelopeFollower {
    /// Current envelope level (linear, non-negative)
    envelope: f32,
    attack_coeff: f32,
    release_coeff: f32,
    sample_rate: f32,
    /// Attack time in ms, kept for recooking on sample-rate change
    attack_ms: f32,
    /// Release time in ms, kept for recooking on sample-rate change
    release_ms: f32,
}

impl EnvelopeFollower {
    /// Create a follower with 10 ms attack / 100 ms release defaults.
    pub fn new(sample_rate: f32) -> Self {
        let mut follower = Self {
            envelope: 0.0,
            attack_coeff: 0.0,
            release_coeff: 0.0,
            sample_rate,
            attack_ms: 10.0,
            release_ms: 100.0,
        };
        follower.recook();
        follower
    }

    /// Set the attack time in milliseconds.
    ///
    /// Floored at 0.01 ms so the coefficient stays finite when a host
    /// delivers a zero attack.
    pub fn set_attack_ms(&mut self, attack_ms: f32) {
        self.attack_ms = attack_ms.max(0.01);
        self.recook();
    }

    /// Current attack time in milliseconds.
    pub fn attack_ms(&self) -> f32 {
        self.attack_ms
    }

    /// Set the release time in milliseconds (floored at 1 ms).
    pub fn set_release_ms(&mut self, release_ms: f32) {
        self.release_ms = release_ms.max(1.0);
        self.recook();
    }

    /// Current release time in milliseconds.
    pub fn release_ms(&self) -> f32 {
        self.release_ms
    }

    /// Update sample rate and recook both coefficients.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recook();
    }

    /// Process one sample; returns the updated envelope level.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let rectified = input.abs();

        let coeff = if rectified > self.envelope {
            self.attack_coeff
        } else {
            self.release_coeff
        };

        // One-pole smoothing toward the rectified input
        self.envelope = coeff * self.envelope + (1.0 - coeff) * rectified;
        self.envelope
    }

    /// Current envelope level without advancing state.
    pub fn level(&self) -> f32 {
        self.envelope
    }

    /// Zero the envelope state.
    pub fn reset(&mut self) {
        self.envelope = 0.0;
    }

    fn recook(&mut self) {
        self.attack_coeff = expf(-1.0 / (self.attack_ms * self.sample_rate / 1000.0));
        self.release_coeff = expf(-1.0 / (self.release_ms * self.sample_rate / 1000.0));
    }
}

impl Default for EnvelopeFollower {
    fn default() -> Self {
        Self::new(48000.0)
    }
}
