//! Biquad filter section and Linkwitz-Riley crossover coefficients.
//!
//! The [`Biquad`] is a generic second-order IIR section. The coefficient
//! functions in this module compute the Linkwitz-Riley 2nd-order (LR2)
//! lowpass/highpass pair used to build crossover networks: at the split
//! frequency each branch is -6 dB, and `lowpass - highpass` has unity
//! magnitude at every frequency (allpass-flat reconstruction).
//!
//! Coefficients use the bilinear transform with analog prewarping:
//!
//! ```text
//! theta = pi * f / sample_rate
//! omega = pi * f
//! kappa = omega / tan(theta)
//! ```

use crate::flush_denormal;
use core::f32::consts::PI;
use libm::tanf;

/// Generic biquad filter coefficients and state.
///
/// Implements the Direct Form I difference equation:
/// ```text
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2]
///                - a1*y[n-1] - a2*y[n-2]
/// ```
#[derive(Debug, Clone)]
pub struct Biquad {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,

    /// Input delay line: x[n-1], x[n-2]
    x1: f32,
    x2: f32,

    /// Output delay line: y[n-1], y[n-2]
    y1: f32,
    y2: f32,
}

impl Biquad {
    /// Creates a new biquad with passthrough coefficients (`y[n] = x[n]`).
    pub fn new() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Sets the coefficients, normalizing by `a0` internally.
    ///
    /// Does not disturb the delay lines, so coefficients may be updated
    /// while processing continues; the filter settles over a few samples.
    pub fn set_coefficients(&mut self, b0: f32, b1: f32, b2: f32, a0: f32, a1: f32, a2: f32) {
        let a0_inv = 1.0 / a0;
        self.b0 = b0 * a0_inv;
        self.b1 = b1 * a0_inv;
        self.b2 = b2 * a0_inv;
        self.a1 = a1 * a0_inv;
        self.a2 = a2 * a0_inv;
    }

    /// Processes a single sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.b0 * input + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;
        let output = flush_denormal(output);

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }

    /// Clears the delay lines without changing coefficients.
    pub fn clear(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared LR2 intermediate terms: (kappa, omega, delta).
#[inline]
fn lr2_terms(frequency: f32, sample_rate: f32) -> (f32, f32, f32) {
    let theta = PI * frequency / sample_rate;
    let omega = PI * frequency;
    let kappa = omega / tanf(theta);
    let delta = kappa * kappa + omega * omega + 2.0 * kappa * omega;
    (kappa, omega, delta)
}

/// Calculates Linkwitz-Riley 2nd-order lowpass coefficients.
///
/// # Arguments
///
/// * `frequency` - Split frequency in Hz (must be below Nyquist)
/// * `sample_rate` - Sample rate in Hz
///
/// # Returns
///
/// (b0, b1, b2, a0, a1, a2) coefficients with `a0 = 1.0`
pub fn linkwitz_riley_lowpass_coefficients(
    frequency: f32,
    sample_rate: f32,
) -> (f32, f32, f32, f32, f32, f32) {
    let (kappa, omega, delta) = lr2_terms(frequency, sample_rate);

    let b0 = omega * omega / delta;
    let b1 = 2.0 * b0;
    let b2 = b0;
    let a1 = (-2.0 * kappa * kappa + 2.0 * omega * omega) / delta;
    let a2 = (-2.0 * kappa * omega + kappa * kappa + omega * omega) / delta;

    (b0, b1, b2, 1.0, a1, a2)
}

/// Calculates Linkwitz-Riley 2nd-order highpass coefficients.
///
/// Same poles as [`linkwitz_riley_lowpass_coefficients`]; the two outputs
/// at the split frequency are each -6 dB and sum (with the highpass branch
/// inverted) back to flat magnitude.
pub fn linkwitz_riley_highpass_coefficients(
    frequency: f32,
    sample_rate: f32,
) -> (f32, f32, f32, f32, f32, f32) {
    let (kappa, omega, delta) = lr2_terms(frequency, sample_rate);

    let b0 = kappa * kappa / delta;
    let b1 = -2.0 * b0;
    let b2 = b0;
    let a1 = (-2.0 * kappa * kappa + 2.0 * omega * omega) / delta;
    let a2 = (-2.0 * kappa * omega + kappa * kappa + omega * omega) / delta;

    (b0, b1, b2, 1.0, a1, a2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured(coeffs: (f32, f32, f32, f32, f32, f32)) -> Biquad {
        let mut bq = Biquad::new();
        let (b0, b1, b2, a0, a1, a2) = coeffs;
        bq.set_coefficients(b0, b1, b2, a0, a1, a2);
        bq
    }

    #[test]
    fn passthrough_by_default() {
        let mut bq = Biquad::new();
        assert_eq!(bq.process(0.5), 0.5);
        assert_eq!(bq.process(-1.0), -1.0);
    }

    #[test]
    fn lr2_lowpass_passes_dc() {
        let mut lp = configured(linkwitz_riley_lowpass_coefficients(1000.0, 48000.0));
        let mut out = 0.0;
        for _ in 0..48000 {
            out = lp.process(1.0);
        }
        assert!((out - 1.0).abs() < 1e-3, "DC should pass, got {out}");
    }

    #[test]
    fn lr2_highpass_blocks_dc() {
        let mut hp = configured(linkwitz_riley_highpass_coefficients(1000.0, 48000.0));
        let mut out = 0.0;
        for _ in 0..48000 {
            out = hp.process(1.0);
        }
        assert!(out.abs() < 1e-3, "DC should be blocked, got {out}");
    }

    #[test]
    fn lr2_branches_are_minus_six_db_at_split() {
        // At the split frequency each LR2 branch sits at -6 dB (gain 0.5).
        let sample_rate = 48000.0;
        let split = 1000.0;
        let mut lp = configured(linkwitz_riley_lowpass_coefficients(split, sample_rate));

        let mut peak = 0.0f32;
        let total = 48000;
        for i in 0..total {
            let phase = core::f32::consts::TAU * split * i as f32 / sample_rate;
            let out = lp.process(libm::sinf(phase));
            // Skip the settling period before measuring.
            if i > total / 2 {
                peak = peak.max(out.abs());
            }
        }
        assert!(
            (peak - 0.5).abs() < 0.02,
            "expected ~0.5 gain at split, got {peak}"
        );
    }

    #[test]
    fn clear_resets_state() {
        let mut lp = configured(linkwitz_riley_lowpass_coefficients(500.0, 48000.0));
        for _ in 0..64 {
            lp.process(1.0);
        }
        lp.clear();
        let out = lp.process(0.0);
        assert_eq!(out, 0.0);
    }
}
