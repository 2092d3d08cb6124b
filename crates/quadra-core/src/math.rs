//! Mathematical utility functions for dynamics processing.
//!
//! All functions are allocation-free, branch-light, and suitable for
//! `no_std` targets. Transcendentals come from `libm`.

use libm::{expf, logf, tanhf};

/// Convert decibels to linear gain.
///
/// # Example
/// ```rust
/// use quadra_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels.
///
/// The input is floored at 1e-10 (-200 dB) before the logarithm so that
/// silence never produces NaN or -inf in a gain computation.
///
/// # Example
/// ```rust
/// use quadra_core::linear_to_db;
///
/// assert!((linear_to_db(1.0) - 0.0).abs() < 0.001);
/// assert!(linear_to_db(0.0).is_finite());
/// ```
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    // 20 * log10(linear) = 20 * ln(linear) / ln(10)
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(1e-10)) * FACTOR
}

/// Drive-normalized soft clip.
///
/// For `drive <= 1.0` this is the identity function - a deliberate bypass
/// threshold, not a curve starting at zero. Above that it applies
/// `tanh(x * drive) / tanh(drive)`, so unity-amplitude input stays near
/// unity output at low drive while higher drive pushes the signal into
/// the tanh saturation region.
///
/// Stateless; safe to call at audio rate.
///
/// # Example
/// ```rust
/// use quadra_core::drive_clip;
///
/// assert_eq!(drive_clip(0.7, 1.0), 0.7);
/// assert!(drive_clip(0.7, 8.0).abs() <= 1.0);
/// ```
#[inline]
pub fn drive_clip(x: f32, drive: f32) -> f32 {
    if drive <= 1.0 {
        x
    } else {
        tanhf(x * drive) / tanhf(drive)
    }
}

/// Flush subnormal (denormalized) floats to zero.
///
/// Subnormal floats cause severe CPU slowdowns on most architectures.
/// Values below 1e-20 are replaced with zero, leaving margin before the
/// IEEE 754 subnormal range begins. Use in recursive filter state.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Encode a stereo pair into mid/side form.
///
/// `mid = (l + r) / 2`, `side = (l - r) / 2`.
#[inline]
pub fn mid_side_encode(left: f32, right: f32) -> (f32, f32) {
    ((left + right) * 0.5, (left - right) * 0.5)
}

/// Decode a mid/side pair back to left/right.
///
/// Inverse of [`mid_side_encode`] up to rounding: `l = mid + side`,
/// `r = mid - side`.
#[inline]
pub fn mid_side_decode(mid: f32, side: f32) -> (f32, f32) {
    (mid + side, mid - side)
}
