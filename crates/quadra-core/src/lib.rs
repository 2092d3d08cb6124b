//! Quadra Core - DSP primitives for multiband dynamics processing
//!
//! This crate provides the building blocks the quadra engine is assembled
//! from, designed for real-time audio with zero allocation in the audio path.
//!
//! # Contents
//!
//! ## Filters
//!
//! - [`Biquad`] - Second-order IIR filter section (Direct Form I)
//! - [`linkwitz_riley_lowpass_coefficients`] / [`linkwitz_riley_highpass_coefficients`] -
//!   LR2 crossover coefficient computation
//!
//! ## Dynamics
//!
//! - [`EnvelopeFollower`] - Peak envelope detection with independent
//!   attack/release time constants
//!
//! ## Utilities
//!
//! - Level conversions: [`db_to_linear`], [`linear_to_db`]
//! - Waveshaping: [`drive_clip`]
//! - Numeric hygiene: [`flush_denormal`]
//! - Stereo helpers: [`mid_side_encode`], [`mid_side_decode`]
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! quadra-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: no allocations, no locking, bounded execution time
//! - **Cooked coefficients**: transcendental math happens when a parameter
//!   changes, never per sample
//! - **No NaN leakage**: logarithms are floored, feedback paths flush
//!   denormals

#![cfg_attr(not(feature = "std"), no_std)]

pub mod biquad;
pub mod envelope;
pub mod math;

pub use biquad::{
    Biquad, linkwitz_riley_highpass_coefficients, linkwitz_riley_lowpass_coefficients,
};
pub use envelope::EnvelopeFollower;
pub use math::{
    db_to_linear, drive_clip, flush_denormal, linear_to_db, mid_side_decode, mid_side_encode,
};
