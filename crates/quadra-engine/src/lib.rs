//! Quadra Engine - four-band dynamics processing core
//!
//! This crate assembles the quadra-core DSP primitives into a complete
//! multiband dynamics processor:
//!
//! - [`BandSplitterBank`] - cascaded Linkwitz-Riley crossovers splitting
//!   each channel into four bands
//! - [`DynamicsUnit`] - per-band compressor/expander with soft knee,
//!   hard-limit and gate modes
//! - [`resolve_band_mutes`] - mute/solo routing resolved to a single mask
//! - [`MultibandEngine`] - the frame processor tying it all together with
//!   mid/side processing, per-band saturation, dry blend, master trim,
//!   and metering
//!
//! ## Example
//!
//! ```rust
//! use quadra_engine::{Band, EngineParameters, MultibandEngine};
//!
//! let mut engine = MultibandEngine::new(48000.0);
//!
//! let mut params = EngineParameters::default();
//! params.threshold_db[Band::Low.index()] = -24.0;
//! params.ratio[Band::Low.index()] = 8.0;
//! engine.set_parameters(params);
//!
//! let mut output = [0.0f32; 2];
//! engine.process_frame(&[0.1, -0.1], &mut output).unwrap();
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod band;
pub mod crossover;
pub mod dynamics;
pub mod engine;
pub mod meters;
pub mod params;
pub mod router;
pub mod splitter;

// Re-export main types at crate root
pub use band::{BAND_COUNT, Band, PRIMARY_BAND_COUNT};
pub use crossover::{BandSplit, CrossoverFilter};
pub use dynamics::{DynamicsMode, DynamicsParams, DynamicsUnit};
pub use engine::{EngineError, MultibandEngine};
pub use meters::MeterSnapshot;
pub use params::{DRY_FLOOR_DB, EngineParameters};
pub use router::resolve_band_mutes;
pub use splitter::BandSplitterBank;
