//! Output-only metering snapshot.

use crate::band::{BAND_COUNT, PRIMARY_BAND_COUNT};

/// Meter values written once per processed frame.
///
/// Value-copied out to the host; never read back by the engine. Band
/// input/output levels cover the four crossover bands (channel-averaged,
/// input taken pre-dynamics and output post-processing). Gain-reduction
/// meters cover all six dynamics bands and use the inverted display
/// convention `1 - gain_linear`, so 0 means no reduction and values grow
/// toward 1 as the band is pulled down.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeterSnapshot {
    /// Pre-dynamics level per crossover band.
    pub band_input: [f32; PRIMARY_BAND_COUNT],
    /// Post-processing level per crossover band.
    pub band_output: [f32; PRIMARY_BAND_COUNT],
    /// Inverted gain reduction per dynamics band (`1 - gain_linear`).
    pub gain_reduction: [f32; BAND_COUNT],
    /// Channel-averaged input level.
    pub master_input: f32,
    /// Channel-averaged output level.
    pub master_output: f32,
}
