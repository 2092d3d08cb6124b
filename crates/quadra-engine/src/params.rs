//! Frame-level parameter snapshot.

use crate::band::{BAND_COUNT, Band, PRIMARY_BAND_COUNT};
use crate::dynamics::{DynamicsMode, DynamicsParams};
use quadra_core::db_to_linear;

/// Below this dry level the dry path is hard-switched off rather than
/// merely attenuated.
pub const DRY_FLOOR_DB: f32 = -15.0;

/// Flat snapshot of every engine parameter.
///
/// The host collaborator builds one of these per control block and hands
/// it to [`MultibandEngine::set_parameters`](crate::MultibandEngine::set_parameters)
/// between frames; the engine value-copies it, clamps crossover ordering,
/// and cooks all derived coefficients there. Per-band arrays are indexed
/// by [`Band`].
///
/// The sidechain fields mirror the host's routing switches: the engine
/// stores and reports them, but the reference audio path does not consume
/// them (the external sidechain input never reaches this core).
#[derive(Debug, Clone, Copy)]
pub struct EngineParameters {
    /// Crossover split frequencies (low, mid, high), Hz. Clamped to keep
    /// `low <= mid <= high` when applied.
    pub split_frequencies_hz: [f32; 3],

    /// Per-band threshold, dB.
    pub threshold_db: [f32; BAND_COUNT],
    /// Per-band ratio.
    pub ratio: [f32; BAND_COUNT],
    /// Per-band detector attack, ms.
    pub attack_ms: [f32; BAND_COUNT],
    /// Per-band detector release, ms.
    pub release_ms: [f32; BAND_COUNT],
    /// Per-band makeup gain, dB.
    pub makeup_gain_db: [f32; BAND_COUNT],
    /// Per-band soft-knee width, dB.
    pub knee_db: [f32; BAND_COUNT],
    /// Per-band hard-limit (compressor) / gate (expander) switch.
    pub hard_limit_gate: [bool; BAND_COUNT],
    /// Per-band transfer-curve mode.
    pub mode: [DynamicsMode; BAND_COUNT],

    /// Per-band mute switch.
    pub mute: [bool; BAND_COUNT],
    /// Per-band solo switch.
    pub solo: [bool; BAND_COUNT],
    /// Per-band saturation drive; `<= 1` bypasses the waveshaper.
    pub saturation_drive: [f32; BAND_COUNT],

    /// Dry blend level, dB; `<=` [`DRY_FLOOR_DB`] switches the dry path off.
    pub dry_volume_db: f32,
    /// Master output trim, dB.
    pub master_output_db: f32,

    /// Add the mid/side dynamics contribution to the output.
    pub enable_mid_side: bool,
    /// Host sidechain input switch (routing metadata; see struct docs).
    pub enable_sidechain: bool,
    /// Sidechain targets every crossover band.
    pub sidechain_target_all: bool,
    /// Per-crossover-band sidechain target flags.
    pub sidechain_target: [bool; PRIMARY_BAND_COUNT],
}

impl Default for EngineParameters {
    /// The default preset: 200/1000/10000 Hz splits, -10 dB thresholds,
    /// 4:1 ratio, 5 ms / 200 ms times, 5 dB knee, saturation bypassed,
    /// dry path off, unity master.
    fn default() -> Self {
        let dynamics = DynamicsParams::default();
        Self {
            split_frequencies_hz: [200.0, 1000.0, 10000.0],
            threshold_db: [dynamics.threshold_db; BAND_COUNT],
            ratio: [dynamics.ratio; BAND_COUNT],
            attack_ms: [dynamics.attack_ms; BAND_COUNT],
            release_ms: [dynamics.release_ms; BAND_COUNT],
            makeup_gain_db: [dynamics.makeup_gain_db; BAND_COUNT],
            knee_db: [dynamics.knee_db; BAND_COUNT],
            hard_limit_gate: [false; BAND_COUNT],
            mode: [DynamicsMode::default(); BAND_COUNT],
            mute: [false; BAND_COUNT],
            solo: [false; BAND_COUNT],
            saturation_drive: [1.0; BAND_COUNT],
            dry_volume_db: -60.0,
            master_output_db: 0.0,
            enable_mid_side: false,
            enable_sidechain: false,
            sidechain_target_all: false,
            sidechain_target: [false; PRIMARY_BAND_COUNT],
        }
    }
}

impl EngineParameters {
    /// Assemble the dynamics parameter set for one band.
    pub fn dynamics_for(&self, band: Band) -> DynamicsParams {
        let i = band.index();
        DynamicsParams {
            threshold_db: self.threshold_db[i],
            ratio: self.ratio[i],
            attack_ms: self.attack_ms[i],
            release_ms: self.release_ms[i],
            makeup_gain_db: self.makeup_gain_db[i],
            knee_db: self.knee_db[i],
            hard_limit_gate: self.hard_limit_gate[i],
            mode: self.mode[i],
        }
    }

    /// Cooked dry gain: zero at or below [`DRY_FLOOR_DB`], else linear.
    ///
    /// The discontinuity is deliberate - the bottom of the dry control
    /// doubles as an off switch.
    pub fn dry_volume_linear(&self) -> f32 {
        if self.dry_volume_db <= DRY_FLOOR_DB {
            0.0
        } else {
            db_to_linear(self.dry_volume_db.min(0.0))
        }
    }

    /// Cooked master gain, clamped to the host's [-20, 20] dB range.
    pub fn master_output_linear(&self) -> f32 {
        db_to_linear(self.master_output_db.clamp(-20.0, 20.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dry_floor_is_a_hard_switch() {
        let mut params = EngineParameters::default();

        params.dry_volume_db = -15.0;
        assert_eq!(params.dry_volume_linear(), 0.0);

        params.dry_volume_db = -20.0;
        assert_eq!(params.dry_volume_linear(), 0.0);

        params.dry_volume_db = -14.999;
        let just_above = params.dry_volume_linear();
        assert!(just_above > 0.0, "just above the floor must be audible");
        assert!((just_above - db_to_linear(-14.999)).abs() < 1e-6);
    }

    #[test]
    fn master_gain_is_clamped() {
        let mut params = EngineParameters::default();
        params.master_output_db = 40.0;
        assert!((params.master_output_linear() - db_to_linear(20.0)).abs() < 1e-5);
    }

    #[test]
    fn dynamics_for_picks_the_band_slot() {
        let mut params = EngineParameters::default();
        params.threshold_db[Band::Side.index()] = -33.0;
        params.ratio[Band::Side.index()] = 7.5;
        let side = params.dynamics_for(Band::Side);
        assert_eq!(side.threshold_db, -33.0);
        assert_eq!(side.ratio, 7.5);
        // Another band keeps the default
        assert_eq!(params.dynamics_for(Band::Low).threshold_db, -10.0);
    }
}
