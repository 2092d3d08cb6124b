//! Per-band dynamics processing: compressor/expander with knee, plus the
//! hard-limit/gate variants.

use quadra_core::{EnvelopeFollower, db_to_linear, linear_to_db};

/// Gain offset applied below threshold when the expander runs as a hard
/// gate. Effectively a mute (one part per million) while staying in
/// comfortable f32 territory.
const GATE_FLOOR_DB: f32 = -120.0;

/// Transfer-curve selection for a dynamics band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DynamicsMode {
    /// Attenuate above the threshold.
    #[default]
    Compressor,
    /// Attenuate below the threshold (downward expansion).
    Expander,
}

/// Parameter set for one [`DynamicsUnit`].
///
/// A plain value type: the engine copies one of these per band out of the
/// frame-level snapshot and hands it to
/// [`DynamicsUnit::set_parameters`], which clamps ranges and cooks the
/// derived coefficients. Nothing here is read in the per-sample path.
#[derive(Debug, Clone, Copy)]
pub struct DynamicsParams {
    /// Level where gain processing begins, dB. Clamped to [-40, 0].
    pub threshold_db: f32,
    /// Compression/expansion ratio. Clamped to [1, 20].
    pub ratio: f32,
    /// Detector attack time, ms. Clamped to [0, 100].
    pub attack_ms: f32,
    /// Detector release time, ms. Clamped to [1, 1000].
    pub release_ms: f32,
    /// Static makeup gain, dB. Clamped to [-20, 20].
    pub makeup_gain_db: f32,
    /// Soft-knee width around the threshold, dB. Clamped to [0, 20].
    pub knee_db: f32,
    /// Compressor: infinite-ratio limiting. Expander: hard noise gate.
    pub hard_limit_gate: bool,
    /// Transfer-curve selection.
    pub mode: DynamicsMode,
}

impl Default for DynamicsParams {
    fn default() -> Self {
        Self {
            threshold_db: -10.0,
            ratio: 4.0,
            attack_ms: 5.0,
            release_ms: 200.0,
            makeup_gain_db: 0.0,
            knee_db: 5.0,
            hard_limit_gate: false,
            mode: DynamicsMode::default(),
        }
    }
}

impl DynamicsParams {
    fn clamped(self) -> Self {
        Self {
            threshold_db: self.threshold_db.clamp(-40.0, 0.0),
            ratio: self.ratio.clamp(1.0, 20.0),
            attack_ms: self.attack_ms.clamp(0.0, 100.0),
            release_ms: self.release_ms.clamp(1.0, 1000.0),
            makeup_gain_db: self.makeup_gain_db.clamp(-20.0, 20.0),
            knee_db: self.knee_db.clamp(0.0, 20.0),
            ..self
        }
    }
}

/// Envelope follower plus gain computer for one band.
///
/// The envelope is the only state that persists across samples. Each call
/// to [`process`](Self::process) detects the peak level, converts it to
/// dB, walks the soft-knee transfer curve, and applies the resulting gain
/// (plus cooked makeup gain) multiplicatively.
///
/// # Example
///
/// ```rust
/// use quadra_engine::{DynamicsParams, DynamicsUnit};
///
/// let mut unit = DynamicsUnit::new(48000.0);
/// unit.set_parameters(DynamicsParams {
///     threshold_db: -20.0,
///     ratio: 4.0,
///     ..DynamicsParams::default()
/// });
/// let out = unit.process(0.5);
/// assert!(out.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct DynamicsUnit {
    detector: EnvelopeFollower,
    params: DynamicsParams,
    /// Makeup gain cooked to linear at parameter-set time.
    makeup_linear: f32,
    /// Last computed gain offset in dB (non-positive).
    last_gain_db: f32,
    /// Last computed gain offset as a linear factor, excluding makeup.
    last_gain_linear: f32,
}

impl DynamicsUnit {
    /// Create a unit with default parameters.
    pub fn new(sample_rate: f32) -> Self {
        let mut unit = Self {
            detector: EnvelopeFollower::new(sample_rate),
            params: DynamicsParams::default(),
            makeup_linear: 1.0,
            last_gain_db: 0.0,
            last_gain_linear: 1.0,
        };
        unit.set_parameters(DynamicsParams::default());
        unit
    }

    /// Replace the parameter set, clamping ranges and cooking coefficients.
    pub fn set_parameters(&mut self, params: DynamicsParams) {
        let params = params.clamped();
        self.detector.set_attack_ms(params.attack_ms);
        self.detector.set_release_ms(params.release_ms);
        self.makeup_linear = db_to_linear(params.makeup_gain_db);
        self.params = params;
    }

    /// Current (clamped) parameter set.
    pub fn parameters(&self) -> DynamicsParams {
        self.params
    }

    /// Zero the envelope and recook time constants for a new sample rate.
    pub fn reset(&mut self, sample_rate: f32) {
        self.detector.set_sample_rate(sample_rate);
        self.detector.reset();
        self.last_gain_db = 0.0;
        self.last_gain_linear = 1.0;
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let envelope = self.detector.process(input);
        // linear_to_db floors the envelope, so silence stays finite
        let detect_db = linear_to_db(envelope);
        let gain_db = self.compute_gain_db(detect_db);
        let gain = db_to_linear(gain_db);

        self.last_gain_db = gain_db;
        self.last_gain_linear = gain;

        input * gain * self.makeup_linear
    }

    /// Last computed gain reduction in dB (always non-positive; 0 = none).
    pub fn gain_reduction_db(&self) -> f32 {
        self.last_gain_db
    }

    /// Last computed gain reduction as a linear factor (1 = no reduction).
    ///
    /// Excludes makeup gain, matching the meter convention.
    pub fn gain_reduction_linear(&self) -> f32 {
        self.last_gain_linear
    }

    /// Soft-knee gain computer. Returns the gain offset in dB for the
    /// detected level.
    #[inline]
    fn compute_gain_db(&self, detect_db: f32) -> f32 {
        let p = &self.params;
        let half_knee = p.knee_db * 0.5;

        match p.mode {
            DynamicsMode::Compressor => {
                let overshoot = detect_db - p.threshold_db;
                // hard_limit_gate pins the slope at 1 (infinite ratio)
                let slope = if p.hard_limit_gate {
                    1.0
                } else {
                    1.0 - 1.0 / p.ratio
                };

                if overshoot <= -half_knee {
                    0.0
                } else if overshoot > half_knee {
                    -(overshoot * slope)
                } else {
                    let t = (overshoot + half_knee) / p.knee_db;
                    -(t * t * overshoot * slope)
                }
            }
            DynamicsMode::Expander => {
                let undershoot = detect_db - p.threshold_db;

                if p.hard_limit_gate {
                    // Noise gate: the knee does not apply, the band is
                    // simply muted below threshold.
                    if undershoot >= 0.0 { 0.0 } else { GATE_FLOOR_DB }
                } else if undershoot >= half_knee {
                    0.0
                } else if undershoot < -half_knee {
                    undershoot * (p.ratio - 1.0)
                } else {
                    // Quadratic knee: meets 0 at +knee/2 and the full
                    // expansion slope at -knee/2
                    let edge = undershoot - half_knee;
                    (1.0 - p.ratio) * edge * edge / (2.0 * p.knee_db)
                }
            }
        }
    }
}
