//! Frame-level orchestration of the splitter bank, dynamics units,
//! saturation, mute/solo routing, and mixdown.

use crate::band::{BAND_COUNT, Band, PRIMARY_BAND_COUNT};
use crate::dynamics::DynamicsUnit;
use crate::meters::MeterSnapshot;
use crate::params::EngineParameters;
use crate::router::resolve_band_mutes;
use crate::splitter::BandSplitterBank;
use quadra_core::{drive_clip, mid_side_decode, mid_side_encode};

/// Errors surfaced by the frame processor.
///
/// Nothing in the hot path panics or allocates; an unsupported channel
/// layout is the only observable failure, and it leaves the output buffer
/// untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// The input/output channel-count pair is not one of mono->mono,
    /// mono->stereo, or stereo->stereo.
    UnsupportedChannelLayout {
        /// Input channel count as delivered.
        input: usize,
        /// Output channel count as requested.
        output: usize,
    },
}

impl core::fmt::Display for EngineError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnsupportedChannelLayout { input, output } => {
                write!(f, "unsupported channel layout: {input} in / {output} out")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EngineError {}

/// The multiband dynamics engine.
///
/// Owns two [`BandSplitterBank`]s (one per stereo channel) and six
/// [`DynamicsUnit`]s - four for the crossover bands plus mid and side.
/// Parameters arrive as a whole [`EngineParameters`] snapshot between
/// frames; [`process_frame`](Self::process_frame) then runs allocation-
/// and lock-free.
///
/// The four crossover-band dynamics units are shared between the left and
/// right channels: each frame their envelopes hear the left sample, then
/// the right. The channels therefore influence each other's gain
/// reduction. This mirrors the reference processor and is kept for
/// behavioral compatibility rather than "fixed" into independent
/// per-channel detection. Mono-in/mono-out skips the second channel
/// entirely, so the envelopes advance once per frame and time constants
/// keep their nominal values.
///
/// # Example
///
/// ```rust
/// use quadra_engine::{EngineParameters, MultibandEngine};
///
/// let mut engine = MultibandEngine::new(48000.0);
/// engine.set_parameters(EngineParameters::default());
///
/// let input = [0.25, -0.25];
/// let mut output = [0.0; 2];
/// engine.process_frame(&input, &mut output).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct MultibandEngine {
    params: EngineParameters,
    splitters: [BandSplitterBank; 2],
    dynamics: [DynamicsUnit; BAND_COUNT],
    /// Saturation drive per band, cooked at parameter-set time.
    drive: [f32; BAND_COUNT],
    /// Dry blend gain, cooked (0.0 at or below the dry floor).
    dry_gain: f32,
    /// Master output gain, cooked.
    master_gain: f32,
    meters: MeterSnapshot,
    sample_rate: f32,
}

impl MultibandEngine {
    /// Create an engine at the given sample rate with the default preset.
    pub fn new(sample_rate: f32) -> Self {
        let params = EngineParameters::default();
        let [low, mid, high] = params.split_frequencies_hz;
        let mut engine = Self {
            params,
            splitters: [
                BandSplitterBank::new(sample_rate, low, mid, high),
                BandSplitterBank::new(sample_rate, low, mid, high),
            ],
            dynamics: core::array::from_fn(|_| DynamicsUnit::new(sample_rate)),
            drive: [1.0; BAND_COUNT],
            dry_gain: 0.0,
            master_gain: 1.0,
            meters: MeterSnapshot::default(),
            sample_rate,
        };
        engine.set_parameters(params);
        engine
    }

    /// Apply a full parameter snapshot.
    ///
    /// Call only at block boundaries, never mid-frame - the engine holds
    /// no lock and assumes the caller serializes this with processing.
    /// Crossover frequencies are clamped to `low <= mid <= high`; all
    /// derived coefficients are cooked here so the per-sample path stays
    /// free of transcendental math.
    pub fn set_parameters(&mut self, params: EngineParameters) {
        let mut params = params;

        let [low, mid, high] = params.split_frequencies_hz;
        for splitter in &mut self.splitters {
            splitter.set_frequencies(low, mid, high);
        }
        // Store the clamped values so the snapshot reflects what runs
        let (low, mid, high) = self.splitters[0].frequencies();
        params.split_frequencies_hz = [low, mid, high];

        for band in Band::ALL {
            self.dynamics[band.index()].set_parameters(params.dynamics_for(band));
        }

        for (drive, &raw) in self.drive.iter_mut().zip(&params.saturation_drive) {
            *drive = raw.clamp(1.0, 10.0);
        }

        self.dry_gain = params.dry_volume_linear();
        self.master_gain = params.master_output_linear();
        self.params = params;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            low_hz = low,
            mid_hz = mid,
            high_hz = high,
            dry_db = self.params.dry_volume_db,
            master_db = self.params.master_output_db,
            mid_side = self.params.enable_mid_side,
            "engine parameters applied"
        );
    }

    /// The stored parameter snapshot, with crossover clamping applied.
    pub fn parameters(&self) -> EngineParameters {
        self.params
    }

    /// Meter values from the most recently processed frame.
    pub fn meters(&self) -> MeterSnapshot {
        self.meters
    }

    /// Current sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Clear all filter and envelope state and adopt a new sample rate.
    ///
    /// Must be called before first use at a new rate.
    pub fn reset(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        for splitter in &mut self.splitters {
            splitter.reset(sample_rate);
        }
        for unit in &mut self.dynamics {
            unit.reset(sample_rate);
        }
        self.meters = MeterSnapshot::default();

        #[cfg(feature = "tracing")]
        tracing::trace!(sample_rate, "engine reset");
    }

    /// Process one audio frame.
    ///
    /// `input` and `output` carry one sample per channel. Supported
    /// layouts: mono->mono, mono->stereo (channel 0 duplicated exactly),
    /// stereo->stereo. Any other combination returns
    /// [`EngineError::UnsupportedChannelLayout`] with the output left
    /// untouched; the caller should treat that as a configuration error
    /// rather than retry.
    pub fn process_frame(&mut self, input: &[f32], output: &mut [f32]) -> Result<(), EngineError> {
        match (input.len(), output.len()) {
            (1, 1) | (1, 2) | (2, 2) => {}
            (input, output) => {
                return Err(EngineError::UnsupportedChannelLayout { input, output });
            }
        }

        // Mono-in/mono-out runs a single channel so the shared band
        // envelopes advance once per frame; any stereo layout runs both.
        let channels = output.len();
        let xn = match (input.len(), channels) {
            (2, _) => [input[0], input[1]],
            (1, 2) => [input[0], input[0]],
            _ => [input[0], 0.0],
        };
        let yn = self.process_stereo(xn, channels);

        output[0] = yn[0];
        if output.len() == 2 {
            // Mono-in/stereo-out duplicates channel 0 exactly
            output[1] = if input.len() == 1 { yn[0] } else { yn[1] };
        }
        Ok(())
    }

    /// Process a block of planar stereo samples.
    ///
    /// Equivalent to calling [`process_frame`](Self::process_frame) per
    /// sample with a stereo layout; meters reflect the final frame of the
    /// block.
    pub fn process_block(
        &mut self,
        left_in: &[f32],
        right_in: &[f32],
        left_out: &mut [f32],
        right_out: &mut [f32],
    ) {
        debug_assert_eq!(left_in.len(), right_in.len());
        debug_assert_eq!(left_in.len(), left_out.len());
        debug_assert_eq!(left_out.len(), right_out.len());

        for i in 0..left_in.len() {
            let yn = self.process_stereo([left_in[i], right_in[i]], 2);
            left_out[i] = yn[0];
            right_out[i] = yn[1];
        }
    }

    /// Core per-frame signal flow. `channels` is 1 for mono-in/mono-out
    /// and 2 otherwise; channel 1 state is simply skipped in the mono case.
    fn process_stereo(&mut self, xn: [f32; 2], channels: usize) -> [f32; 2] {
        let norm = 1.0 / channels as f32;

        // 1. Four-way split per channel, collecting the raw (pre-dynamics)
        //    bands and the per-channel dry sum.
        let mut raw = [[0.0f32; 2]; PRIMARY_BAND_COUNT];
        let mut dry = [0.0f32; 2];
        for ch in 0..channels {
            let bands = self.splitters[ch].process(xn[ch]);
            for (slot, band) in raw.iter_mut().zip(bands) {
                slot[ch] = band;
            }
            dry[ch] = bands.iter().sum();
        }

        // 2. Mid/side derived from the dry sums.
        let (mid_in, side_in) = mid_side_encode(dry[0], dry[1]);

        // 3. Input meters, pre-dynamics. The LowMid meter mixes the left
        //    LowMid sample with the right Low sample - a reference quirk
        //    kept as-is rather than second-guessed.
        self.meters.band_input[0] = norm * (raw[0][0] + raw[0][1]);
        self.meters.band_input[1] = norm * (raw[1][0] + raw[0][1]);
        self.meters.band_input[2] = norm * (raw[2][0] + raw[2][1]);
        self.meters.band_input[3] = norm * (raw[3][0] + raw[3][1]);

        // 4. Dynamics and saturation, channel-major: each band's shared
        //    envelope hears left then right.
        let mut processed = [[0.0f32; 2]; PRIMARY_BAND_COUNT];
        for ch in 0..channels {
            for band in 0..PRIMARY_BAND_COUNT {
                let shaped = self.dynamics[band].process(raw[band][ch]);
                processed[band][ch] = drive_clip(shaped, self.drive[band]);
            }
        }

        let mid_out = drive_clip(
            self.dynamics[Band::Mid.index()].process(mid_in),
            self.drive[Band::Mid.index()],
        );
        let side_out = drive_clip(
            self.dynamics[Band::Side.index()].process(side_in),
            self.drive[Band::Side.index()],
        );

        // 5. Mute/solo mask, recomputed every frame.
        let mask = resolve_band_mutes(self.params.mute, self.params.solo);
        for (band, slot) in processed.iter_mut().enumerate() {
            if mask[band] {
                *slot = [0.0; 2];
            }
        }
        let mid_out = if mask[Band::Mid.index()] { 0.0 } else { mid_out };
        let side_out = if mask[Band::Side.index()] { 0.0 } else { side_out };

        // 6. Mixdown: band sum, mid/side contribution, dry blend, master.
        let mut yn = [0.0f32; 2];
        for ch in 0..2 {
            yn[ch] = processed.iter().map(|slot| slot[ch]).sum();
        }
        if self.params.enable_mid_side {
            let (left, right) = mid_side_decode(mid_out, side_out);
            yn[0] += left;
            yn[1] += right;
        }
        for ch in 0..2 {
            yn[ch] += dry[ch] * self.dry_gain;
            yn[ch] *= self.master_gain;
        }

        // 7. Remaining meters.
        for (meter, unit) in self.meters.gain_reduction.iter_mut().zip(&self.dynamics) {
            *meter = 1.0 - unit.gain_reduction_linear();
        }
        for (meter, slot) in self.meters.band_output.iter_mut().zip(&processed) {
            *meter = norm * (slot[0] + slot[1]);
        }
        self.meters.master_input = norm * (xn[0] + xn[1]);
        self.meters.master_output = norm * (yn[0] + yn[1]);

        yn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transparent_params() -> EngineParameters {
        // Thresholds at 0 dB with ratio 1: the dynamics stage passes
        // signal through unchanged.
        let mut params = EngineParameters::default();
        params.threshold_db = [0.0; BAND_COUNT];
        params.ratio = [1.0; BAND_COUNT];
        params.knee_db = [0.0; BAND_COUNT];
        params
    }

    #[test]
    fn rejects_stereo_in_mono_out() {
        let mut engine = MultibandEngine::new(48000.0);
        let input = [0.5, 0.5];
        let mut output = [123.0];
        let err = engine.process_frame(&input, &mut output).unwrap_err();
        assert_eq!(
            err,
            EngineError::UnsupportedChannelLayout {
                input: 2,
                output: 1
            }
        );
        assert_eq!(output[0], 123.0, "output must be left untouched");
    }

    #[test]
    fn rejects_empty_frames() {
        let mut engine = MultibandEngine::new(48000.0);
        assert!(engine.process_frame(&[], &mut [0.0]).is_err());
        assert!(engine.process_frame(&[0.0], &mut []).is_err());
    }

    #[test]
    fn mono_to_stereo_duplicates_exactly() {
        let mut engine = MultibandEngine::new(48000.0);
        engine.set_parameters(transparent_params());

        for i in 0..512 {
            let x = libm::sinf(i as f32 * 0.13) * 0.4;
            let mut output = [0.0; 2];
            engine.process_frame(&[x], &mut output).unwrap();
            assert_eq!(
                output[0].to_bits(),
                output[1].to_bits(),
                "channels diverged at sample {i}"
            );
        }
    }

    #[test]
    fn mono_envelopes_advance_once_per_frame() {
        let mut params = EngineParameters::default();
        params.threshold_db = [-40.0; BAND_COUNT];
        params.ratio = [10.0; BAND_COUNT];
        params.knee_db = [0.0; BAND_COUNT];
        params.attack_ms = [50.0; BAND_COUNT];
        params.release_ms = [1000.0; BAND_COUNT];
        let mut mono = MultibandEngine::new(48000.0);
        let mut stereo = MultibandEngine::new(48000.0);
        mono.set_parameters(params);
        stereo.set_parameters(params);

        // Same step input; the stereo engine's shared envelopes hear every
        // sample twice (left then right), so mid-attack they sit higher
        // and pull the gain down further than the mono engine's.
        for _ in 0..100 {
            mono.process_frame(&[0.9], &mut [0.0]).unwrap();
            stereo.process_frame(&[0.9, 0.9], &mut [0.0; 2]).unwrap();
        }
        let mono_red = mono.meters().gain_reduction[Band::Low.index()];
        let stereo_red = stereo.meters().gain_reduction[Band::Low.index()];
        assert!(
            stereo_red > mono_red + 0.01,
            "mono reduction {mono_red} should trail stereo {stereo_red}"
        );
    }

    #[test]
    fn muting_all_bands_silences_wet_path() {
        let mut params = transparent_params();
        params.mute = [true; BAND_COUNT];
        let mut engine = MultibandEngine::new(48000.0);
        engine.set_parameters(params);

        for i in 0..1024 {
            let x = libm::sinf(i as f32 * 0.2);
            let mut output = [0.0; 2];
            engine.process_frame(&[x, x], &mut output).unwrap();
            assert_eq!(output, [0.0, 0.0]);
        }
    }

    #[test]
    fn dry_path_survives_full_mute() {
        let mut params = transparent_params();
        params.mute = [true; BAND_COUNT];
        params.dry_volume_db = -6.0;
        let mut engine = MultibandEngine::new(48000.0);
        engine.set_parameters(params);

        // 60 Hz sits well below the lowest split, where the recombined
        // band sum has negligible phase ripple; compare RMS, not peak.
        let mut in_sq = 0.0f32;
        let mut out_sq = 0.0f32;
        for i in 0..48000 {
            let x = libm::sinf(core::f32::consts::TAU * 60.0 * i as f32 / 48000.0);
            let mut output = [0.0; 2];
            engine.process_frame(&[x, x], &mut output).unwrap();
            if i > 8000 {
                in_sq += x * x;
                out_sq += output[0] * output[0];
            }
        }
        let ratio = libm::sqrtf(out_sq / in_sq);
        let expected = quadra_core::db_to_linear(-6.0);
        assert!(
            (ratio - expected).abs() < 0.025,
            "dry RMS ratio {ratio}, expected about {expected}"
        );
    }

    #[test]
    fn master_gain_scales_output() {
        let mut quiet = transparent_params();
        quiet.master_output_db = -20.0;
        let mut engine_a = MultibandEngine::new(48000.0);
        let mut engine_b = MultibandEngine::new(48000.0);
        engine_a.set_parameters(transparent_params());
        engine_b.set_parameters(quiet);

        let scale = quadra_core::db_to_linear(-20.0);
        for i in 0..2048 {
            let x = libm::sinf(i as f32 * 0.1) * 0.5;
            let mut out_a = [0.0; 2];
            let mut out_b = [0.0; 2];
            engine_a.process_frame(&[x, x], &mut out_a).unwrap();
            engine_b.process_frame(&[x, x], &mut out_b).unwrap();
            assert!(
                (out_b[0] - out_a[0] * scale).abs() < 1e-5,
                "sample {i}: {} vs {}",
                out_b[0],
                out_a[0] * scale
            );
        }
    }

    #[test]
    fn clamped_crossovers_are_reported_back() {
        let mut params = EngineParameters::default();
        params.split_frequencies_hz = [5000.0, 1000.0, 800.0];
        let mut engine = MultibandEngine::new(48000.0);
        engine.set_parameters(params);

        let [low, mid, high] = engine.parameters().split_frequencies_hz;
        assert!(low <= mid && mid <= high, "got {low}/{mid}/{high}");
    }

    #[test]
    fn meters_track_master_levels() {
        let mut engine = MultibandEngine::new(48000.0);
        engine.set_parameters(transparent_params());

        let mut output = [0.0; 2];
        engine.process_frame(&[0.5, 0.3], &mut output).unwrap();
        let meters = engine.meters();
        assert!((meters.master_input - 0.4).abs() < 1e-6);
        assert_eq!(meters.master_output, 0.5 * (output[0] + output[1]));
    }

    #[test]
    fn gain_reduction_meter_reports_compression() {
        let mut params = EngineParameters::default();
        params.threshold_db = [-30.0; BAND_COUNT];
        params.ratio = [4.0; BAND_COUNT];
        params.knee_db = [0.0; BAND_COUNT];
        params.attack_ms = [1.0; BAND_COUNT];
        let mut engine = MultibandEngine::new(48000.0);
        engine.set_parameters(params);

        // Loud 1 kHz sine drives the mid-high band into compression
        for i in 0..48000 {
            let x = libm::sinf(core::f32::consts::TAU * 1000.0 * i as f32 / 48000.0) * 0.9;
            let mut output = [0.0; 2];
            engine.process_frame(&[x, x], &mut output).unwrap();
        }
        let meters = engine.meters();
        assert!(
            meters.gain_reduction[Band::MidHigh.index()] > 0.1,
            "expected visible reduction, got {:?}",
            meters.gain_reduction
        );
        // An idle band shows none
        assert!(meters.gain_reduction[Band::Side.index()] < 0.05);
    }

    #[test]
    fn reset_clears_state_and_meters() {
        let mut engine = MultibandEngine::new(48000.0);
        engine.set_parameters(transparent_params());
        for _ in 0..256 {
            engine.process_frame(&[0.9, 0.9], &mut [0.0; 2]).unwrap();
        }
        engine.reset(96000.0);
        assert_eq!(engine.sample_rate(), 96000.0);
        assert_eq!(engine.meters().master_output, 0.0);
    }
}
