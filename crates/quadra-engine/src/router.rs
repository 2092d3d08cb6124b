//! Mute/solo resolution.

use crate::band::BAND_COUNT;

/// Resolve per-band mute and solo flags into an effective mute mask.
///
/// If any band is soloed, every band is muted except the soloed ones -
/// solo overrides the soloed band's own mute flag and overrides non-solo
/// bands regardless of their mute state. With no solo active, each band's
/// own mute flag passes through.
///
/// Purely functional; the engine recomputes this every frame before the
/// mixdown.
///
/// # Example
///
/// ```rust
/// use quadra_engine::resolve_band_mutes;
///
/// let mut solo = [false; 6];
/// solo[2] = true;
/// let mask = resolve_band_mutes([false; 6], solo);
/// assert_eq!(mask, [true, true, false, true, true, true]);
/// ```
pub fn resolve_band_mutes(
    mute: [bool; BAND_COUNT],
    solo: [bool; BAND_COUNT],
) -> [bool; BAND_COUNT] {
    let any_solo = solo.iter().any(|&s| s);
    if any_solo {
        let mut mask = [true; BAND_COUNT];
        for (m, &s) in mask.iter_mut().zip(&solo) {
            if s {
                *m = false;
            }
        }
        mask
    } else {
        mute
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_solo_passes_mute_flags_through() {
        let mute = [true, false, true, false, false, true];
        assert_eq!(resolve_band_mutes(mute, [false; BAND_COUNT]), mute);
    }

    #[test]
    fn single_solo_mutes_everything_else() {
        let mut solo = [false; BAND_COUNT];
        solo[2] = true;
        let mask = resolve_band_mutes([false; BAND_COUNT], solo);
        assert_eq!(mask, [true, true, false, true, true, true]);
    }

    #[test]
    fn solo_overrides_own_mute_flag() {
        let mut mute = [false; BAND_COUNT];
        mute[1] = true;
        let mut solo = [false; BAND_COUNT];
        solo[1] = true;
        let mask = resolve_band_mutes(mute, solo);
        assert!(!mask[1], "soloed band must play even if muted");
    }

    #[test]
    fn multiple_solos_all_play() {
        let mut solo = [false; BAND_COUNT];
        solo[0] = true;
        solo[4] = true;
        let mask = resolve_band_mutes([true; BAND_COUNT], solo);
        assert_eq!(mask, [false, true, true, true, false, true]);
    }
}
