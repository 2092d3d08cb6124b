//! Band identifiers for the four crossover bands plus mid/side.

/// Total number of dynamics bands (four crossover bands, mid, side).
pub const BAND_COUNT: usize = 6;

/// Number of crossover-derived bands per channel.
pub const PRIMARY_BAND_COUNT: usize = 4;

/// One dynamics band.
///
/// `Low` through `High` are the crossover bands produced by the splitter
/// bank; `Mid` and `Side` are derived from the stereo sum/difference and
/// processed by their own dynamics units. The discriminants index the
/// per-band parameter and meter arrays, replacing the magic 0..5 indexing
/// a flat layout would invite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Band {
    /// Below the low split frequency.
    Low = 0,
    /// Between the low and mid splits.
    LowMid = 1,
    /// Between the mid and high splits.
    MidHigh = 2,
    /// Above the high split frequency.
    High = 3,
    /// Stereo sum component, (L + R) / 2.
    Mid = 4,
    /// Stereo difference component, (L - R) / 2.
    Side = 5,
}

impl Band {
    /// All six bands in array order.
    pub const ALL: [Band; BAND_COUNT] = [
        Band::Low,
        Band::LowMid,
        Band::MidHigh,
        Band::High,
        Band::Mid,
        Band::Side,
    ];

    /// The four crossover bands in array order.
    pub const PRIMARY: [Band; PRIMARY_BAND_COUNT] =
        [Band::Low, Band::LowMid, Band::MidHigh, Band::High];

    /// Array index of this band.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Display label.
    pub const fn label(self) -> &'static str {
        match self {
            Band::Low => "Low",
            Band::LowMid => "Low Mid",
            Band::MidHigh => "Mid High",
            Band::High => "High",
            Band::Mid => "Mid",
            Band::Side => "Side",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_match_array_order() {
        for (i, band) in Band::ALL.iter().enumerate() {
            assert_eq!(band.index(), i);
        }
    }

    #[test]
    fn primary_bands_are_the_first_four() {
        assert_eq!(Band::PRIMARY.len(), PRIMARY_BAND_COUNT);
        for band in Band::PRIMARY {
            assert!(band.index() < PRIMARY_BAND_COUNT);
        }
    }
}
