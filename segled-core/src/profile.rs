//! Per-device panel profiles
//!
//! The known device variants disagree on wiring polarity and on the
//! denominator used when scaling duty cycle by lit-segment count. Both are
//! fixed properties of a device, so they live in a profile chosen at setup
//! rather than being unified in code.

/// Electrical sense of "asserted" for a group of pins.
///
/// Common-cathode panels select a digit by pulling its cathode low, so their
/// digit-select pins are active-low; designs that switch the common pin
/// through a transistor are typically active-high instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Asserted = pin high
    ActiveHigh,
    /// Asserted = pin low
    ActiveLow,
}

impl Polarity {
    /// Logical pin level that realizes the given asserted state.
    pub fn level(self, asserted: bool) -> bool {
        match self {
            Polarity::ActiveHigh => asserted,
            Polarity::ActiveLow => !asserted,
        }
    }
}

/// Denominator used when seg-adjust scales duty cycle by lit segments.
///
/// One device variant weighs a digit against the 7 segments A-G; the other
/// weighs against all 8 positions including the decimal point. The lit
/// count itself always considers A-G only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScanWeight {
    /// Weigh against the 7 segments A-G
    Seven,
    /// Weigh against all 8 segment positions including the decimal point
    Eight,
}

impl ScanWeight {
    /// The denominator value.
    pub fn denominator(self) -> u32 {
        match self {
            ScanWeight::Seven => 7,
            ScanWeight::Eight => 8,
        }
    }
}

/// Fixed per-device scanning configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelProfile {
    /// Polarity of the segment pins
    pub segment_polarity: Polarity,
    /// Polarity of the digit-select pins
    pub digit_polarity: Polarity,
    /// Scale duty cycle with lit-segment count (for designs that limit
    /// current at the common pin)
    pub seg_adjust: bool,
    /// Denominator for seg-adjust scaling
    pub scan_weight: ScanWeight,
}

impl PanelProfile {
    /// SMA420564 driven bare: common-cathode, digit cathodes wired straight
    /// to GPIOs (active-low), segment anodes active-high, no decimal point
    /// pin. Brightness equalization is always on and weighs against the
    /// seven wired segments.
    pub const fn sma420564() -> Self {
        Self {
            segment_polarity: Polarity::ActiveHigh,
            digit_polarity: Polarity::ActiveLow,
            seg_adjust: true,
            scan_weight: ScanWeight::Seven,
        }
    }

    /// Generic gpio-segled wiring: all eight segment pins including the
    /// decimal point, digit selects switched through transistors
    /// (active-high). Seg-adjust is a per-board choice.
    pub const fn gpio_segled(seg_adjust: bool) -> Self {
        Self {
            segment_polarity: Polarity::ActiveHigh,
            digit_polarity: Polarity::ActiveHigh,
            seg_adjust,
            scan_weight: ScanWeight::Eight,
        }
    }

    /// The scan weight to apply, or `None` when seg-adjust is off.
    pub fn adjust(&self) -> Option<ScanWeight> {
        if self.seg_adjust {
            Some(self.scan_weight)
        } else {
            None
        }
    }
}
