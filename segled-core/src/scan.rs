//! Scan state advancement and tick timing
//!
//! The scanning cursor for one panel. Each scheduler tick either advances
//! to the next digit (computing its segment pattern and duty cycle) or
//! enters a resting phase where every digit stays dark. Alternating active
//! and resting phases in proportion to the duty cycle dims the display
//! without a PWM channel per pin.
//!
//! The advance step runs in the timer context: it only mutates state and
//! must complete quickly. The pin writes it prepares are carried out later
//! by the dispatcher in `segled-drivers` from a [`ScanFrame`] snapshot.

use crate::duty::compute_duty_cycle;
use crate::font;
use crate::panel::Panel;
use crate::profile::PanelProfile;

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Snapshot of one prepared tick, handed to the pin dispatcher.
///
/// Frames may be coalesced (a newer frame replacing an undispatched older
/// one), so they carry everything the dispatcher needs and nothing that
/// depends on every frame being delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanFrame {
    /// Digit to light, when not resting
    pub active_digit: u8,
    /// Segment bitmask to drive (A = bit 0 .. P = bit 7)
    pub segments: u8,
    /// All-dark phase: leave every digit off
    pub resting: bool,
}

/// Mutable scanning cursor, one per panel.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanState {
    active_digit: usize,
    resting: bool,
    segments_out: u8,
    duty_cycle_percent: u8,
}

impl ScanState {
    /// Initial state: digit 0, not resting, zero duty cycle.
    pub fn new() -> Self {
        Self {
            active_digit: 0,
            resting: false,
            segments_out: 0,
            duty_cycle_percent: 0,
        }
    }

    /// Advance one step in the scanning cycle.
    ///
    /// A resting phase is entered by toggling only while the previous duty
    /// cycle is strictly between 0 and 100; at the extremes the cursor
    /// never rests. When resting, the digit and segments stay as they were
    /// so the dispatcher leaves the panel dark without recomputation.
    pub fn advance(&mut self, panel: &Panel, profile: &PanelProfile) {
        if self.duty_cycle_percent > 0 && self.duty_cycle_percent < 100 {
            self.resting = !self.resting;
        } else {
            self.resting = false;
        }
        if self.resting {
            return;
        }

        self.active_digit += 1;
        if self.active_digit >= panel.digit_count() {
            self.active_digit = 0;
        }

        let (ch, decimal_point) = panel.digit(self.active_digit);
        self.segments_out = font::encode(ch, decimal_point);
        self.duty_cycle_percent = compute_duty_cycle(
            self.segments_out,
            panel.brightness_percent(),
            profile.adjust(),
        );
    }

    /// Snapshot the current step for the dispatcher.
    pub fn frame(&self) -> ScanFrame {
        ScanFrame {
            active_digit: self.active_digit as u8,
            segments: self.segments_out,
            resting: self.resting,
        }
    }

    /// Duration of the phase just entered, in nanoseconds.
    ///
    /// At a duty cycle strictly between 0 and 100 the nominal per-digit
    /// period is split between the active and resting phases in proportion
    /// to the duty cycle; the two phases of one digit always sum to one
    /// nominal period. At the extremes the full period is used unscaled.
    pub fn phase_period_ns(&self, panel: &Panel) -> u64 {
        let period = nominal_period_ns(panel.digit_count(), panel.refresh_rate_hz());
        if self.duty_cycle_percent > 0 && self.duty_cycle_percent < 100 {
            let percent = if self.resting {
                100 - self.duty_cycle_percent
            } else {
                self.duty_cycle_percent
            };
            period / 100 * u64::from(percent)
        } else {
            period
        }
    }

    /// Index of the digit the cursor is on.
    pub fn active_digit(&self) -> usize {
        self.active_digit
    }

    /// Whether the cursor is in an all-dark phase.
    pub fn resting(&self) -> bool {
        self.resting
    }

    /// Segment bitmask prepared for the active digit.
    pub fn segments_out(&self) -> u8 {
        self.segments_out
    }

    /// Duty cycle computed for the active digit, in percent.
    pub fn duty_cycle_percent(&self) -> u8 {
        self.duty_cycle_percent
    }
}

impl Default for ScanState {
    fn default() -> Self {
        Self::new()
    }
}

/// Nominal per-phase period: one full scan of all digits takes
/// `1 / refresh_rate_hz` seconds.
pub fn nominal_period_ns(digit_count: usize, refresh_rate_hz: u32) -> u64 {
    NANOS_PER_SEC / (digit_count.max(1) as u64 * u64::from(refresh_rate_hz.max(1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_brightness_panel(digit_count: usize, text: &[u8]) -> Panel {
        let mut panel = Panel::new(digit_count);
        panel.write_digits(text);
        panel
    }

    #[test]
    fn test_cursor_visits_every_digit() {
        // Full duty cycle, so no resting phases interleave.
        let panel = full_brightness_panel(4, b"8888");
        let profile = PanelProfile::gpio_segled(false);
        let mut state = ScanState::new();

        let mut visited = [0u32; 4];
        for _ in 0..12 {
            state.advance(&panel, &profile);
            assert!(!state.resting());
            visited[state.active_digit()] += 1;
        }
        assert_eq!(visited, [3, 3, 3, 3]);
    }

    #[test]
    fn test_single_digit_panel_stays_on_digit_zero() {
        let panel = full_brightness_panel(1, b"7");
        let profile = PanelProfile::gpio_segled(false);
        let mut state = ScanState::new();

        for _ in 0..5 {
            state.advance(&panel, &profile);
            assert_eq!(state.active_digit(), 0);
            assert_eq!(state.segments_out(), font::encode(b'7', false));
        }
    }

    #[test]
    fn test_resting_alternates_at_partial_duty() {
        let mut panel = full_brightness_panel(4, b"8888");
        panel.write_brightness(b"50");
        let profile = PanelProfile::gpio_segled(false);
        let mut state = ScanState::new();

        // First advance: prior duty is 0, so no rest; duty becomes 50.
        state.advance(&panel, &profile);
        assert!(!state.resting());
        assert_eq!(state.duty_cycle_percent(), 50);

        // From here on active and resting strictly alternate.
        for _ in 0..8 {
            state.advance(&panel, &profile);
            assert!(state.resting());
            state.advance(&panel, &profile);
            assert!(!state.resting());
        }
    }

    #[test]
    fn test_no_resting_at_duty_extremes() {
        let profile = PanelProfile::gpio_segled(false);

        let bright = full_brightness_panel(4, b"8888");
        let mut state = ScanState::new();
        for _ in 0..10 {
            state.advance(&bright, &profile);
            assert!(!state.resting());
            assert_eq!(state.duty_cycle_percent(), 100);
        }

        let mut dark = full_brightness_panel(4, b"8888");
        dark.write_brightness(b"0");
        let mut state = ScanState::new();
        for _ in 0..10 {
            state.advance(&dark, &profile);
            assert!(!state.resting());
            assert_eq!(state.duty_cycle_percent(), 0);
        }
    }

    #[test]
    fn test_resting_keeps_digit_and_segments() {
        let mut panel = full_brightness_panel(4, b"1234");
        panel.write_brightness(b"50");
        let profile = PanelProfile::gpio_segled(false);
        let mut state = ScanState::new();

        state.advance(&panel, &profile);
        let digit = state.active_digit();
        let segments = state.segments_out();

        state.advance(&panel, &profile);
        assert!(state.resting());
        assert_eq!(state.active_digit(), digit);
        assert_eq!(state.segments_out(), segments);
    }

    #[test]
    fn test_segments_follow_contents() {
        let panel = full_brightness_panel(4, b"12");
        let profile = PanelProfile::gpio_segled(false);
        let mut state = ScanState::new();

        // Cursor starts on digit 0, so the first advance lands on digit 1.
        state.advance(&panel, &profile);
        assert_eq!(state.active_digit(), 1);
        assert_eq!(state.segments_out(), 0x00); // blank padding
        state.advance(&panel, &profile);
        assert_eq!(state.segments_out(), 0x06); // '1'
        state.advance(&panel, &profile);
        assert_eq!(state.segments_out(), 0x5B); // '2'
    }

    #[test]
    fn test_nominal_period() {
        // 4 digits at 100 Hz: 2.5 ms per digit.
        assert_eq!(nominal_period_ns(4, 100), 2_500_000);
        assert_eq!(nominal_period_ns(1, 100), 10_000_000);
        // Degenerate inputs fall back to sane divisors.
        assert_eq!(nominal_period_ns(0, 0), NANOS_PER_SEC);
    }

    #[test]
    fn test_phase_split_sums_to_nominal_period() {
        let mut panel = full_brightness_panel(4, b"8888");
        panel.write_brightness(b"50");
        let profile = PanelProfile::gpio_segled(true);
        let mut state = ScanState::new();

        state.advance(&panel, &profile);
        let duty = state.duty_cycle_percent();
        assert!(duty > 0 && duty < 100);
        let active = state.phase_period_ns(&panel);

        state.advance(&panel, &profile);
        assert!(state.resting());
        let resting = state.phase_period_ns(&panel);

        assert_eq!(active + resting, nominal_period_ns(4, 100));
    }

    #[test]
    fn test_full_period_at_extremes() {
        let panel = full_brightness_panel(4, b"8888");
        let profile = PanelProfile::gpio_segled(false);
        let mut state = ScanState::new();

        state.advance(&panel, &profile);
        assert_eq!(state.duty_cycle_percent(), 100);
        assert_eq!(state.phase_period_ns(&panel), nominal_period_ns(4, 100));
    }
}
