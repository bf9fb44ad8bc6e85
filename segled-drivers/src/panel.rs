//! Segment panel pin driver
//!
//! [`SegmentPanel`] owns the GPIO handles for one panel and turns prepared
//! scan frames into ordered pin writes. It runs in a context that may
//! block; the scan timer never touches pins itself, it only hands frames
//! over.
//!
//! The panel tracks which digit it last lit. Frames can be coalesced on the
//! way here (a newer frame replacing an undispatched one), so only the pin
//! driver knows which select pin is physically asserted; de-asserting it
//! first on every dispatch guarantees two digits are never lit at once and
//! a skipped frame cannot leave a stale digit glowing.

use heapless::Vec;

use segled_core::panel::MAX_DIGITS;
use segled_core::profile::PanelProfile;
use segled_core::scan::ScanFrame;

use crate::gpio::{ClaimError, OutputPin, PinRole, PinSource, PinState};

/// Number of segment pins on a decimal-point capable device.
pub const MAX_SEGMENTS: usize = 8;

/// Pin ids for one panel, in wiring order.
///
/// `segments` holds 7 entries (A-G) for devices without a decimal point
/// pin, or 8 (A-G plus P) for devices with one.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelPins {
    /// Segment pin ids, A first
    pub segments: Vec<u32, MAX_SEGMENTS>,
    /// Digit-select pin ids, digit 0 first
    pub digits: Vec<u32, MAX_DIGITS>,
}

/// Pin driver for one panel.
pub struct SegmentPanel<P> {
    segments: Vec<P, MAX_SEGMENTS>,
    digit_selects: Vec<P, MAX_DIGITS>,
    profile: PanelProfile,
    last_digit: usize,
}

impl<P: OutputPin> SegmentPanel<P> {
    /// Wrap already-acquired pins, driving everything to its de-asserted
    /// level so the panel starts dark.
    pub fn from_pins(
        segments: Vec<P, MAX_SEGMENTS>,
        digit_selects: Vec<P, MAX_DIGITS>,
        profile: PanelProfile,
    ) -> Result<Self, P::Error> {
        let mut panel = Self {
            segments,
            digit_selects,
            profile,
            last_digit: 0,
        };
        panel.blank()?;
        Ok(panel)
    }

    /// Acquire the panel's pins from `source`, each at its de-asserted
    /// level. If any request fails, the pins acquired so far are released
    /// in reverse order and the failure reported with the pin that caused
    /// it; the panel is not created.
    pub fn claim<S>(
        source: &mut S,
        pins: &PanelPins,
        profile: PanelProfile,
    ) -> Result<Self, ClaimError<S::Error>>
    where
        S: PinSource<Pin = P>,
    {
        let mut segments: Vec<P, MAX_SEGMENTS> = Vec::new();
        for (bit, &id) in pins.segments.iter().enumerate() {
            match source.request(id, profile.segment_polarity.level(false)) {
                Ok(pin) => {
                    let _ = segments.push(pin);
                }
                Err(cause) => {
                    release_reverse(&mut segments);
                    return Err(ClaimError {
                        role: PinRole::Segment(bit as u8),
                        cause,
                    });
                }
            }
        }

        let mut digit_selects: Vec<P, MAX_DIGITS> = Vec::new();
        for (digit, &id) in pins.digits.iter().enumerate() {
            match source.request(id, profile.digit_polarity.level(false)) {
                Ok(pin) => {
                    let _ = digit_selects.push(pin);
                }
                Err(cause) => {
                    release_reverse(&mut digit_selects);
                    release_reverse(&mut segments);
                    return Err(ClaimError {
                        role: PinRole::DigitSelect(digit as u8),
                        cause,
                    });
                }
            }
        }

        Ok(Self {
            segments,
            digit_selects,
            profile,
            last_digit: 0,
        })
    }

    /// Carry out the pin writes for one prepared frame.
    ///
    /// Strictly ordered: the previously lit digit is always de-asserted
    /// first, then (unless resting) the segment pins are driven to the
    /// frame's bitmask and the active digit asserted.
    pub fn dispatch(&mut self, frame: &ScanFrame) -> Result<(), P::Error> {
        let last = self.last_digit;
        self.set_digit(last, false)?;

        if frame.resting {
            return Ok(());
        }

        let polarity = self.profile.segment_polarity;
        for (bit, pin) in self.segments.iter_mut().enumerate() {
            let lit = frame.segments & (1 << bit) != 0;
            pin.set_state(PinState::from(polarity.level(lit)))?;
        }

        let active = usize::from(frame.active_digit);
        self.set_digit(active, true)?;
        self.last_digit = active;
        Ok(())
    }

    /// Drive every pin to its de-asserted level.
    pub fn blank(&mut self) -> Result<(), P::Error> {
        let polarity = self.profile.segment_polarity;
        for pin in self.segments.iter_mut() {
            pin.set_state(PinState::from(polarity.level(false)))?;
        }
        let polarity = self.profile.digit_polarity;
        for pin in self.digit_selects.iter_mut() {
            pin.set_state(PinState::from(polarity.level(false)))?;
        }
        Ok(())
    }

    /// Blank the panel and release its pins.
    ///
    /// Digit selects are released first, then segments, each group in
    /// reverse acquisition order. Once this returns no further pin write
    /// can occur.
    pub fn shutdown(mut self) -> Result<(), P::Error> {
        self.blank()?;
        release_reverse(&mut self.digit_selects);
        release_reverse(&mut self.segments);
        Ok(())
    }

    /// Number of digit positions wired up.
    pub fn digit_count(&self) -> usize {
        self.digit_selects.len()
    }

    /// Index of the digit most recently asserted.
    pub fn last_digit(&self) -> usize {
        self.last_digit
    }

    /// The segment pins, A first.
    pub fn segment_pins(&self) -> &[P] {
        &self.segments
    }

    /// The digit-select pins, digit 0 first.
    pub fn digit_select_pins(&self) -> &[P] {
        &self.digit_selects
    }

    fn set_digit(&mut self, digit: usize, asserted: bool) -> Result<(), P::Error> {
        let level = self.profile.digit_polarity.level(asserted);
        if let Some(pin) = self.digit_selects.get_mut(digit) {
            pin.set_state(PinState::from(level))?;
        }
        Ok(())
    }
}

/// Drop pins in reverse acquisition order; dropping a handle releases it.
fn release_reverse<P, const N: usize>(pins: &mut Vec<P, N>) {
    while pins.pop().is_some() {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::{Cell, RefCell};
    use core::convert::Infallible;
    use segled_core::font::encode;

    #[derive(Debug, Default)]
    struct MockPin {
        high: bool,
    }

    impl embedded_hal::digital::ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.high = true;
            Ok(())
        }
    }

    fn mock_panel(digit_count: usize, profile: PanelProfile) -> SegmentPanel<MockPin> {
        let mut segments = Vec::new();
        for _ in 0..MAX_SEGMENTS {
            let _ = segments.push(MockPin::default());
        }
        let mut digit_selects = Vec::new();
        for _ in 0..digit_count {
            let _ = digit_selects.push(MockPin::default());
        }
        match SegmentPanel::from_pins(segments, digit_selects, profile) {
            Ok(panel) => panel,
            Err(e) => match e {},
        }
    }

    fn frame(active_digit: u8, segments: u8) -> ScanFrame {
        ScanFrame {
            active_digit,
            segments,
            resting: false,
        }
    }

    fn rest_frame() -> ScanFrame {
        ScanFrame {
            active_digit: 0,
            segments: 0,
            resting: true,
        }
    }

    fn asserted_selects(panel: &SegmentPanel<MockPin>, active_high: bool) -> usize {
        panel
            .digit_select_pins()
            .iter()
            .filter(|p| p.high == active_high)
            .count()
    }

    #[test]
    fn test_dispatch_drives_segments_and_select() {
        let mut panel = mock_panel(4, PanelProfile::gpio_segled(true));
        let mask = encode(b'2', false); // 0x5B

        panel.dispatch(&frame(2, mask)).unwrap();

        for (bit, pin) in panel.segment_pins().iter().enumerate() {
            assert_eq!(pin.high, mask & (1 << bit) != 0, "segment bit {}", bit);
        }
        assert!(panel.digit_select_pins()[2].high);
        assert_eq!(asserted_selects(&panel, true), 1);
        assert_eq!(panel.last_digit(), 2);
    }

    #[test]
    fn test_dispatch_turns_previous_digit_off() {
        let mut panel = mock_panel(4, PanelProfile::gpio_segled(true));

        panel.dispatch(&frame(0, 0x06)).unwrap();
        panel.dispatch(&frame(1, 0x5B)).unwrap();

        assert!(!panel.digit_select_pins()[0].high);
        assert!(panel.digit_select_pins()[1].high);
        assert_eq!(asserted_selects(&panel, true), 1);
    }

    #[test]
    fn test_rest_frame_goes_dark() {
        let mut panel = mock_panel(4, PanelProfile::gpio_segled(true));

        panel.dispatch(&frame(3, 0x7F)).unwrap();
        panel.dispatch(&rest_frame()).unwrap();

        assert_eq!(asserted_selects(&panel, true), 0);
    }

    #[test]
    fn test_coalesced_frames_still_clear_previous_digit() {
        let mut panel = mock_panel(4, PanelProfile::gpio_segled(true));

        // Frames for digits 1 and 2 were coalesced away; the dispatcher
        // still only ever has one digit asserted.
        panel.dispatch(&frame(0, 0x06)).unwrap();
        panel.dispatch(&frame(3, 0x4F)).unwrap();

        assert!(!panel.digit_select_pins()[0].high);
        assert!(panel.digit_select_pins()[3].high);
        assert_eq!(asserted_selects(&panel, true), 1);
    }

    #[test]
    fn test_active_low_digit_selects() {
        let mut panel = mock_panel(4, PanelProfile::sma420564());

        // De-asserted active-low selects idle high.
        assert_eq!(asserted_selects(&panel, true), 4);

        panel.dispatch(&frame(1, 0x06)).unwrap();
        assert!(!panel.digit_select_pins()[1].high);
        assert_eq!(asserted_selects(&panel, false), 1);
    }

    #[test]
    fn test_blank_deasserts_everything() {
        let mut panel = mock_panel(4, PanelProfile::gpio_segled(true));
        panel.dispatch(&frame(2, 0x7F)).unwrap();

        panel.blank().unwrap();

        assert_eq!(asserted_selects(&panel, true), 0);
        assert!(panel.segment_pins().iter().all(|p| !p.high));
    }

    // Select pin that counts concurrently asserted selects through a shared
    // cell, to catch any ordering where two digits are lit at once.
    struct GuardedPin<'a> {
        high: bool,
        is_select: bool,
        lit: &'a Cell<u8>,
    }

    impl embedded_hal::digital::ErrorType for GuardedPin<'_> {
        type Error = Infallible;
    }

    impl OutputPin for GuardedPin<'_> {
        fn set_low(&mut self) -> Result<(), Infallible> {
            if self.is_select && self.high {
                self.lit.set(self.lit.get() - 1);
            }
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            if self.is_select && !self.high {
                self.lit.set(self.lit.get() + 1);
                assert!(self.lit.get() <= 1, "two digit selects asserted at once");
            }
            self.high = true;
            Ok(())
        }
    }

    #[test]
    fn test_never_two_selects_asserted() {
        let lit = Cell::new(0u8);
        let mut segments = Vec::new();
        for _ in 0..MAX_SEGMENTS {
            let _ = segments.push(GuardedPin {
                high: false,
                is_select: false,
                lit: &lit,
            });
        }
        let mut digit_selects = Vec::new();
        for _ in 0..4 {
            let _ = digit_selects.push(GuardedPin {
                high: false,
                is_select: true,
                lit: &lit,
            });
        }
        let mut panel =
            match SegmentPanel::from_pins(segments, digit_selects, PanelProfile::gpio_segled(true))
            {
                Ok(panel) => panel,
                Err(e) => match e {},
            };

        // The GuardedPin asserts inside set_high, so any overlap inside a
        // dispatch trips immediately.
        for digit in [0u8, 1, 2, 3, 0, 2, 1] {
            panel.dispatch(&frame(digit, 0x7F)).unwrap();
            assert_eq!(lit.get(), 1);
        }
        panel.dispatch(&rest_frame()).unwrap();
        assert_eq!(lit.get(), 0);
    }

    // Pin source that can fail at a configured request and records every
    // grant and release, for unwind-order checks.
    struct TrackedPin<'a> {
        id: u32,
        dropped: &'a RefCell<Vec<u32, 32>>,
    }

    impl Drop for TrackedPin<'_> {
        fn drop(&mut self) {
            let _ = self.dropped.borrow_mut().push(self.id);
        }
    }

    impl embedded_hal::digital::ErrorType for TrackedPin<'_> {
        type Error = Infallible;
    }

    impl OutputPin for TrackedPin<'_> {
        fn set_low(&mut self) -> Result<(), Infallible> {
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            Ok(())
        }
    }

    struct TrackedSource<'a> {
        fail_at: Option<u32>,
        granted: RefCell<Vec<(u32, bool), 32>>,
        dropped: &'a RefCell<Vec<u32, 32>>,
    }

    impl<'a> PinSource for TrackedSource<'a> {
        type Pin = TrackedPin<'a>;
        type Error = ();

        fn request(&mut self, id: u32, initial_high: bool) -> Result<TrackedPin<'a>, ()> {
            if self.fail_at == Some(id) {
                return Err(());
            }
            let _ = self.granted.borrow_mut().push((id, initial_high));
            Ok(TrackedPin {
                id,
                dropped: self.dropped,
            })
        }
    }

    fn four_digit_pins() -> PanelPins {
        let mut pins = PanelPins::default();
        for id in 10..18 {
            let _ = pins.segments.push(id);
        }
        for id in 20..24 {
            let _ = pins.digits.push(id);
        }
        pins
    }

    #[test]
    fn test_claim_requests_deasserted_levels() {
        let dropped = RefCell::new(Vec::new());
        let mut source = TrackedSource {
            fail_at: None,
            granted: RefCell::new(Vec::new()),
            dropped: &dropped,
        };

        // Common cathode: idle segments low, idle digit selects high.
        let panel = SegmentPanel::claim(&mut source, &four_digit_pins(), PanelProfile::sma420564());
        assert!(panel.is_ok());
        for &(id, initial_high) in source.granted.borrow().iter() {
            assert_eq!(initial_high, id >= 20, "pin {}", id);
        }
    }

    #[test]
    fn test_claim_failure_unwinds_in_reverse() {
        let dropped = RefCell::new(Vec::new());
        let mut source = TrackedSource {
            fail_at: Some(22),
            granted: RefCell::new(Vec::new()),
            dropped: &dropped,
        };

        let err = SegmentPanel::claim(&mut source, &four_digit_pins(), PanelProfile::sma420564())
            .err()
            .unwrap();
        assert!(matches!(err.role, PinRole::DigitSelect(2)));

        // Everything granted before the failure was released again, most
        // recently acquired first.
        let expected: [u32; 10] = [21, 20, 17, 16, 15, 14, 13, 12, 11, 10];
        assert_eq!(dropped.borrow().as_slice(), &expected);
    }

    #[test]
    fn test_shutdown_releases_all_pins() {
        let dropped = RefCell::new(Vec::new());
        let mut source = TrackedSource {
            fail_at: None,
            granted: RefCell::new(Vec::new()),
            dropped: &dropped,
        };

        let panel = SegmentPanel::claim(&mut source, &four_digit_pins(), PanelProfile::sma420564())
            .ok()
            .unwrap();
        panel.shutdown().unwrap();

        // Digit selects first, then segments, each newest-first.
        let expected: [u32; 12] = [23, 22, 21, 20, 17, 16, 15, 14, 13, 12, 11, 10];
        assert_eq!(dropped.borrow().as_slice(), &expected);
    }
}
