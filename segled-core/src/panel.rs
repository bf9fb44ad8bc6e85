//! Panel contents and settings
//!
//! One [`Panel`] per independently-scanned display. It holds the characters
//! and decimal points to show plus the refresh and brightness settings, and
//! implements the text attribute protocol used by the external control
//! surface (`digits`, `refresh`, `brightness`). Attribute writes never
//! fail: malformed digit text is truncated, unparseable numbers are
//! silently ignored and the prior value retained.

use heapless::{String, Vec};

/// Upper bound on digits per panel.
pub const MAX_DIGITS: usize = 8;

/// Longest `digits` readback text: every digit followed by a decimal point.
pub const MAX_TEXT: usize = MAX_DIGITS * 2;

/// The blank character.
pub const BLANK_CHAR: u8 = b' ';

/// Default full-scan refresh rate in Hz.
pub const DEFAULT_REFRESH_RATE_HZ: u32 = 100;

/// Default brightness in percent of maximum.
pub const DEFAULT_BRIGHTNESS_PERCENT: u8 = 100;

/// Contents and settings of one display panel.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Panel {
    digits: Vec<u8, MAX_DIGITS>,
    decimal_points: Vec<bool, MAX_DIGITS>,
    refresh_rate_hz: u32,
    brightness_percent: u8,
}

impl Panel {
    /// Create a blank panel with `digit_count` positions (clamped to
    /// 1..=[`MAX_DIGITS`]), scanning at the default refresh rate and full
    /// brightness.
    pub fn new(digit_count: usize) -> Self {
        let count = digit_count.clamp(1, MAX_DIGITS);
        let mut digits = Vec::new();
        let mut decimal_points = Vec::new();
        for _ in 0..count {
            let _ = digits.push(BLANK_CHAR);
            let _ = decimal_points.push(false);
        }
        Self {
            digits,
            decimal_points,
            refresh_rate_hz: DEFAULT_REFRESH_RATE_HZ,
            brightness_percent: DEFAULT_BRIGHTNESS_PERCENT,
        }
    }

    /// Number of digit positions on the device.
    pub fn digit_count(&self) -> usize {
        self.digits.len()
    }

    /// Character and decimal-point flag at a position.
    ///
    /// Out-of-range positions read as blank.
    pub fn digit(&self, index: usize) -> (u8, bool) {
        match (self.digits.get(index), self.decimal_points.get(index)) {
            (Some(&ch), Some(&dp)) => (ch, dp),
            _ => (BLANK_CHAR, false),
        }
    }

    /// Desired full-scan refresh rate in Hz.
    pub fn refresh_rate_hz(&self) -> u32 {
        self.refresh_rate_hz
    }

    /// Desired brightness in percent of maximum.
    pub fn brightness_percent(&self) -> u8 {
        self.brightness_percent
    }

    /// Set the refresh rate. Zero is ignored, keeping the scan period
    /// arithmetic well-defined.
    pub fn set_refresh_rate_hz(&mut self, hz: u32) {
        if hz > 0 {
            self.refresh_rate_hz = hz;
        }
    }

    /// Set the brightness, clamped to 100 percent.
    pub fn set_brightness_percent(&mut self, percent: u8) {
        self.brightness_percent = percent.min(100);
    }

    /// Apply a `digits` attribute write.
    ///
    /// Characters are consumed up to the digit-count limit or the first
    /// non-printable byte. A `.` immediately following a character sets that
    /// character's decimal point instead of consuming a digit slot; a
    /// leading `.` is ignored. If fewer characters were supplied than digit
    /// slots, they are right-aligned and the left-hand slots padded with
    /// blanks. This never fails.
    pub fn write_digits(&mut self, text: &[u8]) {
        let count = self.digit_count();
        let mut digits: Vec<u8, MAX_DIGITS> = Vec::new();
        let mut decimal_points: Vec<bool, MAX_DIGITS> = Vec::new();

        for &byte in text {
            if !byte.is_ascii_graphic() && byte != BLANK_CHAR {
                break;
            }
            if byte == b'.' {
                if let Some(dp) = decimal_points.last_mut() {
                    *dp = true;
                }
            } else {
                if digits.len() >= count {
                    break;
                }
                let _ = digits.push(byte);
                let _ = decimal_points.push(false);
            }
        }

        // Right-align: pad the left-hand slots with blanks.
        let pad = count - digits.len();
        for slot in 0..count {
            let (ch, dp) = if slot < pad {
                (BLANK_CHAR, false)
            } else {
                (digits[slot - pad], decimal_points[slot - pad])
            };
            self.digits[slot] = ch;
            self.decimal_points[slot] = dp;
        }
    }

    /// Apply a `refresh` attribute write. Unparseable or zero input is
    /// silently ignored and the prior value retained.
    pub fn write_refresh(&mut self, text: &[u8]) {
        if let Some(hz) = parse_unsigned(text) {
            self.set_refresh_rate_hz(hz);
        }
    }

    /// Apply a `brightness` attribute write. Unparseable input is silently
    /// ignored; values above 100 are clamped.
    pub fn write_brightness(&mut self, text: &[u8]) {
        if let Some(percent) = parse_unsigned(text) {
            self.set_brightness_percent(percent.min(100) as u8);
        }
    }

    /// Readback text for the `digits` attribute: each character, optionally
    /// followed by a literal `.` if its decimal point is set.
    pub fn digits_text(&self) -> String<MAX_TEXT> {
        let mut out = String::new();
        for slot in 0..self.digit_count() {
            let (ch, dp) = self.digit(slot);
            let _ = out.push(ch as char);
            if dp {
                let _ = out.push('.');
            }
        }
        out
    }
}

/// Parse a leading unsigned decimal, skipping leading whitespace and
/// ignoring anything after the digit run. `None` if no digits are present.
fn parse_unsigned(text: &[u8]) -> Option<u32> {
    let text = trim_leading_whitespace(text);
    let mut value: u32 = 0;
    let mut seen = false;
    for &byte in text {
        if !byte.is_ascii_digit() {
            break;
        }
        seen = true;
        value = value
            .saturating_mul(10)
            .saturating_add(u32::from(byte - b'0'));
    }
    if seen {
        Some(value)
    } else {
        None
    }
}

fn trim_leading_whitespace(text: &[u8]) -> &[u8] {
    let start = text
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(text.len());
    &text[start..]
}
