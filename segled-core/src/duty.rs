//! Duty-cycle computation
//!
//! Perceived brightness is set by how long a digit stays lit versus dark
//! within its slice of the scan cycle. Where a design limits current at the
//! common digit-select pin, a digit with few lit segments appears brighter
//! than one with many (the same current spread over fewer LEDs); seg-adjust
//! compensates by scaling the duty cycle with the lit-segment count so
//! perceived brightness stays uniform across digits.

use crate::font::SEG7_MASK;
use crate::profile::ScanWeight;

/// Compute the effective duty cycle for one digit, in percent.
///
/// Without seg-adjust the configured brightness passes through unchanged.
/// With seg-adjust the result is `brightness * lit / weight`, where `lit`
/// counts the segment bits A-G (the decimal point never counts) and
/// `weight` is the profile's denominator. A blank digit therefore gets a
/// zero duty cycle.
pub fn compute_duty_cycle(segments: u8, brightness_percent: u8, adjust: Option<ScanWeight>) -> u8 {
    match adjust {
        None => brightness_percent,
        Some(weight) => {
            let lit = (segments & SEG7_MASK).count_ones();
            (u32::from(brightness_percent) * lit / weight.denominator()) as u8
        }
    }
}
