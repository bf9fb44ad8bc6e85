//! Board wiring
//!
//! Pin assignments for a four-digit common-anode module on a Raspberry Pi
//! Pico, segments driven directly and digit anodes switched high through
//! NPN transistors:
//!
//! - GPIO2..GPIO9: segments A through G plus the decimal point
//! - GPIO10..GPIO13: digit selects, leftmost digit first
//! - GPIO0/GPIO1: UART0 control console
//!
//! A common-cathode module wired without transistors instead wants
//! [`PanelProfile::sma420564`], which drives the selects active-low and
//! has no decimal point pin.

use segled_core::profile::PanelProfile;

/// Digit positions wired up.
pub const DIGIT_COUNT: usize = 4;

/// Electrical profile for the wired module.
pub fn profile() -> PanelProfile {
    PanelProfile::gpio_segled(true)
}
