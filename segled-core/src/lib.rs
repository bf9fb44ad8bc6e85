//! Board-agnostic scanning engine for GPIO-driven segmented LED panels
//!
//! Multi-digit seven-segment displays without decoder hardware share their
//! segment pins across digits, so only one digit can be lit at any instant.
//! The driver rapidly "scans" the digits, cycling through them on the order
//! of 100 Hz per full sweep, so that persistence of vision makes them appear
//! simultaneously lit. Brightness is controlled by inserting all-dark
//! resting phases whose length follows a computed duty cycle.
//!
//! This crate contains everything that does not touch hardware:
//!
//! - Seven-segment font lookup
//! - Duty-cycle computation (with optional per-digit seg-adjust)
//! - Panel contents and the text attribute protocol
//! - Scan state advancement and tick period arithmetic
//!
//! Pin-level driving lives in `segled-drivers`.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod duty;
pub mod font;
pub mod panel;
pub mod profile;
pub mod scan;
