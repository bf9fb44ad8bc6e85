//! Pin-level drivers for segmented LED panels
//!
//! Concrete pin driving for the scanning engine in `segled-core`:
//!
//! - GPIO pin capability (fallible acquisition, polarity-aware writes)
//! - Segment panel dispatcher that turns prepared scan frames into ordered
//!   pin writes

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod panel;
