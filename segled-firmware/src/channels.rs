//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use heapless::Vec;

use segled_core::scan::ScanFrame;

/// Channel capacity for pending setting writes from the console
const SETTING_CHANNEL_SIZE: usize = 4;

/// Longest raw attribute write forwarded to the scan task
pub const MAX_WRITE: usize = 64;

/// Message from the scan task to the pin dispatcher.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameMessage {
    /// Light (or rest) per this prepared frame
    Frame(ScanFrame),
    /// Blank the panel, release its pins and stop dispatching
    Shutdown,
}

/// Raw attribute write forwarded from the console to the scan task.
///
/// The payload is the unparsed write text; the scan task applies it with
/// the same parsing the console uses for its readback mirror, so both
/// sides always agree on the effective value.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingWrite {
    Digits(Vec<u8, MAX_WRITE>),
    Refresh(Vec<u8, MAX_WRITE>),
    Brightness(Vec<u8, MAX_WRITE>),
}

/// Latest prepared frame, coalescing: if the dispatcher falls behind, a
/// newer frame silently replaces the undispatched one.
pub static SCAN_FRAME: Signal<CriticalSectionRawMutex, FrameMessage> = Signal::new();

/// Pending setting writes, drained by the scan task at tick boundaries
pub static SETTING_WRITES: Channel<CriticalSectionRawMutex, SettingWrite, SETTING_CHANNEL_SIZE> =
    Channel::new();

/// Request for the scan task to stop scanning and tear down
pub static SCAN_STOP: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Raised by the dispatcher once the panel is dark and its pins released
pub static DISPATCH_DONE: Signal<CriticalSectionRawMutex, ()> = Signal::new();
