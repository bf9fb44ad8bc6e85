//! GPIO pin capability
//!
//! Pin writes go through [`embedded_hal::digital::OutputPin`], so anything
//! from a memory-mapped GPIO to a pin behind a slow I/O expander plugs in;
//! writes are allowed to block, which is why they run in the deferred
//! dispatch context rather than the scan timer. Acquisition goes through
//! [`PinSource`] so a board can hand out pins by opaque id and report
//! failure per pin.

pub use embedded_hal::digital::{OutputPin, PinState};

/// Logical position of a pin within a panel's wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinRole {
    /// Segment pin, A = 0 through G = 6, decimal point = 7
    Segment(u8),
    /// Digit-select pin, 0-based digit index
    DigitSelect(u8),
}

/// Fallible source of output pins, keyed by an opaque per-board id.
///
/// `request` must hand back a pin already driven to `initial_high`, so a
/// freshly claimed panel starts with every pin at its de-asserted level.
pub trait PinSource {
    /// Pin handle type produced by this source
    type Pin: OutputPin;
    /// Per-pin acquisition error
    type Error;

    /// Request exclusive use of a pin, driven to `initial_high`.
    fn request(&mut self, id: u32, initial_high: bool) -> Result<Self::Pin, Self::Error>;
}

/// Pin acquisition failure.
///
/// By the time this is returned, every pin acquired earlier for the same
/// panel has already been released again (in reverse acquisition order).
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClaimError<E> {
    /// Which pin failed to acquire
    pub role: PinRole,
    /// The source's error for that pin
    pub cause: E,
}
