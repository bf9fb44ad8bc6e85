//! Seven-segment font
//!
//! Converts displayable characters into segment bitmasks. Bit order is
//! A = bit 0 through G = bit 6, with the decimal point P at bit 7, matching
//! the de-facto layout described in the Wikipedia entry for "Seven-segment
//! display":
//!
//! ```text
//!    AAAA
//!   F    B
//!   F    B
//!    GGGG
//!   E    C
//!   E    C
//!    DDDD  P
//! ```

/// Decimal point bit within a segment mask.
pub const SEG_DP: u8 = 0x80;

/// Mask covering the seven segment bits A-G (decimal point excluded).
pub const SEG7_MASK: u8 = 0x7F;

/// All segments off.
pub const BLANK: u8 = 0x00;

/// Look up the segment pattern for a character.
///
/// The supported alphabet is the digits 0-9, a dash, the uppercase letters
/// A-Z, and space. Anything else maps to the blank pattern; this is a total
/// function with no failure mode. If `decimal_point` is set, the P bit is
/// mixed into the result.
pub fn encode(ch: u8, decimal_point: bool) -> u8 {
    let segments = match ch {
        b'0' => 0x3F,
        b'1' => 0x06,
        b'2' => 0x5B,
        b'3' => 0x4F,
        b'4' => 0x66,
        b'5' => 0x6D,
        b'6' => 0x7D,
        b'7' => 0x07,
        b'8' => 0x7F,
        b'9' => 0x6F,
        b'-' => 0x40,
        b'A' => 0x77,
        b'B' => 0x7F,
        b'C' => 0x39,
        b'D' => 0x3F,
        b'E' => 0x79,
        b'F' => 0x71,
        b'G' => 0x7D,
        b'H' => 0x76,
        b'I' => 0x06,
        b'J' => 0x0E,
        b'K' => 0x76,
        b'L' => 0x38,
        b'M' => 0x37,
        b'N' => 0x37,
        b'O' => 0x3F,
        b'P' => 0x73,
        b'Q' => 0x3F,
        b'R' => 0x77,
        b'S' => 0x6D,
        b'T' => 0x31,
        b'U' => 0x3E,
        b'V' => 0x3E,
        b'W' => 0x3E,
        b'X' => 0x76,
        b'Y' => 0x72,
        b'Z' => 0x5B,
        _ => BLANK,
    };

    if decimal_point {
        segments | SEG_DP
    } else {
        segments
    }
}
