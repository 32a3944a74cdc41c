//! Segment encodings for a single 7-segment digit.
//!
//! Bit layout follows the HT16K33 backpack wiring: bit 0 is segment A (top) through bit 6 for
//! segment G (middle bar). Bit 7 drives the decimal point next to the digit.

pub const BLANK: u8 = 0b00000000;
pub const MINUS: u8 = 0b01000000;
pub const DOT: u8 = 0b10000000;

pub const ZERO: u8 = 0b00111111;
pub const ONE: u8 = 0b00000110;
pub const TWO: u8 = 0b01011011;
pub const THREE: u8 = 0b01001111;
pub const FOUR: u8 = 0b01100110;
pub const FIVE: u8 = 0b01101101;
pub const SIX: u8 = 0b01111101;
pub const SEVEN: u8 = 0b00000111;
pub const EIGHT: u8 = 0b01111111;
pub const NINE: u8 = 0b01101111;
pub const HEX_A: u8 = 0b01110111;
pub const HEX_B: u8 = 0b01111100;
pub const HEX_C: u8 = 0b00111001;
pub const HEX_D: u8 = 0b01011110;
pub const HEX_E: u8 = 0b01111001;
pub const HEX_F: u8 = 0b01110001;

/// Digit glyphs indexed by value, `0`-`9` followed by `a`-`f`
pub const GLYPHS: [u8; 16] = [
    ZERO, ONE, TWO, THREE, FOUR, FIVE, SIX, SEVEN, EIGHT, NINE, HEX_A, HEX_B, HEX_C, HEX_D,
    HEX_E, HEX_F,
];

/// Raised when a glyph is requested for a value that has no single-digit representation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GlyphError {
    OutOfRange(u8),
}

impl core::fmt::Display for GlyphError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            GlyphError::OutOfRange(digit) => write!(f, "no glyph for digit value {digit}"),
        }
    }
}

impl core::error::Error for GlyphError {}

/// Looks up the segment mask for a digit value in `0..=15`
pub fn glyph_for(digit: u8) -> Result<u8, GlyphError> {
    GLYPHS
        .get(digit as usize)
        .copied()
        .ok_or(GlyphError::OutOfRange(digit))
}

/// Maps a printable character onto its glyph
///
/// Decimal digits and hex letters (either case) use the glyph table and `-` is the minus bar.
/// Every other character has no glyph and yields `None`.
pub fn glyph_for_char(c: char) -> Option<u8> {
    match c {
        '-' => Some(MINUS),
        _ => c
            .to_digit(16)
            .map(|digit| GLYPHS[digit as usize]),
    }
}

/// Inverse of [`glyph_for`], ignoring the decimal point bit
pub fn digit_for_glyph(mask: u8) -> Option<u8> {
    let mask = mask & !DOT;
    GLYPHS
        .iter()
        .position(|&glyph| glyph == mask)
        .map(|digit| digit as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_named_glyphs() {
        assert_eq!(glyph_for(0), Ok(ZERO));
        assert_eq!(glyph_for(9), Ok(NINE));
        assert_eq!(glyph_for(0xa), Ok(0x77));
        assert_eq!(glyph_for(0xf), Ok(0x71));
    }

    #[test]
    fn digit_above_hex_range_is_rejected() {
        assert_eq!(glyph_for(16), Err(GlyphError::OutOfRange(16)));
        assert_eq!(glyph_for(u8::MAX), Err(GlyphError::OutOfRange(u8::MAX)));
    }

    #[test]
    fn glyphs_are_unique_and_leave_dot_clear() {
        for (i, a) in GLYPHS.iter().enumerate() {
            assert_eq!(a & DOT, 0);
            for b in &GLYPHS[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn characters_map_case_insensitively() {
        assert_eq!(glyph_for_char('7'), Some(SEVEN));
        assert_eq!(glyph_for_char('b'), Some(HEX_B));
        assert_eq!(glyph_for_char('B'), Some(HEX_B));
        assert_eq!(glyph_for_char('-'), Some(MINUS));
        assert_eq!(glyph_for_char('g'), None);
        assert_eq!(glyph_for_char(' '), None);
    }

    #[test]
    fn glyph_decodes_back_to_digit() {
        for digit in 0..16 {
            let mask = glyph_for(digit).unwrap();
            assert_eq!(digit_for_glyph(mask), Some(digit));
            assert_eq!(digit_for_glyph(mask | DOT), Some(digit));
        }
        assert_eq!(digit_for_glyph(MINUS), None);
        assert_eq!(digit_for_glyph(BLANK), None);
    }
}
