//! Errors surfaced by the display drivers

use core::fmt;

use super::glyph::GlyphError;
use super::render::UnsupportedBase;

/// Errors that can occur while driving the display
///
/// Generic over the bus error so callers can still inspect what the I2C implementation reported.
/// Out of range positions and values too large for the display are not errors: the former are
/// ignored like the hardware ignores them, the latter show the error pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// The bus write failed. Display contents are undefined until the next full repaint.
    Bus(E),
    /// Only bases 2, 8, 10 and 16 can be rendered
    UnsupportedBase(u8),
    /// A single digit must be in `0..=15`
    DigitOutOfRange(u8),
}

impl<E> From<UnsupportedBase> for Error<E> {
    fn from(err: UnsupportedBase) -> Self {
        Error::UnsupportedBase(err.0)
    }
}

impl<E> From<GlyphError> for Error<E> {
    fn from(err: GlyphError) -> Self {
        match err {
            GlyphError::OutOfRange(digit) => Error::DigitOutOfRange(digit),
        }
    }
}

impl<E> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Bus(_) => write!(f, "I2C write failed"),
            Error::UnsupportedBase(base) => write!(f, "unsupported base {base}"),
            Error::DigitOutOfRange(digit) => write!(f, "digit {digit} has no glyph"),
        }
    }
}

impl<E: fmt::Debug> core::error::Error for Error<E> {}

#[cfg(feature = "defmt")]
impl<E> defmt::Format for Error<E> {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Error::Bus(_) => defmt::write!(fmt, "I2C write failed"),
            Error::UnsupportedBase(base) => defmt::write!(fmt, "unsupported base {}", base),
            Error::DigitOutOfRange(digit) => defmt::write!(fmt, "digit {} has no glyph", digit),
        }
    }
}
