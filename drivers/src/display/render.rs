//! Number to segment rendering.
//!
//! Two rendering strategies are available and both always repaint every digit column:
//!
//! - [`RenderStrategy::FixedPoint`] scales the value into an integer in the requested radix and
//!   emits digits right to left. Fractional digits are dropped one at a time until the value fits.
//!   When even the integer part does not fit, the error pattern is shown instead.
//! - [`RenderStrategy::Formatted`] formats the value as text and maps each character onto a glyph,
//!   right aligned. Text longer than the display is cut off after the fourth column.

use core::fmt::{self, Write};

use heapless::Vec;

use super::buffer::{DisplayBuffer, COLON_POSITION, DIGIT_COUNT};
use super::glyph::{self, GLYPHS};

/// A `.` in formatted text is only honored while fewer slots than this have been filled
const DOT_SLOT_LIMIT: usize = DIGIT_COUNT - 1;

/// Characters retained from formatted text; anything past this is counted but not stored
const TEXT_CAPACITY: usize = 24;

/// Numeric bases the renderer can express with the hex glyph table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Radix {
    Binary = 2,
    Octal = 8,
    Decimal = 10,
    Hexadecimal = 16,
}

impl Radix {
    pub const fn base(self) -> u8 {
        self as u8
    }
}

/// A base outside of 2, 8, 10 and 16 was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnsupportedBase(pub u8);

impl fmt::Display for UnsupportedBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported base {}", self.0)
    }
}

impl core::error::Error for UnsupportedBase {}

impl TryFrom<u8> for Radix {
    type Error = UnsupportedBase;

    fn try_from(base: u8) -> Result<Self, Self::Error> {
        match base {
            2 => Ok(Radix::Binary),
            8 => Ok(Radix::Octal),
            10 => Ok(Radix::Decimal),
            16 => Ok(Radix::Hexadecimal),
            _ => Err(UnsupportedBase(base)),
        }
    }
}

/// Selects how numbers are turned into glyphs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderStrategy {
    /// Scaled integer rendering with precision reduction and an overflow error pattern
    #[default]
    FixedPoint,
    /// Text formatting followed by a character scan, silently truncating long output
    Formatted,
}

/// Something to put on the display
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderInput<'a> {
    Integer(i64),
    Fraction { value: f64, fractional_digits: u8 },
    /// Pre-formatted text, always mapped character by character
    Text(&'a str),
}

/// What ended up on the display after a render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderOutcome {
    /// The value is shown in full, possibly with fewer fractional digits than requested
    Shown,
    /// The value could not fit and the error pattern is shown
    Overflow,
    /// Characters past the fourth column were dropped
    Truncated,
}

/// Renders `input` into `buffer` using `strategy`
pub fn render(
    buffer: &mut DisplayBuffer,
    input: RenderInput<'_>,
    radix: Radix,
    strategy: RenderStrategy,
) -> RenderOutcome {
    match (input, strategy) {
        (RenderInput::Text(text), _) => render_text(buffer, text),
        (RenderInput::Integer(value), RenderStrategy::FixedPoint) => {
            render_fixed_point(buffer, value as f64, 0, radix)
        }
        (RenderInput::Integer(value), RenderStrategy::Formatted) => {
            render_formatted_integer(buffer, value, radix)
        }
        (
            RenderInput::Fraction {
                value,
                fractional_digits,
            },
            RenderStrategy::FixedPoint,
        ) => render_fixed_point(buffer, value, fractional_digits, radix),
        (
            RenderInput::Fraction {
                value,
                fractional_digits,
            },
            RenderStrategy::Formatted,
        ) => render_formatted(buffer, value, fractional_digits, radix),
    }
}

/// Shows the overflow pattern: a minus bar in every cell up to the colon except the third
pub fn render_error(buffer: &mut DisplayBuffer) {
    for position in 0..=COLON_POSITION {
        let mask = if position == 2 {
            glyph::BLANK
        } else {
            glyph::MINUS
        };
        buffer.write_digit_raw(position, mask);
    }
}

/// Fixed-point rendering of `value` with up to `fractional_digits` digits after the point
///
/// A negative value gives up the leftmost column to the minus sign. Fractional digits are never
/// requested beyond what the remaining columns can show next to a leading digit.
pub fn render_fixed_point(
    buffer: &mut DisplayBuffer,
    value: f64,
    fractional_digits: u8,
    radix: Radix,
) -> RenderOutcome {
    if !value.is_finite() {
        log::warn!("cannot display non-finite value");
        render_error(buffer);
        return RenderOutcome::Overflow;
    }

    let is_neg = value < 0.0;
    let numeric_slots = if is_neg { DIGIT_COUNT - 1 } else { DIGIT_COUNT };
    let magnitude = if is_neg { -value } else { value };
    let base = radix.base() as f64;

    let mut fractional_digits = fractional_digits.min((numeric_slots - 1) as u8);
    let mut scale = 1.0_f64;
    for _ in 0..fractional_digits {
        scale *= base;
    }
    let mut scaled = magnitude * scale + 0.5;

    let mut too_big = 1.0_f64;
    for _ in 0..numeric_slots {
        too_big *= base;
    }

    while scaled >= too_big {
        if fractional_digits == 0 {
            log::warn!(
                "{} does not fit in {} digits (base {})",
                value,
                numeric_slots,
                radix.base()
            );
            render_error(buffer);
            return RenderOutcome::Overflow;
        }
        fractional_digits -= 1;
        scale /= base;
        scaled = magnitude * scale + 0.5;
    }

    let base = radix.base() as u64;
    let mut digits = scaled as u64;
    let mut positions = (0..DIGIT_COUNT).rev();

    if digits == 0 {
        if let Some(position) = positions.next() {
            buffer.write_digit(position, glyph::ZERO, false);
        }
    } else {
        let mut emitted = 0;
        while digits != 0 || emitted <= fractional_digits {
            let Some(position) = positions.next() else {
                break;
            };
            let dot = fractional_digits != 0 && emitted == fractional_digits;
            buffer.write_digit(position, GLYPHS[(digits % base) as usize], dot);
            digits /= base;
            emitted += 1;
        }
    }

    if is_neg {
        if let Some(position) = positions.next() {
            buffer.write_digit_raw(position, glyph::MINUS);
        }
    }

    for position in positions {
        buffer.write_digit_raw(position, glyph::BLANK);
    }

    RenderOutcome::Shown
}

/// Formatted rendering of a fractional value
///
/// Decimal values keep `fractional_digits` digits after the point. Other radixes show the integer
/// part only.
pub fn render_formatted(
    buffer: &mut DisplayBuffer,
    value: f64,
    fractional_digits: u8,
    radix: Radix,
) -> RenderOutcome {
    let mut text = GlyphText::new();
    let formatted = match radix {
        Radix::Decimal => write!(text, "{:.*}", fractional_digits as usize, value),
        _ => write_integer(&mut text, value as i64, radix),
    };
    // GlyphText never rejects input
    debug_assert!(formatted.is_ok());
    text.scan_into(buffer)
}

/// Formatted rendering of an integer
pub fn render_formatted_integer(
    buffer: &mut DisplayBuffer,
    value: i64,
    radix: Radix,
) -> RenderOutcome {
    let mut text = GlyphText::new();
    let formatted = write_integer(&mut text, value, radix);
    debug_assert!(formatted.is_ok());
    text.scan_into(buffer)
}

/// Maps `text` onto the display one character per column, right aligned
///
/// Digits and the letters `a` to `f` show their glyph, `-` shows the minus bar and `.` lights the
/// decimal point of the column before it. Every other character leaves its column blank and does
/// not count towards the alignment.
pub fn render_text(buffer: &mut DisplayBuffer, text: &str) -> RenderOutcome {
    let mut glyph_text = GlyphText::new();
    let formatted = glyph_text.write_str(text);
    debug_assert!(formatted.is_ok());
    glyph_text.scan_into(buffer)
}

fn write_integer(out: &mut GlyphText, value: i64, radix: Radix) -> fmt::Result {
    if radix == Radix::Decimal {
        return write!(out, "{value}");
    }
    if value < 0 {
        out.write_char('-')?;
    }
    let magnitude = value.unsigned_abs();
    match radix {
        Radix::Binary => write!(out, "{magnitude:b}"),
        Radix::Octal => write!(out, "{magnitude:o}"),
        Radix::Decimal => write!(out, "{magnitude}"),
        Radix::Hexadecimal => write!(out, "{magnitude:x}"),
    }
}

/// Formatting sink that keeps the head of the text and counts the characters that have a glyph
struct GlyphText {
    chars: Vec<u8, TEXT_CAPACITY>,
    glyphs: usize,
    dropped: bool,
}

impl GlyphText {
    fn new() -> Self {
        Self {
            chars: Vec::new(),
            glyphs: 0,
            dropped: false,
        }
    }

    fn scan_into(&self, buffer: &mut DisplayBuffer) -> RenderOutcome {
        buffer.blank_digits();

        let start = DIGIT_COUNT.saturating_sub(self.glyphs);
        let mut filled = 0;
        let mut truncated = self.dropped;
        for &c in self.chars.iter() {
            if c == b'.' {
                if filled > 0 && filled < DOT_SLOT_LIMIT {
                    buffer.set_dot(start + filled - 1, true);
                }
                continue;
            }
            let position = start + filled;
            if position >= DIGIT_COUNT {
                truncated = true;
                break;
            }
            let mask = glyph::glyph_for_char(c as char).unwrap_or(glyph::BLANK);
            buffer.write_digit_raw(position, mask);
            filled += 1;
        }

        if truncated {
            log::debug!("text wider than {} digits was cut off", DIGIT_COUNT);
            RenderOutcome::Truncated
        } else {
            RenderOutcome::Shown
        }
    }
}

impl Write for GlyphText {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if glyph::glyph_for_char(c).is_some() {
                self.glyphs += 1;
            }
            // Only the head of the text can reach the display
            let byte = if c.is_ascii() { c as u8 } else { b' ' };
            if self.chars.push(byte).is_err() && c != '.' {
                self.dropped = true;
            }
        }
        Ok(())
    }
}
