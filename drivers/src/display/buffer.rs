//! In-memory mirror of the HT16K33 display RAM.
//!
//! The controller exposes 8 row registers of 16 bits each. A 4-digit backpack only uses the first
//! five: cells 0 to 3 hold the digit glyphs (with bit 7 as the decimal point) and cell 4 holds the
//! colon. The remaining cells are kept so that a push always covers the full register range.

use core::mem::size_of;

use super::glyph;

/// Number of visible digit columns
pub const DIGIT_COUNT: usize = 4;
/// Cell index of the colon indicator
pub const COLON_POSITION: usize = 4;
/// Number of addressable cells exposed by the controller
pub const CELL_COUNT: usize = 8;

const SIZE_OF_U16: usize = size_of::<u16>();

/// Length of a serialized buffer without the RAM address header
pub const SNAPSHOT_LEN: usize = CELL_COUNT * SIZE_OF_U16;
/// Length of a complete display RAM write, including the RAM address header
pub const FRAME_LEN: usize = SNAPSHOT_LEN + 1;

/// Display RAM start address, sent ahead of the cell data
pub const DISPLAY_RAM_ADDRESS: u8 = 0x00;

const COLON_ON: u16 = 0x01;
const DOT_BIT: u16 = glyph::DOT as u16;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayBuffer {
    cells: [u16; CELL_COUNT],
}

impl DisplayBuffer {
    pub const fn new() -> Self {
        Self {
            cells: [0; CELL_COUNT],
        }
    }

    /// Stores a glyph at `position`, optionally with the decimal point lit
    ///
    /// Positions beyond the colon cell are outside what the backpack wires up, so the write is
    /// dropped.
    pub fn write_digit(&mut self, position: usize, mask: u8, dot: bool) {
        let dot = if dot { glyph::DOT } else { 0 };
        self.write_digit_raw(position, mask | dot);
    }

    /// Stores `mask` unchanged at `position`. Positions above 4 are ignored.
    pub fn write_digit_raw(&mut self, position: usize, mask: u8) {
        if let Some(cell) = self.addressable_cell_mut(position) {
            *cell = mask as u16;
        }
    }

    pub fn write_colon(&mut self, on: bool) {
        self.cells[COLON_POSITION] = if on { COLON_ON } else { 0 };
    }

    /// Toggles the decimal point of a digit without touching its glyph
    ///
    /// Position 4 has no decimal point and controls the colon instead.
    pub fn set_dot(&mut self, position: usize, on: bool) {
        if position == COLON_POSITION {
            self.write_colon(on);
            return;
        }
        if let Some(cell) = self.addressable_cell_mut(position) {
            if on {
                *cell |= DOT_BIT;
            } else {
                *cell &= !DOT_BIT;
            }
        }
    }

    /// Blanks every digit column, leaving the colon alone
    pub fn blank_digits(&mut self) {
        self.cells[..DIGIT_COUNT].fill(0);
    }

    pub fn clear(&mut self) {
        self.cells = [0; CELL_COUNT];
    }

    pub fn cell(&self, position: usize) -> Option<u16> {
        self.cells.get(position).copied()
    }

    /// Segment masks of the four digit columns, left to right
    pub fn digits(&self) -> [u8; DIGIT_COUNT] {
        let mut digits = [0; DIGIT_COUNT];
        for (digit, cell) in digits.iter_mut().zip(self.cells.iter()) {
            *digit = (*cell & 0xff) as u8;
        }
        digits
    }

    pub fn colon(&self) -> bool {
        self.cells[COLON_POSITION] & COLON_ON != 0
    }

    /// Serializes every cell as a little endian `u16`
    pub fn snapshot(&self) -> [u8; SNAPSHOT_LEN] {
        let mut buf = [0; SNAPSHOT_LEN];
        for (chunk, cell) in buf.chunks_exact_mut(SIZE_OF_U16).zip(self.cells.iter()) {
            chunk.copy_from_slice(&cell.to_le_bytes());
        }
        buf
    }

    /// The complete bus payload for a display RAM write: the RAM address followed by the snapshot
    pub fn frame(&self) -> [u8; FRAME_LEN] {
        let mut buf = [0; FRAME_LEN];
        for (byte, segment_bits) in buf.iter_mut().zip(
            [DISPLAY_RAM_ADDRESS]
                .into_iter()
                .chain(self.snapshot().into_iter()),
        ) {
            *byte = segment_bits;
        }
        buf
    }

    fn addressable_cell_mut(&mut self, position: usize) -> Option<&mut u16> {
        if position > COLON_POSITION {
            return None;
        }
        self.cells.get_mut(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_with_dot_sets_high_bit() {
        let mut buffer = DisplayBuffer::new();
        buffer.write_digit(1, glyph::THREE, true);
        assert_eq!(buffer.cell(1), Some((glyph::THREE | glyph::DOT) as u16));
        buffer.write_digit(1, glyph::THREE, false);
        assert_eq!(buffer.cell(1), Some(glyph::THREE as u16));
    }

    #[test]
    fn writes_past_colon_are_ignored() {
        let mut buffer = DisplayBuffer::new();
        buffer.write_digit(0, glyph::ONE, false);
        let before = buffer;

        buffer.write_digit(5, glyph::EIGHT, true);
        buffer.write_digit_raw(7, 0xff);
        buffer.set_dot(6, true);
        buffer.write_digit_raw(usize::MAX, 0xff);

        assert_eq!(buffer, before);
        assert_eq!(buffer.snapshot(), before.snapshot());
    }

    #[test]
    fn dot_toggle_preserves_glyph() {
        let mut buffer = DisplayBuffer::new();
        buffer.write_digit(2, glyph::SEVEN, false);
        buffer.set_dot(2, true);
        assert_eq!(buffer.digits()[2], glyph::SEVEN | glyph::DOT);
        buffer.set_dot(2, false);
        assert_eq!(buffer.digits()[2], glyph::SEVEN);
    }

    #[test]
    fn dot_on_colon_position_drives_colon() {
        let mut buffer = DisplayBuffer::new();
        buffer.set_dot(COLON_POSITION, true);
        assert!(buffer.colon());
        assert_eq!(buffer.cell(COLON_POSITION), Some(0x01));
        buffer.set_dot(COLON_POSITION, false);
        assert!(!buffer.colon());
        assert_eq!(buffer.cell(COLON_POSITION), Some(0x00));
    }

    #[test]
    fn snapshot_is_little_endian_cells() {
        let mut buffer = DisplayBuffer::new();
        buffer.write_digit(0, glyph::ONE, false);
        buffer.write_digit(3, glyph::NINE, true);
        buffer.write_colon(true);

        let snapshot = buffer.snapshot();
        assert_eq!(
            snapshot,
            [
                glyph::ONE,
                0x00,
                0x00,
                0x00,
                0x00,
                0x00,
                glyph::NINE | glyph::DOT,
                0x00,
                0x01,
                0x00,
                0x00,
                0x00,
                0x00,
                0x00,
                0x00,
                0x00,
            ]
        );
        assert_eq!(buffer.frame()[0], DISPLAY_RAM_ADDRESS);
        assert_eq!(&buffer.frame()[1..], &snapshot[..]);
    }

    #[test]
    fn cleared_frame_is_all_zero_after_header() {
        let mut buffer = DisplayBuffer::new();
        buffer.write_digit(0, glyph::EIGHT, true);
        buffer.write_colon(true);
        buffer.clear();

        let frame = buffer.frame();
        assert_eq!(frame.len(), FRAME_LEN);
        assert_eq!(frame[0], DISPLAY_RAM_ADDRESS);
        assert!(frame[1..].iter().all(|&b| b == 0));
    }

    #[test]
    fn blanking_digits_keeps_colon() {
        let mut buffer = DisplayBuffer::new();
        buffer.write_digit(0, glyph::EIGHT, true);
        buffer.write_colon(true);
        buffer.blank_digits();
        assert_eq!(buffer.digits(), [0; DIGIT_COUNT]);
        assert!(buffer.colon());
    }
}
