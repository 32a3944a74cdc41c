//! Drivers and rendering for 4-digit 7-segment displays behind an HT16K33.
//!
//! The most common setup is a 0.56" 4-digit backpack where the HT16K33 provides the I2C
//! interface. Rendering happens into an in-memory [`buffer::DisplayBuffer`] which the drivers
//! push to the controller as a single display RAM write.

pub mod buffer;
pub mod config;
pub mod error;
pub mod glyph;
pub mod ht16k33_7seg_display;
pub mod render;
