//! Drivers for a 4-digit 7-segment display with the HT16K33 chip. The most common setup that uses
//! the HT16K33 is a 0.56" 7-segment display backpack where the HT16K33 provides I2C communication
//! from microcontrollers to the display.
//!
//! The module contains two variants, a synchronous driver and an asynchronous driver. Both keep
//! a [`DisplayBuffer`] mirroring the display RAM and push it to the controller after every change
//! that affects what is lit.

use core::marker::PhantomData;

use embedded_hal::i2c::I2c as SyncI2c;
use embedded_hal_async::i2c::I2c as AsyncI2c;

use super::buffer::{DisplayBuffer, COLON_POSITION};
use super::config::Config;
use super::error::Error;
use super::glyph;
use super::render::{self, Radix, RenderInput, RenderOutcome, RenderStrategy};
use crate::initialization::{Active, DriverState, Uninitialized};

/// Blink modes supported by the HT16K33
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum BlinkRate {
    #[default]
    Off = 0,
    TwoHz,
    OneHz,
    HalfHz,
}

impl BlinkRate {
    /// Interprets a raw rate value. Anything above 3 turns blinking off.
    pub const fn from_raw(rate: u8) -> Self {
        match rate {
            1 => BlinkRate::TwoHz,
            2 => BlinkRate::OneHz,
            3 => BlinkRate::HalfHz,
            _ => BlinkRate::Off,
        }
    }
}

const HT16K33_DISPLAY_ON: u8 = 0x01;
const MAX_BRIGHTNESS: u8 = 0x0f;

#[derive(Debug, Clone, Copy)]
#[repr(u8)]
enum HT16K33Commands {
    Begin = 0x21,
    SetBlink = 0x80,
    SetBrightness = 0xE0,
}

fn blink_command(rate: BlinkRate) -> u8 {
    HT16K33Commands::SetBlink as u8 | HT16K33_DISPLAY_ON | ((rate as u8) << 1)
}

fn brightness_command(brightness: u8) -> u8 {
    HT16K33Commands::SetBrightness as u8 | brightness.min(MAX_BRIGHTNESS)
}

fn power_command(turn_on: bool) -> u8 {
    if turn_on {
        HT16K33Commands::SetBlink as u8 | HT16K33_DISPLAY_ON
    } else {
        HT16K33Commands::SetBlink as u8
    }
}

/// Column the sequential writer moves to after `position`. The colon slot is skipped.
fn next_cursor(position: usize) -> usize {
    match position.saturating_add(1) {
        2 => 3,
        next => next,
    }
}

/// What a single character does in sequential write mode
enum CursorAction {
    Reset,
    Digit(u8),
    Ignore,
}

fn cursor_action(c: char) -> CursorAction {
    match c {
        '\n' | '\r' => CursorAction::Reset,
        '0'..='9' => CursorAction::Digit(c as u8 - b'0'),
        _ => CursorAction::Ignore,
    }
}

/// A synchronous driver for the HT16K33 driving a 4-digit 7-segment display. Can be used with any
/// I2C interface that implements the `embedded_hal::i2c::I2c` trait.
pub struct SyncI2C7SegDisplay<T: SyncI2c, S: DriverState = Uninitialized> {
    address: u8,
    strategy: RenderStrategy,
    buffer: DisplayBuffer,
    cursor: usize,
    tx: T,
    _state: PhantomData<S>,
}

impl<T: SyncI2c, S: DriverState> SyncI2C7SegDisplay<T, S> {
    /// Gives back the I2C interface
    pub fn release(self) -> T {
        self.tx
    }

    fn into_state<N: DriverState>(self) -> SyncI2C7SegDisplay<T, N> {
        SyncI2C7SegDisplay {
            address: self.address,
            strategy: self.strategy,
            buffer: self.buffer,
            cursor: self.cursor,
            tx: self.tx,
            _state: PhantomData,
        }
    }

    fn command(&mut self, command: u8) -> Result<(), Error<T::Error>> {
        self.tx.write(self.address, &[command]).map_err(Error::Bus)
    }
}

impl<T: SyncI2c> SyncI2C7SegDisplay<T, Uninitialized> {
    /// Creates a new synchronous driver instance
    ///
    /// In order to use the display, the driver needs to send initialization commands which can be
    /// achieved by calling `begin()`.
    pub fn new(tx: T, config: Config) -> Self {
        Self {
            address: config.address,
            strategy: config.strategy,
            buffer: DisplayBuffer::new(),
            cursor: 0,
            tx,
            _state: PhantomData,
        }
    }

    /// Initializes the HT16K33 IC chip
    ///
    /// Upon initialization, commands are sent to turn on the HT16K33's oscillator, turn on the
    /// display without blinking and set the brightness to its maximum. Display RAM is left as is.
    pub fn begin(mut self) -> Result<SyncI2C7SegDisplay<T, Active>, Error<T::Error>> {
        log::debug!("starting HT16K33 at {:#04x}", self.address);
        self.command(HT16K33Commands::Begin as u8)?;
        let mut display = self.into_state::<Active>();
        display.set_blink_rate(BlinkRate::Off)?;
        display.set_brightness(MAX_BRIGHTNESS)?;
        Ok(display)
    }
}

impl<T: SyncI2c> SyncI2C7SegDisplay<T, Active> {
    /// The buffer as last rendered
    pub fn buffer(&self) -> &DisplayBuffer {
        &self.buffer
    }

    pub fn strategy(&self) -> RenderStrategy {
        self.strategy
    }

    pub fn set_strategy(&mut self, strategy: RenderStrategy) {
        self.strategy = strategy;
    }

    /// Column the next sequential character lands in
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Turns the display on or off without touching display RAM
    pub fn turn_on(&mut self) -> Result<(), Error<T::Error>> {
        log::debug!("display on");
        self.command(power_command(true))
    }

    pub fn turn_off(&mut self) -> Result<(), Error<T::Error>> {
        log::debug!("display off");
        self.command(power_command(false))
    }

    /// Sets the brightness of the display
    ///
    /// Acceptable brightness values is a range from [0, 15]. Anything higher than 15 will be
    /// interpreted as a brightness of 15.
    pub fn set_brightness(&mut self, brightness: u8) -> Result<(), Error<T::Error>> {
        log::debug!("brightness {}", brightness.min(MAX_BRIGHTNESS));
        self.command(brightness_command(brightness))
    }

    /// Sets the blinkrate of the display
    ///
    /// Setting any rate, including [`BlinkRate::Off`], also turns the display on.
    pub fn set_blink_rate(&mut self, rate: BlinkRate) -> Result<(), Error<T::Error>> {
        log::debug!("blink rate {:?}", rate);
        self.command(blink_command(rate))
    }

    /// Sets the blinkrate from its raw value
    ///
    /// The HT16K33 chip supports 4 blink modes:
    /// - 0: Blink off
    /// - 1: 2Hz blink (1 period every 1/2 second)
    /// - 2: 1Hz blink (1 period every second)
    /// - 3: 1/2Hz blink (1 period every 2 seconds)
    ///
    /// Any other value turns blinking off.
    pub fn set_blink_rate_raw(&mut self, rate: u8) -> Result<(), Error<T::Error>> {
        self.set_blink_rate(BlinkRate::from_raw(rate))
    }

    /// Sends the buffer to the display
    pub fn write_display(&mut self) -> Result<(), Error<T::Error>> {
        log::trace!("push {:?}", self.buffer.digits());
        self.tx
            .write(self.address, &self.buffer.frame())
            .map_err(Error::Bus)
    }

    /// Clears the display
    ///
    /// Zeroes the buffer, colon included, and pushes it.
    pub fn clear(&mut self) -> Result<(), Error<T::Error>> {
        self.buffer.clear();
        self.write_display()
    }

    /// Stores a raw segment mask at `position` without pushing it
    ///
    /// Positions above 4 are ignored.
    pub fn write_digit_raw(&mut self, position: usize, mask: u8) {
        self.buffer.write_digit_raw(position, mask);
    }

    /// Shows a single digit value (`0..=15`) at `position`
    ///
    /// Positions above 4 are ignored and nothing is sent, whatever the digit.
    pub fn write_digit_num(
        &mut self,
        position: usize,
        digit: u8,
        dot: bool,
    ) -> Result<(), Error<T::Error>> {
        if position > COLON_POSITION {
            return Ok(());
        }
        let mask = glyph::glyph_for(digit)?;
        self.buffer.write_digit(position, mask, dot);
        self.write_display()
    }

    /// Shows a digit or hex character value at `position`, without a decimal point
    pub fn show_digit_at(&mut self, position: usize, digit: u8) -> Result<(), Error<T::Error>> {
        self.write_digit_num(position, digit, false)
    }

    pub fn draw_colon(&mut self, on: bool) -> Result<(), Error<T::Error>> {
        self.buffer.write_colon(on);
        self.write_display()
    }

    /// Lights or clears the decimal point at `position`
    ///
    /// Position 4 controls the colon. Positions above 4 are ignored and nothing is sent.
    pub fn show_dot(&mut self, position: usize, on: bool) -> Result<(), Error<T::Error>> {
        if position > COLON_POSITION {
            return Ok(());
        }
        self.buffer.set_dot(position, on);
        self.write_display()
    }

    /// Renders `input` with the configured strategy and pushes the result
    ///
    /// A value too large for the display is not an error: the error pattern is shown and
    /// [`RenderOutcome::Overflow`] is returned.
    pub fn render(
        &mut self,
        input: RenderInput<'_>,
        radix: Radix,
    ) -> Result<RenderOutcome, Error<T::Error>> {
        let outcome = render::render(&mut self.buffer, input, radix, self.strategy);
        self.write_display()?;
        Ok(outcome)
    }

    pub fn print_number(
        &mut self,
        number: i64,
        radix: Radix,
    ) -> Result<RenderOutcome, Error<T::Error>> {
        self.render(RenderInput::Integer(number), radix)
    }

    /// Sends a floating point number to the display
    ///
    /// <div class="warning">Fixed-point rendering scales the value with floating point arithmetic
    /// before rounding, so values sitting right on a rounding boundary may round either way.</div>
    pub fn print_float(
        &mut self,
        value: f64,
        fractional_digits: u8,
        radix: Radix,
    ) -> Result<RenderOutcome, Error<T::Error>> {
        self.render(
            RenderInput::Fraction {
                value,
                fractional_digits,
            },
            radix,
        )
    }

    /// Like [`print_float`](Self::print_float) with an unchecked base
    ///
    /// The base is validated before the buffer is touched.
    pub fn print_in_base(
        &mut self,
        value: f64,
        fractional_digits: u8,
        base: u8,
    ) -> Result<RenderOutcome, Error<T::Error>> {
        let radix = Radix::try_from(base)?;
        self.print_float(value, fractional_digits, radix)
    }

    pub fn print_text(&mut self, text: &str) -> Result<RenderOutcome, Error<T::Error>> {
        self.render(RenderInput::Text(text), Radix::Decimal)
    }

    pub fn show_hex_number(&mut self, number: i64) -> Result<RenderOutcome, Error<T::Error>> {
        self.print_number(number, Radix::Hexadecimal)
    }

    /// Writes a character at the cursor and advances it
    ///
    /// Digits are shown at the cursor, which then moves on skipping the colon slot. A newline or
    /// carriage return moves the cursor back to the first column. Every other character is
    /// ignored. Returns the number of digits written.
    pub fn write_char(&mut self, c: char) -> Result<usize, Error<T::Error>> {
        match cursor_action(c) {
            CursorAction::Reset => {
                self.cursor = 0;
                Ok(0)
            }
            CursorAction::Digit(digit) => {
                self.write_digit_num(self.cursor, digit, false)?;
                self.cursor = next_cursor(self.cursor);
                Ok(1)
            }
            CursorAction::Ignore => Ok(0),
        }
    }

    /// Writes every character of `text` in sequential mode, returning the digits written
    pub fn write_str(&mut self, text: &str) -> Result<usize, Error<T::Error>> {
        let mut written = 0;
        for c in text.chars() {
            written += self.write_char(c)?;
        }
        Ok(written)
    }
}

/// An asynchronous driver for the HT16K33 driving a 4-digit 7-segment display. Can be used with
/// any I2C interface that implements the `embedded_hal_async::i2c::I2c` trait.
pub struct AsyncI2C7SegDisplay<T: AsyncI2c, S: DriverState = Uninitialized> {
    address: u8,
    strategy: RenderStrategy,
    buffer: DisplayBuffer,
    cursor: usize,
    tx: T,
    _state: PhantomData<S>,
}

impl<T: AsyncI2c, S: DriverState> AsyncI2C7SegDisplay<T, S> {
    /// Gives back the I2C interface
    pub fn release(self) -> T {
        self.tx
    }

    fn into_state<N: DriverState>(self) -> AsyncI2C7SegDisplay<T, N> {
        AsyncI2C7SegDisplay {
            address: self.address,
            strategy: self.strategy,
            buffer: self.buffer,
            cursor: self.cursor,
            tx: self.tx,
            _state: PhantomData,
        }
    }

    async fn command(&mut self, command: u8) -> Result<(), Error<T::Error>> {
        self.tx
            .write(self.address, &[command])
            .await
            .map_err(Error::Bus)
    }
}

impl<T: AsyncI2c> AsyncI2C7SegDisplay<T, Uninitialized> {
    /// Creates a new asynchronous driver instance
    ///
    /// In order to use the display, the driver needs to send initialization commands which can be
    /// achieved by calling `begin()`.
    pub fn new(tx: T, config: Config) -> Self {
        Self {
            address: config.address,
            strategy: config.strategy,
            buffer: DisplayBuffer::new(),
            cursor: 0,
            tx,
            _state: PhantomData,
        }
    }

    /// Initializes the HT16K33 IC chip
    ///
    /// Upon initialization, commands are sent to turn on the HT16K33's oscillator, turn on the
    /// display without blinking and set the brightness to its maximum. Display RAM is left as is.
    pub async fn begin(mut self) -> Result<AsyncI2C7SegDisplay<T, Active>, Error<T::Error>> {
        log::debug!("starting HT16K33 at {:#04x}", self.address);
        self.command(HT16K33Commands::Begin as u8).await?;
        let mut display = self.into_state::<Active>();
        display.set_blink_rate(BlinkRate::Off).await?;
        display.set_brightness(MAX_BRIGHTNESS).await?;
        Ok(display)
    }
}

impl<T: AsyncI2c> AsyncI2C7SegDisplay<T, Active> {
    /// The buffer as last rendered
    pub fn buffer(&self) -> &DisplayBuffer {
        &self.buffer
    }

    pub fn strategy(&self) -> RenderStrategy {
        self.strategy
    }

    pub fn set_strategy(&mut self, strategy: RenderStrategy) {
        self.strategy = strategy;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub async fn turn_on(&mut self) -> Result<(), Error<T::Error>> {
        log::debug!("display on");
        self.command(power_command(true)).await
    }

    pub async fn turn_off(&mut self) -> Result<(), Error<T::Error>> {
        log::debug!("display off");
        self.command(power_command(false)).await
    }

    /// Sets the brightness of the display
    ///
    /// Acceptable brightness values is a range from [0, 15]. Anything higher than 15 will be
    /// interpreted as a brightness of 15.
    pub async fn set_brightness(&mut self, brightness: u8) -> Result<(), Error<T::Error>> {
        log::debug!("brightness {}", brightness.min(MAX_BRIGHTNESS));
        self.command(brightness_command(brightness)).await
    }

    pub async fn set_blink_rate(&mut self, rate: BlinkRate) -> Result<(), Error<T::Error>> {
        log::debug!("blink rate {:?}", rate);
        self.command(blink_command(rate)).await
    }

    /// Sets the blinkrate from its raw value. Anything above 3 turns blinking off.
    pub async fn set_blink_rate_raw(&mut self, rate: u8) -> Result<(), Error<T::Error>> {
        self.set_blink_rate(BlinkRate::from_raw(rate)).await
    }

    /// Sends the buffer to the display
    pub async fn write_display(&mut self) -> Result<(), Error<T::Error>> {
        log::trace!("push {:?}", self.buffer.digits());
        self.tx
            .write(self.address, &self.buffer.frame())
            .await
            .map_err(Error::Bus)
    }

    pub async fn clear(&mut self) -> Result<(), Error<T::Error>> {
        self.buffer.clear();
        self.write_display().await
    }

    /// Stores a raw segment mask at `position` without pushing it
    pub fn write_digit_raw(&mut self, position: usize, mask: u8) {
        self.buffer.write_digit_raw(position, mask);
    }

    pub async fn write_digit_num(
        &mut self,
        position: usize,
        digit: u8,
        dot: bool,
    ) -> Result<(), Error<T::Error>> {
        if position > COLON_POSITION {
            return Ok(());
        }
        let mask = glyph::glyph_for(digit)?;
        self.buffer.write_digit(position, mask, dot);
        self.write_display().await
    }

    pub async fn show_digit_at(
        &mut self,
        position: usize,
        digit: u8,
    ) -> Result<(), Error<T::Error>> {
        self.write_digit_num(position, digit, false).await
    }

    pub async fn draw_colon(&mut self, on: bool) -> Result<(), Error<T::Error>> {
        self.buffer.write_colon(on);
        self.write_display().await
    }

    pub async fn show_dot(&mut self, position: usize, on: bool) -> Result<(), Error<T::Error>> {
        if position > COLON_POSITION {
            return Ok(());
        }
        self.buffer.set_dot(position, on);
        self.write_display().await
    }

    pub async fn render(
        &mut self,
        input: RenderInput<'_>,
        radix: Radix,
    ) -> Result<RenderOutcome, Error<T::Error>> {
        let outcome = render::render(&mut self.buffer, input, radix, self.strategy);
        self.write_display().await?;
        Ok(outcome)
    }

    pub async fn print_number(
        &mut self,
        number: i64,
        radix: Radix,
    ) -> Result<RenderOutcome, Error<T::Error>> {
        self.render(RenderInput::Integer(number), radix).await
    }

    pub async fn print_float(
        &mut self,
        value: f64,
        fractional_digits: u8,
        radix: Radix,
    ) -> Result<RenderOutcome, Error<T::Error>> {
        self.render(
            RenderInput::Fraction {
                value,
                fractional_digits,
            },
            radix,
        )
        .await
    }

    pub async fn print_in_base(
        &mut self,
        value: f64,
        fractional_digits: u8,
        base: u8,
    ) -> Result<RenderOutcome, Error<T::Error>> {
        let radix = Radix::try_from(base)?;
        self.print_float(value, fractional_digits, radix).await
    }

    pub async fn print_text(&mut self, text: &str) -> Result<RenderOutcome, Error<T::Error>> {
        self.render(RenderInput::Text(text), Radix::Decimal).await
    }

    pub async fn show_hex_number(
        &mut self,
        number: i64,
    ) -> Result<RenderOutcome, Error<T::Error>> {
        self.print_number(number, Radix::Hexadecimal).await
    }

    pub async fn write_char(&mut self, c: char) -> Result<usize, Error<T::Error>> {
        match cursor_action(c) {
            CursorAction::Reset => {
                self.cursor = 0;
                Ok(0)
            }
            CursorAction::Digit(digit) => {
                self.write_digit_num(self.cursor, digit, false).await?;
                self.cursor = next_cursor(self.cursor);
                Ok(1)
            }
            CursorAction::Ignore => Ok(0),
        }
    }

    pub async fn write_str(&mut self, text: &str) -> Result<usize, Error<T::Error>> {
        let mut written = 0;
        for c in text.chars() {
            written += self.write_char(c).await?;
        }
        Ok(written)
    }
}
