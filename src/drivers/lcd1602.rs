// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! HD44780 16x2 character LCD behind a PCF8574 I2C backpack.
//!
//! The backpack maps the expander pins onto the LCD in 4-bit mode:
//!
//! | PCF8574 | P7 | P6 | P5 | P4 | P3 | P2 | P1 | P0 |
//! | ------- | -- | -- | -- | -- | -- | -- | -- | -- |
//! | LCD     | D7 | D6 | D5 | D4 | BL | E  | RW | RS |
//!
//! Each nibble is latched by sending it twice, once with E high and once with E low. At 100 kHz the
//! I2C transfer of a byte already exceeds the 37 us command execution time, so only clear/home and
//! the power-on sequence need explicit delays.
//!
//! Layout used by the elevator:
//! - row 0: destination floor label
//! - row 1: measured height, e.g. `1234 mm`

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::i2c::Write;

use crate::interfaces::StatusDisplay;

/// Default 7-bit address of a PCF8574 backpack with A0..A2 pulled high.
pub const DEFAULT_ADDRESS: u8 = 0x27;

/// Characters per row.
pub const COLUMNS: usize = 16;

// Expander bits
const RS: u8 = 1 << 0;
const EN: u8 = 1 << 2;
const BACKLIGHT: u8 = 1 << 3;

// Instructions
pub mod cmd {
    pub const CLEAR: u8 = 0x01;
    pub const ENTRY_MODE_INCREMENT: u8 = 0x06;
    pub const DISPLAY_ON: u8 = 0x0C;
    pub const FUNCTION_4BIT_2LINE: u8 = 0x28;
    pub const SET_DDRAM: u8 = 0x80;
}

/// DDRAM address of the first column of each row.
const ROW_OFFSETS: [u8; 2] = [0x00, 0x40];

/// Error type for `Lcd1602` operations.
#[derive(Debug, PartialEq)]
pub enum Error<E> {
    /// I2C transfer to the backpack failed (usually a NACK: wrong address or no display).
    I2c(E),
    /// Row outside 0..=1.
    InvalidRow(u8),
}

/// Character LCD driver.
pub struct Lcd1602<I2C> {
    i2c: I2C,
    address: u8,
    backlight: bool,
    shown_distance: Option<u16>,
}

impl<I2C, E> Lcd1602<I2C>
where
    I2C: Write<Error = E>,
{
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            backlight: true,
            shown_distance: None,
        }
    }

    /// Power-on initialization into 4-bit, 2-line mode, display on, cursor off, cleared.
    pub fn init<D: DelayMs<u32>>(&mut self, delay: &mut D) -> Result<(), Error<E>> {
        // Wait for Vcc to settle
        delay.delay_ms(50);

        // Force 8-bit mode three times, then switch to 4-bit
        self.write_nibble(0x30, 0)?;
        delay.delay_ms(5);
        self.write_nibble(0x30, 0)?;
        delay.delay_ms(1);
        self.write_nibble(0x30, 0)?;
        delay.delay_ms(1);
        self.write_nibble(0x20, 0)?;

        self.command(cmd::FUNCTION_4BIT_2LINE)?;
        self.command(cmd::DISPLAY_ON)?;
        self.command(cmd::ENTRY_MODE_INCREMENT)?;
        self.clear(delay)
    }

    /// Clear the display and return the cursor home.
    pub fn clear<D: DelayMs<u32>>(&mut self, delay: &mut D) -> Result<(), Error<E>> {
        self.command(cmd::CLEAR)?;
        delay.delay_ms(2);
        self.shown_distance = None;
        Ok(())
    }

    /// Move the cursor to `col`, `row`.
    pub fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), Error<E>> {
        let offset = *ROW_OFFSETS
            .get(row as usize)
            .ok_or(Error::InvalidRow(row))?;
        self.command(cmd::SET_DDRAM | (offset + col.min(COLUMNS as u8 - 1)))
    }

    /// Write ASCII text at the cursor. Non-ASCII bytes are shown as `?`.
    pub fn write_str(&mut self, s: &str) -> Result<(), Error<E>> {
        for &b in s.as_bytes() {
            self.data(if b.is_ascii() { b } else { b'?' })?;
        }
        Ok(())
    }

    /// Replace a whole row with `text`, truncated or padded with spaces to 16 columns.
    pub fn write_line(&mut self, row: u8, text: &str) -> Result<(), Error<E>> {
        self.set_cursor(0, row)?;

        let text = text.get(..COLUMNS).unwrap_or(text);
        self.write_str(text)?;
        for _ in text.len()..COLUMNS {
            self.data(b' ')?;
        }
        Ok(())
    }

    /// Show a height reading on row 1.
    pub fn write_distance(&mut self, mm: u16) -> Result<(), Error<E>> {
        if self.shown_distance == Some(mm) {
            return Ok(());
        }

        let mut buf = itoa::Buffer::new();
        let digits = buf.format(mm);

        let mut line = [b' '; COLUMNS];
        line[..digits.len()].copy_from_slice(digits.as_bytes());
        line[digits.len()..digits.len() + 3].copy_from_slice(b" mm");

        self.set_cursor(0, 1)?;
        for b in line {
            self.data(b)?;
        }
        self.shown_distance = Some(mm);
        Ok(())
    }

    /// Switch the backlight. Takes effect with the next transfer.
    pub fn set_backlight(&mut self, on: bool) -> Result<(), Error<E>> {
        self.backlight = on;
        let bl = self.backlight_bit();
        self.i2c.write(self.address, &[bl]).map_err(Error::I2c)
    }

    pub fn free(self) -> I2C {
        self.i2c
    }

    #[inline]
    fn backlight_bit(&self) -> u8 {
        if self.backlight {
            BACKLIGHT
        } else {
            0
        }
    }

    #[inline]
    fn command(&mut self, byte: u8) -> Result<(), Error<E>> {
        self.write_byte(byte, 0)
    }

    #[inline]
    fn data(&mut self, byte: u8) -> Result<(), Error<E>> {
        self.write_byte(byte, RS)
    }

    /// Send a full byte as two nibbles in one I2C transaction.
    fn write_byte(&mut self, byte: u8, mode: u8) -> Result<(), Error<E>> {
        let bl = self.backlight_bit();
        let hi = (byte & 0xF0) | mode | bl;
        let lo = ((byte << 4) & 0xF0) | mode | bl;
        self.i2c
            .write(self.address, &[hi | EN, hi, lo | EN, lo])
            .map_err(Error::I2c)
    }

    /// Send only the upper nibble of `bits` (used during the power-on sequence).
    fn write_nibble(&mut self, bits: u8, mode: u8) -> Result<(), Error<E>> {
        let v = (bits & 0xF0) | mode | self.backlight_bit();
        self.i2c
            .write(self.address, &[v | EN, v])
            .map_err(Error::I2c)
    }
}

impl<I2C, E> StatusDisplay for Lcd1602<I2C>
where
    I2C: Write<Error = E>,
{
    fn show_floor_label(&mut self, label: &str) {
        let _ = self.write_line(0, label);
    }

    fn show_distance(&mut self, mm: u16) {
        let _ = self.write_distance(mm);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeI2c {
        writes: Vec<(u8, Vec<u8>)>,
        nack: bool,
    }

    #[derive(Debug, PartialEq)]
    struct Nack;

    impl Write for FakeI2c {
        type Error = Nack;

        fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
            if self.nack {
                return Err(Nack);
            }
            self.writes.push((address, bytes.to_vec()));
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeDelay {
        total_ms: u32,
    }

    impl DelayMs<u32> for FakeDelay {
        fn delay_ms(&mut self, ms: u32) {
            self.total_ms += ms;
        }
    }

    /// Reassemble the bytes written to the LCD from the expander traffic, tagged with RS.
    fn decode(writes: &[(u8, Vec<u8>)]) -> Vec<(bool, u8)> {
        writes
            .iter()
            .filter(|(_, b)| b.len() == 4)
            .map(|(_, b)| ((b[1] & RS) != 0, (b[1] & 0xF0) | (b[3] >> 4)))
            .collect()
    }

    fn text(writes: &[(u8, Vec<u8>)]) -> String {
        decode(writes)
            .into_iter()
            .filter(|&(rs, _)| rs)
            .map(|(_, b)| b as char)
            .collect()
    }

    #[test]
    fn init_ends_in_four_bit_two_line_mode() {
        let mut lcd = Lcd1602::new(FakeI2c::default(), DEFAULT_ADDRESS);
        let mut delay = FakeDelay::default();
        lcd.init(&mut delay).unwrap();

        let i2c = lcd.free();
        assert!(i2c.writes.iter().all(|(a, _)| *a == DEFAULT_ADDRESS));
        assert_eq!(
            decode(&i2c.writes),
            [
                (false, cmd::FUNCTION_4BIT_2LINE),
                (false, cmd::DISPLAY_ON),
                (false, cmd::ENTRY_MODE_INCREMENT),
                (false, cmd::CLEAR),
            ]
        );
        assert!(delay.total_ms >= 50);
    }

    #[test]
    fn enable_is_pulsed_for_every_nibble() {
        let mut lcd = Lcd1602::new(FakeI2c::default(), DEFAULT_ADDRESS);
        lcd.write_str("A").unwrap();

        let i2c = lcd.free();
        let bytes = &i2c.writes[0].1;
        assert_eq!(bytes[0] & EN, EN);
        assert_eq!(bytes[1] & EN, 0);
        assert_eq!(bytes[2] & EN, EN);
        assert_eq!(bytes[3] & EN, 0);
        assert!(bytes.iter().all(|b| b & BACKLIGHT != 0));
    }

    #[test]
    fn backlight_off_clears_bit_on_later_transfers() {
        let mut lcd = Lcd1602::new(FakeI2c::default(), DEFAULT_ADDRESS);
        lcd.set_backlight(false).unwrap();
        lcd.write_str("B").unwrap();

        let i2c = lcd.free();
        assert_eq!(i2c.writes[0].1, [0]);
        assert!(i2c.writes[1].1.iter().all(|b| b & BACKLIGHT == 0));
        assert_eq!(text(&i2c.writes), "B");
    }

    #[test]
    fn floor_label_fills_top_row() {
        let mut lcd = Lcd1602::new(FakeI2c::default(), DEFAULT_ADDRESS);
        lcd.show_floor_label("Floor 2");

        let i2c = lcd.free();
        assert_eq!(decode(&i2c.writes)[0], (false, cmd::SET_DDRAM));
        assert_eq!(text(&i2c.writes), "Floor 2         ");
    }

    #[test]
    fn distance_goes_to_second_row() {
        let mut lcd = Lcd1602::new(FakeI2c::default(), DEFAULT_ADDRESS);
        lcd.show_distance(1234);

        let i2c = lcd.free();
        assert_eq!(decode(&i2c.writes)[0], (false, cmd::SET_DDRAM | 0x40));
        assert_eq!(text(&i2c.writes), "1234 mm         ");
    }

    #[test]
    fn unchanged_distance_is_not_rewritten() {
        let mut lcd = Lcd1602::new(FakeI2c::default(), DEFAULT_ADDRESS);
        lcd.show_distance(500);
        lcd.show_distance(500);
        lcd.show_distance(501);

        let i2c = lcd.free();
        assert_eq!(text(&i2c.writes), "500 mm          501 mm          ");
    }

    #[test]
    fn long_text_is_truncated() {
        let mut lcd = Lcd1602::new(FakeI2c::default(), DEFAULT_ADDRESS);
        lcd.write_line(0, "Floor 1 - doors opening").unwrap();
        assert_eq!(text(&lcd.free().writes), "Floor 1 - doors ");
    }

    #[test]
    fn invalid_row_is_rejected() {
        let mut lcd = Lcd1602::new(FakeI2c::default(), DEFAULT_ADDRESS);
        assert_eq!(lcd.set_cursor(0, 2), Err(Error::InvalidRow(2)));
    }

    #[test]
    fn missing_display_is_reported_but_not_fatal() {
        let i2c = FakeI2c {
            nack: true,
            ..Default::default()
        };
        let mut lcd = Lcd1602::new(i2c, DEFAULT_ADDRESS);
        let mut delay = FakeDelay::default();

        assert_eq!(lcd.init(&mut delay), Err(Error::I2c(Nack)));
        lcd.show_floor_label("Floor 1");
        lcd.show_distance(500);
    }
}
