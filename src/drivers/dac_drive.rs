// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Analog speed input of the hoist motor controller.
//!
//! The motor controller takes a 0..3.3V speed reference and a direction input. The speed reference
//! comes from a DAC channel, the direction from a GPIO.
//!
//! Wiring:
//! - SPEED: DAC output (0V = stopped, 3.3V = full speed)
//! - DIR:   GPIO output (high = down, low = up)

use embedded_hal::digital::v2::OutputPin;

use crate::interfaces::DriveOutput;

/// Largest accepted command magnitude.
pub const MAX_COMMAND: u16 = 1023;

/// Logical hoist direction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Stop,
}

impl Direction {
    /// Direction of a signed drive command. Positive commands lower the car.
    pub fn of(command: i16) -> Self {
        match command {
            c if c > 0 => Direction::Down,
            c if c < 0 => Direction::Up,
            _ => Direction::Stop,
        }
    }
}

/// DAC-driven hoist motor.
///
/// `WriteDac` is a closure that writes a right-aligned 12-bit value (0..4095) to the DAC.
pub struct DacDrive<DIR, WriteDac> {
    dir: DIR,
    write_dac: WriteDac,
    direction: Direction,
    magnitude: u16,
}

impl<DIR, WriteDac> DacDrive<DIR, WriteDac>
where
    DIR: OutputPin,
    WriteDac: FnMut(u16),
{
    /// Construct a stopped drive.
    pub fn new(dir: DIR, write_dac: WriteDac) -> Self {
        let mut drive = Self {
            dir,
            write_dac,
            direction: Direction::Stop,
            magnitude: 0,
        };
        drive.stop();
        drive
    }

    /// Scale a 10-bit command magnitude to the 12-bit DAC range.
    #[inline]
    pub fn dac_counts(magnitude: u16) -> u16 {
        magnitude.min(MAX_COMMAND) << 2
    }

    /// Set speed and direction from a signed command in `[-1023, 1023]`.
    ///
    /// If the direction pin cannot be driven the speed reference is left at zero and the drive
    /// reports `Stop`, so the motor never runs in a stale direction.
    pub fn set_command(&mut self, command: i16) -> Result<(), DIR::Error> {
        let direction = Direction::of(command);
        let magnitude = command.unsigned_abs().min(MAX_COMMAND);

        // Zero the speed before flipping direction
        if direction != self.direction && self.magnitude != 0 {
            (self.write_dac)(0);
        }

        let pin = match direction {
            Direction::Down => self.dir.set_high(),
            Direction::Up => self.dir.set_low(),
            Direction::Stop => Ok(()),
        };
        if let Err(e) = pin {
            (self.write_dac)(0);
            self.direction = Direction::Stop;
            self.magnitude = 0;
            return Err(e);
        }

        (self.write_dac)(Self::dac_counts(magnitude));
        self.direction = direction;
        self.magnitude = magnitude;
        Ok(())
    }

    /// Stop the motor (zero speed reference).
    #[inline]
    pub fn stop(&mut self) {
        // A stop never touches the direction pin
        let _ = self.set_command(0);
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[inline]
    pub fn magnitude(&self) -> u16 {
        self.magnitude
    }
}

impl<DIR, WriteDac> DriveOutput for DacDrive<DIR, WriteDac>
where
    DIR: OutputPin,
    WriteDac: FnMut(u16),
{
    fn set_drive(&mut self, command: i16) {
        // On a pin failure the drive has already fallen back to a stop
        let _ = self.set_command(command);
    }
}
