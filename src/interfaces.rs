// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Traits the controller loop uses to reach the outside world.
//!
//! The board implementations live in [`crate::drivers`] and `hw`; unit tests substitute recording
//! fakes.

use core::fmt::Debug;

use bxcan::Frame;

/// Distance sensor pointed at the car.
///
/// A reading is taken as `start_measurement`, settle delay, `read_distance_mm`, `stop_measurement`.
pub trait DistanceSensor {
    type Error: Debug;

    fn start_measurement(&mut self) -> Result<(), Self::Error>;

    /// Latest distance in millimeters.
    fn read_distance_mm(&mut self) -> Result<u16, Self::Error>;

    fn stop_measurement(&mut self) -> Result<(), Self::Error>;
}

/// Hoist motor input.
pub trait DriveOutput {
    /// Apply a signed drive command in `[-1023, 1023]`. Positive lowers the car.
    fn set_drive(&mut self, command: i16);
}

/// Outbound side of the CAN bus.
pub trait StatusBus {
    type Error: Debug;

    /// Queue a frame for transmission without waiting.
    fn try_send(&mut self, frame: &Frame) -> Result<(), Self::Error>;
}

/// Operator display. Fire-and-forget.
pub trait StatusDisplay {
    fn show_floor_label(&mut self, label: &str);

    fn show_distance(&mut self, mm: u16);
}
