// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Floor codes carried in byte 0 of elevator CAN frames.

use bxcan::{Data, Frame, StandardId};

// Floor codes
pub const FLOOR_UNKNOWN: u8 = 0x00;
pub const FLOOR_1: u8 = 0x01;
pub const FLOOR_2: u8 = 0x02;
pub const FLOOR_3: u8 = 0x03;

/// Physical floor as seen on the bus.
///
/// `Unknown` is only ever reported before the car has been classified at a floor for the first
/// time; it is never a valid request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum FloorId {
    Unknown = FLOOR_UNKNOWN,
    Floor1 = FLOOR_1,
    Floor2 = FLOOR_2,
    Floor3 = FLOOR_3,
}

impl FloorId {
    /// Served floors in classification priority order.
    pub const SERVED: [FloorId; 3] = [FloorId::Floor1, FloorId::Floor2, FloorId::Floor3];

    /// Wire code of this floor.
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decode a floor-request code. Returns `None` for anything that is not a served floor.
    pub fn from_request_code(code: u8) -> Option<Self> {
        match code {
            FLOOR_1 => Some(FloorId::Floor1),
            FLOOR_2 => Some(FloorId::Floor2),
            FLOOR_3 => Some(FloorId::Floor3),
            _ => None,
        }
    }

    /// Position in the setpoint table, `None` for `Unknown`.
    #[inline]
    pub const fn index(self) -> Option<usize> {
        match self {
            FloorId::Unknown => None,
            FloorId::Floor1 => Some(0),
            FloorId::Floor2 => Some(1),
            FloorId::Floor3 => Some(2),
        }
    }

    /// Text shown on the LCD.
    pub const fn label(self) -> &'static str {
        match self {
            FloorId::Unknown => "Floor ?",
            FloorId::Floor1 => "Floor 1",
            FloorId::Floor2 => "Floor 2",
            FloorId::Floor3 => "Floor 3",
        }
    }
}

/// Build an 11-bit ID from a raw value, dropping anything above bit 10.
#[inline]
pub fn standard_id(raw: u16) -> StandardId {
    StandardId::new(raw & 0x7FF).unwrap_or(StandardId::ZERO)
}

/// Build the periodic floor-status frame.
///
/// Byte 0 carries the floor code, the remaining `dlc - 1` bytes are zero. `dlc` is limited to
/// 1..=8.
pub fn status_frame(id: StandardId, dlc: u8, floor: FloorId) -> Frame {
    let len = dlc.clamp(1, 8) as usize;
    let mut buf = [0u8; 8];
    buf[0] = floor.code();

    let data = Data::new(&buf[..len]).unwrap_or_else(Data::empty);
    Frame::new_data(id, data)
}
