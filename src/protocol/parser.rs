// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Decoding of inbound floor-request frames.
//!
//! Only data byte 0 carries meaning; every other byte is ignored. Remote frames and empty data
//! frames never carry a request. Whether a code names a served floor is decided by
//! [`crate::control::FloorState::on_floor_request`].

use core::fmt;

use bxcan::{Frame, Id};

/// Floor-request code (data byte 0) of a received frame.
pub fn request_code(frame: &Frame) -> Option<u8> {
    if frame.is_remote_frame() {
        return None;
    }

    frame.data()?.first().copied()
}

/// `Display` adapter printing a frame the way the serial log shows it.
///
/// ```text
/// [CAN] RX: Standard ID: 0x100 DLC: 1 Data: 0x02
/// [CAN] RX: Extended ID: 0x12345678 DLC: 0 Data: REMOTE REQUEST FRAME
/// ```
pub struct FrameLog<'a>(pub &'a Frame);

impl fmt::Display for FrameLog<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frame = self.0;

        match frame.id() {
            Id::Standard(id) => write!(f, "Standard ID: 0x{:03X}", id.as_raw())?,
            Id::Extended(id) => write!(f, "Extended ID: 0x{:08X}", id.as_raw())?,
        }
        write!(f, " DLC: {} Data:", frame.dlc())?;

        if frame.is_remote_frame() {
            return f.write_str(" REMOTE REQUEST FRAME");
        }

        if let Some(data) = frame.data() {
            for b in data.iter() {
                write!(f, " 0x{:02X}", b)?;
            }
        }
        Ok(())
    }
}
