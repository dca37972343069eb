// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! CAN message protocol between the elevator controller and the floor call stations.
//!
//! - Inbound (`request_id`): byte 0 is the requested floor code.
//! - Outbound (`status_id`, every status period): byte 0 is the floor the car was last seen at.

pub mod messages;
pub mod parser;

pub use messages::{standard_id, status_frame, FloorId};
pub use parser::{request_code, FrameLog};
