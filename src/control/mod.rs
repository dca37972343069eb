// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Control Algorithms
//!
//! This module provides the closed-loop position control of the elevator car.
//!
//! ## Modules
//!
//! - [`approach`] - Damped exponential approach profile (distance error to drive command).
//! - [`floor`] - Floor request handling and floor classification.
//! - [`elevator_controller`] - The per-tick controller loop tying sensor, motor, bus and display.

pub mod approach;
pub mod elevator_controller;
pub mod floor;

pub use approach::ApproachProfile;
pub use elevator_controller::ElevatorController;
pub use floor::{FloorMap, FloorState};
