// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Elevator Controller Firmware
//!
//! This crate contains the firmware for a single-car, three-floor elevator model, written in Rust,
//! targeting an STM32F777 MCU. The car height is read from an analog ultrasonic rangefinder, the
//! hoist motor is driven through a DAC, floor requests and floor status travel over CAN, and a
//! 16x2 character LCD shows the destination and the measured height.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`config`] | Floor setpoints, control calibration, bus and timing settings |
//! | [`control`] | Approach profile, floor state machine and the controller loop |
//! | [`protocol`] | Floor codes and CAN frame encoding/decoding |
//! | [`signals`] | Interrupt-to-loop flags and single-slot mailboxes |
//! | [`interfaces`] | Traits the controller uses to reach sensor, motor, bus and display |
//! | [`drivers`] | Device-level drivers (rangefinder, DAC motor drive, I2C LCD) |
//! | `hw` | MCU-level wrappers around CAN, USART, ADC, DAC and timers (target only) |
//!
//! ## Getting Started
//!
//! Run the host-side unit tests:
//!
//! ```bash
//! cargo test
//! ```
//!
//! Flash the board:
//!
//! ```bash
//! cargo run --release --target thumbv7em-none-eabihf
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod control;
pub mod drivers;
pub mod interfaces;
pub mod protocol;
pub mod signals;

#[cfg(target_os = "none")]
pub mod hw;
