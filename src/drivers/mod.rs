// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Device-Specific Drivers
//!
//! This module contains device-specific drivers that sit above the raw `hw/` layer and below the
//! controller. They are written against `embedded-hal` traits and closures so that they build and
//! test on the host.
//!
//! ## Existing drivers
//!
//! - [`maxsonar`] – MaxBotix HRLV-MaxSonar rangefinder with analog output and ranging enable
//! - [`dac_drive`] – Hoist motor controller with analog speed reference and direction input
//! - [`lcd1602`] – HD44780 16x2 LCD on a PCF8574 I2C backpack

pub mod dac_drive;
pub mod lcd1602;
pub mod maxsonar;

pub use dac_drive::DacDrive;
pub use lcd1602::Lcd1602;
pub use maxsonar::MaxSonar;
