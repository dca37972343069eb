// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Calibration and wiring constants for the elevator.
//!
//! All distances are in millimeters as reported by the rangefinder, measured from the sensor at the
//! bottom of the shaft up to the car.

/// Setpoints and bands for the three floors.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FloorConfig {
    /// Target height of Floor 1, Floor 2 and Floor 3 (mm).
    pub setpoints_mm: [u16; 3],

    /// Dead-band around the active setpoint in which the motor is stopped (mm).
    pub setpoint_tolerance_mm: u16,

    /// Extra width added to the dead-band when deciding which floor the car is at (mm).
    pub classification_margin_mm: u16,
}

/// Parameters of the damped exponential approach profile.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ProfileConfig {
    /// Lowest plausible sensor reading (mm). Anything below stops the car.
    pub min_height_mm: u16,

    /// Highest plausible sensor reading (mm). Anything above stops the car.
    pub max_height_mm: u16,

    /// Proportional gain `A` applied to the height error.
    pub gain: f32,

    /// Dampener numerator of the decay constant `DAMPENER / diff_max`.
    pub dampener: f32,

    /// Error span (mm) the dampener is normalized against.
    pub diff_max_mm: f32,

    /// Largest drive command the actuator accepts.
    pub max_drive: i16,
}

/// CAN bus settings.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BusConfig {
    /// Standard ID of inbound floor-request frames.
    pub request_id: u16,

    /// Standard ID of outbound floor-status frames.
    pub status_id: u16,

    /// Data length of outbound status frames.
    pub status_dlc: u8,

    /// Value for the CAN_BTR register.
    ///
    /// 125 kbit/s with a 16 MHz APB1 clock: BRP = 8, BS1 = 13 tq, BS2 = 2 tq, SJW = 1 tq.
    pub bit_timing: u32,
}

/// Complete controller configuration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ElevatorConfig {
    pub floors: FloorConfig,
    pub profile: ProfileConfig,
    pub bus: BusConfig,

    /// Interval between floor-status broadcasts (ms).
    pub status_period_ms: u32,

    /// Time the rangefinder is given to settle after ranging starts (ms).
    pub sensor_settle_ms: u32,
}

impl ElevatorConfig {
    /// Calibration of the three-floor demonstration shaft.
    pub const DEFAULT: Self = Self {
        floors: FloorConfig {
            setpoints_mm: [500, 900, 1300],
            setpoint_tolerance_mm: 5,
            classification_margin_mm: 10,
        },
        profile: ProfileConfig {
            min_height_mm: 50,
            max_height_mm: 1600,
            gain: 5.0,
            dampener: 3.0,
            diff_max_mm: 1000.0,
            max_drive: 1023,
        },
        bus: BusConfig {
            request_id: 0x100,
            status_id: 0x101,
            status_dlc: 1,
            bit_timing: 0x001C_0007,
        },
        status_period_ms: 2000,
        sensor_settle_ms: 100,
    };
}

impl Default for ElevatorConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
