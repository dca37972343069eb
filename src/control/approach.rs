// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Damped exponential approach profile for the hoist motor.
//!
//! The drive command is a pure function of the instantaneous height error `e`:
//!
//! ```text
//! u = A * e * exp(-(DAMPENER / diff_max) * |e|)
//! ```
//!
//! which is large while the car is far from its target and decays smoothly as it closes in. There
//! is no integral or derivative term and no state between calls.
//!
//! Works in `no_std` and does not allocate memory.

use micromath::F32Ext;

use crate::config::ProfileConfig;

/// Approach profile with a dead-band and a plausibility window on the sensor reading.
#[derive(Copy, Clone, Debug)]
pub struct ApproachProfile {
    /// Proportional gain
    gain: f32,
    /// `DAMPENER / diff_max`, per mm
    decay: f32,

    /// Dead-band half-width (mm)
    tolerance_mm: u16,

    /// Plausible sensor window (mm), inclusive
    min_height_mm: u16,
    max_height_mm: u16,

    /// Output clamp
    max_drive: i16,
}

impl ApproachProfile {
    /// Create a profile from calibration constants.
    ///
    /// `tolerance_mm` is the dead-band around the setpoint inside which the motor is stopped.
    pub fn new(cfg: &ProfileConfig, tolerance_mm: u16) -> Self {
        Self {
            gain: cfg.gain,
            decay: cfg.dampener / cfg.diff_max_mm,
            tolerance_mm,
            min_height_mm: cfg.min_height_mm,
            max_height_mm: cfg.max_height_mm,
            max_drive: cfg.max_drive,
        }
    }

    /// Whether a reading is physically plausible.
    ///
    /// Both endpoints count as plausible: a car parked exactly at `min_height_mm` or
    /// `max_height_mm` is still driven, not stopped.
    #[inline]
    pub fn in_range(&self, distance_mm: u16) -> bool {
        (self.min_height_mm..=self.max_height_mm).contains(&distance_mm)
    }

    /// Whether `distance_mm` is inside the dead-band of `setpoint_mm`.
    #[inline]
    pub fn on_target(&self, distance_mm: u16, setpoint_mm: u16) -> bool {
        distance_mm.abs_diff(setpoint_mm) <= self.tolerance_mm
    }

    /// Compute the drive command for one control step.
    ///
    /// `distance_mm` – latest sensor reading
    /// `setpoint_mm` – active floor setpoint
    ///
    /// Positive output means the car is above its target and must go down. The result is zero for
    /// implausible readings and inside the dead-band, and is always within `±max_drive`.
    pub fn compute_drive(&self, distance_mm: u16, setpoint_mm: u16) -> i16 {
        // Fail-safe stop
        if !self.in_range(distance_mm) {
            return 0;
        }

        // Dead-band
        if self.on_target(distance_mm, setpoint_mm) {
            return 0;
        }

        let error = (i32::from(distance_mm) - i32::from(setpoint_mm)) as f32;
        let shaped = error * self.gain * (-self.decay * error.abs()).exp();

        let limit = f32::from(self.max_drive);
        shaped.clamp(-limit, limit) as i16
    }
}
