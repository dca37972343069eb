// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Floor bookkeeping: which floor the car is heading to and which floor it was last seen at.
//!
//! Classification uses a band `[sp - (tol + margin), sp + (tol + margin)]` around each setpoint,
//! wider than the motion dead-band so sensor noise at a floor does not make the reported floor
//! flicker. Floors are tested in the order Floor 1, Floor 2, Floor 3; if calibration ever makes
//! two bands overlap, the lower floor takes precedence. Outside every band the car is between
//! floors and the last classified floor is kept.

use crate::config::FloorConfig;
use crate::protocol::FloorId;

/// Fixed floor geometry.
#[derive(Copy, Clone, Debug)]
pub struct FloorMap {
    setpoints_mm: [u16; 3],
    band_mm: u16,
}

impl FloorMap {
    pub fn new(cfg: &FloorConfig) -> Self {
        Self {
            setpoints_mm: cfg.setpoints_mm,
            band_mm: cfg
                .setpoint_tolerance_mm
                .saturating_add(cfg.classification_margin_mm),
        }
    }

    /// Setpoint of a served floor, `None` for `Unknown`.
    #[inline]
    pub fn setpoint_mm(&self, floor: FloorId) -> Option<u16> {
        floor.index().map(|i| self.setpoints_mm[i])
    }

    /// Floor whose classification band contains `distance_mm`, if any.
    pub fn classify(&self, distance_mm: u16) -> Option<FloorId> {
        FloorId::SERVED.into_iter().find(|&floor| {
            self.setpoint_mm(floor)
                .is_some_and(|sp| distance_mm.abs_diff(sp) <= self.band_mm)
        })
    }
}

/// Live floor state of the controller.
#[derive(Copy, Clone, Debug)]
pub struct FloorState {
    map: FloorMap,

    /// Floor the car is commanded to.
    target: FloorId,

    /// Last floor the car was classified at.
    current: FloorId,
}

impl FloorState {
    /// Start-up state: heading to Floor 1, position not yet known.
    pub fn new(map: FloorMap) -> Self {
        Self {
            map,
            target: FloorId::Floor1,
            current: FloorId::Unknown,
        }
    }

    #[inline]
    pub fn target(&self) -> FloorId {
        self.target
    }

    #[inline]
    pub fn current(&self) -> FloorId {
        self.current
    }

    /// Active setpoint (mm).
    #[inline]
    pub fn setpoint_mm(&self) -> u16 {
        // `target` is always a served floor
        self.map.setpoint_mm(self.target).unwrap_or(self.map.setpoints_mm[0])
    }

    /// Handle a floor-request code.
    ///
    /// Returns the newly selected floor, or `None` (and changes nothing) for an unrecognized code.
    pub fn on_floor_request(&mut self, code: u8) -> Option<FloorId> {
        let floor = FloorId::from_request_code(code)?;
        self.target = floor;
        Some(floor)
    }

    /// Re-classify the car from a fresh reading. Returns the (possibly unchanged) current floor.
    pub fn refresh(&mut self, distance_mm: u16) -> FloorId {
        if let Some(floor) = self.map.classify(distance_mm) {
            self.current = floor;
        }
        self.current
    }
}
