// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Main control loop of the elevator.
//!
//! This controller owns the sensor, motor, bus and display collaborators and provides a `tick()`
//! function that is called as fast as the main loop spins. Each tick runs to completion:
//!
//! 1. take at most one pending floor request from the bus mailbox and retarget the car,
//! 2. if the status timer fired, broadcast the last classified floor,
//! 3. take a fresh distance reading (blocks for the sensor settle delay),
//! 4. drive the motor along the approach profile toward the active setpoint,
//! 5. re-classify the car's floor from the same reading.
//!
//! Typical usage pattern:
//!
//! ```ignore
//! controller.start();
//!
//! loop {
//!     controller.tick();
//! }
//! ```

use core::fmt::Write;

use bxcan::{Frame, StandardId};
use embedded_hal::blocking::delay::DelayMs;

use crate::config::ElevatorConfig;
use crate::control::{ApproachProfile, FloorMap, FloorState};
use crate::interfaces::{DistanceSensor, DriveOutput, StatusBus, StatusDisplay};
use crate::protocol::{self, FloorId, FrameLog};
use crate::signals::Signals;

/// Elevator controller state and collaborators.
pub struct ElevatorController<'a, S, A, B, D, DL, W> {
    signals: &'a Signals,

    sensor: S,
    actuator: A,
    bus: B,
    display: D,
    delay: DL,
    log: W,

    profile: ApproachProfile,
    floors: FloorState,

    status_id: StandardId,
    status_dlc: u8,
    settle_ms: u32,

    /// Most recent sensor reading (mm), 0 until the first reading.
    last_distance_mm: u16,

    /// Drive command applied on the most recent tick.
    last_drive: i16,
}

impl<'a, S, A, B, D, DL, W> ElevatorController<'a, S, A, B, D, DL, W>
where
    S: DistanceSensor,
    A: DriveOutput,
    B: StatusBus,
    D: StatusDisplay,
    DL: DelayMs<u32>,
    W: Write,
{
    /// Create a controller heading for Floor 1 with an unknown current floor.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: &ElevatorConfig,
        signals: &'a Signals,
        sensor: S,
        actuator: A,
        bus: B,
        display: D,
        delay: DL,
        log: W,
    ) -> Self {
        Self {
            signals,
            sensor,
            actuator,
            bus,
            display,
            delay,
            log,
            profile: ApproachProfile::new(&config.profile, config.floors.setpoint_tolerance_mm),
            floors: FloorState::new(FloorMap::new(&config.floors)),
            status_id: protocol::standard_id(config.bus.status_id),
            status_dlc: config.bus.status_dlc,
            settle_ms: config.sensor_settle_ms,
            last_distance_mm: 0,
            last_drive: 0,
        }
    }

    /// Show the start-up destination. Call once before the first `tick()`.
    pub fn start(&mut self) {
        self.display.show_floor_label(self.floors.target().label());
        let _ = writeln!(
            self.log,
            "[EC] Ready, heading to {} ({} mm)\r",
            self.floors.target().label(),
            self.floors.setpoint_mm()
        );
    }

    /// Run one iteration of the control loop.
    pub fn tick(&mut self) {
        if let Some(frame) = self.signals.requests.take() {
            self.handle_request(&frame);
        }

        if self.signals.broadcast.take() {
            self.broadcast_status();
        }

        let distance_mm = self.measure();
        self.drive_toward_setpoint(distance_mm);
        self.floors.refresh(distance_mm);
    }

    /// Log a received frame and retarget the car if it carries a valid floor request.
    fn handle_request(&mut self, frame: &Frame) {
        let _ = writeln!(self.log, "[CAN] RX: {}\r", FrameLog(frame));

        let Some(code) = protocol::request_code(frame) else {
            return;
        };
        if let Some(floor) = self.floors.on_floor_request(code) {
            self.display.show_floor_label(floor.label());
        }
    }

    /// Send the last classified floor. A failed send is logged and dropped.
    fn broadcast_status(&mut self) {
        let floor = self.floors.current();
        let frame = protocol::status_frame(self.status_id, self.status_dlc, floor);

        match self.bus.try_send(&frame) {
            Ok(()) => {
                let _ = writeln!(
                    self.log,
                    "[CAN] TX: ID: 0x{:X} Data: 0x{:X}\r",
                    self.status_id.as_raw(),
                    floor.code()
                );
            }
            Err(e) => {
                let _ = writeln!(self.log, "[CAN] TX: Error Sending Message... ({:?})\r", e);
            }
        }
    }

    /// Take one distance reading. A failed reading is logged and reported as 0 mm, which is
    /// outside the plausible range and stops the car.
    fn measure(&mut self) -> u16 {
        let reading = self.sensor.start_measurement().and_then(|()| {
            self.delay.delay_ms(self.settle_ms);
            self.sensor.read_distance_mm()
        });

        if let Err(e) = self.sensor.stop_measurement() {
            let _ = writeln!(self.log, "[DSM] stop failed: {:?}\r", e);
        }

        let distance_mm = match reading {
            Ok(mm) => mm,
            Err(e) => {
                let _ = writeln!(self.log, "[DSM] read failed: {:?}\r", e);
                0
            }
        };
        self.last_distance_mm = distance_mm;
        distance_mm
    }

    /// Apply the approach profile for `distance_mm` and show the reading if it is plausible.
    fn drive_toward_setpoint(&mut self, distance_mm: u16) {
        if self.profile.in_range(distance_mm) {
            self.display.show_distance(distance_mm);
        }

        let command = self
            .profile
            .compute_drive(distance_mm, self.floors.setpoint_mm());
        self.actuator.set_drive(command);
        self.last_drive = command;
    }

    /// Floor the car is commanded to.
    #[inline]
    pub fn target_floor(&self) -> FloorId {
        self.floors.target()
    }

    /// Active setpoint (mm).
    #[inline]
    pub fn setpoint_mm(&self) -> u16 {
        self.floors.setpoint_mm()
    }

    /// Last floor the car was classified at.
    #[inline]
    pub fn current_floor(&self) -> FloorId {
        self.floors.current()
    }

    #[inline]
    pub fn last_distance_mm(&self) -> u16 {
        self.last_distance_mm
    }

    #[inline]
    pub fn last_drive(&self) -> i16 {
        self.last_drive
    }

    /// Access the display collaborator.
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Access the bus collaborator.
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Access the diagnostic log sink.
    pub fn log(&self) -> &W {
        &self.log
    }

    /// Access the sensor collaborator, e.g. to feed readings in tests.
    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bxcan::Data;
    use std::collections::VecDeque;

    #[derive(Debug, PartialEq)]
    enum FakeSensorError {
        NoEcho,
    }

    #[derive(Default)]
    struct FakeSensor {
        readings: VecDeque<Result<u16, FakeSensorError>>,
        ranging: bool,
        starts: usize,
        stops: usize,
    }

    impl FakeSensor {
        fn push(&mut self, mm: u16) {
            self.readings.push_back(Ok(mm));
        }
    }

    impl DistanceSensor for FakeSensor {
        type Error = FakeSensorError;

        fn start_measurement(&mut self) -> Result<(), Self::Error> {
            self.ranging = true;
            self.starts += 1;
            Ok(())
        }

        fn read_distance_mm(&mut self) -> Result<u16, Self::Error> {
            assert!(self.ranging, "read before start");
            self.readings.pop_front().unwrap_or(Err(FakeSensorError::NoEcho))
        }

        fn stop_measurement(&mut self) -> Result<(), Self::Error> {
            self.ranging = false;
            self.stops += 1;
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeActuator {
        commands: Vec<i16>,
    }

    impl DriveOutput for &mut FakeActuator {
        fn set_drive(&mut self, command: i16) {
            self.commands.push(command);
        }
    }

    #[derive(Debug)]
    struct MailboxFull;

    #[derive(Default)]
    struct FakeBus {
        sent: Vec<Frame>,
        fail: bool,
    }

    impl StatusBus for FakeBus {
        type Error = MailboxFull;

        fn try_send(&mut self, frame: &Frame) -> Result<(), Self::Error> {
            if self.fail {
                return Err(MailboxFull);
            }
            self.sent.push(frame.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeDisplay {
        labels: Vec<String>,
        distances: Vec<u16>,
    }

    impl StatusDisplay for FakeDisplay {
        fn show_floor_label(&mut self, label: &str) {
            self.labels.push(label.into());
        }

        fn show_distance(&mut self, mm: u16) {
            self.distances.push(mm);
        }
    }

    #[derive(Default)]
    struct FakeDelay {
        total_ms: u32,
    }

    impl DelayMs<u32> for FakeDelay {
        fn delay_ms(&mut self, ms: u32) {
            self.total_ms += ms;
        }
    }

    type Controller<'a, 'b> = ElevatorController<
        'a,
        FakeSensor,
        &'b mut FakeActuator,
        FakeBus,
        FakeDisplay,
        FakeDelay,
        String,
    >;

    fn controller<'a, 'b>(signals: &'a Signals, actuator: &'b mut FakeActuator) -> Controller<'a, 'b> {
        let mut c = ElevatorController::new(
            &ElevatorConfig::DEFAULT,
            signals,
            FakeSensor::default(),
            actuator,
            FakeBus::default(),
            FakeDisplay::default(),
            FakeDelay::default(),
            String::new(),
        );
        c.start();
        c
    }

    fn request(code: u8) -> Frame {
        Frame::new_data(
            protocol::standard_id(0x100),
            Data::new(&[code]).expect("one byte"),
        )
    }

    #[test]
    fn starts_heading_to_floor_one() {
        let signals = Signals::new();
        let mut motor = FakeActuator::default();
        let c = controller(&signals, &mut motor);

        assert_eq!(c.target_floor(), FloorId::Floor1);
        assert_eq!(c.setpoint_mm(), 500);
        assert_eq!(c.current_floor(), FloorId::Unknown);
        assert_eq!(c.display().labels, ["Floor 1"]);
    }

    #[test]
    fn stops_at_setpoint() {
        let signals = Signals::new();
        let mut motor = FakeActuator::default();
        let mut c = controller(&signals, &mut motor);

        c.sensor_mut().push(500);
        c.tick();

        assert_eq!(c.last_drive(), 0);
        assert_eq!(c.current_floor(), FloorId::Floor1);
        assert_eq!(c.display().distances, [500]);
        drop(c);
        assert_eq!(motor.commands, [0]);
    }

    #[test]
    fn drives_up_when_below_target() {
        let signals = Signals::new();
        let mut motor = FakeActuator::default();
        let mut c = controller(&signals, &mut motor);

        c.sensor_mut().push(100);
        c.tick();

        assert!(c.last_drive() < 0);
        assert!(c.last_drive() >= -1023);
        assert_eq!(c.current_floor(), FloorId::Unknown);
    }

    #[test]
    fn implausible_reading_stops_without_display() {
        let signals = Signals::new();
        let mut motor = FakeActuator::default();
        let mut c = controller(&signals, &mut motor);

        c.sensor_mut().push(9999);
        c.tick();

        assert_eq!(c.last_drive(), 0);
        assert_eq!(c.last_distance_mm(), 9999);
        assert!(c.display().distances.is_empty());
    }

    #[test]
    fn request_retargets_in_the_same_tick() {
        let signals = Signals::new();
        let mut motor = FakeActuator::default();
        let mut c = controller(&signals, &mut motor);

        signals.requests.post(request(0x02));
        c.sensor_mut().push(500);
        c.tick();

        assert_eq!(c.target_floor(), FloorId::Floor2);
        assert_eq!(c.setpoint_mm(), 900);
        assert_eq!(c.display().labels, ["Floor 1", "Floor 2"]);
        // Car is below Floor 2, so it must go up
        assert!(c.last_drive() < 0);
        assert!(c.log().contains("[CAN] RX: Standard ID: 0x100 DLC: 1 Data: 0x02"));
    }

    #[test]
    fn unknown_request_is_ignored() {
        let signals = Signals::new();
        let mut motor = FakeActuator::default();
        let mut c = controller(&signals, &mut motor);

        signals.requests.post(request(0x03));
        c.sensor_mut().push(1300);
        c.tick();

        signals.requests.post(request(0x7F));
        c.sensor_mut().push(1300);
        c.tick();

        assert_eq!(c.target_floor(), FloorId::Floor3);
        assert_eq!(c.setpoint_mm(), 1300);
        assert_eq!(c.display().labels, ["Floor 1", "Floor 3"]);
    }

    #[test]
    fn unknown_code_and_remote_frame_only_get_logged() {
        let signals = Signals::new();
        let mut motor = FakeActuator::default();
        let mut c = controller(&signals, &mut motor);

        signals.requests.post(request(0x00));
        c.sensor_mut().push(500);
        c.tick();

        signals
            .requests
            .post(Frame::new_remote(protocol::standard_id(0x100), 1));
        c.sensor_mut().push(500);
        c.tick();

        assert_eq!(c.target_floor(), FloorId::Floor1);
        assert_eq!(c.display().labels, ["Floor 1"]);
        assert!(c.log().contains("[CAN] RX: Standard ID: 0x100 DLC: 1 Data: 0x00"));
        assert!(c.log().contains("Data: REMOTE REQUEST FRAME"));
    }

    #[test]
    fn newer_request_overwrites_unread_one() {
        let signals = Signals::new();
        let mut motor = FakeActuator::default();
        let mut c = controller(&signals, &mut motor);

        signals.requests.post(request(0x02));
        signals.requests.post(request(0x03));
        c.sensor_mut().push(500);
        c.tick();

        assert_eq!(c.target_floor(), FloorId::Floor3);
        assert_eq!(c.display().labels, ["Floor 1", "Floor 3"]);
        assert!(!signals.requests.is_pending());
    }

    #[test]
    fn broadcast_reports_last_classified_floor() {
        let signals = Signals::new();
        let mut motor = FakeActuator::default();
        let mut c = controller(&signals, &mut motor);

        // Before any classification the floor is unknown
        signals.broadcast.raise();
        c.sensor_mut().push(895);
        c.tick();

        // Now at Floor 2, then between floors
        signals.broadcast.raise();
        c.sensor_mut().push(1100);
        c.tick();

        let sent: Vec<u8> = c
            .bus()
            .sent
            .iter()
            .map(|f| f.data().expect("data frame")[0])
            .collect();
        assert_eq!(sent, [0x00, 0x02]);
        assert!(c.log().contains("[CAN] TX: ID: 0x101 Data: 0x2"));
    }

    #[test]
    fn broadcast_only_when_timer_fired() {
        let signals = Signals::new();
        let mut motor = FakeActuator::default();
        let mut c = controller(&signals, &mut motor);

        c.sensor_mut().push(500);
        c.tick();
        assert!(c.bus().sent.is_empty());

        signals.broadcast.raise();
        signals.broadcast.raise();
        c.sensor_mut().push(500);
        c.tick();
        c.sensor_mut().push(500);
        c.tick();
        assert_eq!(c.bus().sent.len(), 1);
    }

    #[test]
    fn failed_send_is_logged_and_dropped() {
        let signals = Signals::new();
        let mut motor = FakeActuator::default();
        let mut c = controller(&signals, &mut motor);
        c.bus.fail = true;

        signals.broadcast.raise();
        c.sensor_mut().push(500);
        c.tick();

        assert!(c.bus().sent.is_empty());
        assert!(c.log().contains("[CAN] TX: Error Sending Message"));
        assert!(!signals.broadcast.is_raised());

        // Not retried on the next tick
        c.bus.fail = false;
        c.sensor_mut().push(500);
        c.tick();
        assert!(c.bus().sent.is_empty());
    }

    #[test]
    fn failed_reading_stops_and_keeps_floor() {
        let signals = Signals::new();
        let mut motor = FakeActuator::default();
        let mut c = controller(&signals, &mut motor);

        c.sensor_mut().push(900);
        c.tick();
        assert_eq!(c.current_floor(), FloorId::Floor2);

        // No reading queued: the fake sensor reports no echo
        c.tick();
        assert_eq!(c.last_drive(), 0);
        assert_eq!(c.last_distance_mm(), 0);
        assert_eq!(c.current_floor(), FloorId::Floor2);
        assert!(c.log().contains("[DSM] read failed: NoEcho"));
        assert_eq!(c.sensor_mut().stops, 2);
    }

    #[test]
    fn each_reading_waits_for_settle_delay() {
        let signals = Signals::new();
        let mut motor = FakeActuator::default();
        let mut c = controller(&signals, &mut motor);

        for _ in 0..3 {
            c.sensor_mut().push(500);
            c.tick();
        }
        assert_eq!(c.delay.total_ms, 300);
        assert_eq!(c.sensor_mut().starts, 3);
        assert_eq!(c.sensor_mut().stops, 3);
    }

    #[test]
    fn approaches_and_settles_at_new_floor() {
        let signals = Signals::new();
        let mut motor = FakeActuator::default();
        let mut c = controller(&signals, &mut motor);

        signals.requests.post(request(0x03));
        for mm in [500, 800, 1100, 1250, 1290, 1298, 1300] {
            c.sensor_mut().push(mm);
            c.tick();
        }

        assert_eq!(c.current_floor(), FloorId::Floor3);
        drop(c);
        let cmds = &motor.commands;
        assert!(cmds[..5].iter().all(|&u| u < 0));
        assert_eq!(cmds[5..], [0, 0]);
    }
}
