// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Controller Area Network (CAN) abstraction layer.
//!
//! - `CanBus` wraps a HAL `can::Can` instance in `bxcan::Can` with non-blocking transmit.
//! - `SharedCan` holds the bus in a critical-section cell so the RX interrupt and the main loop can
//!   both reach it.

use core::cell::RefCell;

use bxcan::{self, filter::Mask32, Fifo, Frame, Interrupt, OverrunError, StandardId};
use critical_section::Mutex;
use stm32f7xx_hal::can as hal_can;

use crate::interfaces::StatusBus;
use crate::signals::Mailbox;

/// Error type for transmit operations.
#[derive(Debug)]
pub enum TxError {
    /// All TX mailboxes hold frames of equal or higher priority.
    MailboxFull,
    /// The shared bus has not been installed yet.
    NotInstalled,
}

/// Wrapper around a bxcan CAN instance built from a HAL CAN peripheral.
pub struct CanBus<I>
where
    hal_can::Can<I>: bxcan::Instance,
{
    can: bxcan::Can<hal_can::Can<I>>,
}

impl<I> CanBus<I>
where
    hal_can::Can<I>: bxcan::Instance,
{
    /// Configure a bxcan instance from a HAL CAN peripheral, leaving it in initialization mode.
    ///
    /// * `hal_can` – the HAL CAN wrapper
    /// * `btr` – value for the CAN_BTR register (bit timing).
    ///
    /// Call [`try_enable`](Self::try_enable) once filters and interrupts are set up.
    pub fn new(hal_can: hal_can::Can<I>, btr: u32) -> Self {
        let can = bxcan::Can::builder(hal_can)
            .set_bit_timing(btr)
            .leave_disabled();

        Self { can }
    }

    /// Raise the FIFO0 interrupt (`CAN1_RX0`) whenever a frame is pending.
    pub fn listen_rx(&mut self) {
        self.can.enable_interrupt(Interrupt::Fifo0MessagePending);
    }

    /// Leave initialization mode.
    ///
    /// The peripheral has to see 11 recessive bits before it joins the bus. Returns `false` if that
    /// did not happen within `attempts` polls; the hardware keeps trying on its own.
    pub fn try_enable(&mut self, attempts: u32) -> bool {
        for _ in 0..attempts {
            match self.can.enable_non_blocking() {
                Ok(()) => return true,
                Err(nb::Error::WouldBlock) => cortex_m::asm::nop(),
                Err(nb::Error::Other(never)) => match never {},
            }
        }
        false
    }

    /// Queue a frame for transmission without waiting.
    pub fn try_transmit(&mut self, frame: &Frame) -> Result<(), TxError> {
        match self.can.transmit(frame) {
            Ok(_status) => Ok(()),
            Err(nb::Error::WouldBlock) => Err(TxError::MailboxFull),
            Err(nb::Error::Other(never)) => match never {},
        }
    }

    /// Non-blocking receive of a frame.
    pub fn receive(&mut self) -> nb::Result<Frame, OverrunError> {
        self.can.receive()
    }
}

/// Filter helpers for CAN instances that own the filter banks (CAN1 on STM32F7).
impl<I> CanBus<I>
where
    hal_can::Can<I>: bxcan::Instance + bxcan::FilterOwner,
{
    /// Accept only standard data/remote frames with exactly `id`, into FIFO0.
    pub fn accept_only(&mut self, id: StandardId) {
        self.can
            .modify_filters()
            .enable_bank(0, Fifo::Fifo0, Mask32::frames_with_std_id(id, StandardId::MAX));
    }
}

/// `CanBus` shared between interrupt handlers and the main loop.
pub struct SharedCan<I>
where
    hal_can::Can<I>: bxcan::Instance,
{
    bus: Mutex<RefCell<Option<CanBus<I>>>>,
}

impl<I> SharedCan<I>
where
    hal_can::Can<I>: bxcan::Instance,
{
    pub const fn new() -> Self {
        Self {
            bus: Mutex::new(RefCell::new(None)),
        }
    }

    /// Hand the configured bus over. Must happen before its interrupt is unmasked.
    pub fn install(&self, bus: CanBus<I>) {
        critical_section::with(|cs| {
            self.bus.borrow_ref_mut(cs).replace(bus);
        });
    }

    /// Run `f` on the bus inside a critical section. `None` if no bus is installed.
    pub fn with<R>(&self, f: impl FnOnce(&mut CanBus<I>) -> R) -> Option<R> {
        critical_section::with(|cs| self.bus.borrow_ref_mut(cs).as_mut().map(f))
    }

    /// Drain FIFO0 into `mailbox`. Call from the FIFO0 interrupt handler.
    ///
    /// Only the newest frame survives; older unread frames are overwritten.
    pub fn on_rx_interrupt(&self, mailbox: &Mailbox<Frame>) {
        self.with(|bus| loop {
            match bus.receive() {
                Ok(frame) => {
                    mailbox.post(frame);
                }
                // Lost frames are irrelevant: only the newest request counts
                Err(nb::Error::Other(_overrun)) => continue,
                Err(nb::Error::WouldBlock) => break,
            }
        });
    }
}

impl<I> StatusBus for &SharedCan<I>
where
    hal_can::Can<I>: bxcan::Instance,
{
    type Error = TxError;

    fn try_send(&mut self, frame: &Frame) -> Result<(), Self::Error> {
        self.with(|bus| bus.try_transmit(frame))
            .unwrap_or(Err(TxError::NotInstalled))
    }
}
