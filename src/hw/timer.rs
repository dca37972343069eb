// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Periodic update interrupt on TIM2 for the status broadcast.
//!
//! The counter runs at 10 kHz, so any period from 0.1 ms up to several days fits in the 32-bit
//! auto-reload register.

use stm32f7xx_hal::pac;

/// Counter frequency after prescaling.
const TICK_HZ: u32 = 10_000;

/// Owns TIM2 for as long as the broadcast interrupt should keep firing.
pub struct StatusTimer {
    _tim: pac::TIM2,
}

impl StatusTimer {
    /// Configure TIM2 to raise its update interrupt every `period_ms` and start counting.
    ///
    /// * `timer_clock_hz` – TIM2 kernel clock (APB1 timer clock).
    pub fn start(tim: pac::TIM2, timer_clock_hz: u32, period_ms: u32) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim2en().set_bit());

        let psc = (timer_clock_hz / TICK_HZ).saturating_sub(1);
        let arr = period_ms.max(1).saturating_mul(TICK_HZ / 1000).saturating_sub(1);

        tim.cr1.modify(|_, w| w.cen().clear_bit());
        tim.psc.write(|w| unsafe { w.bits(psc) });
        tim.arr.write(|w| unsafe { w.bits(arr) });
        tim.cnt.write(|w| unsafe { w.bits(0) });

        // Latch PSC/ARR now; the forced update sets UIF, which must not fire a broadcast
        tim.egr.write(|w| w.ug().set_bit());
        tim.sr.modify(|_, w| w.uif().clear_bit());

        tim.dier.modify(|_, w| w.uie().set_bit());
        tim.cr1.modify(|_, w| w.cen().set_bit());

        Self { _tim: tim }
    }

    /// Clear the update flag. Call from the TIM2 interrupt handler.
    #[inline]
    pub fn clear_pending() {
        let tim = unsafe { &*pac::TIM2::ptr() };
        tim.sr.modify(|_, w| w.uif().clear_bit());
    }
}
