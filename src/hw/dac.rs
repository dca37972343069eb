// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! DAC channel 1 (PA4) using direct PAC register access.
//!
//! Output buffer enabled, no trigger: a write to DHR12R1 appears on the pin one APB1 cycle later.

use stm32f7xx_hal::pac;

pub struct Dac {
    dac: pac::DAC,
}

impl Dac {
    /// Enable the DAC clock and channel 1, output at 0V.
    pub fn dac1(dac: pac::DAC) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.dacen().set_bit());

        dac.dhr12r1.write(|w| unsafe { w.bits(0) });
        dac.cr.modify(|_, w| w.boff1().clear_bit().ten1().clear_bit().en1().set_bit());

        Self { dac }
    }

    /// Write a right-aligned 12-bit value (0..4095).
    #[inline]
    pub fn write(&mut self, value: u16) {
        self.dac
            .dhr12r1
            .write(|w| unsafe { w.bits(u32::from(value & 0x0FFF)) });
    }

    /// Consume the DAC into a writer closure for [`crate::drivers::DacDrive`].
    pub fn into_writer(mut self) -> impl FnMut(u16) {
        move |value| self.write(value)
    }
}
