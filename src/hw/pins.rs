// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for STM32F777 MCU for the elevator controller.

use stm32f7xx_hal::{
    gpio::{gpioa, gpiob, gpiod, Alternate, Analog, OpenDrain, Output, PushPull},
    pac,
    prelude::*,
};

/// All board pins. Construct this once at startup using:
///
/// ```rust
/// let pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOD);
/// ```
pub struct BoardPins {
    pub usart1: Usart1Pins,
    pub can1: Can1Pins,
    pub i2c1: I2c1Pins,
    pub sonar: SonarPins,
    pub hoist: HoistPins,
}

pub struct Usart1Pins {
    pub tx: gpioa::PA9<Alternate<7>>,
    pub rx: gpioa::PA10<Alternate<7>>,
}

/// CAN1 bus pins
pub struct Can1Pins {
    pub tx: gpioa::PA12<Alternate<9>>,
    pub rx: gpioa::PA11<Alternate<9>>,
}

/// I2C1 to the LCD backpack
pub struct I2c1Pins {
    pub scl: gpiob::PB8<Alternate<4, OpenDrain>>,
    pub sda: gpiob::PB9<Alternate<4, OpenDrain>>,
}

/// Rangefinder pins
pub struct SonarPins {
    pub enable: gpiod::PD3<Output<PushPull>>,
    pub analog: gpioa::PA3<Analog>, // ADC1_IN3
}

/// Hoist motor drive pins
pub struct HoistPins {
    pub speed: gpioa::PA4<Analog>, // DAC_OUT1
    pub dir: gpiod::PD4<Output<PushPull>>,
}

impl BoardPins {
    /// Create all named pins from raw GPIO peripherals.
    pub fn new(gpioa: pac::GPIOA, gpiob: pac::GPIOB, gpiod: pac::GPIOD) -> Self {
        let gpioa = gpioa.split();
        let gpiob = gpiob.split();
        let gpiod = gpiod.split();

        Self {
            usart1: Usart1Pins {
                tx: gpioa.pa9.into_alternate::<7>(),
                rx: gpioa.pa10.into_alternate::<7>(),
            },

            can1: Can1Pins {
                tx: gpioa.pa12.into_alternate::<9>(),
                rx: gpioa.pa11.into_alternate::<9>().internal_pull_up(true),
            },

            i2c1: I2c1Pins {
                scl: gpiob.pb8.into_alternate_open_drain::<4>(),
                sda: gpiob.pb9.into_alternate_open_drain::<4>(),
            },

            sonar: SonarPins {
                enable: gpiod.pd3.into_push_pull_output(),
                analog: gpioa.pa3.into_analog(),
            },

            hoist: HoistPins {
                speed: gpioa.pa4.into_analog(),
                dir: gpiod.pd4.into_push_pull_output(),
            },
        }
    }
}
