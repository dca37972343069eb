// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Board bring-up, interrupt handlers and the main loop.

use core::cell::RefCell;
use core::fmt::Write;

use cortex_m::{delay::Delay, peripheral::NVIC};
use cortex_m_rt::entry;
use panic_halt as _;

use hal::{
    can::Can,
    i2c::{BlockingI2c, Mode},
    pac::{self, interrupt},
    prelude::*,
    serial::{Config, Serial},
};
use stm32f7xx_hal as hal;

use elevator::config::ElevatorConfig;
use elevator::control::ElevatorController;
use elevator::drivers::{lcd1602, DacDrive, Lcd1602, MaxSonar};
use elevator::hw::{Adc, BoardPins, CanBus, Dac, SharedCan, StatusTimer, Usart};
use elevator::protocol;
use elevator::signals::Signals;

/// ADC1 channel wired to the rangefinder's analog output (PA3).
const SONAR_ADC_CHANNEL: u8 = 3;

/// Polls of the CAN controller before start-up gives up waiting for bus sync.
const CAN_SYNC_POLLS: u32 = 100_000;

/// I2C data timeout for the LCD backpack.
const I2C_TIMEOUT_US: u32 = 10_000;

static SIGNALS: Signals = Signals::new();
static CAN1_BUS: SharedCan<pac::CAN1> = SharedCan::new();

#[interrupt]
fn CAN1_RX0() {
    CAN1_BUS.on_rx_interrupt(&SIGNALS.requests);
}

#[interrupt]
fn TIM2() {
    StatusTimer::clear_pending();
    SIGNALS.broadcast.raise();
}

#[entry]
fn main() -> ! {
    let config = ElevatorConfig::DEFAULT;

    // Peripherals
    let dp = pac::Peripherals::take().unwrap();
    let cp = cortex_m::Peripherals::take().unwrap();

    // Clocks
    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze();
    let mut apb1 = rcc.apb1;

    let pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOD);

    // USART1 (DBG)
    let usart_cfg = Config {
        baud_rate: 115_200.bps(),
        ..Default::default()
    };
    let serial = Serial::new(
        dp.USART1,
        (pins.usart1.tx, pins.usart1.rx),
        &clocks,
        usart_cfg,
    );
    let mut usart = Usart::new(serial);
    usart.println("Elevator controller starting");

    let mut delay = Delay::new(cp.SYST, clocks.sysclk().raw());

    // CAN1
    let can1 = Can::new(dp.CAN1, &mut apb1, (pins.can1.tx, pins.can1.rx));
    let mut can_bus = CanBus::new(can1, config.bus.bit_timing);
    can_bus.accept_only(protocol::standard_id(config.bus.request_id));
    can_bus.listen_rx();
    if can_bus.try_enable(CAN_SYNC_POLLS) {
        usart.println("[CAN] Started");
    } else {
        usart.println("[CAN] No bus sync yet, continuing");
    }
    CAN1_BUS.install(can_bus);

    // Status timer
    let _status_timer =
        StatusTimer::start(dp.TIM2, clocks.timclk1().raw(), config.status_period_ms);

    unsafe {
        NVIC::unmask(pac::Interrupt::CAN1_RX0);
        NVIC::unmask(pac::Interrupt::TIM2);
    }

    // Rangefinder
    let adc = RefCell::new(Adc::adc1(dp.ADC1));
    let _sonar_in = pins.sonar.analog;
    let mut sonar = MaxSonar::new(pins.sonar.enable, Adc::make_reader(&adc, SONAR_ADC_CHANNEL));
    if let Some(e) = sonar.take_init_fault() {
        let _ = writeln!(usart, "[DSM] enable pin init failed: {:?}\r", e);
    }

    // Hoist motor
    let _speed_out = pins.hoist.speed;
    let hoist = DacDrive::new(pins.hoist.dir, Dac::dac1(dp.DAC).into_writer());

    // LCD
    let i2c = BlockingI2c::i2c1(
        dp.I2C1,
        (pins.i2c1.scl, pins.i2c1.sda),
        Mode::standard(100.kHz()),
        &clocks,
        &mut apb1,
        I2C_TIMEOUT_US,
    );
    let mut lcd = Lcd1602::new(i2c, lcd1602::DEFAULT_ADDRESS);
    if let Err(e) = lcd.init(&mut delay) {
        let _ = writeln!(usart, "[LCD] init failed: {:?}\r", e);
    }

    let mut controller = ElevatorController::new(
        &config, &SIGNALS, sonar, hoist, &CAN1_BUS, lcd, delay, usart,
    );
    controller.start();

    loop {
        controller.tick();
    }
}
