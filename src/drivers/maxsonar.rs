// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Driver for a MaxBotix HRLV-MaxSonar-EZ ultrasonic rangefinder read through an ADC channel.
//!
//! The sensor is mounted at the bottom of the shaft looking up at the car.
//!
//! Wiring:
//! - Pin 3 (AN): Analog output, Vcc/5120 per mm (ADC Input)
//! - Pin 4 (RX): Ranging enable, held high to range continuously (GPIO Output)
//! - Pin 6 (V+): 3.3V, same reference as the ADC
//! - Pin 7 (GND): Ground
//!
//! With the ADC referenced to the sensor supply, one 12-bit count is 5120 / 4096 = 1.25 mm.

use embedded_hal::digital::v2::OutputPin;

use crate::interfaces::DistanceSensor;

/// Number of ADC samples combined into one reading.
const SAMPLES: usize = 5;

/// Error type for `MaxSonar` operations.
#[derive(Debug, PartialEq)]
pub enum Error<E> {
    /// Ranging-enable pin could not be driven.
    Pin(E),
    /// A reading was requested while ranging was stopped.
    NotRanging,
}

/// Rangefinder with an enable pin and an ADC reader.
///
/// `ReadRaw` is a closure that returns the raw 12-bit ADC reading (0..4095).
pub struct MaxSonar<EN: OutputPin, ReadRaw> {
    enable: EN,
    read_raw: ReadRaw,
    ranging: bool,
    init_fault: Option<EN::Error>,
}

impl<EN, ReadRaw> MaxSonar<EN, ReadRaw>
where
    EN: OutputPin,
    ReadRaw: FnMut() -> u16,
{
    /// Construct a new rangefinder driver. Ranging starts stopped.
    ///
    /// The driver is built even if the enable pin cannot be driven low; the failure is kept for
    /// [`take_init_fault`](Self::take_init_fault) so start-up can log it and carry on.
    pub fn new(mut enable: EN, read_raw: ReadRaw) -> Self {
        let init_fault = enable.set_low().err();
        Self {
            enable,
            read_raw,
            ranging: false,
            init_fault,
        }
    }

    /// Pin failure seen during construction, if any. Cleared by the call.
    pub fn take_init_fault(&mut self) -> Option<EN::Error> {
        self.init_fault.take()
    }

    /// Convert a raw 12-bit ADC count to millimeters.
    #[inline]
    pub fn counts_to_mm(raw: u16) -> u16 {
        ((u32::from(raw) * 5120) / 4096) as u16
    }

    /// Median of a burst of ADC samples (kills single-read spikes).
    pub fn read_raw_median(&mut self) -> u16 {
        let mut samples = [0u16; SAMPLES];
        for s in samples.iter_mut() {
            *s = (self.read_raw)();
        }
        samples.sort_unstable();
        samples[SAMPLES / 2]
    }
}

impl<EN, ReadRaw> DistanceSensor for MaxSonar<EN, ReadRaw>
where
    EN: OutputPin,
    EN::Error: core::fmt::Debug,
    ReadRaw: FnMut() -> u16,
{
    type Error = Error<EN::Error>;

    fn start_measurement(&mut self) -> Result<(), Self::Error> {
        self.enable.set_high().map_err(Error::Pin)?;
        self.ranging = true;
        Ok(())
    }

    fn read_distance_mm(&mut self) -> Result<u16, Self::Error> {
        if !self.ranging {
            return Err(Error::NotRanging);
        }
        Ok(Self::counts_to_mm(self.read_raw_median()))
    }

    fn stop_measurement(&mut self) -> Result<(), Self::Error> {
        self.ranging = false;
        self.enable.set_low().map_err(Error::Pin)
    }
}
