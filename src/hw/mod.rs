pub mod adc;
pub mod can;
pub mod dac;
pub mod pins;
pub mod timer;
pub mod usart;

pub use adc::Adc;
pub use can::{CanBus, SharedCan};
pub use dac::Dac;
pub use pins::BoardPins;
pub use timer::StatusTimer;
pub use usart::Usart;
