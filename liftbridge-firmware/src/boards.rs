//! Pico W board wiring
//!
//! Embassy peripherals are typed at compile time, so the pins taken in
//! `main` are fixed here. `bridge.toml` must agree with them.

use liftbridge_hal_rp2040::UartId;

/// Lift controller line
pub const LIFT_UART: UartId = UartId::Uart0;
pub const LIFT_TX_PIN: u8 = 16;
pub const LIFT_RX_PIN: u8 = 17;

/// Wired remote line
pub const REMOTE_UART: UartId = UartId::Uart1;
pub const REMOTE_TX_PIN: u8 = 8;
pub const REMOTE_RX_PIN: u8 = 9;

// CYW43 radio (fixed by the Pico W module)
// PWR_ON: GPIO23, SPI CS: GPIO25, SPI DIO: GPIO24, SPI CLK: GPIO29
