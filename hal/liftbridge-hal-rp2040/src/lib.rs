//! RP2040-specific HAL for the lift bridge firmware
//!
//! This crate provides RP2040-specific implementations of the shared
//! `liftbridge-hal` traits:
//!
//! - UART pin routing validation (startup check for endpoint pin pairs)
//! - Embassy UART config conversion
//! - Buffered UART halves implementing `UartRx`/`UartTx`

#![no_std]

pub mod uart;

// Re-export shared traits from liftbridge-hal for convenience
pub use liftbridge_hal::{SerialError, UartConfig, UartRx, UartTx};
pub use uart::{rp_uart_config, uart_for_pins, PinError, SerialRx, SerialTx, UartId};
