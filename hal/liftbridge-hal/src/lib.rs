//! Liftbridge Hardware Abstraction Layer
//!
//! This crate defines the serial abstraction that chip-specific HALs
//! implement. The bridge logic in `liftbridge-core` is written against these
//! traits only, so it runs unchanged on the RP2040 and on the host under test.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (liftbridge-firmware)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  liftbridge-core (bridge, dispatcher)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  liftbridge-hal (this crate - traits)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ liftbridge-   │
//!             │ hal-rp2040    │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartTx`], [`uart::UartRx`] - Serial communication

#![no_std]
#![deny(unsafe_code)]

pub mod uart;

// Re-export key items at crate root for convenience
pub use uart::{
    DataBits, FlowControl, Parity, SerialError, StopBits, UartConfig, UartRx, UartTx,
};
