//! Board-agnostic core logic for the lift bridge firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Serial link manager owning the lift and remote endpoints
//! - Bridge loop relaying frames between the two endpoints
//! - Command dispatcher injecting button opcodes onto the lift line
//! - Control interface request/response contract
//! - Network link state machine
//! - Configuration types and parser

#![no_std]
#![deny(unsafe_code)]

pub mod bridge;
pub mod config;
pub mod control;
pub mod dispatch;
pub mod link;
pub mod network;

pub use bridge::{Bridge, CycleReport, Direction, LegOutcome, RelayObserver};
pub use dispatch::{DispatchError, Dispatched, Dispatcher};
pub use link::{EndpointId, LinkManager, FRAME_CAPACITY};
pub use network::{LinkEvent, LinkState};
