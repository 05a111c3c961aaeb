//! Lift Remote Wire Protocol
//!
//! This crate defines the byte sequences the wired remote sends to the lift
//! controller, and the mapping from logical button commands to those
//! sequences. The bridge injects these sequences onto the lift line when a
//! network client asks for a button press.
//!
//! # Opcode Format
//!
//! Every button command is a fixed five-byte sequence:
//! ```text
//! ┌──────┬──────┬─────────┬─────────┬─────────┐
//! │ SYNC │ SYNC │ PAYLOAD │ PAYLOAD │ PAYLOAD │
//! │ 0x55 │ 0xAA │ X       │ X       │ X       │
//! └──────┴──────┴─────────┴─────────┴─────────┘
//! ```
//!
//! The controller checks that the payload byte is repeated three times.
//! Everything else on the line (status frames from the lift, wake bytes from
//! the remote) is relayed opaquely and never interpreted here.

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod diag;
pub mod opcode;

pub use command::{lookup, Action, ButtonEdge, LogicalCommand, Preset};
pub use diag::{HexPreview, PREVIEW_LEN};
pub use opcode::{Opcode, OPCODE_LEN, SYNC};
