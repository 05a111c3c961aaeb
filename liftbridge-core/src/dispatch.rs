//! Command dispatcher
//!
//! Turns a logical command request into one opcode write on the lift line.
//! Nothing is read back: success means the five bytes were queued for
//! transmission, not that the lift moved.

use embassy_sync::blocking_mutex::raw::RawMutex;

use liftbridge_hal::{SerialError, UartRx, UartTx};
use liftbridge_protocol::LogicalCommand;

use crate::link::{EndpointId, LinkManager};

/// Why a dispatch did not happen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchError {
    /// Action/subtype pair is not in the opcode table; nothing was written
    UnrecognizedCommand,
    /// Lift endpoint rejected the write
    Transmit(SerialError),
}

/// A command that was queued on the lift line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Dispatched {
    pub command: LogicalCommand,
}

impl Dispatched {
    /// Status label for the client
    pub fn label(&self) -> &'static str {
        self.command.label()
    }
}

/// Injects button opcodes onto the lift endpoint
pub struct Dispatcher<'a, M: RawMutex, Rx, Tx> {
    links: &'a LinkManager<M, Rx, Tx>,
}

impl<M: RawMutex, Rx, Tx> Clone for Dispatcher<'_, M, Rx, Tx> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: RawMutex, Rx, Tx> Copy for Dispatcher<'_, M, Rx, Tx> {}

impl<'a, M, Rx, Tx> Dispatcher<'a, M, Rx, Tx>
where
    M: RawMutex,
    Rx: UartRx,
    Tx: UartTx,
{
    pub fn new(links: &'a LinkManager<M, Rx, Tx>) -> Self {
        Self { links }
    }

    /// Resolve an action/subtype request and send it
    ///
    /// Unknown pairs fail with [`DispatchError::UnrecognizedCommand`]
    /// without touching the serial line.
    pub async fn dispatch(
        &self,
        action: &str,
        subtype: Option<&str>,
    ) -> Result<Dispatched, DispatchError> {
        let command = LogicalCommand::from_request(action, subtype)
            .ok_or(DispatchError::UnrecognizedCommand)?;
        self.send(command).await
    }

    /// Write one command's opcode to the lift endpoint
    ///
    /// Identical commands sent twice are written twice.
    pub async fn send(&self, command: LogicalCommand) -> Result<Dispatched, DispatchError> {
        self.links
            .write(EndpointId::Lift, command.opcode().as_bytes())
            .await
            .map_err(DispatchError::Transmit)?;
        Ok(Dispatched { command })
    }
}
