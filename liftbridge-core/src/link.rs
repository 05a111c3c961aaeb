//! Serial link manager
//!
//! Owns the lift-side and remote-side serial endpoints for the lifetime of
//! the firmware. The bridge loop and the command dispatcher both hold a
//! shared reference to the same manager.
//!
//! Each endpoint half sits behind its own async mutex. Concurrent writers to
//! one endpoint therefore take turns, and every write reaches the wire as one
//! contiguous run of bytes. Which writer goes first is not specified.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;

use liftbridge_hal::{SerialError, UartRx, UartTx};

/// Largest frame moved in a single read (receive buffer capacity)
pub const FRAME_CAPACITY: usize = 1024;

/// Serial endpoint identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EndpointId {
    /// Line to the lift controller
    Lift,
    /// Line to the physical wired remote
    Remote,
}

impl EndpointId {
    /// The endpoint on the other side of the bridge
    pub const fn peer(self) -> Self {
        match self {
            EndpointId::Lift => EndpointId::Remote,
            EndpointId::Remote => EndpointId::Lift,
        }
    }
}

struct Endpoint<M: RawMutex, Rx, Tx> {
    rx: Mutex<M, Rx>,
    tx: Mutex<M, Tx>,
}

impl<M: RawMutex, Rx, Tx> Endpoint<M, Rx, Tx> {
    fn new(rx: Rx, tx: Tx) -> Self {
        Self {
            rx: Mutex::new(rx),
            tx: Mutex::new(tx),
        }
    }
}

/// Owner of both serial endpoints
pub struct LinkManager<M: RawMutex, Rx, Tx> {
    lift: Endpoint<M, Rx, Tx>,
    remote: Endpoint<M, Rx, Tx>,
}

impl<M, Rx, Tx> LinkManager<M, Rx, Tx>
where
    M: RawMutex,
    Rx: UartRx,
    Tx: UartTx,
{
    /// Take ownership of the configured endpoint halves
    pub fn new(lift: (Rx, Tx), remote: (Rx, Tx)) -> Self {
        Self {
            lift: Endpoint::new(lift.0, lift.1),
            remote: Endpoint::new(remote.0, remote.1),
        }
    }

    fn endpoint(&self, id: EndpointId) -> &Endpoint<M, Rx, Tx> {
        match id {
            EndpointId::Lift => &self.lift,
            EndpointId::Remote => &self.remote,
        }
    }

    /// Read up to `buf.len()` bytes from an endpoint
    ///
    /// Waits at most `timeout_ms`. `Ok(0)` means the line was idle.
    pub async fn read(
        &self,
        id: EndpointId,
        buf: &mut [u8],
        timeout_ms: u32,
    ) -> Result<usize, SerialError> {
        let mut rx = self.endpoint(id).rx.lock().await;
        rx.read_timeout(buf, timeout_ms).await.map_err(Into::into)
    }

    /// Write `bytes` to an endpoint, in order
    ///
    /// Holds the endpoint's transmit lock until every byte is accepted, so
    /// the write is never interleaved with another writer's bytes.
    pub async fn write(&self, id: EndpointId, bytes: &[u8]) -> Result<(), SerialError> {
        let mut tx = self.endpoint(id).tx.lock().await;
        tx.write_all(bytes).await.map_err(Into::into)
    }
}
