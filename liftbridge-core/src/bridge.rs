//! Bridge loop
//!
//! Relays raw bytes lift -> remote and remote -> lift, forever. This is the
//! only path by which physical remote presses reach the lift and lift status
//! frames reach the remote's display.
//!
//! One iteration:
//! 1. Bounded read on the lift endpoint; forward any bytes to the remote
//! 2. Bounded read on the remote endpoint; forward any bytes to the lift
//! 3. Sleep `idle_delay_ms`
//!
//! Frames are opaque. Whatever a single read returns is written out
//! unmodified as a single write.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;

use liftbridge_hal::{SerialError, UartRx, UartTx};

use crate::config::BridgeTiming;
use crate::link::{EndpointId, LinkManager, FRAME_CAPACITY};

/// Relay direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Lift status frames heading to the remote's display
    LiftToRemote,
    /// Remote button frames heading to the lift
    RemoteToLift,
}

impl Direction {
    /// Endpoint read from
    pub const fn source(self) -> EndpointId {
        match self {
            Direction::LiftToRemote => EndpointId::Lift,
            Direction::RemoteToLift => EndpointId::Remote,
        }
    }

    /// Endpoint written to
    pub const fn destination(self) -> EndpointId {
        self.source().peer()
    }
}

/// Result of one direction within one iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LegOutcome {
    /// Read timed out with no data
    Idle,
    /// Frame of this many bytes was forwarded
    Relayed(usize),
    /// Read failed; nothing forwarded
    ReadFailed(SerialError),
    /// Frame was read but the forward write failed
    WriteFailed(SerialError),
}

/// Outcome of one bridge iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleReport {
    pub lift_to_remote: LegOutcome,
    pub remote_to_lift: LegOutcome,
}

/// Sink for best-effort relay diagnostics
///
/// Not part of the relay contract: an observer cannot alter or delay what is
/// forwarded beyond the time it takes to return.
pub trait RelayObserver {
    /// A frame was forwarded
    fn relayed(&mut self, direction: Direction, frame: &[u8]);

    /// A read or write failed; the leg was skipped
    fn failed(&mut self, direction: Direction, error: SerialError) {
        let _ = (direction, error);
    }
}

/// Observer that discards everything
impl RelayObserver for () {
    fn relayed(&mut self, _direction: Direction, _frame: &[u8]) {}
}

/// The relay worker
pub struct Bridge<'a, M: RawMutex, Rx, Tx> {
    links: &'a LinkManager<M, Rx, Tx>,
    timing: BridgeTiming,
    buf: [u8; FRAME_CAPACITY],
}

impl<'a, M, Rx, Tx> Bridge<'a, M, Rx, Tx>
where
    M: RawMutex,
    Rx: UartRx,
    Tx: UartTx,
{
    pub fn new(links: &'a LinkManager<M, Rx, Tx>, timing: BridgeTiming) -> Self {
        Self {
            links,
            timing,
            buf: [0; FRAME_CAPACITY],
        }
    }

    /// Run both relay legs once, without the idle delay
    ///
    /// A failure on one leg does not skip the other. Every call starts from
    /// the same state regardless of what the previous call returned.
    pub async fn poll_once<O: RelayObserver>(&mut self, observer: &mut O) -> CycleReport {
        let lift_to_remote = self.relay(Direction::LiftToRemote, observer).await;
        let remote_to_lift = self.relay(Direction::RemoteToLift, observer).await;
        CycleReport {
            lift_to_remote,
            remote_to_lift,
        }
    }

    /// Relay forever
    pub async fn run<D, O>(&mut self, delay: &mut D, observer: &mut O) -> !
    where
        D: DelayNs,
        O: RelayObserver,
    {
        loop {
            self.poll_once(observer).await;
            delay.delay_ms(self.timing.idle_delay_ms).await;
        }
    }

    async fn relay<O: RelayObserver>(&mut self, direction: Direction, observer: &mut O) -> LegOutcome {
        let links = self.links;

        let len = match links
            .read(direction.source(), &mut self.buf, self.timing.read_timeout_ms)
            .await
        {
            Ok(0) => return LegOutcome::Idle,
            Ok(n) => n,
            Err(e) => {
                observer.failed(direction, e);
                return LegOutcome::ReadFailed(e);
            }
        };

        let frame = &self.buf[..len];
        if let Err(e) = links.write(direction.destination(), frame).await {
            observer.failed(direction, e);
            return LegOutcome::WriteFailed(e);
        }

        observer.relayed(direction, frame);
        LegOutcome::Relayed(len)
    }
}
