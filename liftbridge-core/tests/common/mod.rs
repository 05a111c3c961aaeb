//! Scripted serial endpoints for driving the bridge on the host

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use embassy_futures::yield_now;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embedded_hal_async::delay::DelayNs;
use embedded_io_async::{ErrorKind, ErrorType, Read, Write};

use liftbridge_core::control::Acceptor;
use liftbridge_core::{Direction, LinkManager, RelayObserver};
use liftbridge_hal::{SerialError, UartRx, UartTx};

pub type TestLinks = LinkManager<NoopRawMutex, MockRx, MockTx>;

#[derive(Default)]
struct PortState {
    incoming: VecDeque<Result<Vec<u8>, SerialError>>,
    wire: Vec<u8>,
    writes: Vec<Vec<u8>>,
    write_faults: VecDeque<SerialError>,
    chunked: bool,
}

/// Test-side handle to one endpoint's scripted line
#[derive(Clone, Default)]
pub struct Port(Rc<RefCell<PortState>>);

impl Port {
    pub fn new() -> Self {
        Self::default()
    }

    /// Receive and transmit halves to hand to the link manager
    pub fn halves(&self) -> (MockRx, MockTx) {
        (MockRx(self.0.clone()), MockTx(self.0.clone()))
    }

    /// Queue bytes to be returned by the next read
    pub fn push_frame(&self, bytes: &[u8]) {
        self.0.borrow_mut().incoming.push_back(Ok(bytes.to_vec()));
    }

    pub fn push_read_error(&self, error: SerialError) {
        self.0.borrow_mut().incoming.push_back(Err(error));
    }

    pub fn fail_next_write(&self, error: SerialError) {
        self.0.borrow_mut().write_faults.push_back(error);
    }

    /// Yield to the executor after every transmitted byte
    pub fn set_chunked(&self, chunked: bool) {
        self.0.borrow_mut().chunked = chunked;
    }

    /// Every byte transmitted, in wire order
    pub fn wire(&self) -> Vec<u8> {
        self.0.borrow().wire.clone()
    }

    /// Each completed write call
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.0.borrow().writes.clone()
    }

    pub fn pending_reads(&self) -> usize {
        self.0.borrow().incoming.len()
    }
}

pub struct MockRx(Rc<RefCell<PortState>>);

impl UartRx for MockRx {
    type Error = SerialError;

    async fn read_timeout(&mut self, buf: &mut [u8], _timeout_ms: u32) -> Result<usize, SerialError> {
        let mut state = self.0.borrow_mut();
        match state.incoming.pop_front() {
            None => Ok(0),
            Some(Err(e)) => Err(e),
            Some(Ok(frame)) => {
                let n = frame.len().min(buf.len());
                buf[..n].copy_from_slice(&frame[..n]);
                if n < frame.len() {
                    state.incoming.push_front(Ok(frame[n..].to_vec()));
                }
                Ok(n)
            }
        }
    }
}

pub struct MockTx(Rc<RefCell<PortState>>);

impl UartTx for MockTx {
    type Error = SerialError;

    async fn write_all(&mut self, data: &[u8]) -> Result<(), SerialError> {
        let fault = self.0.borrow_mut().write_faults.pop_front();
        if let Some(e) = fault {
            return Err(e);
        }

        let chunked = self.0.borrow().chunked;
        for &byte in data {
            self.0.borrow_mut().wire.push(byte);
            if chunked {
                yield_now().await;
            }
        }
        self.0.borrow_mut().writes.push(data.to_vec());
        Ok(())
    }
}

/// Build a link manager over two fresh ports
pub fn links() -> (TestLinks, Port, Port) {
    let lift = Port::new();
    let remote = Port::new();
    let links = LinkManager::new(lift.halves(), remote.halves());
    (links, lift, remote)
}

/// Observer that records every callback
#[derive(Default)]
pub struct Recorder {
    pub relayed: Vec<(Direction, Vec<u8>)>,
    pub failed: Vec<(Direction, SerialError)>,
}

impl RelayObserver for Recorder {
    fn relayed(&mut self, direction: Direction, frame: &[u8]) {
        self.relayed.push((direction, frame.to_vec()));
    }

    fn failed(&mut self, direction: Direction, error: SerialError) {
        self.failed.push((direction, error));
    }
}

/// Delay that returns after one yield and records what was asked for
#[derive(Clone, Default)]
pub struct CountingDelay {
    pub calls: Rc<Cell<usize>>,
    pub last_ms: Rc<Cell<u32>>,
}

impl DelayNs for CountingDelay {
    async fn delay_ns(&mut self, _ns: u32) {
        yield_now().await;
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.calls.set(self.calls.get() + 1);
        self.last_ms.set(ms);
        yield_now().await;
    }
}

/// One scripted client: its request bytes and the response it received
pub struct MockConnection {
    request: Vec<u8>,
    pos: usize,
    response: Rc<RefCell<Vec<u8>>>,
}

impl MockConnection {
    /// A client that sends `request` then closes; the handle collects the response
    pub fn new(request: &[u8]) -> (Self, Rc<RefCell<Vec<u8>>>) {
        let response = Rc::new(RefCell::new(Vec::new()));
        let conn = Self {
            request: request.to_vec(),
            pos: 0,
            response: response.clone(),
        };
        (conn, response)
    }
}

impl ErrorType for MockConnection {
    type Error = ErrorKind;
}

impl Read for MockConnection {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, ErrorKind> {
        let rest = &self.request[self.pos..];
        let n = rest.len().min(buf.len());
        buf[..n].copy_from_slice(&rest[..n]);
        self.pos += n;
        Ok(n)
    }
}

impl Write for MockConnection {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, ErrorKind> {
        self.response.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }
}

/// Hands out queued clients, then waits forever
#[derive(Default)]
pub struct MockAcceptor {
    pending: VecDeque<Vec<u8>>,
    responses: Vec<Rc<RefCell<Vec<u8>>>>,
}

impl MockAcceptor {
    pub fn queue(&mut self, request: &[u8]) {
        self.pending.push_back(request.to_vec());
    }

    /// Responses in the order clients were accepted
    pub fn responses(&self) -> Vec<String> {
        self.responses
            .iter()
            .map(|r| String::from_utf8_lossy(&r.borrow()).into_owned())
            .collect()
    }
}

impl Acceptor for MockAcceptor {
    type Connection<'a> = MockConnection;
    type Error = ();

    async fn accept(&mut self) -> Result<MockConnection, ()> {
        let Some(request) = self.pending.pop_front() else {
            return core::future::pending().await;
        };
        let (conn, response) = MockConnection::new(&request);
        self.responses.push(response);
        Ok(conn)
    }

    async fn close<'a>(_connection: MockConnection)
    where
        Self: 'a,
    {
    }
}
