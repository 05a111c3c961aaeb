//! Control interface contract
//!
//! Maps an HTTP request for `/cmd` onto the dispatcher and renders the JSON
//! reply. Sockets and network bring-up live in the firmware, behind the
//! [`Acceptor`] trait; this module serves whatever connections it yields.
//!
//! ```text
//! GET /cmd?action=up&type=press   -> 200 {"status":"Up pressed"}
//! GET /cmd?action=pos4            -> 200 {"status":"Position 4"}
//! GET /cmd?action=foo             -> 400 {"error":"Invalid command"}
//! ```

use core::fmt::{self, Write as _};
use core::future::Future;
use core::pin::pin;

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_io_async::{Error as _, ErrorKind, Read, Write};
use heapless::String;

use liftbridge_hal::{UartRx, UartTx};

use crate::dispatch::{DispatchError, Dispatcher};

/// Path of the command endpoint
pub const COMMAND_PATH: &str = "/cmd";

/// Capacity of a response body
pub const MAX_BODY_LEN: usize = 64;

/// Largest request head accepted
pub const HEAD_BUF_SIZE: usize = 512;

/// Encoded response buffer
pub const RESPONSE_BUF_SIZE: usize = 256;

/// Request method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Method {
    Get,
    Other,
}

/// Request head is not a usable HTTP/1.x request line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RequestError {
    /// Request line is not terminated yet
    Incomplete,
    /// Request line is not valid UTF-8
    NotUtf8,
    /// Request line does not have method, target and version
    Malformed,
}

/// Parsed request line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request<'a> {
    pub method: Method,
    pub path: &'a str,
    pub query: Option<&'a str>,
}

/// Parse the request line out of a received request head
pub fn parse_request_head(head: &[u8]) -> Result<Request<'_>, RequestError> {
    let end = head
        .windows(2)
        .position(|w| w == b"\r\n")
        .ok_or(RequestError::Incomplete)?;
    let line = core::str::from_utf8(&head[..end]).map_err(|_| RequestError::NotUtf8)?;

    let mut parts = line.split(' ').filter(|p| !p.is_empty());
    let (method, target, version) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(m), Some(t), Some(v), None) => (m, t, v),
        _ => return Err(RequestError::Malformed),
    };
    if !version.starts_with("HTTP/1.") || !target.starts_with('/') {
        return Err(RequestError::Malformed);
    }

    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (target, None),
    };

    Ok(Request {
        method: if method == "GET" { Method::Get } else { Method::Other },
        path,
        query,
    })
}

/// First value for `key` in an `a=b&c=d` query string
///
/// A key present without `=` yields an empty value.
pub fn query_value<'a>(query: &'a str, key: &str) -> Option<&'a str> {
    query.split('&').find_map(|pair| match pair.split_once('=') {
        Some((k, v)) if k == key => Some(v),
        None if pair == key => Some(""),
        _ => None,
    })
}

/// Response status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    Ok,
    BadRequest,
    NotFound,
    MethodNotAllowed,
    ServiceUnavailable,
}

impl Status {
    pub const fn code(&self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::BadRequest => 400,
            Status::NotFound => 404,
            Status::MethodNotAllowed => 405,
            Status::ServiceUnavailable => 503,
        }
    }

    pub const fn reason(&self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::BadRequest => "Bad Request",
            Status::NotFound => "Not Found",
            Status::MethodNotAllowed => "Method Not Allowed",
            Status::ServiceUnavailable => "Service Unavailable",
        }
    }
}

/// Output buffer too small for the encoded response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BufferTooSmall;

/// JSON response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: Status,
    pub body: String<MAX_BODY_LEN>,
}

impl Response {
    /// `200 {"status":"<label>"}`
    pub fn success(label: &str) -> Self {
        Self::json(Status::Ok, "status", label)
    }

    /// `<status> {"error":"<message>"}`
    pub fn error(status: Status, message: &str) -> Self {
        Self::json(status, "error", message)
    }

    fn json(status: Status, key: &str, value: &str) -> Self {
        let mut body = String::new();
        // Labels and messages are short ASCII constants, well under capacity
        let _ = write!(body, "{{\"{}\":\"{}\"}}", key, value);
        Self { status, body }
    }

    /// Render the full HTTP response into `out`
    ///
    /// Returns the number of bytes written.
    pub fn encode(&self, out: &mut [u8]) -> Result<usize, BufferTooSmall> {
        let mut w = SliceWriter { buf: out, len: 0 };
        write!(
            w,
            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status.code(),
            self.status.reason(),
            self.body.len(),
            self.body
        )
        .map_err(|_| BufferTooSmall)?;
        Ok(w.len)
    }
}

struct SliceWriter<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl fmt::Write for SliceWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let end = self.len + s.len();
        if end > self.buf.len() {
            return Err(fmt::Error);
        }
        self.buf[self.len..end].copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }
}

/// Serve one request against the dispatcher
///
/// Unrecognized commands are answered with 400 and never reach the serial
/// line.
pub async fn handle_request<M, Rx, Tx>(
    request: &Request<'_>,
    dispatcher: &Dispatcher<'_, M, Rx, Tx>,
) -> Response
where
    M: RawMutex,
    Rx: UartRx,
    Tx: UartTx,
{
    if request.path != COMMAND_PATH {
        return Response::error(Status::NotFound, "Not found");
    }
    if request.method != Method::Get {
        return Response::error(Status::MethodNotAllowed, "Method not allowed");
    }

    let query = request.query.unwrap_or("");
    let action = query_value(query, "action").unwrap_or("");
    let subtype = query_value(query, "type");

    match dispatcher.dispatch(action, subtype).await {
        Ok(dispatched) => Response::success(dispatched.label()),
        Err(DispatchError::UnrecognizedCommand) => {
            Response::error(Status::BadRequest, "Invalid command")
        }
        Err(DispatchError::Transmit(_)) => {
            Response::error(Status::ServiceUnavailable, "Serial write failed")
        }
    }
}

/// A connection ended without a response being sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServeError {
    /// Peer closed before the request head was complete
    Closed,
    /// Response did not fit the output buffer
    BufferTooSmall,
    /// Transport error
    Io(ErrorKind),
}

/// Source of control connections
#[allow(async_fn_in_trait)]
pub trait Acceptor {
    type Connection<'a>: Read + Write
    where
        Self: 'a;

    type Error;

    /// Wait for the next client
    async fn accept(&mut self) -> Result<Self::Connection<'_>, Self::Error>;

    /// Shut down a served connection
    async fn close<'a>(connection: Self::Connection<'a>)
    where
        Self: 'a;
}

/// Read until the blank line that ends the request head
///
/// `Ok(None)` means the head did not fit in `buf`.
async fn read_head<C: Read>(conn: &mut C, buf: &mut [u8]) -> Result<Option<usize>, ServeError> {
    let mut len = 0;
    loop {
        if len == buf.len() {
            return Ok(None);
        }
        let n = conn
            .read(&mut buf[len..])
            .await
            .map_err(|e| ServeError::Io(e.kind()))?;
        if n == 0 {
            return Err(ServeError::Closed);
        }
        len += n;
        if buf[..len].windows(4).any(|w| w == b"\r\n\r\n") {
            return Ok(Some(len));
        }
    }
}

/// Answer one request on an accepted connection
///
/// Returns the status that was sent.
pub async fn serve_connection<C, M, Rx, Tx>(
    conn: &mut C,
    dispatcher: &Dispatcher<'_, M, Rx, Tx>,
    head: &mut [u8],
    out: &mut [u8],
) -> Result<Status, ServeError>
where
    C: Read + Write,
    M: RawMutex,
    Rx: UartRx,
    Tx: UartTx,
{
    let response = match read_head(conn, head).await? {
        Some(len) => match parse_request_head(&head[..len]) {
            Ok(request) => handle_request(&request, dispatcher).await,
            Err(_) => Response::error(Status::BadRequest, "Malformed request"),
        },
        None => Response::error(Status::BadRequest, "Request too large"),
    };

    let len = response.encode(out).map_err(|_| ServeError::BufferTooSmall)?;
    conn.write_all(&out[..len])
        .await
        .map_err(|e| ServeError::Io(e.kind()))?;
    conn.flush().await.map_err(|e| ServeError::Io(e.kind()))?;
    Ok(response.status)
}

/// Serve connections one at a time until `shutdown` resolves
///
/// Only the wait for a client races `shutdown`. A connection that has been
/// accepted is always served and closed, so a command is never cut off
/// part-way onto the lift line. `on_served` sees the outcome of each one.
pub async fn run_listener<A, M, Rx, Tx, S, F>(
    acceptor: &mut A,
    dispatcher: &Dispatcher<'_, M, Rx, Tx>,
    shutdown: S,
    mut on_served: F,
) -> S::Output
where
    A: Acceptor,
    M: RawMutex,
    Rx: UartRx,
    Tx: UartTx,
    S: Future,
    F: FnMut(Result<Status, ServeError>),
{
    let mut shutdown = pin!(shutdown);
    let mut head = [0u8; HEAD_BUF_SIZE];
    let mut out = [0u8; RESPONSE_BUF_SIZE];

    loop {
        let mut conn = match select(acceptor.accept(), shutdown.as_mut()).await {
            Either::First(Ok(conn)) => conn,
            Either::First(Err(_)) => continue,
            Either::Second(reason) => return reason,
        };

        let result = serve_connection(&mut conn, dispatcher, &mut head, &mut out).await;
        A::close(conn).await;
        on_served(result);
    }
}
