//! HTTP control listener
//!
//! Accepts one connection at a time on the configured port and answers
//! through the core control contract. The listener only runs while the
//! Wi-Fi link is `Connected`; a link drop stops it between connections.

use defmt::*;
use embassy_net::tcp::{AcceptError, TcpSocket};
use embassy_net::Stack;
use embassy_time::Duration;
use embedded_io_async::Write;

use liftbridge_core::control::{run_listener, Acceptor};

use super::LiftDispatcher;
use crate::channels::LINK_STATE;

/// Socket buffer sizes
const SOCKET_BUF_SIZE: usize = 1024;

/// Idle connection timeout
const SOCKET_TIMEOUT: Duration = Duration::from_secs(10);

/// Opens a fresh TCP socket per client over shared buffers
struct TcpAcceptor<'b> {
    stack: Stack<'static>,
    port: u16,
    rx: &'b mut [u8],
    tx: &'b mut [u8],
}

impl<'b> Acceptor for TcpAcceptor<'b> {
    type Connection<'a>
        = TcpSocket<'a>
    where
        Self: 'a;

    type Error = AcceptError;

    async fn accept(&mut self) -> Result<TcpSocket<'_>, AcceptError> {
        let mut socket = TcpSocket::new(self.stack, &mut *self.rx, &mut *self.tx);
        socket.set_timeout(Some(SOCKET_TIMEOUT));

        if let Err(e) = socket.accept(self.port).await {
            warn!("Accept failed: {}", e);
            return Err(e);
        }
        Ok(socket)
    }

    async fn close<'a>(mut connection: TcpSocket<'a>)
    where
        Self: 'a,
    {
        connection.close();
        let _ = connection.flush().await;
    }
}

/// Control task - serves `/cmd` while the link is up
#[embassy_executor::task]
pub async fn control_task(stack: Stack<'static>, dispatcher: LiftDispatcher, port: u16) -> ! {
    info!("Control task started");

    let mut link = unwrap!(LINK_STATE.receiver());
    let mut rx_buffer = [0u8; SOCKET_BUF_SIZE];
    let mut tx_buffer = [0u8; SOCKET_BUF_SIZE];

    loop {
        link.changed_and(|state| state.listener_enabled()).await;
        info!("Control listener up on port {}", port);

        let mut acceptor = TcpAcceptor {
            stack,
            port,
            rx: &mut rx_buffer,
            tx: &mut tx_buffer,
        };
        let down = link.changed_and(|state| !state.listener_enabled());
        let state = run_listener(&mut acceptor, &dispatcher, down, |result| match result {
            Ok(status) => info!("Request answered {}", status.code()),
            Err(e) => debug!("Connection dropped: {}", e),
        })
        .await;
        info!("Control listener down ({})", state);
    }
}
