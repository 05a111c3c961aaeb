//! UART binding and pin routing
//!
//! RP2040 has two UART peripherals (UART0 and UART1), each reachable from a
//! fixed set of GPIOs. This module validates endpoint pin pairs against that
//! routing and wraps the Embassy buffered UART halves in the
//! `liftbridge-hal` serial traits.

use embassy_rp::uart::{
    BufferedUartRx, BufferedUartTx, Config as RpUartConfig, DataBits as RpDataBits,
    Error as RpUartError, Parity as RpParity, StopBits as RpStopBits,
};
use embassy_time::{with_timeout, Duration};
use embedded_io_async::{Read, Write};

use liftbridge_hal::{DataBits, FlowControl, Parity, SerialError, StopBits, UartConfig, UartRx, UartTx};

/// UART peripheral identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartId {
    Uart0,
    Uart1,
}

/// Pin routing or configuration rejected at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin cannot carry UART TX
    NotTxCapable(u8),
    /// Pin cannot carry UART RX
    NotRxCapable(u8),
    /// TX and RX pins belong to different UART peripherals
    MixedPeripherals,
    /// Requested framing is not supported by this binding
    UnsupportedFraming,
}

/// Which UART can drive TX on a given GPIO
///
/// UART0 TX: GPIO 0, 12, 16, 28. UART1 TX: GPIO 4, 8, 20, 24.
pub fn tx_uart(gpio: u8) -> Option<UartId> {
    match gpio {
        0 | 12 | 16 | 28 => Some(UartId::Uart0),
        4 | 8 | 20 | 24 => Some(UartId::Uart1),
        _ => None,
    }
}

/// Which UART can receive RX on a given GPIO
///
/// UART0 RX: GPIO 1, 13, 17, 29. UART1 RX: GPIO 5, 9, 21, 25.
pub fn rx_uart(gpio: u8) -> Option<UartId> {
    match gpio {
        1 | 13 | 17 | 29 => Some(UartId::Uart0),
        5 | 9 | 21 | 25 => Some(UartId::Uart1),
        _ => None,
    }
}

/// Resolve the UART peripheral that serves a TX/RX pin pair
pub fn uart_for_pins(tx_pin: u8, rx_pin: u8) -> Result<UartId, PinError> {
    let tx = tx_uart(tx_pin).ok_or(PinError::NotTxCapable(tx_pin))?;
    let rx = rx_uart(rx_pin).ok_or(PinError::NotRxCapable(rx_pin))?;
    if tx != rx {
        return Err(PinError::MixedPeripherals);
    }
    Ok(tx)
}

/// Convert a bridge UART config into the Embassy UART config
///
/// Hardware flow control is rejected: the lift and remote lines carry only
/// TX/RX.
pub fn rp_uart_config(config: &UartConfig) -> Result<RpUartConfig, PinError> {
    if config.flow_control != FlowControl::None {
        return Err(PinError::UnsupportedFraming);
    }

    let mut cfg = RpUartConfig::default();
    cfg.baudrate = config.baudrate;
    cfg.data_bits = match config.data_bits {
        DataBits::Five => RpDataBits::DataBits5,
        DataBits::Six => RpDataBits::DataBits6,
        DataBits::Seven => RpDataBits::DataBits7,
        DataBits::Eight => RpDataBits::DataBits8,
    };
    cfg.parity = match config.parity {
        Parity::None => RpParity::ParityNone,
        Parity::Even => RpParity::ParityEven,
        Parity::Odd => RpParity::ParityOdd,
    };
    cfg.stop_bits = match config.stop_bits {
        StopBits::One => RpStopBits::STOP1,
        StopBits::Two => RpStopBits::STOP2,
    };
    Ok(cfg)
}

/// Error from the RP2040 UART driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartBusError(pub SerialError);

impl From<RpUartError> for UartBusError {
    fn from(e: RpUartError) -> Self {
        UartBusError(match e {
            RpUartError::Overrun => SerialError::Overrun,
            RpUartError::Break => SerialError::Break,
            RpUartError::Parity => SerialError::Parity,
            RpUartError::Framing => SerialError::Framing,
            _ => SerialError::Other,
        })
    }
}

impl From<UartBusError> for SerialError {
    fn from(e: UartBusError) -> Self {
        e.0
    }
}

/// Receive half of a buffered UART endpoint
pub struct SerialRx {
    inner: BufferedUartRx,
}

impl SerialRx {
    pub fn new(inner: BufferedUartRx) -> Self {
        Self { inner }
    }
}

impl UartRx for SerialRx {
    type Error = UartBusError;

    async fn read_timeout(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize, Self::Error> {
        // Dropping the read on timeout is safe: unread bytes stay in the ring buffer
        match with_timeout(Duration::from_millis(timeout_ms as u64), self.inner.read(buf)).await {
            Ok(Ok(n)) => Ok(n),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Ok(0),
        }
    }
}

/// Transmit half of a buffered UART endpoint
pub struct SerialTx {
    inner: BufferedUartTx,
}

impl SerialTx {
    pub fn new(inner: BufferedUartTx) -> Self {
        Self { inner }
    }
}

impl UartTx for SerialTx {
    type Error = UartBusError;

    async fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.inner.write_all(data).await.map_err(UartBusError::from)
    }
}
