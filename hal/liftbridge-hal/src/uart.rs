//! UART serial communication abstractions
//!
//! Provides async traits for the two serial endpoints of the bridge. Reads are
//! bounded by a timeout so a relay loop can poll both directions without ever
//! blocking indefinitely on an idle line.

/// Default baud rate of the lift controller and its remote
pub const DEFAULT_BAUDRATE: u32 = 9600;

/// Errors reported by a serial endpoint at runtime
///
/// These are transient from the bridge's point of view: the current relay
/// cycle is skipped and the next one starts from the same state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerialError {
    /// Framing error (bad stop bit)
    Framing,
    /// Parity mismatch
    Parity,
    /// Receive FIFO overrun
    Overrun,
    /// Line held low for longer than a frame
    Break,
    /// Transmit path did not accept the data
    WriteFailed,
    /// Other driver error
    Other,
}

/// UART transmitter
#[allow(async_fn_in_trait)]
pub trait UartTx {
    /// Error type for transmit operations
    type Error: Into<SerialError>;

    /// Write all of `data` to the UART, in order
    ///
    /// Returns once every byte has been accepted into the transmit buffer.
    /// It does not wait for the bytes to leave the wire.
    async fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error>;
}

/// UART receiver
#[allow(async_fn_in_trait)]
pub trait UartRx {
    /// Error type for receive operations
    type Error: Into<SerialError>;

    /// Read up to `buf.len()` bytes, waiting at most `timeout_ms`
    ///
    /// Returns `Ok(0)` when the timeout elapses with no data; that is the
    /// normal outcome on an idle line, not an error.
    async fn read_timeout(&mut self, buf: &mut [u8], timeout_ms: u32)
        -> Result<usize, Self::Error>;
}

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
    /// Hardware flow control
    pub flow_control: FlowControl,
}

impl Default for UartConfig {
    /// 9600 8N1, no flow control
    fn default() -> Self {
        Self {
            baudrate: DEFAULT_BAUDRATE,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            flow_control: FlowControl::None,
        }
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Five,
    Six,
    Seven,
    Eight,
}

impl DataBits {
    /// Parse from a bit count
    pub fn from_count(bits: u32) -> Option<Self> {
        match bits {
            5 => Some(DataBits::Five),
            6 => Some(DataBits::Six),
            7 => Some(DataBits::Seven),
            8 => Some(DataBits::Eight),
            _ => None,
        }
    }
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

impl Parity {
    /// Parse from a config name (`none`, `even`, `odd`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "none" => Some(Parity::None),
            "even" => Some(Parity::Even),
            "odd" => Some(Parity::Odd),
            _ => None,
        }
    }
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}

impl StopBits {
    /// Parse from a bit count
    pub fn from_count(bits: u32) -> Option<Self> {
        match bits {
            1 => Some(StopBits::One),
            2 => Some(StopBits::Two),
            _ => None,
        }
    }
}

/// Hardware flow control mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlowControl {
    None,
    RtsCts,
}

impl FlowControl {
    /// Parse from a config name (`none`, `rts_cts`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "none" => Some(FlowControl::None),
            "rts_cts" => Some(FlowControl::RtsCts),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_9600_8n1() {
        let cfg = UartConfig::default();
        assert_eq!(cfg.baudrate, 9600);
        assert_eq!(cfg.data_bits, DataBits::Eight);
        assert_eq!(cfg.parity, Parity::None);
        assert_eq!(cfg.stop_bits, StopBits::One);
        assert_eq!(cfg.flow_control, FlowControl::None);
    }

    #[test]
    fn test_parse_framing_names() {
        assert_eq!(DataBits::from_count(7), Some(DataBits::Seven));
        assert_eq!(DataBits::from_count(9), None);
        assert_eq!(Parity::from_name("odd"), Some(Parity::Odd));
        assert_eq!(Parity::from_name("None"), None);
        assert_eq!(StopBits::from_count(2), Some(StopBits::Two));
        assert_eq!(StopBits::from_count(0), None);
        assert_eq!(FlowControl::from_name("rts_cts"), Some(FlowControl::RtsCts));
    }
}
