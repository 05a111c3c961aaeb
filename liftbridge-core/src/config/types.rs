//! Configuration type definitions

use heapless::String;

use liftbridge_hal::UartConfig;

use crate::link::FRAME_CAPACITY;

/// Maximum SSID length
pub const MAX_SSID_LEN: usize = 32;

/// Maximum WPA2 passphrase length
pub const MAX_PASSPHRASE_LEN: usize = 64;

/// Default receive buffer per endpoint
pub const DEFAULT_RX_BUFFER: usize = 1024;

/// Default bridge read timeout
pub const DEFAULT_READ_TIMEOUT_MS: u32 = 20;

/// Default bridge idle delay between iterations
pub const DEFAULT_IDLE_DELAY_MS: u32 = 10;

/// Default control interface port
pub const DEFAULT_HTTP_PORT: u16 = 80;

/// Default delay before retrying a failed join
pub const DEFAULT_RETRY_DELAY_MS: u32 = 5000;

/// Configuration errors
///
/// Any of these at boot is a startup failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Key not valid in its section
    UnknownKey,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// String value exceeds its capacity
    TooLong,
    /// Baud rate of zero
    InvalidBaudrate,
    /// Receive buffer empty or larger than a frame
    InvalidBufferSize,
    /// A pin is used twice
    PinConflict,
    /// Read timeout of zero
    InvalidTiming,
    /// No SSID given
    MissingSsid,
    /// Port zero
    InvalidPort,
}

/// One serial endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EndpointConfig {
    /// Line framing
    pub uart: UartConfig,
    /// TX GPIO
    pub tx_pin: u8,
    /// RX GPIO
    pub rx_pin: u8,
    /// Receive buffer capacity in bytes
    pub rx_buffer: usize,
}

impl EndpointConfig {
    /// Lift controller line: UART0 on GPIO16 (TX) / GPIO17 (RX)
    pub fn lift() -> Self {
        Self {
            uart: UartConfig::default(),
            tx_pin: 16,
            rx_pin: 17,
            rx_buffer: DEFAULT_RX_BUFFER,
        }
    }

    /// Wired remote line: UART1 on GPIO8 (TX) / GPIO9 (RX)
    pub fn remote() -> Self {
        Self {
            uart: UartConfig::default(),
            tx_pin: 8,
            rx_pin: 9,
            rx_buffer: DEFAULT_RX_BUFFER,
        }
    }

    /// Size of the driver's receive ring (double-buffered)
    pub fn driver_rx_len(&self) -> usize {
        self.rx_buffer * 2
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.uart.baudrate == 0 {
            return Err(ConfigError::InvalidBaudrate);
        }
        if self.rx_buffer == 0 || self.rx_buffer > FRAME_CAPACITY {
            return Err(ConfigError::InvalidBufferSize);
        }
        if self.tx_pin == self.rx_pin {
            return Err(ConfigError::PinConflict);
        }
        Ok(())
    }

    fn shares_pin_with(&self, other: &EndpointConfig) -> bool {
        let mine = [self.tx_pin, self.rx_pin];
        mine.contains(&other.tx_pin) || mine.contains(&other.rx_pin)
    }
}

/// Bridge loop timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BridgeTiming {
    /// Upper bound on each endpoint read
    pub read_timeout_ms: u32,
    /// Sleep between iterations
    pub idle_delay_ms: u32,
}

impl Default for BridgeTiming {
    fn default() -> Self {
        Self {
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            idle_delay_ms: DEFAULT_IDLE_DELAY_MS,
        }
    }
}

/// Wi-Fi station and control interface settings
///
/// Holds the passphrase, so it has no `defmt::Format` impl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub ssid: String<MAX_SSID_LEN>,
    pub passphrase: String<MAX_PASSPHRASE_LEN>,
    /// TCP port of the control interface
    pub http_port: u16,
    /// Wait before rejoining after a failure or link loss
    pub retry_delay_ms: u32,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            ssid: String::new(),
            passphrase: String::new(),
            http_port: DEFAULT_HTTP_PORT,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
        }
    }
}

/// Complete bridge configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    pub lift: EndpointConfig,
    pub remote: EndpointConfig,
    pub bridge: BridgeTiming,
    pub network: NetworkConfig,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            lift: EndpointConfig::lift(),
            remote: EndpointConfig::remote(),
            bridge: BridgeTiming::default(),
            network: NetworkConfig::default(),
        }
    }
}

impl BridgeConfig {
    /// Check that the configuration can be brought up
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.lift.validate()?;
        self.remote.validate()?;
        if self.lift.shares_pin_with(&self.remote) {
            return Err(ConfigError::PinConflict);
        }
        if self.bridge.read_timeout_ms == 0 {
            return Err(ConfigError::InvalidTiming);
        }
        if self.network.ssid.is_empty() {
            return Err(ConfigError::MissingSsid);
        }
        if self.network.http_port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        Ok(())
    }
}
