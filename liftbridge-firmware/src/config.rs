//! Configuration loading
//!
//! The configuration is compiled in from `bridge.toml` and parsed by the
//! core's `no_std` parser. The build script has already checked the syntax;
//! this is where the values are validated against the board.

use defmt::*;

use liftbridge_core::config::{parse_config, BridgeConfig, ConfigError, EndpointConfig};
use liftbridge_hal_rp2040::{rp_uart_config, uart_for_pins, PinError, UartId};

use crate::boards;

/// Embedded configuration. Edit bridge.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../bridge.toml");

/// Reasons the firmware cannot start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Format)]
pub enum StartupError {
    Config(ConfigError),
    Pins(PinError),
    /// Pins are valid UART pins but not the ones wired on this board
    Wiring { tx_pin: u8, rx_pin: u8 },
}

impl From<ConfigError> for StartupError {
    fn from(e: ConfigError) -> Self {
        StartupError::Config(e)
    }
}

impl From<PinError> for StartupError {
    fn from(e: PinError) -> Self {
        StartupError::Pins(e)
    }
}

/// Parse and validate the embedded configuration
pub fn load_config() -> Result<BridgeConfig, StartupError> {
    let config = parse_config(EMBEDDED_CONFIG)?;
    config.validate()?;

    check_endpoint(&config.lift, boards::LIFT_UART, (boards::LIFT_TX_PIN, boards::LIFT_RX_PIN))?;
    check_endpoint(
        &config.remote,
        boards::REMOTE_UART,
        (boards::REMOTE_TX_PIN, boards::REMOTE_RX_PIN),
    )?;

    info!(
        "Config: lift {} baud, remote {} baud, ssid \"{}\"",
        config.lift.uart.baudrate,
        config.remote.uart.baudrate,
        config.network.ssid.as_str()
    );
    Ok(config)
}

fn check_endpoint(ep: &EndpointConfig, uart: UartId, wired: (u8, u8)) -> Result<(), StartupError> {
    let routed = uart_for_pins(ep.tx_pin, ep.rx_pin)?;
    rp_uart_config(&ep.uart)?;
    if routed != uart || (ep.tx_pin, ep.rx_pin) != wired {
        return Err(StartupError::Wiring {
            tx_pin: ep.tx_pin,
            rx_pin: ep.rx_pin,
        });
    }
    Ok(())
}
