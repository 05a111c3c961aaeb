//! Minimal TOML parser for bridge configuration
//!
//! Handles only the subset `bridge.toml` uses, without an allocator. It is
//! NOT a general TOML parser.
//!
//! Supported:
//! - `[section]` headers: `lift`, `remote`, `bridge`, `network`
//! - `key = value` with integer or double-quoted string values
//! - Comments (`# ...`), outside of strings
//!
//! NOT supported:
//! - Escapes inside strings
//! - Floats, booleans, arrays, inline tables
//! - Dotted keys

use heapless::String;

use liftbridge_hal::{DataBits, FlowControl, Parity, StopBits};

use super::types::{BridgeConfig, ConfigError, EndpointConfig};

/// Highest GPIO number on the RP2040
const MAX_GPIO: u32 = 29;

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Lift,
    Remote,
    Bridge,
    Network,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Value<'a> {
    Int(u32),
    Str(&'a str),
}

impl<'a> Value<'a> {
    fn parse(raw: &'a str) -> Result<Self, ConfigError> {
        if let Some(inner) = raw.strip_prefix('"') {
            let inner = inner.strip_suffix('"').ok_or(ConfigError::InvalidValue)?;
            if inner.contains('"') {
                return Err(ConfigError::InvalidValue);
            }
            return Ok(Value::Str(inner));
        }
        raw.parse::<u32>()
            .map(Value::Int)
            .map_err(|_| ConfigError::InvalidValue)
    }

    fn int(self) -> Result<u32, ConfigError> {
        match self {
            Value::Int(n) => Ok(n),
            Value::Str(_) => Err(ConfigError::InvalidValue),
        }
    }

    fn str(self) -> Result<&'a str, ConfigError> {
        match self {
            Value::Str(s) => Ok(s),
            Value::Int(_) => Err(ConfigError::InvalidValue),
        }
    }

    fn pin(self) -> Result<u8, ConfigError> {
        let n = self.int()?;
        if n > MAX_GPIO {
            return Err(ConfigError::InvalidValue);
        }
        Ok(n as u8)
    }
}

/// Parse TOML configuration into a [`BridgeConfig`]
///
/// Keys that are absent keep their defaults. The result is not validated;
/// call [`BridgeConfig::validate`] before bringing hardware up.
pub fn parse_config(input: &str) -> Result<BridgeConfig, ConfigError> {
    let mut config = BridgeConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = strip_comment(line).trim();

        // Skip empty lines and comments
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let name = header.strip_suffix(']').ok_or(ConfigError::InvalidSection)?;
            section = parse_section_header(name.trim())?;
            continue;
        }

        let (key, raw) = line.split_once('=').ok_or(ConfigError::InvalidValue)?;
        let key = key.trim();
        let value = Value::parse(raw.trim())?;

        match section {
            Section::Root => return Err(ConfigError::UnknownKey),
            Section::Lift => apply_endpoint(&mut config.lift, key, value)?,
            Section::Remote => apply_endpoint(&mut config.remote, key, value)?,
            Section::Bridge => apply_bridge(&mut config, key, value)?,
            Section::Network => apply_network(&mut config, key, value)?,
        }
    }

    Ok(config)
}

fn parse_section_header(name: &str) -> Result<Section, ConfigError> {
    match name {
        "lift" => Ok(Section::Lift),
        "remote" => Ok(Section::Remote),
        "bridge" => Ok(Section::Bridge),
        "network" => Ok(Section::Network),
        _ => Err(ConfigError::InvalidSection),
    }
}

/// Drop a trailing `# comment`, ignoring `#` inside a quoted string
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

fn apply_endpoint(ep: &mut EndpointConfig, key: &str, value: Value<'_>) -> Result<(), ConfigError> {
    match key {
        "baudrate" => ep.uart.baudrate = value.int()?,
        "data_bits" => {
            ep.uart.data_bits = DataBits::from_count(value.int()?).ok_or(ConfigError::InvalidValue)?
        }
        "parity" => ep.uart.parity = Parity::from_name(value.str()?).ok_or(ConfigError::InvalidValue)?,
        "stop_bits" => {
            ep.uart.stop_bits = StopBits::from_count(value.int()?).ok_or(ConfigError::InvalidValue)?
        }
        "flow_control" => {
            ep.uart.flow_control =
                FlowControl::from_name(value.str()?).ok_or(ConfigError::InvalidValue)?
        }
        "tx_pin" => ep.tx_pin = value.pin()?,
        "rx_pin" => ep.rx_pin = value.pin()?,
        "rx_buffer" => ep.rx_buffer = value.int()? as usize,
        _ => return Err(ConfigError::UnknownKey),
    }
    Ok(())
}

fn apply_bridge(config: &mut BridgeConfig, key: &str, value: Value<'_>) -> Result<(), ConfigError> {
    match key {
        "read_timeout_ms" => config.bridge.read_timeout_ms = value.int()?,
        "idle_delay_ms" => config.bridge.idle_delay_ms = value.int()?,
        _ => return Err(ConfigError::UnknownKey),
    }
    Ok(())
}

fn apply_network(config: &mut BridgeConfig, key: &str, value: Value<'_>) -> Result<(), ConfigError> {
    let net = &mut config.network;
    match key {
        "ssid" => net.ssid = bounded(value.str()?)?,
        "passphrase" => net.passphrase = bounded(value.str()?)?,
        "http_port" => {
            net.http_port = u16::try_from(value.int()?).map_err(|_| ConfigError::InvalidValue)?
        }
        "retry_delay_ms" => net.retry_delay_ms = value.int()?,
        _ => return Err(ConfigError::UnknownKey),
    }
    Ok(())
}

fn bounded<const N: usize>(s: &str) -> Result<String<N>, ConfigError> {
    let mut out = String::new();
    out.push_str(s).map_err(|_| ConfigError::TooLong)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
# Lift bridge configuration

[lift]
baudrate = 9600
data_bits = 8
parity = "none"
stop_bits = 1
flow_control = "none"
tx_pin = 16
rx_pin = 17
rx_buffer = 1024

[remote]
tx_pin = 8   # UART1
rx_pin = 9

[bridge]
read_timeout_ms = 20
idle_delay_ms = 10

[network]
ssid = "living#room"
passphrase = "hunter22"
http_port = 8080
"#;

    #[test]
    fn test_parse_sample() {
        let config = parse_config(SAMPLE).unwrap();
        assert_eq!(config.lift, EndpointConfig::lift());
        assert_eq!(config.remote, EndpointConfig::remote());
        assert_eq!(config.network.ssid.as_str(), "living#room");
        assert_eq!(config.network.passphrase.as_str(), "hunter22");
        assert_eq!(config.network.http_port, 8080);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_empty_input_gives_defaults() {
        assert_eq!(parse_config("").unwrap(), BridgeConfig::default());
    }

    #[test]
    fn test_framing_keys() {
        let config = parse_config("[remote]\nparity = \"even\"\nstop_bits = 2\ndata_bits = 7\n").unwrap();
        assert_eq!(config.remote.uart.parity, Parity::Even);
        assert_eq!(config.remote.uart.stop_bits, StopBits::Two);
        assert_eq!(config.remote.uart.data_bits, DataBits::Seven);
        assert_eq!(config.lift.uart.parity, Parity::None);
    }

    #[test]
    fn test_unknown_section() {
        assert_eq!(parse_config("[display]\n"), Err(ConfigError::InvalidSection));
        assert_eq!(parse_config("[lift\n"), Err(ConfigError::InvalidSection));
    }

    #[test]
    fn test_key_outside_section() {
        assert_eq!(parse_config("baudrate = 9600\n"), Err(ConfigError::UnknownKey));
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(parse_config("[lift]\nspeed = 3\n"), Err(ConfigError::UnknownKey));
    }

    #[test]
    fn test_bad_values() {
        assert_eq!(parse_config("[lift]\nbaudrate = \"fast\"\n"), Err(ConfigError::InvalidValue));
        assert_eq!(parse_config("[lift]\ntx_pin = 30\n"), Err(ConfigError::InvalidValue));
        assert_eq!(parse_config("[lift]\nparity = \"mark\"\n"), Err(ConfigError::InvalidValue));
        assert_eq!(parse_config("[lift]\nbaudrate = -1\n"), Err(ConfigError::InvalidValue));
        assert_eq!(parse_config("[network]\nssid = \"open\n"), Err(ConfigError::InvalidValue));
        assert_eq!(parse_config("[network]\nhttp_port = 70000\n"), Err(ConfigError::InvalidValue));
        assert_eq!(parse_config("[bridge]\nidle_delay_ms\n"), Err(ConfigError::InvalidValue));
    }

    #[test]
    fn test_ssid_too_long() {
        let input = "[network]\nssid = \"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa\"\n";
        assert_eq!(parse_config(input), Err(ConfigError::TooLong));
    }

    #[test]
    fn test_strip_comment() {
        assert_eq!(strip_comment("a = 1 # note"), "a = 1 ");
        assert_eq!(strip_comment("s = \"x#y\" # note"), "s = \"x#y\" ");
        assert_eq!(strip_comment("# whole line"), "");
    }
}
