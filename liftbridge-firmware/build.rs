//! Build script for liftbridge-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates bridge.toml at compile time
//! - Checks that the CYW43 firmware blobs are present

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Blobs `include_bytes!`-ed by the radio bring-up
const CYW43_BLOBS: [&str; 2] = ["cyw43-firmware/43439A0.bin", "cyw43-firmware/43439A0_clm.bin"];

/// Largest receive buffer the bridge accepts per endpoint
const MAX_RX_BUFFER: u32 = 1024;

fn main() {
    setup_linker();
    validate_config();
    check_radio_firmware();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BridgeToml {
    lift: Option<EndpointToml>,
    remote: Option<EndpointToml>,
    bridge: Option<TimingToml>,
    network: NetworkToml,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EndpointToml {
    baudrate: Option<u32>,
    data_bits: Option<u32>,
    parity: Option<String>,
    stop_bits: Option<u32>,
    flow_control: Option<String>,
    tx_pin: Option<u8>,
    rx_pin: Option<u8>,
    rx_buffer: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TimingToml {
    read_timeout_ms: Option<u32>,
    #[allow(dead_code)]
    idle_delay_ms: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NetworkToml {
    ssid: String,
    passphrase: Option<String>,
    http_port: Option<u16>,
    #[allow(dead_code)]
    retry_delay_ms: Option<u32>,
}

/// Validate bridge.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=bridge.toml");

    let config_path = Path::new("bridge.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: bridge.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware compiles its configuration in from bridge.toml.    ║\n\
            ║  Create one in the liftbridge-firmware directory.                ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => panic!("{}", boxed("Failed to read bridge.toml", &[e.to_string()])),
    };

    let config: BridgeToml = match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            let lines: Vec<String> = e.to_string().lines().map(str::to_string).collect();
            panic!("{}", boxed("Invalid bridge.toml", &lines));
        }
    };

    let mut errors = Vec::new();
    let lift_pins = check_endpoint("lift", config.lift.as_ref(), (16, 17), &mut errors);
    let remote_pins = check_endpoint("remote", config.remote.as_ref(), (8, 9), &mut errors);

    let lift = [lift_pins.0, lift_pins.1];
    if lift.contains(&remote_pins.0) || lift.contains(&remote_pins.1) {
        errors.push("[lift] and [remote] share a pin".to_string());
    }

    if let Some(timing) = &config.bridge {
        if timing.read_timeout_ms == Some(0) {
            errors.push("[bridge] read_timeout_ms must be non-zero".to_string());
        }
    }

    let net = &config.network;
    if net.ssid.is_empty() {
        errors.push("[network] ssid is required".to_string());
    } else if net.ssid.len() > 32 {
        errors.push("[network] ssid is longer than 32 bytes".to_string());
    }
    if net.passphrase.as_ref().is_some_and(|p| p.len() > 64) {
        errors.push("[network] passphrase is longer than 64 bytes".to_string());
    }
    if net.http_port == Some(0) {
        errors.push("[network] http_port must be non-zero".to_string());
    }

    if !errors.is_empty() {
        panic!("{}", boxed("Invalid bridge.toml configuration", &errors));
    }

    if net.ssid == "YOUR_WIFI_SSID" {
        println!("cargo:warning=bridge.toml still has the placeholder SSID");
    }
    println!("cargo:warning=bridge.toml validated successfully");
}

/// Check one endpoint section and return its effective pin pair
fn check_endpoint(
    name: &str,
    section: Option<&EndpointToml>,
    default_pins: (u8, u8),
    errors: &mut Vec<String>,
) -> (u8, u8) {
    let Some(ep) = section else {
        return default_pins;
    };

    if ep.baudrate == Some(0) {
        errors.push(format!("[{}] baudrate must be non-zero", name));
    }
    if let Some(bits) = ep.data_bits {
        if !(5..=8).contains(&bits) {
            errors.push(format!("[{}] data_bits must be 5-8", name));
        }
    }
    if let Some(parity) = &ep.parity {
        if !["none", "even", "odd"].contains(&parity.as_str()) {
            errors.push(format!("[{}] parity must be 'none', 'even', or 'odd'", name));
        }
    }
    if let Some(stop) = ep.stop_bits {
        if stop != 1 && stop != 2 {
            errors.push(format!("[{}] stop_bits must be 1 or 2", name));
        }
    }
    if let Some(flow) = &ep.flow_control {
        if flow != "none" {
            errors.push(format!("[{}] flow_control must be 'none' on this board", name));
        }
    }
    if let Some(size) = ep.rx_buffer {
        if size == 0 || size > MAX_RX_BUFFER {
            errors.push(format!("[{}] rx_buffer must be 1-{}", name, MAX_RX_BUFFER));
        }
    }

    let pins = (ep.tx_pin.unwrap_or(default_pins.0), ep.rx_pin.unwrap_or(default_pins.1));
    if pins != default_pins {
        errors.push(format!(
            "[{}] pins must be tx={} rx={} to match the board wiring",
            name, default_pins.0, default_pins.1
        ));
    }
    pins
}

/// Make sure the radio firmware can be embedded
fn check_radio_firmware() {
    let missing: Vec<String> = CYW43_BLOBS
        .iter()
        .filter(|blob| {
            println!("cargo:rerun-if-changed={}", blob);
            !Path::new(blob).exists()
        })
        .map(|blob| format!("missing {}", blob))
        .collect();

    if !missing.is_empty() {
        let mut lines = missing;
        lines.push(String::new());
        lines.push("Copy 43439A0.bin and 43439A0_clm.bin from the".to_string());
        lines.push("embassy repository (cyw43-firmware/) into this crate.".to_string());
        panic!("{}", boxed("CYW43 firmware blobs not found", &lines));
    }
}

/// Render an error box like the rest of the build diagnostics
fn boxed(title: &str, lines: &[String]) -> String {
    let body = lines
        .iter()
        .map(|line| {
            let truncated = if line.chars().count() > 62 {
                format!("{}...", line.chars().take(59).collect::<String>())
            } else {
                line.to_string()
            };
            format!("║  • {:<62} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title, body
    )
}
