//! Liftbridge - Furniture Lift Serial Bridge Firmware
//!
//! Sits between a motorized lift controller and its wired remote on a
//! Raspberry Pi Pico W. Both serial lines are relayed verbatim, and a small
//! HTTP endpoint lets a network client inject remote button presses onto the
//! lift line.
//!
//! ```text
//!   lift controller <-- UART0 --> [ Pico W ] <-- UART1 --> wired remote
//!                                     ^
//!                                     | GET /cmd?action=...
//!                                  Wi-Fi client
//! ```

#![no_std]
#![no_main]

use cyw43_pio::{PioSpi, DEFAULT_CLOCK_DIVIDER};
use defmt::*;
use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, StackResources};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{PIO0, UART0, UART1};
use embassy_rp::pio::{InterruptHandler as PioInterruptHandler, Pio};
use embassy_rp::uart::{BufferedInterruptHandler, BufferedUart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use liftbridge_core::config::{BridgeConfig, NetworkConfig};
use liftbridge_core::{Dispatcher, LinkManager, FRAME_CAPACITY};
use liftbridge_hal_rp2040::{rp_uart_config, SerialRx, SerialTx};

use crate::tasks::Links;

mod boards;
mod channels;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    UART1_IRQ => BufferedInterruptHandler<UART1>;
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
});

/// Driver receive ring per endpoint (double the largest frame)
const DRIVER_RX_LEN: usize = FRAME_CAPACITY * 2;

/// Driver transmit ring per endpoint
const DRIVER_TX_LEN: usize = 256;

/// Sockets: one TCP listener plus DHCP and DNS
const NET_SOCKETS: usize = 4;

// Static cells for UART buffers (must live forever)
static LIFT_TX_BUF: StaticCell<[u8; DRIVER_TX_LEN]> = StaticCell::new();
static LIFT_RX_BUF: StaticCell<[u8; DRIVER_RX_LEN]> = StaticCell::new();
static REMOTE_TX_BUF: StaticCell<[u8; DRIVER_TX_LEN]> = StaticCell::new();
static REMOTE_RX_BUF: StaticCell<[u8; DRIVER_RX_LEN]> = StaticCell::new();

static LINKS: StaticCell<Links> = StaticCell::new();
static NETWORK_CONFIG: StaticCell<NetworkConfig> = StaticCell::new();
static CYW43_STATE: StaticCell<cyw43::State> = StaticCell::new();
static NET_RESOURCES: StaticCell<StackResources<NET_SOCKETS>> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Liftbridge firmware starting...");

    let p = embassy_rp::init(Default::default());

    let BridgeConfig {
        lift,
        remote,
        bridge,
        network,
    } = match config::load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Startup failed: {}", e);
            defmt::panic!("invalid configuration");
        }
    };

    // Both configs passed load_config, so conversion cannot fail here
    let lift_uart_config = unwrap!(rp_uart_config(&lift.uart));
    let remote_uart_config = unwrap!(rp_uart_config(&remote.uart));

    // Lift line: UART0, TX GPIO16 / RX GPIO17
    let lift_rx_buf = LIFT_RX_BUF.init([0u8; DRIVER_RX_LEN]);
    let lift_uart = BufferedUart::new(
        p.UART0,
        p.PIN_16,
        p.PIN_17,
        Irqs,
        LIFT_TX_BUF.init([0u8; DRIVER_TX_LEN]),
        &mut lift_rx_buf[..lift.driver_rx_len()],
        lift_uart_config,
    );
    let (lift_tx, lift_rx) = lift_uart.split();

    // Remote line: UART1, TX GPIO8 / RX GPIO9
    let remote_rx_buf = REMOTE_RX_BUF.init([0u8; DRIVER_RX_LEN]);
    let remote_uart = BufferedUart::new(
        p.UART1,
        p.PIN_8,
        p.PIN_9,
        Irqs,
        REMOTE_TX_BUF.init([0u8; DRIVER_TX_LEN]),
        &mut remote_rx_buf[..remote.driver_rx_len()],
        remote_uart_config,
    );
    let (remote_tx, remote_rx) = remote_uart.split();

    info!("Serial endpoints initialized");

    let links: &'static Links = LINKS.init(LinkManager::new(
        (SerialRx::new(lift_rx), SerialTx::new(lift_tx)),
        (SerialRx::new(remote_rx), SerialTx::new(remote_tx)),
    ));

    // The relay must not wait on the radio
    spawner.spawn(tasks::bridge_task(links, bridge)).unwrap();

    // CYW43 radio over PIO SPI
    let fw = include_bytes!("../cyw43-firmware/43439A0.bin");
    let clm = include_bytes!("../cyw43-firmware/43439A0_clm.bin");

    let pwr = Output::new(p.PIN_23, Level::Low);
    let cs = Output::new(p.PIN_25, Level::High);
    let mut pio = Pio::new(p.PIO0, Irqs);
    let spi = PioSpi::new(
        &mut pio.common,
        pio.sm0,
        DEFAULT_CLOCK_DIVIDER,
        pio.irq0,
        cs,
        p.PIN_24,
        p.PIN_29,
        p.DMA_CH0,
    );

    let state = CYW43_STATE.init(cyw43::State::new());
    let (net_device, mut control, runner) = cyw43::new(state, pwr, spi, fw).await;
    spawner.spawn(tasks::cyw43_task(runner)).unwrap();

    control.init(clm).await;
    control
        .set_power_management(cyw43::PowerManagementMode::PowerSave)
        .await;

    info!("Radio initialized");

    // Seed only feeds TCP sequence numbers and DHCP transaction ids
    let seed = 0x6c69_6674_6272_6467;
    let (stack, net_runner) = embassy_net::new(
        net_device,
        NetConfig::dhcpv4(Default::default()),
        NET_RESOURCES.init(StackResources::new()),
        seed,
    );
    spawner.spawn(tasks::net_task(net_runner)).unwrap();

    let port = network.http_port;
    let network = NETWORK_CONFIG.init(network);

    spawner
        .spawn(tasks::network_task(control, stack, network))
        .unwrap();
    spawner
        .spawn(tasks::control_task(stack, Dispatcher::new(links), port))
        .unwrap();

    info!("All tasks spawned, firmware running");
}
