//! Wi-Fi join/rejoin task
//!
//! Drives the core `LinkState` machine from radio and stack events and
//! publishes each new state to `LINK_STATE`.

use cyw43::JoinOptions;
use defmt::*;
use embassy_net::Stack;
use embassy_time::{with_timeout, Duration, Timer};

use liftbridge_core::config::NetworkConfig;
use liftbridge_core::{LinkEvent, LinkState};

use crate::channels::LINK_STATE;

/// Upper bound on waiting for a DHCP lease after association
const ADDRESS_TIMEOUT_S: u64 = 30;

/// Network task - keeps the station joined, forever
#[embassy_executor::task]
pub async fn network_task(
    mut control: cyw43::Control<'static>,
    stack: Stack<'static>,
    config: &'static NetworkConfig,
) -> ! {
    info!("Network task started");

    let sender = LINK_STATE.sender();
    let mut state = LinkState::Disconnected;
    sender.send(state);

    loop {
        let event = match state {
            LinkState::Disconnected => LinkEvent::Start,
            LinkState::Connecting => join(&mut control, stack, config).await,
            LinkState::Connected => {
                stack.wait_link_down().await;
                warn!("Wi-Fi link lost");
                LinkEvent::LinkLost
            }
            LinkState::Reconnecting => {
                Timer::after_millis(config.retry_delay_ms as u64).await;
                LinkEvent::RetryElapsed
            }
        };

        let next = state.transition(event);
        if next != state {
            debug!("Link {} -> {} on {}", state, next, event);
            state = next;
            sender.send(state);
        }
    }
}

/// One join attempt, through to an acquired address
async fn join(control: &mut cyw43::Control<'static>, stack: Stack<'static>, config: &NetworkConfig) -> LinkEvent {
    info!("Joining \"{}\"", config.ssid.as_str());

    let options = if config.passphrase.is_empty() {
        JoinOptions::new_open()
    } else {
        JoinOptions::new(config.passphrase.as_bytes())
    };

    if let Err(e) = control.join(config.ssid.as_str(), options).await {
        warn!("Join failed with status {}", e.status);
        return LinkEvent::JoinFailed;
    }

    match with_timeout(Duration::from_secs(ADDRESS_TIMEOUT_S), stack.wait_config_up()).await {
        Ok(()) => {
            if let Some(v4) = stack.config_v4() {
                info!("Connected, address {}", v4.address);
            }
            LinkEvent::Joined
        }
        Err(_) => {
            warn!("No address after {}s, leaving", ADDRESS_TIMEOUT_S);
            control.leave().await;
            LinkEvent::JoinFailed
        }
    }
}
