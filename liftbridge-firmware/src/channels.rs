//! Inter-task communication
//!
//! The network task owns the Wi-Fi link state and publishes every change
//! here. The control task waits on it to open and close its listener.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::watch::Watch;

use liftbridge_core::LinkState;

/// Number of tasks allowed to follow the link state
const LINK_STATE_RECEIVERS: usize = 1;

/// Current Wi-Fi link state (updated by the network task)
pub static LINK_STATE: Watch<CriticalSectionRawMutex, LinkState, LINK_STATE_RECEIVERS> =
    Watch::new();
