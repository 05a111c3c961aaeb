//! Embassy async tasks
//!
//! Each task runs independently and shares state through the link manager
//! or the channels module.

pub mod bridge;
pub mod control;
pub mod net;
pub mod network;

pub use bridge::bridge_task;
pub use control::control_task;
pub use net::{cyw43_task, net_task};
pub use network::network_task;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use liftbridge_core::{Dispatcher, LinkManager};
use liftbridge_hal_rp2040::{SerialRx, SerialTx};

/// The firmware's serial link manager
pub type Links = LinkManager<CriticalSectionRawMutex, SerialRx, SerialTx>;

/// Dispatcher over the firmware's link manager
pub type LiftDispatcher = Dispatcher<'static, CriticalSectionRawMutex, SerialRx, SerialTx>;
