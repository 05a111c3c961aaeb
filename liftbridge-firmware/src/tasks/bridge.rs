//! Bridge relay task
//!
//! Runs the relay loop for the lifetime of the firmware and mirrors every
//! relayed frame to the console.

use defmt::*;
use embassy_time::Delay;

use liftbridge_core::config::BridgeTiming;
use liftbridge_core::{Bridge, Direction, RelayObserver};
use liftbridge_hal_rp2040::SerialError;
use liftbridge_protocol::HexPreview;

use super::Links;

/// Logs relayed frames as a truncated hex preview
struct ConsoleObserver;

impl RelayObserver for ConsoleObserver {
    fn relayed(&mut self, direction: Direction, frame: &[u8]) {
        let preview = HexPreview::new(frame);
        if preview.is_truncated() {
            debug!("{}: {} ... ({} bytes)", direction, preview, frame.len());
        } else {
            debug!("{}: {}", direction, preview);
        }
    }

    fn failed(&mut self, direction: Direction, error: SerialError) {
        warn!("{}: serial error {}, frame skipped", direction, error);
    }
}

/// Bridge task - relays lift <-> remote forever
#[embassy_executor::task]
pub async fn bridge_task(links: &'static Links, timing: BridgeTiming) -> ! {
    info!(
        "Bridge task started (read timeout {}ms, idle {}ms)",
        timing.read_timeout_ms, timing.idle_delay_ms
    );

    let mut bridge = Bridge::new(links, timing);
    bridge.run(&mut Delay, &mut ConsoleObserver).await
}
