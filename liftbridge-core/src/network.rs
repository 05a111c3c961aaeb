//! Network link state machine
//!
//! Tracks the station's Wi-Fi association. The control interface listener
//! runs only while the link is `Connected`; every other state keeps it shut.

/// Wi-Fi link states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    /// Radio idle, no join attempted
    Disconnected,
    /// Join and address acquisition in progress
    Connecting,
    /// Associated with an address; listener is up
    Connected,
    /// Link dropped or join failed; waiting out the retry delay
    Reconnecting,
}

/// Events that drive the link state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkEvent {
    /// Bring the link up
    Start,
    /// Associated and an address was acquired
    Joined,
    /// Join attempt failed
    JoinFailed,
    /// Established link went down
    LinkLost,
    /// Retry delay elapsed
    RetryElapsed,
    /// Take the link down
    Stop,
}

impl LinkState {
    /// Whether the control interface listener should be accepting
    pub fn listener_enabled(&self) -> bool {
        matches!(self, LinkState::Connected)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: LinkEvent) -> Self {
        use LinkEvent::*;
        use LinkState::*;

        match (self, event) {
            (_, Stop) => Disconnected,

            (Disconnected, Start) => Connecting,

            (Connecting, Joined) => Connected,
            (Connecting, JoinFailed) => Reconnecting,

            (Connected, LinkLost) => Reconnecting,

            (Reconnecting, RetryElapsed) => Connecting,

            // Default: stay in current state
            _ => self,
        }
    }
}
