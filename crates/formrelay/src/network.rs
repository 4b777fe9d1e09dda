//! Connectivity state and auto-send network matching.

use std::sync::RwLock;

use crate::config::AutoSendMode;

/// Kind of the currently active connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkType {
    Wifi,
    Cellular,
}

/// Reports the active connection, if any.
pub trait NetworkStateProvider: Send + Sync {
    fn current_network(&self) -> Option<NetworkType>;
}

/// Returns whether the active connection is one the auto-send setting
/// allows. No connection never matches.
pub fn network_type_matches(mode: AutoSendMode, network: Option<NetworkType>) -> bool {
    let Some(network) = network else {
        return false;
    };

    let (send_wifi, send_cellular) = match mode {
        AutoSendMode::Off => (false, false),
        AutoSendMode::WifiOnly => (true, false),
        AutoSendMode::CellularOnly => (false, true),
        AutoSendMode::WifiAndCellular => (true, true),
    };

    match network {
        NetworkType::Wifi => send_wifi,
        NetworkType::Cellular => send_cellular,
    }
}

/// Connectivity holder updated by the host when the connection changes.
#[derive(Debug, Default)]
pub struct SharedNetworkState {
    current: RwLock<Option<NetworkType>>,
}

impl SharedNetworkState {
    pub fn new(initial: Option<NetworkType>) -> Self {
        Self {
            current: RwLock::new(initial),
        }
    }

    pub fn set(&self, network: Option<NetworkType>) {
        if let Ok(mut guard) = self.current.write() {
            *guard = network;
        }
    }
}

impl NetworkStateProvider for SharedNetworkState {
    fn current_network(&self) -> Option<NetworkType> {
        self.current.read().ok().and_then(|g| *g)
    }
}
