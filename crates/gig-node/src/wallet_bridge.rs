//! Bridge between the egui shell and the wallet workspace crates.
//!
//! This module is the only place the shell touches wallet types. UI code
//! reads sessions and issues connect/disconnect through here.

use gig_node_wallet_adapters::{Eip1193Adapter, WalletAdapterConfig};
use gig_node_wallet_core::{ConnectionState, WalletConnector, WalletSession};

pub struct WalletBridge {
    connector: WalletConnector<Eip1193Adapter>,
}

impl WalletBridge {
    pub fn from_env() -> Self {
        Self::with_config(WalletAdapterConfig::from_env())
    }

    pub fn with_config(config: WalletAdapterConfig) -> Self {
        let adapter = Eip1193Adapter::with_config(config);
        let provider = adapter.is_available().then_some(adapter);
        let mut connector = WalletConnector::new(provider);
        connector.mount();
        Self { connector }
    }

    pub fn session(&self) -> &WalletSession {
        self.connector.session()
    }

    pub fn state(&self) -> ConnectionState {
        self.connector.state()
    }

    pub fn provider_available(&self) -> bool {
        self.connector.provider_available()
    }

    pub fn connect(&mut self) {
        self.connector.connect();
    }

    pub fn disconnect(&mut self) {
        self.connector.disconnect();
    }

    /// Applies provider pushes queued since the last frame.
    pub fn pump_events(&mut self) {
        self.connector.pump_events();
    }
}
