#![allow(dead_code)]

use gig_node_wallet_adapters::{Eip1193Adapter, RuntimeProfile, WalletAdapterConfig};

pub const BUILTIN_ACCOUNT: &str = "0x1000000000000000000000000000000000000001";

pub fn dev_config() -> WalletAdapterConfig {
    WalletAdapterConfig::default()
}

pub fn strict_config() -> WalletAdapterConfig {
    WalletAdapterConfig {
        runtime_profile: RuntimeProfile::Production,
        ..WalletAdapterConfig::default()
    }
}

pub fn dev_adapter() -> Eip1193Adapter {
    Eip1193Adapter::with_config(dev_config())
}
