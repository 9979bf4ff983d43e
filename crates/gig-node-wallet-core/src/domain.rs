use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

use crate::ports::PortError;

/// Decimal places of the native currency's smallest unit.
pub const NATIVE_DECIMALS: u32 = 18;

/// Fractional digits shown for a formatted balance.
const BALANCE_DISPLAY_DECIMALS: u32 = 4;

/// Surfaced when the user asks to connect but no provider is injected.
pub const INSTALL_PROVIDER_PROMPT: &str = "Please install MetaMask to connect your wallet";

/// Surfaced when an explicit connect request fails for any reason.
pub const CONNECT_FAILED_MESSAGE: &str = "Failed to connect wallet";

/// Local mirror of the externally-held wallet session.
///
/// Empty `address` means disconnected; `balance` and `chain_id` are cleared
/// together with it. `last_error` is an advisory overlay, not a state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletSession {
    pub address: String,
    pub balance: String,
    pub chain_id: String,
    pub is_connecting: bool,
    pub last_error: String,
}

impl WalletSession {
    pub fn is_connected(&self) -> bool {
        !self.address.is_empty()
    }

    /// Reset the mirrored connection fields. Does not touch `last_error`.
    pub fn clear_connection(&mut self) {
        self.address.clear();
        self.balance.clear();
        self.chain_id.clear();
    }
}

/// Shortened display form of an account address: first 6 + last 4 characters.
/// No well-formedness validation; the two halves overlap for inputs shorter
/// than the cut points.
pub fn format_address(address: &str) -> String {
    if address.is_empty() {
        return String::new();
    }
    // Counted in chars, not bytes; the input is not guaranteed ASCII.
    let head: String = address.chars().take(6).collect();
    let tail_start = address.chars().count().saturating_sub(4);
    let tail: String = address.chars().skip(tail_start).collect();
    format!("{head}...{tail}")
}

/// Human-readable name for the networks the widget recognizes.
pub fn network_name(chain_id: &str) -> &'static str {
    match chain_id {
        "0x1" => "Ethereum",
        "0x89" => "Polygon",
        "0x38" => "BSC",
        _ => "Unknown Network",
    }
}

/// Format a raw smallest-unit balance (hex or decimal string) in native
/// currency units with four fractional digits, truncating.
pub fn format_native_balance(raw: &str) -> Result<String, PortError> {
    let wei = parse_u256(raw)?;
    let unit = U256::from(10u64).pow(U256::from(NATIVE_DECIMALS));
    let scale = U256::from(10u64).pow(U256::from(BALANCE_DISPLAY_DECIMALS));
    let whole = wei / unit;
    let frac = (wei % unit) * scale / unit;
    Ok(format!("{whole}.{:04}", frac.to::<u64>()))
}

fn parse_u256(value: &str) -> Result<U256, PortError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(PortError::Validation("empty balance string".to_owned()));
    }
    if let Some(hex) = value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        U256::from_str_radix(hex, 16)
            .map_err(|e| PortError::Validation(format!("invalid hex balance '{value}': {e}")))
    } else {
        U256::from_str_radix(value, 10)
            .map_err(|e| PortError::Validation(format!("invalid balance '{value}': {e}")))
    }
}
