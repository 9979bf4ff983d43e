use std::fmt;
use std::sync::mpsc::{Receiver, TryRecvError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PortError {
    #[error("port not implemented: {0}")]
    NotImplemented(&'static str),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

/// State change pushed by the provider outside any request/response cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    /// New authorized account list; empty means the provider-side session ended.
    AccountsChanged(Vec<String>),
    /// New hex chain id after a network switch.
    ChainChanged(String),
}

/// The injected account provider, as the widget consumes it.
///
/// Mirrors the EIP-1193 surface the original page used: `eth_accounts`,
/// `eth_requestAccounts`, `eth_getBalance(address, "latest")`, `eth_chainId`,
/// plus the two change events.
pub trait ProviderPort {
    /// Already-authorized accounts, without prompting the user.
    fn authorized_accounts(&self) -> Result<Vec<String>, PortError>;

    /// Request account authorization; may prompt the user out-of-band.
    fn request_accounts(&self) -> Result<Vec<String>, PortError>;

    /// Raw smallest-unit balance string (hex or decimal) at the latest block.
    fn balance_of(&self, address: &str) -> Result<String, PortError>;

    /// Hex chain id of the currently selected network.
    fn chain_id(&self) -> Result<String, PortError>;

    /// Register for `accountsChanged`/`chainChanged` pushes. The returned
    /// handle deregisters on drop.
    fn subscribe_changes(&self) -> Result<ChangeSubscription, PortError>;
}

/// Handle for a live provider event subscription.
///
/// Dropping the handle runs the close callback exactly once, so listener
/// teardown cannot be forgotten across navigations. Events pushed after the
/// drop land in a closed channel and are discarded.
pub struct ChangeSubscription {
    events: Receiver<ProviderEvent>,
    // Not Send: browser-mode close callbacks hold JS listener handles, and
    // the widget lives on the single UI thread anyway.
    on_close: Option<Box<dyn FnOnce()>>,
}

impl ChangeSubscription {
    pub fn new(events: Receiver<ProviderEvent>, on_close: impl FnOnce() + 'static) -> Self {
        Self {
            events,
            on_close: Some(Box::new(on_close)),
        }
    }

    /// Events pushed since the last drain. Never blocks.
    pub fn drain(&self) -> Vec<ProviderEvent> {
        let mut out = Vec::new();
        loop {
            match self.events.try_recv() {
                Ok(event) => out.push(event),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        out
    }
}

impl Drop for ChangeSubscription {
    fn drop(&mut self) {
        if let Some(close) = self.on_close.take() {
            close();
        }
    }
}

impl fmt::Debug for ChangeSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeSubscription")
            .field("closed", &self.on_close.is_none())
            .finish()
    }
}
