//! The wallet-connect widget's logic, detached from any rendering layer.
//!
//! A `WalletConnector` owns the local [`WalletSession`] mirror and keeps it
//! consistent with an injected [`ProviderPort`]. All provider failures are
//! handled at the call site: explicit user actions surface a message on the
//! session, background paths only log.

use crate::domain::{
    format_native_balance, WalletSession, CONNECT_FAILED_MESSAGE, INSTALL_PROVIDER_PROMPT,
};
use crate::ports::{ChangeSubscription, PortError, ProviderEvent, ProviderPort};
use crate::state_machine::{connection_transition, ConnectionEvent, ConnectionState};

pub struct WalletConnector<P: ProviderPort> {
    provider: Option<P>,
    session: WalletSession,
    state: ConnectionState,
    subscription: Option<ChangeSubscription>,
}

impl<P: ProviderPort> WalletConnector<P> {
    /// An absent provider is an expected condition, not an error; the
    /// connector stays functional and `connect` surfaces the install prompt.
    pub fn new(provider: Option<P>) -> Self {
        Self {
            provider,
            session: WalletSession::default(),
            state: ConnectionState::Disconnected,
            subscription: None,
        }
    }

    pub fn session(&self) -> &WalletSession {
        &self.session
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn provider_available(&self) -> bool {
        self.provider.is_some()
    }

    /// Mount-time setup: register the change subscription once and run the
    /// silent reconnection probe.
    pub fn mount(&mut self) {
        self.ensure_subscription();
        self.probe_existing_session();
    }

    /// Silently ask the provider for already-authorized accounts and adopt
    /// the first one. Never prompts, never sets `last_error`.
    pub fn probe_existing_session(&mut self) {
        let accounts = {
            let Some(provider) = self.provider.as_ref() else {
                tracing::debug!("no injected provider; skipping session probe");
                return;
            };
            match provider.authorized_accounts() {
                Ok(accounts) => accounts,
                Err(err) => {
                    // The user took no action, so nothing is surfaced.
                    tracing::debug!(%err, "session probe failed");
                    return;
                }
            }
        };
        if let Some(address) = accounts.into_iter().next() {
            self.adopt_account(address);
        }
    }

    /// Explicit user-initiated connect. `is_connecting` is observably true
    /// only strictly between start and completion, on every path.
    pub fn connect(&mut self) {
        if self.provider.is_none() {
            self.session.last_error = INSTALL_PROVIDER_PROMPT.to_owned();
            return;
        }
        self.apply_event(ConnectionEvent::ConnectRequested);
        self.session.is_connecting = true;
        self.session.last_error.clear();
        match self.request_first_account() {
            Ok(address) => {
                self.session.address = address.clone();
                self.refresh_session_info(&address);
                self.ensure_subscription();
                self.apply_event(ConnectionEvent::ConnectSucceeded);
            }
            Err(err) => {
                tracing::warn!(%err, "wallet connect failed");
                self.session.last_error = CONNECT_FAILED_MESSAGE.to_owned();
                self.apply_event(ConnectionEvent::ConnectFailed);
            }
        }
        self.session.is_connecting = false;
    }

    /// Local-only reset. The provider holds no revocation API, so its side
    /// of the session is untouched.
    pub fn disconnect(&mut self) {
        self.session.clear_connection();
        self.apply_event(ConnectionEvent::UserDisconnected);
    }

    /// Drain pending provider pushes and fold them into the session. Called
    /// by the shell once per frame.
    pub fn pump_events(&mut self) {
        let events = match self.subscription.as_ref() {
            Some(subscription) => subscription.drain(),
            None => return,
        };
        for event in events {
            match event {
                ProviderEvent::ChainChanged(chain_id) => self.on_chain_changed(chain_id),
                ProviderEvent::AccountsChanged(accounts) => self.on_accounts_changed(accounts),
            }
        }
    }

    fn on_chain_changed(&mut self, chain_id: String) {
        self.session.chain_id = chain_id;
        if self.session.is_connected() {
            let address = self.session.address.clone();
            self.refresh_session_info(&address);
        }
        self.apply_event(ConnectionEvent::ChainChanged);
    }

    fn on_accounts_changed(&mut self, accounts: Vec<String>) {
        match accounts.into_iter().next() {
            // Provider-side session ended; same reset as a local disconnect.
            None => {
                self.session.clear_connection();
                self.apply_event(ConnectionEvent::AccountsCleared);
            }
            Some(address) => self.adopt_account(address),
        }
    }

    fn adopt_account(&mut self, address: String) {
        self.session.address = address.clone();
        self.refresh_session_info(&address);
        self.apply_event(ConnectionEvent::AccountsReplaced);
    }

    /// Background refresh of balance and chain id. On failure both values
    /// stay as they were until the next triggering event.
    fn refresh_session_info(&mut self, address: &str) {
        match self.fetch_session_info(address) {
            Ok((balance, chain_id)) => {
                self.session.balance = balance;
                self.session.chain_id = chain_id;
            }
            Err(err) => tracing::warn!(%err, address, "session info refresh failed"),
        }
    }

    fn fetch_session_info(&self, address: &str) -> Result<(String, String), PortError> {
        let provider = self.missing_provider_guard()?;
        let balance = format_native_balance(&provider.balance_of(address)?)?;
        let chain_id = provider.chain_id()?;
        Ok((balance, chain_id))
    }

    fn request_first_account(&self) -> Result<String, PortError> {
        let provider = self.missing_provider_guard()?;
        provider
            .request_accounts()?
            .into_iter()
            .next()
            .ok_or_else(|| PortError::Transport("provider returned no accounts".to_owned()))
    }

    fn missing_provider_guard(&self) -> Result<&P, PortError> {
        self.provider
            .as_ref()
            .ok_or_else(|| PortError::Unavailable("no injected provider".to_owned()))
    }

    fn ensure_subscription(&mut self) {
        if self.subscription.is_some() {
            return;
        }
        let Some(provider) = self.provider.as_ref() else {
            return;
        };
        match provider.subscribe_changes() {
            Ok(subscription) => self.subscription = Some(subscription),
            Err(err) => tracing::debug!(%err, "provider change subscription unavailable"),
        }
    }

    /// Stray events from a provider we did not expect (e.g. a push after a
    /// local disconnect) are logged and dropped; the widget never crashes on
    /// them.
    fn apply_event(&mut self, event: ConnectionEvent) {
        match connection_transition(self.state, event) {
            Ok((next, transition)) => {
                if transition.from != transition.to {
                    tracing::debug!(
                        from = ?transition.from,
                        to = ?transition.to,
                        reason = transition.reason,
                        "connection state change"
                    );
                }
                self.state = next;
            }
            Err(err) => tracing::debug!(%err, "ignoring out-of-order connection event"),
        }
    }
}
