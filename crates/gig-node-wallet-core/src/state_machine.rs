use crate::ports::PortError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionEvent {
    ConnectRequested,
    ConnectSucceeded,
    ConnectFailed,
    UserDisconnected,
    /// Provider pushed an empty account list.
    AccountsCleared,
    /// Provider pushed (or silently reported) a non-empty account list.
    AccountsReplaced,
    ChainChanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTransition {
    pub from: ConnectionState,
    pub to: ConnectionState,
    pub reason: &'static str,
}

/// Connection state table. Errors are advisory overlays on the session, not
/// states, so failure arrows land back on `Disconnected`.
pub fn connection_transition(
    from: ConnectionState,
    event: ConnectionEvent,
) -> Result<(ConnectionState, StateTransition), PortError> {
    use ConnectionEvent::*;
    use ConnectionState::*;

    let (to, reason) = match (from, event) {
        (Disconnected, ConnectRequested) => (Connecting, "user connect"),
        (Connecting, ConnectSucceeded) => (Connected, "provider authorized account"),
        (Connecting, ConnectFailed) => (Disconnected, "connect rejected or failed"),
        (Connected, UserDisconnected) => (Disconnected, "local disconnect"),
        (Connected, AccountsCleared) => (Disconnected, "provider session ended"),
        // Covers both the silent mount-time probe and a provider-pushed
        // account switch while connected.
        (Connected | Disconnected, AccountsReplaced) => (Connected, "account adopted"),
        (state, ChainChanged) => (state, "chain changed in place"),
        (from, event) => {
            return Err(PortError::Validation(format!(
                "illegal connection transition: {from:?} on {event:?}"
            )))
        }
    };
    Ok((to, StateTransition { from, to, reason }))
}
