use gig_node_wallet_core::{connection_transition, ConnectionEvent, ConnectionState};

#[test]
fn connect_happy_path_transitions() {
    let (s1, _) = connection_transition(
        ConnectionState::Disconnected,
        ConnectionEvent::ConnectRequested,
    )
    .expect("disconnected -> connecting");
    assert_eq!(s1, ConnectionState::Connecting);
    let (s2, _) =
        connection_transition(s1, ConnectionEvent::ConnectSucceeded).expect("connecting -> connected");
    assert_eq!(s2, ConnectionState::Connected);
    let (s3, _) =
        connection_transition(s2, ConnectionEvent::UserDisconnected).expect("connected -> disconnected");
    assert_eq!(s3, ConnectionState::Disconnected);
}

#[test]
fn connect_failure_returns_to_disconnected() {
    let (s1, _) = connection_transition(
        ConnectionState::Disconnected,
        ConnectionEvent::ConnectRequested,
    )
    .expect("disconnected -> connecting");
    let (s2, transition) =
        connection_transition(s1, ConnectionEvent::ConnectFailed).expect("connecting -> disconnected");
    assert_eq!(s2, ConnectionState::Disconnected);
    assert_eq!(transition.from, ConnectionState::Connecting);
}

#[test]
fn provider_pushes_drive_connected_state() {
    let (s1, _) = connection_transition(
        ConnectionState::Disconnected,
        ConnectionEvent::AccountsReplaced,
    )
    .expect("silent adoption");
    assert_eq!(s1, ConnectionState::Connected);
    let (s2, _) =
        connection_transition(s1, ConnectionEvent::AccountsReplaced).expect("account switch");
    assert_eq!(s2, ConnectionState::Connected);
    let (s3, _) =
        connection_transition(s2, ConnectionEvent::AccountsCleared).expect("session ended");
    assert_eq!(s3, ConnectionState::Disconnected);
}

#[test]
fn chain_change_keeps_current_state() {
    for state in [
        ConnectionState::Disconnected,
        ConnectionState::Connecting,
        ConnectionState::Connected,
    ] {
        let (next, transition) =
            connection_transition(state, ConnectionEvent::ChainChanged).expect("chain change");
        assert_eq!(next, state);
        assert_eq!(transition.from, transition.to);
    }
}

#[test]
fn illegal_transition_is_rejected() {
    let err = connection_transition(
        ConnectionState::Disconnected,
        ConnectionEvent::ConnectSucceeded,
    )
    .expect_err("must fail");
    assert!(err.to_string().contains("illegal connection transition"));

    let err = connection_transition(ConnectionState::Connecting, ConnectionEvent::ConnectRequested)
        .expect_err("must fail");
    assert!(err.to_string().contains("illegal connection transition"));
}
