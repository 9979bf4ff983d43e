mod common;

use common::{dev_adapter, strict_config, BUILTIN_ACCOUNT};

use gig_node_wallet_adapters::Eip1193Adapter;
use gig_node_wallet_core::{
    ConnectionState, PortError, ProviderEvent, ProviderPort, WalletConnector,
};

#[test]
fn deterministic_mode_serves_builtin_session() {
    let adapter = dev_adapter();
    assert!(adapter.is_available());
    assert_eq!(
        adapter.authorized_accounts().expect("accounts"),
        vec![BUILTIN_ACCOUNT.to_owned()]
    );
    assert_eq!(adapter.chain_id().expect("chain id"), "0x1");
    assert_eq!(
        adapter.balance_of(BUILTIN_ACCOUNT).expect("balance"),
        "1000000000000000000"
    );
}

#[test]
fn connector_runs_full_flow_against_deterministic_adapter() {
    let adapter = dev_adapter();
    let mut connector = WalletConnector::new(Some(adapter.clone()));
    connector.mount();

    assert_eq!(connector.state(), ConnectionState::Connected);
    assert_eq!(connector.session().address, BUILTIN_ACCOUNT);
    assert_eq!(connector.session().balance, "1.0000");
    assert_eq!(connector.session().chain_id, "0x1");

    adapter
        .debug_set_balance("250000000000000000")
        .expect("set balance");
    adapter
        .debug_inject_chain_changed("0x89")
        .expect("inject chain");
    connector.pump_events();
    assert_eq!(connector.session().chain_id, "0x89");
    assert_eq!(connector.session().balance, "0.2500");

    adapter
        .debug_inject_accounts_changed(Vec::new())
        .expect("inject empty accounts");
    connector.pump_events();
    assert_eq!(connector.state(), ConnectionState::Disconnected);
    assert!(connector.session().address.is_empty());
}

#[test]
fn dropped_subscription_stops_receiving() {
    let adapter = dev_adapter();

    let first = adapter.subscribe_changes().expect("subscribe");
    adapter.debug_inject_chain_changed("0x38").expect("inject");
    assert_eq!(
        first.drain(),
        vec![ProviderEvent::ChainChanged("0x38".to_owned())]
    );

    drop(first);
    adapter
        .debug_inject_chain_changed("0x89")
        .expect("inject after drop");

    let second = adapter.subscribe_changes().expect("resubscribe");
    adapter.debug_inject_chain_changed("0x1").expect("inject");
    assert_eq!(
        second.drain(),
        vec![ProviderEvent::ChainChanged("0x1".to_owned())]
    );
}

#[test]
fn strict_profile_without_runtime_disables_adapter() {
    let adapter = Eip1193Adapter::with_config(strict_config());
    assert!(!adapter.is_available());
    let err = adapter.chain_id().expect_err("disabled adapter must refuse");
    assert!(matches!(err, PortError::Unavailable(_)));
}
