mod common;

use std::io::Read;
use std::thread;

use tiny_http::{Header, Response, Server};

use gig_node_wallet_adapters::{Eip1193Adapter, WalletAdapterConfig};
use gig_node_wallet_core::{PortError, ProviderEvent, ProviderPort};

const STUB_ACCOUNT: &str = "0xaaaa00000000000000000000000000000000aaaa";

/// Minimal JSON-RPC stub in the shape the proxy runtime expects.
fn spawn_rpc_stub() -> String {
    let server = Server::http("127.0.0.1:0").expect("bind rpc stub");
    let url = format!("http://{}", server.server_addr());
    thread::spawn(move || {
        for mut request in server.incoming_requests() {
            let mut body = String::new();
            let _ = request.as_reader().read_to_string(&mut body);
            let parsed: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
            let method = parsed
                .get("method")
                .and_then(|m| m.as_str())
                .unwrap_or_default();
            let reply = match method {
                "eth_accounts" => {
                    serde_json::json!({"jsonrpc": "2.0", "id": 1, "result": [STUB_ACCOUNT]})
                }
                "eth_getBalance" => {
                    serde_json::json!({"jsonrpc": "2.0", "id": 1, "result": "0xde0b6b3a7640000"})
                }
                "eth_chainId" => {
                    serde_json::json!({"jsonrpc": "2.0", "id": 1, "result": "0x89"})
                }
                "eth_requestAccounts" => serde_json::json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "error": {"code": 4001, "message": "User rejected the request"}
                }),
                _ => serde_json::json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "error": {"code": -32601, "message": "Method not found"}
                }),
            };
            let header = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                .expect("content-type header");
            let _ = request.respond(Response::from_string(reply.to_string()).with_header(header));
        }
    });
    url
}

fn proxy_adapter(url: String) -> Eip1193Adapter {
    Eip1193Adapter::with_config(WalletAdapterConfig {
        eip1193_proxy_url: Some(url),
        ..WalletAdapterConfig::default()
    })
}

#[test]
fn proxy_round_trips_accounts_balance_and_chain() {
    let adapter = proxy_adapter(spawn_rpc_stub());
    assert!(adapter.is_available());

    let subscription = adapter.subscribe_changes().expect("subscribe");

    assert_eq!(
        adapter.authorized_accounts().expect("accounts"),
        vec![STUB_ACCOUNT.to_owned()]
    );
    assert_eq!(
        adapter.balance_of(STUB_ACCOUNT).expect("balance"),
        "0xde0b6b3a7640000"
    );
    assert_eq!(adapter.chain_id().expect("chain id"), "0x89");

    // State changes observed through the proxy fan out as events.
    let events = subscription.drain();
    assert!(events.contains(&ProviderEvent::AccountsChanged(vec![STUB_ACCOUNT.to_owned()])));
    assert!(events.contains(&ProviderEvent::ChainChanged("0x89".to_owned())));
}

#[test]
fn proxy_rpc_error_maps_to_transport_error() {
    let adapter = proxy_adapter(spawn_rpc_stub());
    let err = adapter
        .request_accounts()
        .expect_err("stub rejects authorization");
    match err {
        PortError::Transport(message) => assert!(message.contains("returned error")),
        other => panic!("unexpected error variant: {other:?}"),
    }
}

#[test]
fn unreachable_proxy_maps_to_transport_error() {
    // Reserved port with no listener.
    let adapter = proxy_adapter("http://127.0.0.1:9".to_owned());
    let err = adapter.chain_id().expect_err("no listener");
    assert!(matches!(err, PortError::Transport(_)));
}
