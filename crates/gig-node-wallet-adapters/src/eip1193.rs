//! EIP-1193 provider adapter.
//!
//! Three runtimes behind one [`ProviderPort`]: the browser-injected
//! `window.ethereum` object on wasm32, a JSON-RPC proxy endpoint on native
//! builds, and a deterministic in-memory fallback for development profiles
//! and tests. Production profiles without a real runtime disable the adapter
//! instead of falling back.

use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};

use serde_json::Value;

use gig_node_wallet_core::{ChangeSubscription, PortError, ProviderEvent, ProviderPort};

use crate::WalletAdapterConfig;

/// Built-in account served by the deterministic fallback.
const DETERMINISTIC_ACCOUNT: &str = "0x1000000000000000000000000000000000000001";
/// One native token, smallest units.
const DETERMINISTIC_BALANCE: &str = "1000000000000000000";
const DETERMINISTIC_CHAIN_ID: &str = "0x1";

#[derive(Clone)]
pub struct Eip1193Adapter {
    mode: ProviderMode,
    state: Arc<Mutex<ProviderState>>,
    subscribers: Arc<Mutex<SubscriberRegistry>>,
    #[cfg(target_arch = "wasm32")]
    hooks: Arc<Mutex<BrowserHooks>>,
}

#[derive(Debug, Clone)]
enum ProviderMode {
    Disabled(String),
    Deterministic,
    #[cfg(not(target_arch = "wasm32"))]
    Proxy(ProxyRuntime),
    #[cfg(target_arch = "wasm32")]
    Browser,
}

#[derive(Debug, Clone)]
#[cfg(not(target_arch = "wasm32"))]
struct ProxyRuntime {
    base_url: String,
    client: reqwest::blocking::Client,
}

#[derive(Debug, Clone)]
struct ProviderState {
    accounts: Vec<String>,
    chain_id: String,
    balance: String,
}

impl Default for ProviderState {
    fn default() -> Self {
        Self {
            accounts: vec![DETERMINISTIC_ACCOUNT.to_owned()],
            chain_id: DETERMINISTIC_CHAIN_ID.to_owned(),
            balance: DETERMINISTIC_BALANCE.to_owned(),
        }
    }
}

#[derive(Debug, Default)]
struct SubscriberRegistry {
    next_id: u64,
    senders: Vec<(u64, Sender<ProviderEvent>)>,
}

impl SubscriberRegistry {
    fn register(&mut self, sender: Sender<ProviderEvent>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.senders.push((id, sender));
        id
    }

    fn remove(&mut self, id: u64) {
        self.senders.retain(|(sid, _)| *sid != id);
    }

    fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }

    fn fan_out(&mut self, event: &ProviderEvent) {
        // Closed receivers are pruned as a side effect of delivery.
        self.senders
            .retain(|(_, sender)| sender.send(event.clone()).is_ok());
    }
}

#[cfg(target_arch = "wasm32")]
#[derive(Default)]
struct BrowserHooks {
    accounts_changed: Option<wasm_bindgen::closure::Closure<dyn FnMut(wasm_bindgen::JsValue)>>,
    chain_changed: Option<wasm_bindgen::closure::Closure<dyn FnMut(wasm_bindgen::JsValue)>>,
}

impl Default for Eip1193Adapter {
    fn default() -> Self {
        Self::with_config(WalletAdapterConfig::from_env())
    }
}

impl Eip1193Adapter {
    pub fn with_config(config: WalletAdapterConfig) -> Self {
        #[cfg(target_arch = "wasm32")]
        let mode = if browser_provider_available() {
            ProviderMode::Browser
        } else if config.strict_runtime_required() {
            ProviderMode::Disabled(
                "EIP-1193 browser provider not found in production runtime profile".to_owned(),
            )
        } else {
            ProviderMode::Deterministic
        };

        #[cfg(not(target_arch = "wasm32"))]
        let mode = if let Some(ref base_url) = config.eip1193_proxy_url {
            let timeout = std::time::Duration::from_millis(config.request_timeout_ms);
            match reqwest::blocking::Client::builder().timeout(timeout).build() {
                Ok(client) => ProviderMode::Proxy(ProxyRuntime {
                    base_url: base_url.clone(),
                    client,
                }),
                Err(e) => {
                    if config.strict_runtime_required() {
                        ProviderMode::Disabled(format!(
                            "failed to initialize EIP-1193 proxy client in production profile: {e}"
                        ))
                    } else {
                        ProviderMode::Deterministic
                    }
                }
            }
        } else if config.strict_runtime_required() {
            ProviderMode::Disabled(
                "EIP-1193 proxy URL not configured in production runtime profile".to_owned(),
            )
        } else {
            ProviderMode::Deterministic
        };

        match &mode {
            ProviderMode::Disabled(reason) => tracing::warn!(%reason, "eip1193 adapter disabled"),
            other => tracing::debug!(mode = ?other, "eip1193 adapter ready"),
        }

        Self {
            mode,
            state: Arc::new(Mutex::new(ProviderState::default())),
            subscribers: Arc::new(Mutex::new(SubscriberRegistry::default())),
            #[cfg(target_arch = "wasm32")]
            hooks: Arc::new(Mutex::new(BrowserHooks::default())),
        }
    }

    /// Whether a runtime backs this adapter. A disabled adapter is the
    /// "provider not installed" condition from the widget's point of view.
    pub fn is_available(&self) -> bool {
        !matches!(self.mode, ProviderMode::Disabled(_))
    }

    fn check_mode(&self) -> Result<(), PortError> {
        if let ProviderMode::Disabled(reason) = &self.mode {
            return Err(PortError::Unavailable(reason.clone()));
        }
        Ok(())
    }

    fn lock_state(&self) -> Result<std::sync::MutexGuard<'_, ProviderState>, PortError> {
        self.state
            .lock()
            .map_err(|e| PortError::Transport(format!("provider lock poisoned: {e}")))
    }

    fn fan_out(&self, event: ProviderEvent) {
        if let Ok(mut registry) = self.subscribers.lock() {
            registry.fan_out(&event);
        }
    }

    fn record_accounts(&self, accounts: Vec<String>) -> Result<(), PortError> {
        let changed = {
            let mut state = self.lock_state()?;
            let changed = state.accounts != accounts;
            state.accounts = accounts.clone();
            changed
        };
        if changed {
            self.fan_out(ProviderEvent::AccountsChanged(accounts));
        }
        Ok(())
    }

    fn record_chain(&self, chain_id: String) -> Result<(), PortError> {
        let changed = {
            let mut state = self.lock_state()?;
            let changed = state.chain_id != chain_id;
            state.chain_id = chain_id.clone();
            changed
        };
        if changed {
            self.fan_out(ProviderEvent::ChainChanged(chain_id));
        }
        Ok(())
    }

    /// Test and tooling hook: replace the account list and push the event to
    /// all live subscriptions.
    pub fn debug_inject_accounts_changed(&self, accounts: Vec<String>) -> Result<(), PortError> {
        {
            let mut state = self.lock_state()?;
            state.accounts = accounts.clone();
        }
        self.fan_out(ProviderEvent::AccountsChanged(accounts));
        Ok(())
    }

    /// Test and tooling hook: switch the chain and push the event.
    pub fn debug_inject_chain_changed(&self, chain_id: &str) -> Result<(), PortError> {
        {
            let mut state = self.lock_state()?;
            state.chain_id = chain_id.to_owned();
        }
        self.fan_out(ProviderEvent::ChainChanged(chain_id.to_owned()));
        Ok(())
    }

    /// Test and tooling hook for the deterministic balance.
    pub fn debug_set_balance(&self, raw: &str) -> Result<(), PortError> {
        let mut state = self.lock_state()?;
        state.balance = raw.to_owned();
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn proxy_call(&self, method: &str, params: Value) -> Result<Value, PortError> {
        let proxy = match &self.mode {
            ProviderMode::Proxy(proxy) => proxy,
            ProviderMode::Disabled(reason) => {
                return Err(PortError::Unavailable(reason.clone()))
            }
            _ => {
                return Err(PortError::NotImplemented(
                    "eip1193 proxy runtime not enabled",
                ))
            }
        };

        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let response = proxy
            .client
            .post(&proxy.base_url)
            .json(&payload)
            .send()
            .map_err(|e| PortError::Transport(format!("eip1193 proxy request failed: {e}")))?;
        let status = response.status();
        let body: Value = response
            .json()
            .map_err(|e| PortError::Transport(format!("eip1193 proxy json decode failed: {e}")))?;
        if !status.is_success() {
            return Err(PortError::Transport(format!(
                "eip1193 proxy status {status}: {body}"
            )));
        }
        if let Some(err) = body.get("error") {
            return Err(PortError::Transport(format!(
                "eip1193 proxy returned error: {err}"
            )));
        }
        body.get("result")
            .cloned()
            .ok_or_else(|| PortError::Transport("eip1193 proxy missing result".to_owned()))
    }

    #[cfg(target_arch = "wasm32")]
    pub async fn wasm_authorized_accounts_async(&self) -> Result<Vec<String>, PortError> {
        self.check_mode()?;
        let result = self.wasm_request("eth_accounts", serde_json::json!([])).await?;
        let accounts = value_to_accounts(&result, "eth_accounts")?;
        self.record_accounts(accounts.clone())?;
        Ok(accounts)
    }

    #[cfg(target_arch = "wasm32")]
    pub async fn wasm_request_accounts_async(&self) -> Result<Vec<String>, PortError> {
        self.check_mode()?;
        let result = self
            .wasm_request("eth_requestAccounts", serde_json::json!([]))
            .await?;
        let accounts = value_to_accounts(&result, "eth_requestAccounts")?;
        self.record_accounts(accounts.clone())?;
        Ok(accounts)
    }

    #[cfg(target_arch = "wasm32")]
    pub async fn wasm_balance_of_async(&self, address: &str) -> Result<String, PortError> {
        self.check_mode()?;
        let result = self
            .wasm_request("eth_getBalance", serde_json::json!([address, "latest"]))
            .await?;
        result
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| PortError::Transport("eth_getBalance result must be string".to_owned()))
    }

    #[cfg(target_arch = "wasm32")]
    pub async fn wasm_chain_id_async(&self) -> Result<String, PortError> {
        self.check_mode()?;
        let result = self.wasm_request("eth_chainId", serde_json::json!([])).await?;
        let chain_id = result
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| PortError::Transport("eth_chainId result must be string".to_owned()))?;
        self.record_chain(chain_id.clone())?;
        Ok(chain_id)
    }

    #[cfg(target_arch = "wasm32")]
    async fn wasm_request(&self, method: &str, params: Value) -> Result<Value, PortError> {
        use wasm_bindgen::JsCast;

        let provider = browser_provider()?;
        let request_fn = get_prop(&provider, "request")
            .ok()
            .and_then(|v| v.dyn_into::<js_sys::Function>().ok())
            .ok_or(PortError::NotImplemented(
                "window.ethereum.request is unavailable",
            ))?;

        let request = serde_json::json!({
            "method": method,
            "params": params,
        });
        let request_js = serde_wasm_bindgen::to_value(&request)
            .map_err(|e| PortError::Transport(format!("failed to encode wasm request: {e}")))?;
        let promise_js = request_fn.call1(&provider, &request_js).map_err(|e| {
            PortError::Transport(format!("provider request dispatch failed: {e:?}"))
        })?;
        let promise = promise_js.dyn_into::<js_sys::Promise>().map_err(|_| {
            PortError::Transport("provider request did not return Promise".to_owned())
        })?;
        let result_js = wasm_bindgen_futures::JsFuture::from(promise)
            .await
            .map_err(|e| PortError::Transport(format!("provider request rejected: {e:?}")))?;
        serde_wasm_bindgen::from_value(result_js)
            .map_err(|e| PortError::Transport(format!("failed to decode wasm response: {e}")))
    }

    /// Snapshot reads of `selectedAddress`/`chainId` keep the sync port
    /// usable in the browser without dispatching RPC.
    #[cfg(target_arch = "wasm32")]
    fn refresh_browser_snapshot(&self) -> Result<(), PortError> {
        use wasm_bindgen::JsValue;

        let provider = browser_provider()?;
        let selected = get_prop(&provider, "selectedAddress").unwrap_or(JsValue::NULL);
        let chain = get_prop(&provider, "chainId").unwrap_or(JsValue::NULL);

        if let Some(address) = selected.as_string() {
            self.record_accounts(vec![address])?;
        }
        if let Some(chain_id) = chain.as_string() {
            self.record_chain(chain_id)?;
        }
        Ok(())
    }

    #[cfg(target_arch = "wasm32")]
    fn register_browser_hooks(&self) -> Result<(), PortError> {
        use wasm_bindgen::{closure::Closure, JsCast, JsValue};

        let provider = browser_provider()?;
        let on_fn = get_prop(&provider, "on")
            .ok()
            .and_then(|v| v.dyn_into::<js_sys::Function>().ok())
            .ok_or(PortError::NotImplemented(
                "provider does not expose on(event, handler)",
            ))?;

        let mut hooks = self
            .hooks
            .lock()
            .map_err(|e| PortError::Transport(format!("provider hooks lock poisoned: {e}")))?;
        if hooks.accounts_changed.is_some() && hooks.chain_changed.is_some() {
            return Ok(());
        }

        let state_for_accounts = Arc::clone(&self.state);
        let subscribers_for_accounts = Arc::clone(&self.subscribers);
        let accounts_cb = Closure::<dyn FnMut(JsValue)>::new(move |value: JsValue| {
            let mut accounts = Vec::new();
            if js_sys::Array::is_array(&value) {
                for item in js_sys::Array::from(&value).iter() {
                    if let Some(raw) = item.as_string() {
                        accounts.push(raw);
                    }
                }
            }
            if let Ok(mut state) = state_for_accounts.lock() {
                state.accounts = accounts.clone();
            }
            if let Ok(mut registry) = subscribers_for_accounts.lock() {
                registry.fan_out(&ProviderEvent::AccountsChanged(accounts));
            }
        });

        let state_for_chain = Arc::clone(&self.state);
        let subscribers_for_chain = Arc::clone(&self.subscribers);
        let chain_cb = Closure::<dyn FnMut(JsValue)>::new(move |value: JsValue| {
            let Some(chain_id) = value.as_string() else {
                return;
            };
            if let Ok(mut state) = state_for_chain.lock() {
                state.chain_id = chain_id.clone();
            }
            if let Ok(mut registry) = subscribers_for_chain.lock() {
                registry.fan_out(&ProviderEvent::ChainChanged(chain_id));
            }
        });

        on_fn
            .call2(
                &provider,
                &JsValue::from_str("accountsChanged"),
                accounts_cb.as_ref().unchecked_ref(),
            )
            .map_err(|e| PortError::Transport(format!("register accountsChanged failed: {e:?}")))?;
        on_fn
            .call2(
                &provider,
                &JsValue::from_str("chainChanged"),
                chain_cb.as_ref().unchecked_ref(),
            )
            .map_err(|e| PortError::Transport(format!("register chainChanged failed: {e:?}")))?;

        hooks.accounts_changed = Some(accounts_cb);
        hooks.chain_changed = Some(chain_cb);
        Ok(())
    }
}

impl ProviderPort for Eip1193Adapter {
    fn authorized_accounts(&self) -> Result<Vec<String>, PortError> {
        self.check_mode()?;

        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, ProviderMode::Browser) {
            self.refresh_browser_snapshot()?;
            return Ok(self.lock_state()?.accounts.clone());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if matches!(self.mode, ProviderMode::Proxy(_)) {
            let result = self.proxy_call("eth_accounts", serde_json::json!([]))?;
            let accounts = value_to_accounts(&result, "eth_accounts")?;
            self.record_accounts(accounts.clone())?;
            return Ok(accounts);
        }

        Ok(self.lock_state()?.accounts.clone())
    }

    fn request_accounts(&self) -> Result<Vec<String>, PortError> {
        self.check_mode()?;

        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, ProviderMode::Browser) {
            return Err(PortError::NotImplemented(
                "wasm sync request_accounts is unavailable; use wasm_request_accounts_async",
            ));
        }

        #[cfg(not(target_arch = "wasm32"))]
        if matches!(self.mode, ProviderMode::Proxy(_)) {
            let result = self.proxy_call("eth_requestAccounts", serde_json::json!([]))?;
            let accounts = value_to_accounts(&result, "eth_requestAccounts")?;
            self.record_accounts(accounts.clone())?;
            return Ok(accounts);
        }

        Ok(self.lock_state()?.accounts.clone())
    }

    fn balance_of(&self, address: &str) -> Result<String, PortError> {
        self.check_mode()?;

        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, ProviderMode::Browser) {
            return Err(PortError::NotImplemented(
                "wasm sync balance_of is unavailable; use wasm_balance_of_async",
            ));
        }

        #[cfg(not(target_arch = "wasm32"))]
        if matches!(self.mode, ProviderMode::Proxy(_)) {
            let result =
                self.proxy_call("eth_getBalance", serde_json::json!([address, "latest"]))?;
            return result.as_str().map(str::to_owned).ok_or_else(|| {
                PortError::Transport("eth_getBalance result must be string".to_owned())
            });
        }

        let _ = address;
        Ok(self.lock_state()?.balance.clone())
    }

    fn chain_id(&self) -> Result<String, PortError> {
        self.check_mode()?;

        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, ProviderMode::Browser) {
            self.refresh_browser_snapshot()?;
            return Ok(self.lock_state()?.chain_id.clone());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if matches!(self.mode, ProviderMode::Proxy(_)) {
            let result = self.proxy_call("eth_chainId", serde_json::json!([]))?;
            let chain_id = result.as_str().map(str::to_owned).ok_or_else(|| {
                PortError::Transport("eth_chainId result must be string".to_owned())
            })?;
            self.record_chain(chain_id.clone())?;
            return Ok(chain_id);
        }

        Ok(self.lock_state()?.chain_id.clone())
    }

    fn subscribe_changes(&self) -> Result<ChangeSubscription, PortError> {
        self.check_mode()?;

        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, ProviderMode::Browser) {
            self.register_browser_hooks()?;
        }

        let (sender, receiver) = mpsc::channel();
        let id = {
            let mut registry = self
                .subscribers
                .lock()
                .map_err(|e| PortError::Transport(format!("subscriber lock poisoned: {e}")))?;
            registry.register(sender)
        };

        let subscribers = Arc::clone(&self.subscribers);
        #[cfg(target_arch = "wasm32")]
        let hooks = Arc::clone(&self.hooks);
        Ok(ChangeSubscription::new(receiver, move || {
            if let Ok(mut registry) = subscribers.lock() {
                registry.remove(id);
                #[cfg(target_arch = "wasm32")]
                if registry.is_empty() {
                    // Last subscription gone: drop the JS listener closures
                    // so the page holds no stale handlers.
                    if let Ok(mut hooks) = hooks.lock() {
                        unregister_browser_hooks(&mut hooks);
                    }
                }
            }
        }))
    }
}

fn value_to_accounts(result: &Value, method: &str) -> Result<Vec<String>, PortError> {
    let arr = result
        .as_array()
        .ok_or_else(|| PortError::Transport(format!("{method} result must be array")))?;
    let mut accounts = Vec::with_capacity(arr.len());
    for item in arr {
        let raw = item
            .as_str()
            .ok_or_else(|| PortError::Transport(format!("{method} item must be string")))?;
        accounts.push(raw.to_owned());
    }
    Ok(accounts)
}

#[cfg(target_arch = "wasm32")]
fn unregister_browser_hooks(hooks: &mut BrowserHooks) {
    use wasm_bindgen::{JsCast, JsValue};

    let Ok(provider) = browser_provider() else {
        hooks.accounts_changed = None;
        hooks.chain_changed = None;
        return;
    };
    let remove_fn = get_prop(&provider, "removeListener")
        .ok()
        .and_then(|v| v.dyn_into::<js_sys::Function>().ok());
    if let Some(remove_fn) = remove_fn {
        if let Some(cb) = hooks.accounts_changed.take() {
            let _ = remove_fn.call2(
                &provider,
                &JsValue::from_str("accountsChanged"),
                cb.as_ref().unchecked_ref(),
            );
        }
        if let Some(cb) = hooks.chain_changed.take() {
            let _ = remove_fn.call2(
                &provider,
                &JsValue::from_str("chainChanged"),
                cb.as_ref().unchecked_ref(),
            );
        }
    } else {
        hooks.accounts_changed = None;
        hooks.chain_changed = None;
    }
}

#[cfg(target_arch = "wasm32")]
fn browser_provider_available() -> bool {
    browser_provider().is_ok()
}

#[cfg(target_arch = "wasm32")]
fn browser_provider() -> Result<wasm_bindgen::JsValue, PortError> {
    let window =
        web_sys::window().ok_or_else(|| PortError::Transport("missing window".to_owned()))?;
    let provider = get_prop(&window.into(), "ethereum")?;
    if provider.is_null() || provider.is_undefined() {
        return Err(PortError::Unavailable("window.ethereum missing".to_owned()));
    }
    Ok(provider)
}

#[cfg(target_arch = "wasm32")]
fn get_prop(target: &wasm_bindgen::JsValue, key: &str) -> Result<wasm_bindgen::JsValue, PortError> {
    js_sys::Reflect::get(target, &wasm_bindgen::JsValue::from_str(key))
        .map_err(|e| PortError::Transport(format!("read provider property {key} failed: {e:?}")))
}
