use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuntimeProfile {
    #[default]
    Development,
    Production,
}

#[derive(Debug, Clone)]
pub struct WalletAdapterConfig {
    /// JSON-RPC endpoint bridging to a real provider on native builds.
    pub eip1193_proxy_url: Option<String>,
    pub request_timeout_ms: u64,
    pub runtime_profile: RuntimeProfile,
    /// Base URL of the marketplace backend serving /api/jobs and /api/users.
    pub marketplace_base_url: String,
}

impl Default for WalletAdapterConfig {
    fn default() -> Self {
        Self {
            eip1193_proxy_url: None,
            request_timeout_ms: 15_000,
            runtime_profile: RuntimeProfile::default(),
            marketplace_base_url: "http://localhost:3000".to_owned(),
        }
    }
}

impl WalletAdapterConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = env::var("GIG_NODE_EIP1193_PROXY_URL") {
            if !url.is_empty() {
                config.eip1193_proxy_url = Some(url);
            }
        }
        if let Ok(raw) = env::var("GIG_NODE_RPC_TIMEOUT_MS") {
            if let Ok(ms) = raw.parse() {
                config.request_timeout_ms = ms;
            }
        }
        if let Ok(profile) = env::var("GIG_NODE_RUNTIME_PROFILE") {
            if profile.eq_ignore_ascii_case("production") {
                config.runtime_profile = RuntimeProfile::Production;
            }
        }
        if let Ok(url) = env::var("GIG_NODE_API_URL") {
            if !url.is_empty() {
                config.marketplace_base_url = url;
            }
        }
        config
    }

    /// Production builds refuse the deterministic fallback; a missing real
    /// provider becomes a disabled adapter instead of fake data.
    pub fn strict_runtime_required(&self) -> bool {
        self.runtime_profile == RuntimeProfile::Production
    }
}
