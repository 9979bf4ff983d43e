pub mod connector;
pub mod domain;
pub mod ports;
pub mod state_machine;

pub use connector::WalletConnector;
pub use domain::{
    format_address, format_native_balance, network_name, WalletSession, CONNECT_FAILED_MESSAGE,
    INSTALL_PROVIDER_PROMPT, NATIVE_DECIMALS,
};
pub use ports::{ChangeSubscription, PortError, ProviderEvent, ProviderPort};
pub use state_machine::{connection_transition, ConnectionEvent, ConnectionState, StateTransition};
