// Rural Ledger - Core Library
// In-memory revenue ledger, client registry, sensor link, and the HTTP API over them

pub mod category;
pub mod config;
pub mod error;
pub mod hardware;
pub mod ledger;
pub mod money;
pub mod registry;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use category::{DataCategory, FALLBACK_PRICE};
pub use config::ServerConfig;
pub use error::{HardwareError, LedgerError};
pub use hardware::{Disconnected, HardwareReading, SensorLink, SensorReading, Simulator};
pub use ledger::{Ledger, LedgerConfig, LedgerSnapshot, Transaction, TransactionStatus};
pub use money::Money;
pub use registry::{Client, ClientRegistry};

#[cfg(feature = "server")]
pub use api::{router, ApiError, AppState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
