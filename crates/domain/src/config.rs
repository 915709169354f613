pub mod bond;
pub mod errors;
pub mod fallthrough;
pub mod logging;
pub mod root;
pub mod server;

pub use bond::{BondConfig, BondDirective, RegistryEndpoint};
pub use errors::ConfigError;
pub use fallthrough::FallthroughConfig;
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
