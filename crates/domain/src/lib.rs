//! Bond DNS Domain Layer
pub mod announcement;
pub mod config;
pub mod errors;
pub mod identity;
pub mod name_resolution;
pub mod relay_filter;

pub use announcement::{AddressSelector, AnnouncementEvent, ResolvedAddress};
pub use config::{CliOverrides, Config, ConfigError, RegistryEndpoint};
pub use errors::DomainError;
pub use identity::{DecodedIdentity, PublicKey};
pub use name_resolution::NameResolution;
pub use relay_filter::{EventKind, RelayFilter};
