mod dns_handler;
mod registry_client;
mod relay_client;
mod request_counter;

pub use dns_handler::{client_writes, DnsHandler, RequestContext, ResponseWriter};
pub use registry_client::RegistryClient;
pub use relay_client::RelayClient;
pub use request_counter::RequestCounter;
