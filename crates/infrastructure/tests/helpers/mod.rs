mod dns_server_mock;
mod registry_stub;
mod relay_stub;
mod signer;

pub use dns_server_mock::MockUpstream;
pub use registry_stub::RegistryStub;
pub use relay_stub::{RelayScript, RelayStub};
pub use signer::Signer;
