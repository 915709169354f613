pub mod dns;
pub mod metrics;
pub mod registry;
pub mod relay;
