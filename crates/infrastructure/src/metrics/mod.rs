pub mod request_counter;

pub use request_counter::{render, PrometheusRequestCounter};
