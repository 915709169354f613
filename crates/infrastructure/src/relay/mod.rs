pub mod event;
pub mod message;
pub mod websocket;

pub use event::RelayEvent;
pub use message::{ClientMessage, RelayMessage};
pub use websocket::WebSocketRelayClient;
