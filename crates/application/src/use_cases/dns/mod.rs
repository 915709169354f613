mod aggregate_relay_events;
mod build_response;
mod extract_query;
mod handle_dns_query;

pub use aggregate_relay_events::{AggregateRelayEventsUseCase, RelayQueryOptions};
pub use build_response::{ResponseBuilder, ANSWER_TTL};
pub use extract_query::QueryExtractor;
pub use handle_dns_query::{HandleDnsQueryUseCase, HANDLER_NAME};
