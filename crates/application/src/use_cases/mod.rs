pub mod dns;

pub use dns::{
    AggregateRelayEventsUseCase, HandleDnsQueryUseCase, QueryExtractor, RelayQueryOptions,
    ResponseBuilder, ANSWER_TTL, HANDLER_NAME,
};
