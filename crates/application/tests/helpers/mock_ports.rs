#![allow(dead_code)]

use async_trait::async_trait;
use bond_dns_application::ports::{
    DnsHandler, RegistryClient, RelayClient, RequestContext, RequestCounter, ResponseWriter,
};
use bond_dns_application::use_cases::ResponseBuilder;
use bond_dns_domain::{AnnouncementEvent, DomainError, NameResolution, RelayFilter};
use hickory_proto::op::{Message, ResponseCode};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Clone, Default)]
pub struct MockRegistryClient {
    responses: Arc<Mutex<HashMap<String, NameResolution>>>,
    errors: Arc<Mutex<HashMap<String, DomainError>>>,
    lookups: Arc<Mutex<Vec<String>>>,
}

impl MockRegistryClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_response(&self, domain: &str, resolution: NameResolution) {
        self.responses
            .lock()
            .unwrap()
            .insert(domain.to_string(), resolution);
    }

    pub fn set_error(&self, domain: &str, error: DomainError) {
        self.errors.lock().unwrap().insert(domain.to_string(), error);
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.lock().unwrap().len()
    }
}

#[async_trait]
impl RegistryClient for MockRegistryClient {
    async fn lookup(&self, domain: &str) -> Result<NameResolution, DomainError> {
        self.lookups.lock().unwrap().push(domain.to_string());
        if let Some(error) = self.errors.lock().unwrap().get(domain) {
            return Err(error.clone());
        }
        self.responses
            .lock()
            .unwrap()
            .get(domain)
            .cloned()
            .ok_or_else(|| DomainError::RegistryLookup(format!("No mock response for {}", domain)))
    }
}

#[derive(Clone)]
pub enum RelayBehavior {
    /// Send the events, each after the given delay, then finish.
    Events(Vec<(Duration, AnnouncementEvent)>),
    /// Fail before sending anything.
    Fail,
    /// Never answer.
    Hang,
}

impl RelayBehavior {
    pub fn immediate(events: Vec<AnnouncementEvent>) -> Self {
        Self::Events(events.into_iter().map(|e| (Duration::ZERO, e)).collect())
    }
}

#[derive(Clone, Default)]
pub struct MockRelayClient {
    relays: Arc<Mutex<HashMap<String, RelayBehavior>>>,
    fetches: Arc<Mutex<Vec<(String, RelayFilter)>>>,
    completed: Arc<AtomicUsize>,
}

impl MockRelayClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_relay(&self, relay: &str, behavior: RelayBehavior) {
        self.relays
            .lock()
            .unwrap()
            .insert(relay.to_string(), behavior);
    }

    pub fn fetches(&self) -> Vec<(String, RelayFilter)> {
        self.fetches.lock().unwrap().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.lock().unwrap().len()
    }

    /// Subscriptions that ran to completion rather than being cancelled.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RelayClient for MockRelayClient {
    async fn fetch(
        &self,
        relay: &str,
        filter: &RelayFilter,
        events: mpsc::Sender<AnnouncementEvent>,
    ) -> Result<(), DomainError> {
        self.fetches
            .lock()
            .unwrap()
            .push((relay.to_string(), filter.clone()));

        let behavior = self.relays.lock().unwrap().get(relay).cloned();

        match behavior {
            Some(RelayBehavior::Events(scripted)) => {
                for (delay, event) in scripted {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    if events.send(event).await.is_err() {
                        break;
                    }
                }
                self.completed.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
            Some(RelayBehavior::Hang) => {
                std::future::pending::<()>().await;
                Ok(())
            }
            Some(RelayBehavior::Fail) | None => Err(DomainError::RelayFailure {
                relay: relay.to_string(),
                reason: "connection refused".to_string(),
            }),
        }
    }
}

#[derive(Default)]
pub struct InMemoryRequestCounter {
    counts: Mutex<HashMap<String, u64>>,
}

impl InMemoryRequestCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, server: &str) -> u64 {
        self.counts
            .lock()
            .unwrap()
            .get(server)
            .copied()
            .unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.lock().unwrap().values().sum()
    }
}

impl RequestCounter for InMemoryRequestCounter {
    fn increment(&self, server: &str) {
        *self
            .counts
            .lock()
            .unwrap()
            .entry(server.to_string())
            .or_insert(0) += 1;
    }
}

/// Next handler that answers every query with a fixed response code.
pub struct MockNextHandler {
    rcode: ResponseCode,
    calls: AtomicUsize,
}

impl MockNextHandler {
    pub fn answering(rcode: ResponseCode) -> Self {
        Self {
            rcode,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DnsHandler for MockNextHandler {
    async fn serve_dns(
        &self,
        _ctx: &RequestContext,
        writer: &mut dyn ResponseWriter,
        request: &Message,
    ) -> Result<ResponseCode, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        writer
            .write_msg(&ResponseBuilder::error(request, self.rcode))
            .await?;
        Ok(self.rcode)
    }

    fn name(&self) -> &'static str {
        "mock-next"
    }
}

#[derive(Default)]
pub struct MemoryResponseWriter {
    pub written: Vec<Message>,
}

impl MemoryResponseWriter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResponseWriter for MemoryResponseWriter {
    async fn write_msg(&mut self, response: &Message) -> Result<(), DomainError> {
        self.written.push(response.clone());
        Ok(())
    }
}

pub struct FailingResponseWriter;

#[async_trait]
impl ResponseWriter for FailingResponseWriter {
    async fn write_msg(&mut self, _response: &Message) -> Result<(), DomainError> {
        Err(DomainError::Transport("broken pipe".to_string()))
    }
}
