/// Monotonic count of requests served, labeled by serving server.
pub trait RequestCounter: Send + Sync {
    fn increment(&self, server: &str);
}
