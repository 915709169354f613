use bond_dns_domain::DomainError;
use hickory_proto::op::Message;
use tracing::info;

pub struct QueryExtractor;

impl QueryExtractor {
    /// Returns the name of the single question without its trailing root
    /// label. Messages with zero or several questions are rejected.
    pub fn extract(request: &Message) -> Result<String, DomainError> {
        let query = match request.queries() {
            [query] => query,
            queries => return Err(DomainError::QueryShape(queries.len())),
        };
        let qname = query.name().to_utf8();
        let domain = Self::normalize(&qname).to_string();

        info!(domain = %domain, "Requested domain");
        Ok(domain)
    }

    /// Strips a single trailing `.`; anything else is returned unchanged.
    pub fn normalize(qname: &str) -> &str {
        qname.strip_suffix('.').unwrap_or(qname)
    }
}
