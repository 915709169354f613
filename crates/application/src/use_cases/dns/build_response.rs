use crate::ports::ResponseWriter;
use bond_dns_domain::DomainError;
use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{RData, Record};
use std::net::Ipv4Addr;
use tracing::{debug, error};

/// TTL of synthesized answers, in seconds.
pub const ANSWER_TTL: u32 = 60;

pub struct ResponseBuilder;

impl ResponseBuilder {
    /// Reply carrying a single A record for the request's question.
    pub fn answer(request: &Message, ip: Ipv4Addr) -> Result<Message, DomainError> {
        let query = request.queries().first().ok_or(DomainError::QueryShape(0))?;

        let mut reply = Self::reply_to(request);
        reply.add_answer(Record::from_rdata(
            query.name().clone(),
            ANSWER_TTL,
            RData::A(A(ip)),
        ));
        Ok(reply)
    }

    /// Empty reply with the given response code.
    pub fn error(request: &Message, code: ResponseCode) -> Message {
        let mut reply = Self::reply_to(request);
        reply.set_response_code(code);
        reply
    }

    /// Builds the answer and writes it. A write failure is terminal for the
    /// query and surfaces as [`DomainError::ResponseWrite`].
    pub async fn write_answer(
        writer: &mut dyn ResponseWriter,
        request: &Message,
        ip: Ipv4Addr,
    ) -> Result<ResponseCode, DomainError> {
        let reply = Self::answer(request, ip)?;

        if let Err(e) = writer.write_msg(&reply).await {
            error!(error = %e, "Failed to write DNS response");
            return Err(DomainError::ResponseWrite(e.to_string()));
        }

        debug!(ip = %ip, ttl = ANSWER_TTL, "Answer sent");
        Ok(ResponseCode::NoError)
    }

    fn reply_to(request: &Message) -> Message {
        let mut reply = Message::new(request.id(), MessageType::Response, request.op_code());
        reply.set_recursion_desired(request.recursion_desired());
        reply.set_checking_disabled(request.checking_disabled());
        reply.set_response_code(ResponseCode::NoError);
        if let Some(query) = request.queries().first() {
            reply.add_query(query.clone());
        }
        reply
    }
}
