use crate::ports::Resolver;
use iterdns_domain::{Message, Record, ResultCode};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// Turns one inbound query into the reply sent back to the client.
pub struct HandleQueryUseCase {
    resolver: Arc<dyn Resolver>,
}

impl HandleQueryUseCase {
    pub fn new(resolver: Arc<dyn Resolver>) -> Self {
        Self { resolver }
    }

    /// Always produces a reply. Missing questions map to FORMERR and resolver
    /// failures to SERVFAIL; otherwise the resolved sections are forwarded.
    pub async fn execute(&self, request: &Message) -> Message {
        let mut reply = Self::reply_skeleton(request.header.id);

        let Some(question) = request.questions.first() else {
            warn!(id = request.header.id, "Query without question");
            reply.header.rescode = ResultCode::FORMERR;
            return reply;
        };
        reply.questions.push(question.clone());

        let start = Instant::now();
        match self.resolver.resolve(&question.name, question.qtype).await {
            Ok(resolved) => {
                info!(
                    domain = %question.name,
                    record_type = %question.qtype,
                    rescode = %resolved.header.rescode,
                    answers = resolved.answers.len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Query resolved"
                );
                reply.header.rescode = resolved.header.rescode;
                reply.answers = forwardable(resolved.answers);
                reply.authorities = forwardable(resolved.authorities);
                reply.resources = forwardable(resolved.resources);
            }
            Err(e) => {
                error!(
                    domain = %question.name,
                    record_type = %question.qtype,
                    error = %e,
                    "Resolution failed"
                );
                reply.header.rescode = ResultCode::SERVFAIL;
            }
        }

        reply
    }

    /// Reply sent for a datagram that could not be parsed at all.
    pub fn format_error(id: u16) -> Message {
        let mut reply = Self::reply_skeleton(id);
        reply.header.rescode = ResultCode::FORMERR;
        reply
    }

    /// Reply sent when the resolved answer cannot be serialized.
    pub fn server_failure(request: &Message) -> Message {
        let mut reply = Self::reply_skeleton(request.header.id);
        reply.questions = request.questions.iter().take(1).cloned().collect();
        reply.header.rescode = ResultCode::SERVFAIL;
        reply
    }

    fn reply_skeleton(id: u16) -> Message {
        let mut reply = Message::new();
        reply.header.id = id;
        reply.header.response = true;
        reply.header.recursion_desired = true;
        reply.header.recursion_available = true;
        reply
    }
}

fn forwardable(records: Vec<Record>) -> Vec<Record> {
    records.into_iter().filter(Record::is_writable).collect()
}
