use async_trait::async_trait;
use iterdns_application::ports::Resolver;
use iterdns_domain::{AaaaLayout, DomainError, Message, QueryType, Record, ResultCode};
use std::collections::HashMap;
use std::net::IpAddr;

pub fn a_record(domain: &str, ip: &str) -> Record {
    Record::A {
        domain: domain.to_string(),
        addr: ip.parse::<IpAddr>().unwrap(),
        ttl: 60,
    }
}

pub fn ns_record(zone: &str, host: &str) -> Record {
    Record::NS {
        domain: zone.to_string(),
        host: host.to_string(),
        ttl: 172800,
    }
}

/// Reply to `query` with the given rescode and records.
pub fn reply_to(
    query: &Message,
    rescode: ResultCode,
    answers: Vec<Record>,
    authorities: Vec<Record>,
    resources: Vec<Record>,
) -> Message {
    let mut reply = Message::new();
    reply.header.id = query.header.id;
    reply.header.response = true;
    reply.header.rescode = rescode;
    reply.questions = query.questions.clone();
    reply.answers = answers;
    reply.authorities = authorities;
    reply.resources = resources;
    reply
}

pub fn encode(mut message: Message) -> Vec<u8> {
    message.to_bytes(AaaaLayout::Packed).unwrap()
}

pub fn query_bytes(id: u16, qname: &str, qtype: QueryType) -> Vec<u8> {
    encode(Message::query(id, qname, qtype))
}

/// Resolver returning canned replies keyed by query name.
#[derive(Default)]
pub struct StubResolver {
    replies: HashMap<String, Message>,
}

impl StubResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(mut self, qname: &str, reply: Message) -> Self {
        self.replies.insert(qname.to_string(), reply);
        self
    }
}

#[async_trait]
impl Resolver for StubResolver {
    async fn resolve(&self, qname: &str, _qtype: QueryType) -> Result<Message, DomainError> {
        self.replies
            .get(qname)
            .cloned()
            .ok_or_else(|| DomainError::NameResolutionFailure {
                domain: qname.to_string(),
                reason: "no stub reply".to_string(),
            })
    }
}
