use async_trait::async_trait;
use iterdns_application::ports::UpstreamExchange;
use iterdns_domain::{DomainError, Message, QueryType};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub struct SentQuery {
    pub server: SocketAddr,
    pub qname: String,
    pub qtype: QueryType,
    pub recursion_desired: bool,
}

/// Upstream scripted per `(server, qname)`; every outbound query is recorded.
#[derive(Clone, Default)]
pub struct MockUpstream {
    replies: Arc<Mutex<HashMap<(SocketAddr, String), Result<Message, DomainError>>>>,
    sent: Arc<Mutex<Vec<SentQuery>>>,
}

impl MockUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, server: SocketAddr, qname: &str, reply: Message) {
        self.replies
            .lock()
            .unwrap()
            .insert((server, qname.to_string()), Ok(reply));
    }

    pub fn fail(&self, server: SocketAddr, qname: &str, error: DomainError) {
        self.replies
            .lock()
            .unwrap()
            .insert((server, qname.to_string()), Err(error));
    }

    pub fn sent(&self) -> Vec<SentQuery> {
        self.sent.lock().unwrap().clone()
    }

    pub fn destinations(&self) -> Vec<SocketAddr> {
        self.sent().into_iter().map(|q| q.server).collect()
    }
}

#[async_trait]
impl UpstreamExchange for MockUpstream {
    async fn query(&self, server: SocketAddr, request: Message) -> Result<Message, DomainError> {
        let question = request
            .questions
            .first()
            .cloned()
            .ok_or_else(|| DomainError::InvalidDnsResponse("query without question".into()))?;

        self.sent.lock().unwrap().push(SentQuery {
            server,
            qname: question.name.clone(),
            qtype: question.qtype,
            recursion_desired: request.header.recursion_desired,
        });

        let scripted = self
            .replies
            .lock()
            .unwrap()
            .get(&(server, question.name.clone()))
            .cloned();

        match scripted {
            Some(Ok(mut reply)) => {
                reply.header.id = request.header.id;
                Ok(reply)
            }
            Some(Err(e)) => Err(e),
            None => Err(DomainError::TransportTimeout {
                server: server.to_string(),
            }),
        }
    }
}
