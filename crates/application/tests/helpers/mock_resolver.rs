use async_trait::async_trait;
use iterdns_application::ports::Resolver;
use iterdns_domain::{DomainError, Message, QueryType};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct MockResolver {
    results: Arc<Mutex<HashMap<String, Result<Message, DomainError>>>>,
    calls: Arc<Mutex<Vec<(String, QueryType)>>>,
}

impl MockResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_response(&self, qname: &str, reply: Message) {
        self.results
            .lock()
            .unwrap()
            .insert(qname.to_string(), Ok(reply));
    }

    pub fn set_error(&self, qname: &str, error: DomainError) {
        self.results
            .lock()
            .unwrap()
            .insert(qname.to_string(), Err(error));
    }

    pub fn calls(&self) -> Vec<(String, QueryType)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Resolver for MockResolver {
    async fn resolve(&self, qname: &str, qtype: QueryType) -> Result<Message, DomainError> {
        self.calls.lock().unwrap().push((qname.to_string(), qtype));
        self.results
            .lock()
            .unwrap()
            .get(qname)
            .cloned()
            .unwrap_or_else(|| {
                Err(DomainError::NameResolutionFailure {
                    domain: qname.to_string(),
                    reason: "not scripted".to_string(),
                })
            })
    }
}
