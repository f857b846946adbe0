use iterdns_application::use_cases::HandleQueryUseCase;
use iterdns_domain::{AaaaLayout, Message};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Bridges raw inbound datagrams to [`HandleQueryUseCase`].
#[derive(Clone)]
pub struct DnsServerHandler {
    use_case: Arc<HandleQueryUseCase>,
    aaaa_layout: AaaaLayout,
}

impl DnsServerHandler {
    pub fn new(use_case: Arc<HandleQueryUseCase>) -> Self {
        Self {
            use_case,
            aaaa_layout: AaaaLayout::default(),
        }
    }

    pub fn with_aaaa_layout(mut self, aaaa_layout: AaaaLayout) -> Self {
        self.aaaa_layout = aaaa_layout;
        self
    }

    /// Returns the serialized reply for one inbound datagram, or `None` when
    /// nothing sensible can be sent back.
    pub async fn handle_raw_udp(&self, query_buf: &[u8]) -> Option<Vec<u8>> {
        let request = match Message::from_bytes(query_buf) {
            Ok(request) => request,
            Err(e) => {
                let id = query_buf.get(..2)?;
                let id = u16::from_be_bytes([id[0], id[1]]);
                warn!(id, bytes = query_buf.len(), error = %e, "Malformed DNS query");
                return self.serialize(HandleQueryUseCase::format_error(id));
            }
        };

        debug!(
            id = request.header.id,
            questions = request.questions.len(),
            "DNS query received"
        );

        let mut reply = self.use_case.execute(&request).await;
        match reply.to_bytes(self.aaaa_layout) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!(id = request.header.id, error = %e, "Reply not serializable, sending SERVFAIL");
                self.serialize(HandleQueryUseCase::server_failure(&request))
            }
        }
    }

    fn serialize(&self, mut reply: Message) -> Option<Vec<u8>> {
        match reply.to_bytes(self.aaaa_layout) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                error!(id = reply.header.id, error = %e, "Failed to serialize error reply");
                None
            }
        }
    }
}
