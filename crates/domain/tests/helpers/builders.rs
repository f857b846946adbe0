use iterdns_domain::{Message, QueryType, Question, Record, ResultCode};
use std::net::IpAddr;

/// Appends `name` to `buf` as uncompressed labels.
pub fn push_name(buf: &mut Vec<u8>, name: &str) {
    for label in name.split('.').filter(|l| !l.is_empty()) {
        buf.push(label.len() as u8);
        buf.extend_from_slice(label.as_bytes());
    }
    buf.push(0x00);
}

pub fn a_record(domain: &str, ip: &str, ttl: u32) -> Record {
    Record::A {
        domain: domain.to_string(),
        addr: ip.parse::<IpAddr>().unwrap(),
        ttl,
    }
}

pub fn ns_record(zone: &str, host: &str) -> Record {
    Record::NS {
        domain: zone.to_string(),
        host: host.to_string(),
        ttl: 172800,
    }
}

pub struct MessageBuilder {
    message: Message,
}

impl MessageBuilder {
    pub fn new(id: u16) -> Self {
        let mut message = Message::new();
        message.header.id = id;
        Self { message }
    }

    pub fn response(mut self, rescode: ResultCode) -> Self {
        self.message.header.response = true;
        self.message.header.rescode = rescode;
        self
    }

    pub fn question(mut self, name: &str, qtype: QueryType) -> Self {
        self.message.questions.push(Question::new(name, qtype));
        self
    }

    pub fn answer(mut self, record: Record) -> Self {
        self.message.answers.push(record);
        self
    }

    pub fn authority(mut self, record: Record) -> Self {
        self.message.authorities.push(record);
        self
    }

    pub fn additional(mut self, record: Record) -> Self {
        self.message.resources.push(record);
        self
    }

    pub fn build(self) -> Message {
        self.message
    }
}
