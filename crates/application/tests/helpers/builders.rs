use iterdns_domain::{Message, QueryType, Question, Record, ResultCode};
use std::net::{IpAddr, SocketAddr};

pub const ROOT: &str = "192.5.5.241";

pub fn ns_addr(ip: &str) -> SocketAddr {
    SocketAddr::new(ip.parse::<IpAddr>().unwrap(), 53)
}

pub fn a_record(domain: &str, ip: &str) -> Record {
    Record::A {
        domain: domain.to_string(),
        addr: ip.parse().unwrap(),
        ttl: 300,
    }
}

pub fn ns_record(zone: &str, host: &str) -> Record {
    Record::NS {
        domain: zone.to_string(),
        host: host.to_string(),
        ttl: 172800,
    }
}

pub fn soa_like(zone: &str) -> Record {
    Record::Unknown {
        domain: zone.to_string(),
        qtype: 6,
        data_len: 64,
        ttl: 900,
    }
}

fn reply(qname: &str, qtype: QueryType, rescode: ResultCode) -> Message {
    let mut message = Message::new();
    message.header.response = true;
    message.header.rescode = rescode;
    message.questions.push(Question::new(qname, qtype));
    message
}

pub fn answer(qname: &str, ip: &str) -> Message {
    let mut message = reply(qname, QueryType::A, ResultCode::NOERROR);
    message.answers.push(a_record(qname, ip));
    message
}

pub fn nxdomain(qname: &str, zone: &str) -> Message {
    let mut message = reply(qname, QueryType::A, ResultCode::NXDOMAIN);
    message.authorities.push(soa_like(zone));
    message
}

/// Referral to `zone` served by `host`, with an optional glue address.
pub fn referral(qname: &str, zone: &str, host: &str, glue: Option<&str>) -> Message {
    let mut message = reply(qname, QueryType::A, ResultCode::NOERROR);
    message.authorities.push(ns_record(zone, host));
    if let Some(ip) = glue {
        message.resources.push(a_record(host, ip));
    }
    message
}

pub fn empty_noerror(qname: &str) -> Message {
    reply(qname, QueryType::A, ResultCode::NOERROR)
}
