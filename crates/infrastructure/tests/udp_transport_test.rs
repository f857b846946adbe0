mod helpers;

use helpers::{a_record, encode, ns_record, reply_to, MockDnsServer};
use iterdns_application::ports::{Resolver, UpstreamExchange};
use iterdns_application::use_cases::RecursiveResolver;
use iterdns_domain::{DomainError, Message, QueryType, ResolverConfig, ResultCode};
use iterdns_infrastructure::dns::UdpTransport;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;

fn answering(ip: &'static str) -> impl Fn(usize, &Message) -> Option<Vec<u8>> + Send + Sync {
    move |_, query| {
        let name = query.questions[0].name.clone();
        Some(encode(reply_to(
            query,
            ResultCode::NOERROR,
            vec![a_record(&name, ip)],
            vec![],
            vec![],
        )))
    }
}

#[tokio::test]
async fn test_query_returns_parsed_reply() {
    let server = MockDnsServer::start(answering("93.184.216.34")).await.unwrap();
    let transport = UdpTransport::new(Duration::from_secs(2));

    let reply = transport
        .query(server.addr(), Message::query(0x2222, "example.com", QueryType::A))
        .await
        .unwrap();

    assert_eq!(reply.header.id, 0x2222);
    assert!(reply.header.response);
    assert_eq!(reply.first_a(), Some("93.184.216.34".parse::<IpAddr>().unwrap()));
    assert_eq!(server.received(), 1);
}

#[tokio::test]
async fn test_reply_with_wrong_id_is_discarded_until_timeout() {
    let server = MockDnsServer::start(|_, query| {
        let mut reply = reply_to(query, ResultCode::NOERROR, vec![], vec![], vec![]);
        reply.header.id = query.header.id.wrapping_add(1);
        Some(encode(reply))
    })
    .await
    .unwrap();
    let transport = UdpTransport::new(Duration::from_millis(200));

    let err = transport
        .query(server.addr(), Message::query(7, "example.com", QueryType::A))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::TransportTimeout { .. }));
    assert_eq!(server.received(), 1);
}

#[tokio::test]
async fn test_stray_reply_does_not_abort_exchange() {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = socket.local_addr().unwrap();

    tokio::spawn(async move {
        let mut buf = [0u8; 512];
        let (len, peer) = socket.recv_from(&mut buf).await.unwrap();
        let query = Message::from_bytes(&buf[..len]).unwrap();

        let mut stray = reply_to(&query, ResultCode::SERVFAIL, vec![], vec![], vec![]);
        stray.header.id = query.header.id ^ 0xFFFF;
        socket.send_to(&encode(stray), peer).await.unwrap();

        let reply = reply_to(
            &query,
            ResultCode::NOERROR,
            vec![a_record("example.com", "192.0.2.1")],
            vec![],
            vec![],
        );
        socket.send_to(&encode(reply), peer).await.unwrap();
    });

    let transport = UdpTransport::new(Duration::from_secs(2));
    let reply = transport
        .query(addr, Message::query(0x4242, "example.com", QueryType::A))
        .await
        .unwrap();

    assert_eq!(reply.header.id, 0x4242);
    assert_eq!(reply.header.rescode, ResultCode::NOERROR);
    assert_eq!(reply.first_a(), Some("192.0.2.1".parse::<IpAddr>().unwrap()));
}

#[tokio::test]
async fn test_silent_server_times_out_after_all_attempts() {
    let server = MockDnsServer::start(|_, _| None).await.unwrap();
    let transport = UdpTransport::new(Duration::from_millis(100)).with_attempts(3);

    let err = transport
        .query(server.addr(), Message::query(1, "example.com", QueryType::A))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::TransportTimeout { .. }));
    assert_eq!(server.received(), 3);
}

#[tokio::test]
async fn test_timeout_is_retried_until_answer_arrives() {
    let answer = answering("10.0.0.1");
    let server = MockDnsServer::start(move |index, query| {
        if index == 0 {
            None
        } else {
            answer(index, query)
        }
    })
    .await
    .unwrap();
    let transport = UdpTransport::new(Duration::from_millis(150)).with_attempts(2);

    let reply = transport
        .query(server.addr(), Message::query(3, "retry.test", QueryType::A))
        .await
        .unwrap();

    assert_eq!(reply.answers.len(), 1);
    assert_eq!(server.received(), 2);
}

#[tokio::test]
async fn test_unwritable_request_fails_before_sending() {
    let server = MockDnsServer::start(answering("10.0.0.1")).await.unwrap();
    let transport = UdpTransport::new(Duration::from_millis(100));
    let long_label = "a".repeat(64);

    let err = transport
        .query(
            server.addr(),
            Message::query(1, &format!("{}.test", long_label), QueryType::A),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Wire(_)));
    assert_eq!(server.received(), 0);
}

#[tokio::test]
async fn test_resolver_walks_referral_over_loopback() {
    let server = MockDnsServer::start(|index, query| {
        let qname = query.questions[0].name.clone();
        let reply = if index == 0 {
            reply_to(
                query,
                ResultCode::NOERROR,
                vec![],
                vec![ns_record("test", "ns.loopback.test")],
                vec![a_record("ns.loopback.test", "127.0.0.1")],
            )
        } else {
            reply_to(
                query,
                ResultCode::NOERROR,
                vec![a_record(&qname, "192.0.2.7")],
                vec![],
                vec![],
            )
        };
        Some(encode(reply))
    })
    .await
    .unwrap();

    let config = ResolverConfig {
        upstream_port: server.addr().port(),
        ..ResolverConfig::default()
    }
    .with_root_server(Ipv4Addr::LOCALHOST)
    .with_timeout(1000);
    let resolver = RecursiveResolver::new(Arc::new(UdpTransport::from_config(&config)), &config);

    let reply = resolver.resolve("www.loopback.test", QueryType::A).await.unwrap();

    assert_eq!(reply.first_a(), Some("192.0.2.7".parse::<IpAddr>().unwrap()));
    assert_eq!(server.received(), 2);
}
