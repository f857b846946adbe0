//! Resource record variants and their wire layouts.

use super::question::CLASS_IN;
use super::{QueryType, WireBuffer};
use crate::errors::WireError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use tracing::debug;

/// How AAAA payloads are emitted.
///
/// Reading is layout-independent: four 32-bit words split into eight 16-bit
/// segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AaaaLayout {
    /// Sixteen address octets (RFC 3596).
    #[default]
    Packed,
    /// Each address octet widened to a 16-bit word (32 payload bytes) while
    /// RDLENGTH still claims 16. Kept for peers that expect this framing.
    Widened,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    /// Any type without a dedicated variant. The payload is skipped on read,
    /// so the record cannot be written back.
    Unknown {
        domain: String,
        qtype: u16,
        data_len: u16,
        ttl: u32,
    },
    A {
        domain: String,
        addr: IpAddr,
        ttl: u32,
    },
    NS {
        domain: String,
        host: String,
        ttl: u32,
    },
    CNAME {
        domain: String,
        host: String,
        ttl: u32,
    },
    MX {
        domain: String,
        priority: u16,
        host: String,
        ttl: u32,
    },
    AAAA {
        domain: String,
        addr: Ipv6Addr,
        ttl: u32,
    },
}

impl Record {
    pub fn domain(&self) -> &str {
        match self {
            Record::Unknown { domain, .. }
            | Record::A { domain, .. }
            | Record::NS { domain, .. }
            | Record::CNAME { domain, .. }
            | Record::MX { domain, .. }
            | Record::AAAA { domain, .. } => domain,
        }
    }

    pub fn ttl(&self) -> u32 {
        match self {
            Record::Unknown { ttl, .. }
            | Record::A { ttl, .. }
            | Record::NS { ttl, .. }
            | Record::CNAME { ttl, .. }
            | Record::MX { ttl, .. }
            | Record::AAAA { ttl, .. } => *ttl,
        }
    }

    pub fn query_type(&self) -> QueryType {
        match self {
            Record::Unknown { qtype, .. } => QueryType::from_num(*qtype),
            Record::A { .. } => QueryType::A,
            Record::NS { .. } => QueryType::NS,
            Record::CNAME { .. } => QueryType::CNAME,
            Record::MX { .. } => QueryType::MX,
            Record::AAAA { .. } => QueryType::AAAA,
        }
    }

    pub fn is_writable(&self) -> bool {
        !matches!(self, Record::Unknown { .. })
    }

    pub fn read(buffer: &mut WireBuffer) -> Result<Self, WireError> {
        let domain = buffer.read_qname()?;

        let qtype_num = buffer.read_u16()?;
        let _class = buffer.read_u16()?;
        let ttl = buffer.read_u32()?;
        let data_len = buffer.read_u16()?;

        match QueryType::from_num(qtype_num) {
            QueryType::A => {
                let raw_addr = buffer.read_u32()?;
                Ok(Record::A {
                    domain,
                    addr: IpAddr::V4(Ipv4Addr::from(raw_addr)),
                    ttl,
                })
            }
            QueryType::AAAA => {
                let mut segments = [0u16; 8];
                for pair in segments.chunks_exact_mut(2) {
                    let raw = buffer.read_u32()?;
                    pair[0] = (raw >> 16) as u16;
                    pair[1] = (raw & 0xFFFF) as u16;
                }
                Ok(Record::AAAA {
                    domain,
                    addr: Ipv6Addr::from(segments),
                    ttl,
                })
            }
            QueryType::NS => {
                let host = buffer.read_qname()?;
                Ok(Record::NS { domain, host, ttl })
            }
            QueryType::CNAME => {
                let host = buffer.read_qname()?;
                Ok(Record::CNAME { domain, host, ttl })
            }
            QueryType::MX => {
                let priority = buffer.read_u16()?;
                let host = buffer.read_qname()?;
                Ok(Record::MX {
                    domain,
                    priority,
                    host,
                    ttl,
                })
            }
            QueryType::Unknown(_) => {
                debug!(
                    domain = %domain,
                    qtype = qtype_num,
                    data_len,
                    "Skipping record of unsupported type"
                );
                buffer.step(data_len as usize)?;
                Ok(Record::Unknown {
                    domain,
                    qtype: qtype_num,
                    data_len,
                    ttl,
                })
            }
        }
    }

    /// Writes the record with the default (packed) AAAA layout and returns the
    /// number of bytes emitted.
    pub fn write(&self, buffer: &mut WireBuffer) -> Result<usize, WireError> {
        self.write_with_layout(buffer, AaaaLayout::Packed)
    }

    pub fn write_with_layout(
        &self,
        buffer: &mut WireBuffer,
        aaaa_layout: AaaaLayout,
    ) -> Result<usize, WireError> {
        let start_pos = buffer.pos();

        match self {
            Record::Unknown { qtype, .. } => {
                return Err(WireError::UnsupportedRecordWrite { qtype: *qtype });
            }
            Record::A { domain, addr, ttl } => {
                let octets = ipv4_octets(addr)?;
                write_preamble(buffer, domain, QueryType::A, *ttl)?;
                buffer.write_u16(4)?;
                for octet in octets {
                    buffer.write_u8(octet)?;
                }
            }
            Record::NS { domain, host, ttl } => {
                write_preamble(buffer, domain, QueryType::NS, *ttl)?;
                let len_pos = buffer.pos();
                buffer.write_u16(0)?;
                buffer.write_qname(host)?;
                patch_rdlength(buffer, len_pos)?;
            }
            Record::CNAME { domain, host, ttl } => {
                write_preamble(buffer, domain, QueryType::CNAME, *ttl)?;
                let len_pos = buffer.pos();
                buffer.write_u16(0)?;
                buffer.write_qname(host)?;
                patch_rdlength(buffer, len_pos)?;
            }
            Record::MX {
                domain,
                priority,
                host,
                ttl,
            } => {
                write_preamble(buffer, domain, QueryType::MX, *ttl)?;
                let len_pos = buffer.pos();
                buffer.write_u16(0)?;
                buffer.write_u16(*priority)?;
                buffer.write_qname(host)?;
                patch_rdlength(buffer, len_pos)?;
            }
            Record::AAAA { domain, addr, ttl } => {
                write_preamble(buffer, domain, QueryType::AAAA, *ttl)?;
                buffer.write_u16(16)?;
                match aaaa_layout {
                    AaaaLayout::Packed => {
                        for octet in addr.octets() {
                            buffer.write_u8(octet)?;
                        }
                    }
                    AaaaLayout::Widened => {
                        for octet in addr.octets() {
                            buffer.write_u16(octet as u16)?;
                        }
                    }
                }
            }
        }

        Ok(buffer.pos() - start_pos)
    }
}

fn ipv4_octets(addr: &IpAddr) -> Result<[u8; 4], WireError> {
    match addr {
        IpAddr::V4(v4) => Ok(v4.octets()),
        IpAddr::V6(v6) => v6
            .to_ipv4_mapped()
            .map(|v4| v4.octets())
            .ok_or(WireError::InvalidAddress { addr: *addr }),
    }
}

fn write_preamble(
    buffer: &mut WireBuffer,
    domain: &str,
    qtype: QueryType,
    ttl: u32,
) -> Result<(), WireError> {
    buffer.write_qname(domain)?;
    buffer.write_u16(qtype.to_num())?;
    buffer.write_u16(CLASS_IN)?;
    buffer.write_u32(ttl)
}

fn patch_rdlength(buffer: &mut WireBuffer, len_pos: usize) -> Result<(), WireError> {
    let size = buffer.pos() - (len_pos + 2);
    buffer.set_u16(len_pos, size as u16)
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let domain = self.domain();
        let ttl = self.ttl();
        match self {
            Record::Unknown {
                qtype, data_len, ..
            } => write!(
                f,
                "{} {} IN TYPE{} ({} bytes skipped)",
                domain, ttl, qtype, data_len
            ),
            Record::A { addr, .. } => write!(f, "{} {} IN A {}", domain, ttl, addr),
            Record::NS { host, .. } => write!(f, "{} {} IN NS {}", domain, ttl, host),
            Record::CNAME { host, .. } => write!(f, "{} {} IN CNAME {}", domain, ttl, host),
            Record::MX { priority, host, .. } => {
                write!(f, "{} {} IN MX {} {}", domain, ttl, priority, host)
            }
            Record::AAAA { addr, .. } => write!(f, "{} {} IN AAAA {}", domain, ttl, addr),
        }
    }
}
