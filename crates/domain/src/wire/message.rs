use super::{AaaaLayout, Header, QueryType, Question, Record, WireBuffer};
use crate::errors::WireError;
use std::fmt;
use std::net::IpAddr;

/// A full DNS message: header, questions and the three record sections.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<Record>,
    pub authorities: Vec<Record>,
    pub resources: Vec<Record>,
}

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a single-question query with recursion desired.
    pub fn query(id: u16, name: &str, qtype: QueryType) -> Self {
        let mut message = Self::new();
        message.header.id = id;
        message.header.recursion_desired = true;
        message.questions.push(Question::new(name, qtype));
        message.header.questions = 1;
        message
    }

    pub fn from_buffer(buffer: &mut WireBuffer) -> Result<Self, WireError> {
        let header = Header::read(buffer)?;

        // Counts come from the peer; the vectors grow only as records parse.
        let mut message = Self {
            header,
            questions: Vec::new(),
            answers: Vec::new(),
            authorities: Vec::new(),
            resources: Vec::new(),
        };

        for _ in 0..message.header.questions {
            message.questions.push(Question::read(buffer)?);
        }
        for _ in 0..message.header.answers {
            message.answers.push(Record::read(buffer)?);
        }
        for _ in 0..message.header.authoritative_entries {
            message.authorities.push(Record::read(buffer)?);
        }
        for _ in 0..message.header.resource_entries {
            message.resources.push(Record::read(buffer)?);
        }

        Ok(message)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WireError> {
        let mut buffer = WireBuffer::from_bytes(bytes)?;
        Self::from_buffer(&mut buffer)
    }

    pub fn write(&mut self, buffer: &mut WireBuffer) -> Result<(), WireError> {
        self.write_with_layout(buffer, AaaaLayout::Packed)
    }

    /// Serializes the message. Section counts are recomputed from the lists
    /// first, overriding whatever the header held.
    pub fn write_with_layout(
        &mut self,
        buffer: &mut WireBuffer,
        aaaa_layout: AaaaLayout,
    ) -> Result<(), WireError> {
        self.header.questions = section_count(self.questions.len());
        self.header.answers = section_count(self.answers.len());
        self.header.authoritative_entries = section_count(self.authorities.len());
        self.header.resource_entries = section_count(self.resources.len());

        self.header.write(buffer)?;

        for question in &self.questions {
            question.write(buffer)?;
        }
        for record in self
            .answers
            .iter()
            .chain(&self.authorities)
            .chain(&self.resources)
        {
            record.write_with_layout(buffer, aaaa_layout)?;
        }

        Ok(())
    }

    pub fn to_bytes(&mut self, aaaa_layout: AaaaLayout) -> Result<Vec<u8>, WireError> {
        let mut buffer = WireBuffer::new();
        self.write_with_layout(&mut buffer, aaaa_layout)?;
        Ok(buffer.filled().to_vec())
    }

    /// A-record addresses from the answer section, in order.
    pub fn answer_addrs(&self) -> impl Iterator<Item = IpAddr> + '_ {
        self.answers.iter().filter_map(|record| match record {
            Record::A { addr, .. } => Some(*addr),
            _ => None,
        })
    }

    pub fn first_a(&self) -> Option<IpAddr> {
        self.answer_addrs().next()
    }

    /// `(zone, host)` pairs for authority NS records whose zone is a suffix of
    /// `qname`.
    pub fn delegations<'a>(&'a self, qname: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.authorities.iter().filter_map(move |record| match record {
            Record::NS { domain, host, .. } if qname.ends_with(domain.as_str()) => {
                Some((domain.as_str(), host.as_str()))
            }
            _ => None,
        })
    }

    /// Glue addresses: additional-section A records owned by one of the
    /// delegated name servers.
    pub fn resolved_ns<'a>(&'a self, qname: &'a str) -> impl Iterator<Item = IpAddr> + 'a {
        self.resources.iter().filter_map(move |record| match record {
            Record::A { domain, addr, .. }
                if self.delegations(qname).any(|(_, host)| host == domain.as_str()) =>
            {
                Some(*addr)
            }
            _ => None,
        })
    }

    /// Delegated name server hostnames, glue or not.
    pub fn unresolved_ns<'a>(&'a self, qname: &'a str) -> impl Iterator<Item = &'a str> {
        self.delegations(qname).map(|(_, host)| host)
    }
}

fn section_count(len: usize) -> u16 {
    u16::try_from(len).unwrap_or(u16::MAX)
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = &self.header;
        writeln!(
            f,
            ";; id: {} opcode: {} status: {} qr: {} aa: {} tc: {} rd: {} ra: {}",
            h.id,
            h.opcode,
            h.rescode,
            h.response,
            h.authoritative_answer,
            h.truncated_message,
            h.recursion_desired,
            h.recursion_available
        )?;

        writeln!(f, ";; QUESTION SECTION:")?;
        for question in &self.questions {
            writeln!(f, "{} IN {}", question.name, question.qtype)?;
        }

        for (title, records) in [
            ("ANSWER", &self.answers),
            ("AUTHORITY", &self.authorities),
            ("ADDITIONAL", &self.resources),
        ] {
            if records.is_empty() {
                continue;
            }
            writeln!(f, ";; {} SECTION:", title)?;
            for record in records {
                writeln!(f, "{}", record)?;
            }
        }

        Ok(())
    }
}
