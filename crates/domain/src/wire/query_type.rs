use std::fmt;
use std::str::FromStr;

/// Record/query type tag. Unrecognised codes are carried through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryType {
    Unknown(u16),
    A,
    NS,
    CNAME,
    MX,
    AAAA,
}

impl QueryType {
    pub fn to_num(self) -> u16 {
        match self {
            QueryType::Unknown(num) => num,
            QueryType::A => 1,
            QueryType::NS => 2,
            QueryType::CNAME => 5,
            QueryType::MX => 15,
            QueryType::AAAA => 28,
        }
    }

    pub fn from_num(num: u16) -> Self {
        match num {
            1 => QueryType::A,
            2 => QueryType::NS,
            5 => QueryType::CNAME,
            15 => QueryType::MX,
            28 => QueryType::AAAA,
            _ => QueryType::Unknown(num),
        }
    }

    pub fn is_known(self) -> bool {
        !matches!(self, QueryType::Unknown(_))
    }
}

impl From<u16> for QueryType {
    fn from(num: u16) -> Self {
        Self::from_num(num)
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryType::Unknown(num) => write!(f, "TYPE{}", num),
            QueryType::A => write!(f, "A"),
            QueryType::NS => write!(f, "NS"),
            QueryType::CNAME => write!(f, "CNAME"),
            QueryType::MX => write!(f, "MX"),
            QueryType::AAAA => write!(f, "AAAA"),
        }
    }
}

impl FromStr for QueryType {
    type Err = String;

    /// Accepts mnemonics (`"mx"`, `"AAAA"`), `TYPEnn` notation, or a bare number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        match upper.as_str() {
            "A" => return Ok(QueryType::A),
            "NS" => return Ok(QueryType::NS),
            "CNAME" => return Ok(QueryType::CNAME),
            "MX" => return Ok(QueryType::MX),
            "AAAA" => return Ok(QueryType::AAAA),
            _ => {}
        }
        upper
            .strip_prefix("TYPE")
            .unwrap_or(&upper)
            .parse::<u16>()
            .map(QueryType::from_num)
            .map_err(|_| format!("Invalid query type '{}'", s))
    }
}
