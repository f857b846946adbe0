//! RFC 1035 message codec over a fixed 512-byte buffer.

pub mod buffer;
pub mod header;
pub mod message;
pub mod query_type;
pub mod question;
pub mod record;
pub mod result_code;

pub use buffer::{WireBuffer, MAX_COMPRESSION_JUMPS, MAX_LABEL_LEN, MAX_MESSAGE_SIZE};
pub use header::Header;
pub use message::Message;
pub use query_type::QueryType;
pub use question::Question;
pub use record::{AaaaLayout, Record};
pub use result_code::ResultCode;
