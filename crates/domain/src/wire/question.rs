use super::{QueryType, WireBuffer};
use crate::errors::WireError;

/// Query class IN; the only class this codec reads or writes.
pub const CLASS_IN: u16 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub name: String,
    pub qtype: QueryType,
}

impl Question {
    pub fn new(name: impl Into<String>, qtype: QueryType) -> Self {
        Self {
            name: name.into(),
            qtype,
        }
    }

    pub fn read(buffer: &mut WireBuffer) -> Result<Self, WireError> {
        let name = buffer.read_qname()?;
        let qtype = QueryType::from_num(buffer.read_u16()?);
        let _class = buffer.read_u16()?;

        Ok(Self { name, qtype })
    }

    pub fn write(&self, buffer: &mut WireBuffer) -> Result<(), WireError> {
        buffer.write_qname(&self.name)?;
        buffer.write_u16(self.qtype.to_num())?;
        buffer.write_u16(CLASS_IN)?;

        Ok(())
    }
}
