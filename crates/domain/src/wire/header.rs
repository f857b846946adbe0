use super::{ResultCode, WireBuffer};
use crate::errors::WireError;

/// Fixed 12-byte message header.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Header {
    pub id: u16,

    pub recursion_desired: bool,
    pub truncated_message: bool,
    pub authoritative_answer: bool,
    /// Four-bit opcode; higher bits are dropped on write.
    pub opcode: u8,
    pub response: bool,

    pub rescode: ResultCode,
    pub checking_disabled: bool,
    pub authed_data: bool,
    pub z: bool,
    pub recursion_available: bool,

    pub questions: u16,
    pub answers: u16,
    pub authoritative_entries: u16,
    pub resource_entries: u16,
}

impl Header {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(buffer: &mut WireBuffer) -> Result<Self, WireError> {
        let id = buffer.read_u16()?;

        let flags = buffer.read_u16()?;
        let a = (flags >> 8) as u8;
        let b = (flags & 0xFF) as u8;

        Ok(Self {
            id,
            recursion_desired: a & (1 << 0) > 0,
            truncated_message: a & (1 << 1) > 0,
            authoritative_answer: a & (1 << 2) > 0,
            opcode: (a >> 3) & 0x0F,
            response: a & (1 << 7) > 0,

            rescode: ResultCode::from_num(b & 0x0F),
            checking_disabled: b & (1 << 4) > 0,
            authed_data: b & (1 << 5) > 0,
            z: b & (1 << 6) > 0,
            recursion_available: b & (1 << 7) > 0,

            questions: buffer.read_u16()?,
            answers: buffer.read_u16()?,
            authoritative_entries: buffer.read_u16()?,
            resource_entries: buffer.read_u16()?,
        })
    }

    pub fn write(&self, buffer: &mut WireBuffer) -> Result<(), WireError> {
        buffer.write_u16(self.id)?;

        buffer.write_u8(
            (self.recursion_desired as u8)
                | ((self.truncated_message as u8) << 1)
                | ((self.authoritative_answer as u8) << 2)
                | ((self.opcode & 0x0F) << 3)
                | ((self.response as u8) << 7),
        )?;

        buffer.write_u8(
            self.rescode.to_num()
                | ((self.checking_disabled as u8) << 4)
                | ((self.authed_data as u8) << 5)
                | ((self.z as u8) << 6)
                | ((self.recursion_available as u8) << 7),
        )?;

        buffer.write_u16(self.questions)?;
        buffer.write_u16(self.answers)?;
        buffer.write_u16(self.authoritative_entries)?;
        buffer.write_u16(self.resource_entries)?;

        Ok(())
    }
}
