//! Fixed-capacity packet buffer (RFC 1035 §4.2.1 UDP message size).
//!
//! Every primitive access is bounds-checked against [`MAX_MESSAGE_SIZE`]; an
//! access that would touch offset 512 or beyond fails with
//! [`WireError::BufferBounds`] instead of panicking. Domain names are read with
//! compression-pointer support and written uncompressed.

use crate::errors::WireError;

/// Maximum DNS message size over UDP without EDNS(0).
pub const MAX_MESSAGE_SIZE: usize = 512;

/// Maximum number of compression pointers followed while reading one name.
pub const MAX_COMPRESSION_JUMPS: usize = 5;

/// Maximum length of a single label.
pub const MAX_LABEL_LEN: usize = 63;

const POINTER_MASK: u8 = 0xC0;

pub struct WireBuffer {
    buf: [u8; MAX_MESSAGE_SIZE],
    pos: usize,
}

impl WireBuffer {
    pub fn new() -> Self {
        Self {
            buf: [0u8; MAX_MESSAGE_SIZE],
            pos: 0,
        }
    }

    /// Copies a received datagram into a fresh buffer with the cursor at 0.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WireError> {
        if bytes.len() > MAX_MESSAGE_SIZE {
            return Err(WireError::BufferBounds {
                offset: bytes.len() - 1,
            });
        }
        let mut buffer = Self::new();
        buffer.buf[..bytes.len()].copy_from_slice(bytes);
        Ok(buffer)
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Bytes written so far, i.e. everything before the cursor.
    pub fn filled(&self) -> &[u8] {
        &self.buf[..self.pos]
    }

    /// Moves the cursor forward. The cursor may rest at the end of the buffer,
    /// but never past it.
    pub fn step(&mut self, steps: usize) -> Result<(), WireError> {
        self.seek(self.pos.saturating_add(steps))
    }

    pub fn seek(&mut self, pos: usize) -> Result<(), WireError> {
        if pos > MAX_MESSAGE_SIZE {
            return Err(WireError::BufferBounds { offset: pos });
        }
        self.pos = pos;
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8, WireError> {
        let res = self.get(self.pos)?;
        self.pos += 1;
        Ok(res)
    }

    pub fn read_u16(&mut self) -> Result<u16, WireError> {
        let high = self.read_u8()? as u16;
        let low = self.read_u8()? as u16;
        Ok((high << 8) | low)
    }

    pub fn read_u32(&mut self) -> Result<u32, WireError> {
        let mut res = 0u32;
        for _ in 0..4 {
            res = (res << 8) | self.read_u8()? as u32;
        }
        Ok(res)
    }

    /// Reads the byte at `pos` without moving the cursor.
    pub fn get(&self, pos: usize) -> Result<u8, WireError> {
        self.buf
            .get(pos)
            .copied()
            .ok_or(WireError::BufferBounds { offset: pos })
    }

    pub fn get_range(&self, start: usize, len: usize) -> Result<&[u8], WireError> {
        let end = start.saturating_add(len);
        if end > MAX_MESSAGE_SIZE {
            return Err(WireError::BufferBounds {
                offset: end.saturating_sub(1),
            });
        }
        Ok(&self.buf[start..end])
    }

    pub fn write_u8(&mut self, val: u8) -> Result<(), WireError> {
        self.set(self.pos, val)?;
        self.pos += 1;
        Ok(())
    }

    pub fn write_u16(&mut self, val: u16) -> Result<(), WireError> {
        for byte in val.to_be_bytes() {
            self.write_u8(byte)?;
        }
        Ok(())
    }

    pub fn write_u32(&mut self, val: u32) -> Result<(), WireError> {
        for byte in val.to_be_bytes() {
            self.write_u8(byte)?;
        }
        Ok(())
    }

    /// Overwrites the byte at `pos` without moving the cursor.
    pub fn set(&mut self, pos: usize, val: u8) -> Result<(), WireError> {
        let slot = self
            .buf
            .get_mut(pos)
            .ok_or(WireError::BufferBounds { offset: pos })?;
        *slot = val;
        Ok(())
    }

    /// Patches a big-endian u16 in place; used to backfill RDLENGTH.
    pub fn set_u16(&mut self, pos: usize, val: u16) -> Result<(), WireError> {
        let [high, low] = val.to_be_bytes();
        self.set(pos.saturating_add(1), low)?;
        self.set(pos, high)
    }

    /// Reads a possibly compressed domain name starting at the cursor.
    ///
    /// After the first compression pointer the cursor is parked two bytes past
    /// it; further pointers only move the local read position. More than
    /// [`MAX_COMPRESSION_JUMPS`] pointers fail with `CompressionLoopExceeded`.
    pub fn read_qname(&mut self) -> Result<String, WireError> {
        let mut pos = self.pos;
        let mut resume_at: Option<usize> = None;
        let mut jumps = 0usize;
        let mut name = String::new();

        loop {
            let len = self.get(pos)?;

            if len & POINTER_MASK == POINTER_MASK {
                if jumps == MAX_COMPRESSION_JUMPS {
                    return Err(WireError::CompressionLoopExceeded {
                        limit: MAX_COMPRESSION_JUMPS,
                    });
                }
                let low = self.get(pos + 1)? as usize;
                if resume_at.is_none() {
                    resume_at = Some(pos + 2);
                }
                pos = (((len & !POINTER_MASK) as usize) << 8) | low;
                jumps += 1;
                continue;
            }

            pos += 1;
            if len == 0 {
                break;
            }

            let label_len = (len & !POINTER_MASK) as usize;
            let label = self.get_range(pos, label_len)?;
            if !name.is_empty() {
                name.push('.');
            }
            name.push_str(&String::from_utf8_lossy(label));
            pos += label_len;
        }

        self.seek(resume_at.unwrap_or(pos))?;
        Ok(name)
    }

    /// Writes `qname` as a label sequence. Compression pointers are never
    /// emitted; empty labels (leading, trailing or doubled dots) are skipped.
    pub fn write_qname(&mut self, qname: &str) -> Result<(), WireError> {
        for label in qname.split('.').filter(|label| !label.is_empty()) {
            if label.len() > MAX_LABEL_LEN {
                return Err(WireError::LabelTooLong {
                    label: label.to_string(),
                });
            }
            self.write_u8(label.len() as u8)?;
            for &byte in label.as_bytes() {
                self.write_u8(byte)?;
            }
        }
        self.write_u8(0)
    }
}

impl Default for WireBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for WireBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WireBuffer")
            .field("pos", &self.pos)
            .field("filled", &self.filled().len())
            .finish()
    }
}
