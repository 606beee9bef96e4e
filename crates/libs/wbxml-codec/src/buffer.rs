use core::fmt;

use crate::error::{CodecError, Result};

/// Append-only byte sink owned by an encoder.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OutputBuffer {
    buffer: Vec<u8>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { buffer: Vec::with_capacity(capacity) }
    }

    pub fn write(&mut self, data: &[u8]) -> usize {
        self.buffer.extend_from_slice(data);
        data.len()
    }

    pub fn write_byte(&mut self, byte: u8) -> usize {
        self.buffer.push(byte);
        1
    }

    pub fn chain_write(&mut self, data: &[u8]) -> &mut Self {
        self.write(data);
        self
    }

    pub(crate) fn as_mut_vec(&mut self) -> &mut Vec<u8> {
        &mut self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.buffer
    }
}

impl fmt::Display for OutputBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ 0x")?;

        for byte in &self.buffer {
            write!(f, "{:0>2x}", byte)?;
        }

        write!(f, " ]",)
    }
}

/// Read cursor over a borrowed byte slice.
#[derive(Debug, Clone)]
pub struct InputBuffer<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> InputBuffer<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { offset: 0, buffer }
    }

    fn truncated(&self, size: usize) -> CodecError {
        CodecError::Truncated { offset: self.offset, needed: size - self.bytes_left() }
    }

    pub fn peek_byte(&self) -> Option<u8> {
        self.buffer.get(self.offset).copied()
    }

    pub fn read_byte(&mut self) -> Result<u8> {
        let byte = self.peek_byte().ok_or_else(|| self.truncated(1))?;
        self.offset += 1;

        Ok(byte)
    }

    pub fn read_slice(&mut self, size: usize) -> Result<&'a [u8]> {
        if size > self.bytes_left() {
            return Err(self.truncated(size));
        }

        let slice = &self.buffer[self.offset..self.offset + size];

        self.offset += size;

        Ok(slice)
    }

    /// Reads up to (not including) the next `terminator` and consumes it.
    pub fn read_until(&mut self, terminator: u8) -> Result<&'a [u8]> {
        let rest = &self.buffer[self.offset..];
        let Some(len) = rest.iter().position(|&b| b == terminator) else {
            return Err(self.truncated(rest.len() + 1));
        };

        let slice = &rest[..len];
        self.offset += len + 1;

        Ok(slice)
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn bytes_left(&self) -> usize {
        self.buffer.len() - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.bytes_left() == 0
    }
}
