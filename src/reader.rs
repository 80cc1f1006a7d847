//! This module provides a struct for reading length-prefixed fields in the
//! OpenSSH public key format.

use crate::errors::*;

use byteorder::{BigEndian, ByteOrder};

pub struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Reader<'a> {
        Reader { data, offset: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.offset >= self.data.len()
    }

    pub fn peek_int(&self) -> Result<u32> {
        let cur = &self.data[self.offset..];
        if cur.len() < 4 {
            return Err(KeyError::Framing {
                offset: self.offset,
            });
        }
        Ok(BigEndian::read_u32(&cur[..4]))
    }

    pub fn read_bytes(&mut self) -> Result<&'a [u8]> {
        let cur = &self.data[self.offset..];
        let len = self.peek_int()? as usize;
        if cur.len() - 4 < len {
            return Err(KeyError::Framing {
                offset: self.offset,
            });
        }
        self.offset += len + 4;
        Ok(&cur[4..len + 4])
    }

    pub fn read_string(&mut self) -> Result<&'a str> {
        Ok(std::str::from_utf8(self.read_bytes()?)?)
    }
}

/// Splits `buf` into its length-prefixed fields, in order. The whole buffer
/// must be consumed; a header or payload running past the end is an error.
pub fn read_fields(buf: &[u8]) -> Result<Vec<&[u8]>> {
    let mut reader = Reader::new(buf);
    let mut fields = Vec::new();
    while !reader.is_empty() {
        fields.push(reader.read_bytes()?);
    }
    Ok(fields)
}
