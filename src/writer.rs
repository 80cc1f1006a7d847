//! This module provides a struct for writing length-prefixed fields in the
//! OpenSSH public key format.

use crate::integer::minimal_bytes;

use byteorder::{BigEndian, WriteBytesExt};
use num_bigint::BigUint;

#[derive(Default)]
pub struct Writer {
    data: Vec<u8>,
}

impl Writer {
    pub fn new() -> Writer {
        Writer { data: vec![] }
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    pub fn write_int(&mut self, val: u32) {
        if self.data.write_u32::<BigEndian>(val).is_err() {
            unreachable!()
        };
    }

    pub fn write_bytes(&mut self, buf: &[u8]) {
        // The first four bytes represent the length of the encoded data,
        // which may be zero.
        self.write_int(buf.len() as u32);
        self.data.extend_from_slice(buf);
    }

    pub fn write_string(&mut self, val: &str) {
        self.write_bytes(val.as_bytes())
    }

    /// Writes `num` with the minimal number of bytes and no sign byte.
    pub fn write_uint(&mut self, num: &BigUint) {
        self.write_bytes(&minimal_bytes(num))
    }

    // Unlike an RFC 4251 mpint, the leading zero byte is written whether or
    // not the high bit of the first byte is set.
    pub fn write_padded_uint(&mut self, num: &BigUint) {
        let mut buf = vec![0];
        buf.append(&mut minimal_bytes(num));
        self.write_bytes(&buf)
    }
}

/// Frames a single field: a big-endian `u32` length followed by the bytes.
pub fn write_field(field: &[u8]) -> Vec<u8> {
    let mut w = Writer::new();
    w.write_bytes(field);
    w.into_vec()
}

/// Frames each field in turn and concatenates the results.
pub fn write_fields<I, F>(fields: I) -> Vec<u8>
where
    I: IntoIterator<Item = F>,
    F: AsRef<[u8]>,
{
    let mut w = Writer::new();
    for field in fields {
        w.write_bytes(field.as_ref());
    }
    w.into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_empty() {
        let w = Writer::new();
        assert_eq!(w.into_vec().len(), 0);
        let mut w = Writer::new();
        w.write_bytes(&[]);
        assert_eq!(w.into_vec(), vec![0, 0, 0, 0]);
        let mut w = Writer::new();
        w.write_uint(&BigUint::from(0u32));
        assert_eq!(w.into_vec(), vec![0, 0, 0, 0]);
        let mut w = Writer::new();
        w.write_padded_uint(&BigUint::from(0u32));
        assert_eq!(w.into_vec(), vec![0, 0, 0, 1, 0]);
    }

    #[test]
    fn padded_uint_always_leads_with_zero() {
        let mut w = Writer::new();
        w.write_padded_uint(&BigUint::from(0x7fu32));
        w.write_padded_uint(&BigUint::from(0x80u32));
        assert_eq!(w.into_vec(), vec![0, 0, 0, 2, 0, 0x7f, 0, 0, 0, 2, 0, 0x80]);
    }

    #[test]
    fn unpadded_uint_is_minimal() {
        let mut w = Writer::new();
        w.write_uint(&BigUint::from(65537u32));
        assert_eq!(w.into_vec(), vec![0, 0, 0, 3, 1, 0, 1]);
    }

    #[test]
    fn write_field_prefixes_length() {
        assert_eq!(
            write_field(b"ssh-rsa"),
            vec![0, 0, 0, 7, b's', b's', b'h', b'-', b'r', b's', b'a']
        );
    }

    #[test]
    fn write_fields_keeps_order() {
        let out = write_fields([&b"a"[..], &b""[..], &b"bc"[..]]);
        assert_eq!(out, vec![0, 0, 0, 1, b'a', 0, 0, 0, 0, 0, 0, 0, 2, b'b', b'c']);
        assert_eq!(crate::reader::read_fields(&out).unwrap().len(), 3);
    }
}
