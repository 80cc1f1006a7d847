//! Conversions between big-endian byte strings and unsigned integers.

use crate::errors::*;

use num_bigint::BigUint;

/// Interprets `bytes` as a big-endian unsigned integer. An empty slice is 0.
pub fn bytes_to_unsigned_int(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

/// Minimum number of bytes needed to hold `num` without a sign byte.
///
/// Zero takes no bytes at all, so an unpadded zero encodes as an empty field.
pub fn byte_length(num: &BigUint) -> usize {
    ((num.bits() + 7) / 8) as usize
}

/// Encodes `num` as exactly `length` big-endian bytes, left-padded with zeros.
pub fn unsigned_int_to_bytes(num: &BigUint, length: usize) -> Result<Vec<u8>> {
    let mut bytes = minimal_bytes(num);
    if bytes.len() > length {
        return Err(KeyError::IntegerTooLarge {
            needed: bytes.len(),
            length,
        });
    }
    let mut out = vec![0; length - bytes.len()];
    out.append(&mut bytes);
    Ok(out)
}

// BigUint renders zero as a single 0x00; we want it empty.
pub(crate) fn minimal_bytes(num: &BigUint) -> Vec<u8> {
    if byte_length(num) == 0 {
        Vec::new()
    } else {
        num.to_bytes_be()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_length_boundaries() {
        assert_eq!(byte_length(&BigUint::from(0u32)), 0);
        assert_eq!(byte_length(&BigUint::from(1u32)), 1);
        assert_eq!(byte_length(&BigUint::from(255u32)), 1);
        assert_eq!(byte_length(&BigUint::from(256u32)), 2);
        assert_eq!(byte_length(&BigUint::from(65537u32)), 3);
    }

    #[test]
    fn empty_bytes_are_zero() {
        assert_eq!(bytes_to_unsigned_int(&[]), BigUint::from(0u32));
        assert_eq!(bytes_to_unsigned_int(&[0, 0]), BigUint::from(0u32));
    }

    #[test]
    fn wider_than_a_word() {
        let bytes = [0x80, 0, 0, 0, 0, 0, 0, 0, 0, 1];
        let num = bytes_to_unsigned_int(&bytes);
        assert_eq!(num.bits(), 80);
        assert_eq!(byte_length(&num), 10);
        assert_eq!(unsigned_int_to_bytes(&num, 10).unwrap(), bytes);
    }

    #[test]
    fn left_pads_to_length() {
        let num = BigUint::from(0x0102u32);
        assert_eq!(unsigned_int_to_bytes(&num, 2).unwrap(), vec![1, 2]);
        assert_eq!(unsigned_int_to_bytes(&num, 4).unwrap(), vec![0, 0, 1, 2]);
        assert_eq!(
            unsigned_int_to_bytes(&BigUint::from(0u32), 0).unwrap(),
            Vec::<u8>::new()
        );
    }

    #[test]
    fn rejects_short_length() {
        let num = BigUint::from(0x010203u32);
        match unsigned_int_to_bytes(&num, 2) {
            Err(KeyError::IntegerTooLarge { needed, length }) => {
                assert_eq!(needed, 3);
                assert_eq!(length, 2);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
