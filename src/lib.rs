//! openssh-pubkey
//!
//! this library decodes and encodes ssh public keys in the OpenSSH
//! authorized-keys text format and computes their fingerprints. rsa, dsa and
//! ecdsa (nistp256, nistp384, nistp521) keys are supported.
//!
//! ```
//! let line = "ecdsa-sha2-nistp256 AAAAE2VjZHNhLXNoYTItbmlzdHAyNTYAAAAIbmlzdHAyNTYAAABBBJbnQ5XUmFPsFHFM+MCAvC20oLPZyUrwJHx7QjKRbl5OYdQRk4UKxL5qTiA9NXenB9VM7lq0X3qnfelsQFZlgXo= yosida95";
//! let key = openssh_pubkey::PublicKey::parse(line).unwrap();
//! assert_eq!(key.length(), 256);
//! assert_eq!(key.comment(), "yosida95");
//! assert_eq!(key.to_key_format(), line);
//! ```
//!
//! the key material is never checked for mathematical validity. this is a
//! format codec, not a cryptographic library.

pub mod errors;
pub mod integer;
mod reader;
mod writer;

pub use crate::errors::{KeyError, Result};
pub use crate::reader::read_fields;
pub use crate::writer::{write_field, write_fields};

use std::fmt;
use std::io::BufRead;
use std::str::FromStr;

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use base64::Engine;
use log::{debug, trace};
use md5::Md5;
use num_bigint::BigUint;
use sha2::{Digest, Sha256};

use crate::integer::bytes_to_unsigned_int;
use crate::reader::Reader;
use crate::writer::Writer;

const ECDSA_PREFIX: &str = "ecdsa-sha2-";

/// The algorithm of a key, as it appears on the wire and in the text format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAlgorithm {
    Rsa,
    Dsa,
    EcdsaNistp256,
    EcdsaNistp384,
    EcdsaNistp521,
}

impl KeyAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyAlgorithm::Rsa => "ssh-rsa",
            KeyAlgorithm::Dsa => "ssh-dss",
            KeyAlgorithm::EcdsaNistp256 => "ecdsa-sha2-nistp256",
            KeyAlgorithm::EcdsaNistp384 => "ecdsa-sha2-nistp384",
            KeyAlgorithm::EcdsaNistp521 => "ecdsa-sha2-nistp521",
        }
    }
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyAlgorithm {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ssh-rsa" => Ok(KeyAlgorithm::Rsa),
            "ssh-dss" => Ok(KeyAlgorithm::Dsa),
            "ecdsa-sha2-nistp256" => Ok(KeyAlgorithm::EcdsaNistp256),
            "ecdsa-sha2-nistp384" => Ok(KeyAlgorithm::EcdsaNistp384),
            "ecdsa-sha2-nistp521" => Ok(KeyAlgorithm::EcdsaNistp521),
            _ => Err(KeyError::UnsupportedKeytype(s.into())),
        }
    }
}

/// The named curves an ecdsa key may use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Curve {
    Nistp256,
    Nistp384,
    Nistp521,
}

impl Curve {
    pub fn name(&self) -> &'static str {
        match self {
            Curve::Nistp256 => "nistp256",
            Curve::Nistp384 => "nistp384",
            Curve::Nistp521 => "nistp521",
        }
    }

    pub fn bits(&self) -> usize {
        match self {
            Curve::Nistp256 => 256,
            Curve::Nistp384 => 384,
            Curve::Nistp521 => 521,
        }
    }

    pub fn algorithm(&self) -> KeyAlgorithm {
        match self {
            Curve::Nistp256 => KeyAlgorithm::EcdsaNistp256,
            Curve::Nistp384 => KeyAlgorithm::EcdsaNistp384,
            Curve::Nistp521 => KeyAlgorithm::EcdsaNistp521,
        }
    }

    pub fn from_name(name: &str) -> Option<Curve> {
        match name {
            "nistp256" => Some(Curve::Nistp256),
            "nistp384" => Some(Curve::Nistp384),
            "nistp521" => Some(Curve::Nistp521),
            _ => None,
        }
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Data is the representation of the data section of an ssh public key. it
/// is an enum with all the different supported key algorithms.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Data {
    Rsa {
        exponent: BigUint,
        modulus: BigUint,
    },
    Dsa {
        p: BigUint,
        q: BigUint,
        g: BigUint,
        y: BigUint,
    },
    Ecdsa {
        curve: Curve,
        point: Vec<u8>,
    },
}

impl Data {
    pub fn keytype(&self) -> KeyAlgorithm {
        match self {
            Data::Rsa { .. } => KeyAlgorithm::Rsa,
            Data::Dsa { .. } => KeyAlgorithm::Dsa,
            Data::Ecdsa { curve, .. } => curve.algorithm(),
        }
    }

    /// size in bits of the key: the modulus for rsa, p for dsa and the
    /// curve size for ecdsa.
    pub fn length(&self) -> usize {
        match self {
            Data::Rsa { modulus, .. } => modulus.bits() as usize,
            Data::Dsa { p, .. } => p.bits() as usize,
            Data::Ecdsa { curve, .. } => curve.bits(),
        }
    }

    // every key starts with its keytype, followed by the algorithm fields.
    //    ssh-rsa   exponent modulus
    //    ssh-dss   p q g y
    //    ecdsa-*   curve point
    // the modulus and dsa p and q carry a leading zero byte. see the
    // ssh-rsa and ssh-dss formats in https://tools.ietf.org/html/rfc4253#section-6.6
    // and ecdsa in https://tools.ietf.org/html/rfc5656#section-3.1
    fn encode(&self) -> Vec<u8> {
        let mut w = Writer::new();
        w.write_string(self.keytype().as_str());
        match self {
            Data::Rsa { exponent, modulus } => {
                w.write_uint(exponent);
                w.write_padded_uint(modulus);
            }
            Data::Dsa { p, q, g, y } => {
                w.write_padded_uint(p);
                w.write_padded_uint(q);
                w.write_uint(g);
                w.write_uint(y);
            }
            Data::Ecdsa { curve, point } => {
                w.write_string(curve.name());
                w.write_bytes(point);
            }
        }
        w.into_vec()
    }

    fn decode(keytype: &str, buf: &[u8]) -> Result<Self> {
        trace!("decoding {} key data", keytype);
        match keytype {
            "ssh-rsa" => Data::decode_rsa(buf),
            "ssh-dss" => Data::decode_dsa(buf),
            t if t.starts_with(ECDSA_PREFIX) => Data::decode_ecdsa(buf),
            _ => Err(KeyError::UnsupportedKeytype(keytype.into())),
        }
    }

    fn decode_rsa(buf: &[u8]) -> Result<Self> {
        let fields = expect_fields(buf, KeyAlgorithm::Rsa, 3)?;
        expect_keytype(fields[0], KeyAlgorithm::Rsa)?;
        Ok(Data::Rsa {
            exponent: bytes_to_unsigned_int(fields[1]),
            modulus: padded_uint(fields[2], "modulus")?,
        })
    }

    fn decode_dsa(buf: &[u8]) -> Result<Self> {
        let fields = expect_fields(buf, KeyAlgorithm::Dsa, 5)?;
        expect_keytype(fields[0], KeyAlgorithm::Dsa)?;
        Ok(Data::Dsa {
            p: padded_uint(fields[1], "p")?,
            q: padded_uint(fields[2], "q")?,
            g: bytes_to_unsigned_int(fields[3]),
            y: bytes_to_unsigned_int(fields[4]),
        })
    }

    fn decode_ecdsa(buf: &[u8]) -> Result<Self> {
        let fields = read_fields(buf)?;
        if fields.len() != 3 {
            return Err(KeyError::FieldCount {
                keytype: "ecdsa",
                expected: 3,
                found: fields.len(),
            });
        }
        let keytype = std::str::from_utf8(fields[0])?;
        let expected = keytype
            .strip_prefix(ECDSA_PREFIX)
            .ok_or_else(|| KeyError::KeytypeMismatch {
                expected: format!("{}*", ECDSA_PREFIX),
                found: keytype.into(),
            })?;
        // the curve named by the keytype and the curve field must agree.
        let name = std::str::from_utf8(fields[1])?;
        let curve = Curve::from_name(name)
            .filter(|_| name == expected)
            .ok_or_else(|| KeyError::CurveMismatch {
                keytype: keytype.into(),
                curve: name.into(),
            })?;
        Ok(Data::Ecdsa {
            curve,
            point: fields[2].to_vec(),
        })
    }
}

fn expect_fields(buf: &[u8], keytype: KeyAlgorithm, expected: usize) -> Result<Vec<&[u8]>> {
    let fields = read_fields(buf)?;
    if fields.len() != expected {
        return Err(KeyError::FieldCount {
            keytype: keytype.as_str(),
            expected,
            found: fields.len(),
        });
    }
    Ok(fields)
}

fn expect_keytype(field: &[u8], keytype: KeyAlgorithm) -> Result<()> {
    let found = std::str::from_utf8(field)?;
    if found != keytype.as_str() {
        return Err(KeyError::KeytypeMismatch {
            expected: keytype.as_str().into(),
            found: found.into(),
        });
    }
    Ok(())
}

fn padded_uint(field: &[u8], name: &'static str) -> Result<BigUint> {
    match field.split_first() {
        Some((0, rest)) => Ok(bytes_to_unsigned_int(rest)),
        _ => Err(KeyError::MissingPadding { field: name }),
    }
}

/// PublicKey is the struct representation of an ssh public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    pub data: Data,
    comment: String,
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_key_format())
    }
}

impl FromStr for PublicKey {
    type Err = KeyError;
    fn from_str(s: &str) -> Result<Self> {
        PublicKey::parse(s)
    }
}

impl PublicKey {
    pub fn new(data: Data, comment: &str) -> Self {
        PublicKey {
            data,
            comment: comment.into(),
        }
    }

    pub fn from_rsa(exponent: BigUint, modulus: BigUint) -> Self {
        PublicKey::new(Data::Rsa { exponent, modulus }, "")
    }

    pub fn from_dsa(p: BigUint, q: BigUint, g: BigUint, y: BigUint) -> Self {
        PublicKey::new(Data::Dsa { p, q, g, y }, "")
    }

    pub fn from_ecdsa(curve: Curve, point: Vec<u8>) -> Self {
        PublicKey::new(Data::Ecdsa { curve, point }, "")
    }

    /// parse takes a string and parses it as a public key from an
    /// authorized keys file. the line has the form
    ///    keytype base64-data [comment]
    /// where the comment is a single whitespace-free token.
    pub fn parse(key: &str) -> Result<Self> {
        let parts: Vec<&str> = key.split_whitespace().collect();
        if parts.len() < 2 || parts.len() > 3 {
            debug!("rejecting key line with {} tokens", parts.len());
            return Err(KeyError::InvalidFormat);
        }
        let keytype = parts[0];
        let comment = parts.get(2).copied().unwrap_or("");

        let buf = STANDARD.decode(parts[1])?;
        let data = Data::decode(keytype, &buf).map_err(|e| {
            debug!("rejecting {} key: {}", keytype, e);
            e
        })?;
        if data.keytype().as_str() != keytype {
            debug!("keytype {} disagrees with key data", keytype);
            return Err(KeyError::KeytypeMismatch {
                expected: keytype.into(),
                found: data.keytype().as_str().into(),
            });
        }
        Ok(PublicKey::new(data, comment))
    }

    /// from_wire decodes the binary key data, as found inside the base64
    /// section of a key line, using the keytype embedded in its first field.
    pub fn from_wire(buf: &[u8], comment: &str) -> Result<Self> {
        let keytype = Reader::new(buf).read_string()?;
        Ok(PublicKey::new(Data::decode(keytype, buf)?, comment))
    }

    /// read_keys parses every key in an authorized keys style stream, one per
    /// line. blank lines and lines starting with `#` are skipped.
    pub fn read_keys<R: BufRead>(r: R) -> Result<Vec<Self>> {
        let mut keys = vec![];
        for line in r.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            keys.push(PublicKey::parse(line)?);
        }
        Ok(keys)
    }

    pub fn keytype(&self) -> KeyAlgorithm {
        self.data.keytype()
    }

    pub fn length(&self) -> usize {
        self.data.length()
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn set_comment(&mut self, comment: &str) {
        self.comment = comment.into();
    }

    /// data_bytes is the canonical binary encoding of the key. it is what
    /// gets base64 encoded in the text format and what the fingerprints hash.
    pub fn data_bytes(&self) -> Vec<u8> {
        self.data.encode()
    }

    /// to_key_format returns a string representation of the ssh key, in the
    /// format of a line in an authorized keys file. the comment is left off
    /// entirely when it is empty.
    pub fn to_key_format(&self) -> String {
        let data = STANDARD.encode(self.data_bytes());
        if self.comment.is_empty() {
            format!("{} {}", self.keytype(), data)
        } else {
            format!("{} {} {}", self.keytype(), data, self.comment)
        }
    }

    /// fingerprint is the lowercase hex md5 digest of the key data. the
    /// comment does not contribute to it.
    pub fn fingerprint(&self) -> String {
        Md5::digest(self.data_bytes())
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect()
    }

    /// pretty_fingerprint is the md5 fingerprint split into colon separated
    /// pairs of hex digits, e.g. `d8:fe:f4:87:...`.
    pub fn pretty_fingerprint(&self) -> String {
        let fp = self.fingerprint();
        let mut pretty = String::with_capacity(fp.len() + fp.len() / 2);
        for (i, c) in fp.chars().enumerate() {
            if i > 0 && i % 2 == 0 {
                pretty.push(':');
            }
            pretty.push(c);
        }
        pretty
    }

    /// fingerprint_sha256 is the unpadded base64 sha256 digest of the key
    /// data, as printed by current versions of ssh-keygen.
    pub fn fingerprint_sha256(&self) -> String {
        STANDARD_NO_PAD.encode(Sha256::digest(self.data_bytes()))
    }

    pub fn to_fingerprint_string(&self) -> String {
        format!("SHA256:{}", self.fingerprint_sha256())
    }

    pub fn to_md5_fingerprint_string(&self) -> String {
        format!("MD5:{}", self.pretty_fingerprint())
    }
}
