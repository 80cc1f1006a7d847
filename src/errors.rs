//! Errors returned while reading or writing OpenSSH public keys.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, KeyError>;

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid key format")]
    InvalidFormat,
    #[error("invalid {keytype} key: expected {expected} fields, found {found}")]
    FieldCount {
        keytype: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("invalid key format: {field} is missing its leading zero byte")]
    MissingPadding { field: &'static str },
    #[error("invalid key format: expected keytype {expected}, found {found}")]
    KeytypeMismatch { expected: String, found: String },
    #[error("curve {curve} does not match keytype {keytype}")]
    CurveMismatch { keytype: String, curve: String },
    #[error("unsupported keytype: {0}")]
    UnsupportedKeytype(String),
    #[error("truncated field at offset {offset}")]
    Framing { offset: usize },
    #[error("invalid base64 key data: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("integer needs {needed} bytes but only {length} are available")]
    IntegerTooLarge { needed: usize, length: usize },
    #[error("invalid text field: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl KeyError {
    /// Whether this error means the key data itself is malformed, as opposed
    /// to an unknown keytype, undecodable base64, a failed read or an
    /// encoding failure.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            KeyError::InvalidFormat
                | KeyError::FieldCount { .. }
                | KeyError::MissingPadding { .. }
                | KeyError::KeytypeMismatch { .. }
                | KeyError::CurveMismatch { .. }
                | KeyError::Framing { .. }
                | KeyError::Utf8(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_error_family() {
        assert!(KeyError::InvalidFormat.is_format_error());
        assert!(KeyError::MissingPadding { field: "modulus" }.is_format_error());
        assert!(KeyError::CurveMismatch {
            keytype: "ecdsa-sha2-nistp256".into(),
            curve: "nistp384".into(),
        }
        .is_format_error());
        assert!(!KeyError::UnsupportedKeytype("ssh-ed25519".into()).is_format_error());
        assert!(!KeyError::Io(std::io::ErrorKind::PermissionDenied.into()).is_format_error());
        assert!(!KeyError::IntegerTooLarge {
            needed: 2,
            length: 1
        }
        .is_format_error());
    }

    #[test]
    fn display_names_the_keytype() {
        let err = KeyError::UnsupportedKeytype("ssh-ed25519".into());
        assert_eq!(err.to_string(), "unsupported keytype: ssh-ed25519");
    }
}
