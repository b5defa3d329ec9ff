// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0

//! Contains the definition of `ByteString`, used for opaque node identifiers.

use base64::{engine::general_purpose::STANDARD, Engine};

/// An opaque sequence of octets, written as base64 in node IDs.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Default)]
pub struct ByteString {
    /// The raw bytes.
    pub value: Vec<u8>,
}

impl From<Vec<u8>> for ByteString {
    fn from(value: Vec<u8>) -> Self {
        Self { value }
    }
}

impl From<&[u8]> for ByteString {
    fn from(value: &[u8]) -> Self {
        Self {
            value: value.to_vec(),
        }
    }
}

impl AsRef<[u8]> for ByteString {
    fn as_ref(&self) -> &[u8] {
        &self.value
    }
}

impl ByteString {
    /// Decode a byte string from standard base64, returning `None` if `data` is not
    /// valid base64.
    pub fn from_base64(data: &str) -> Option<Self> {
        STANDARD.decode(data).ok().map(Self::from)
    }

    /// Encode the byte string as standard base64.
    pub fn as_base64(&self) -> String {
        STANDARD.encode(&self.value)
    }

    /// Return `true` if the byte string has no bytes.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

#[test]
fn bytestring_base64() {
    let v = ByteString::from(&[1u8, 2, 3, 4][..]);
    assert_eq!(v.as_base64(), "AQIDBA==");
    assert_eq!(ByteString::from_base64("AQIDBA=="), Some(v));
    assert!(ByteString::from_base64("not base64!").is_none());
    assert!(ByteString::from(Vec::new()).is_empty());
}
