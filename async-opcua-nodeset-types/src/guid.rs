// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0

//! Contains the definition of `Guid`, used for GUID node identifiers.

use std::{fmt, str::FromStr};

use uuid::Uuid;

/// A 16 byte globally unique identifier, written in its hyphenated form.
#[derive(Eq, PartialEq, Clone, Copy, Hash, Default)]
pub struct Guid(Uuid);

impl Guid {
    /// The all-zero guid.
    pub fn null() -> Self {
        Self(Uuid::nil())
    }

    /// Return `true` if this is the all-zero guid.
    pub fn is_null(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for Guid {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<Guid> for Uuid {
    fn from(value: Guid) -> Self {
        value.0
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl fmt::Debug for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Guid({})", self.0.hyphenated())
    }
}

impl FromStr for Guid {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[test]
fn guid_text_form() {
    let guid = Guid::from_str("72962B91-FA75-4AE6-8D28-B404DC7DAF63").unwrap();
    assert_eq!(guid.to_string(), "72962b91-fa75-4ae6-8d28-b404dc7daf63");
    assert!(!guid.is_null());
    assert!(Guid::default().is_null());
    assert!(Guid::from_str("72962b91").is_err());
}
