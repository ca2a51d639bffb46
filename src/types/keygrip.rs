use std::fmt;
use std::str::FromStr;

use crate::errors::{Error, Result};

/// GnuPG's keygrip: a SHA-1 over the canonical public key parameters,
/// independent of the OpenPGP packet version or creation time.
///
/// Displayed as 40 lowercase hex digits, the form `gpg-agent` uses.
#[derive(Clone, Copy, Eq, PartialEq, Hash, derive_more::Debug)]
#[debug("Keygrip({})", hex::encode(_0))]
pub struct Keygrip([u8; 20]);

impl Keygrip {
    pub const fn new(raw: [u8; 20]) -> Self {
        Keygrip(raw)
    }

    pub fn from_slice(input: &[u8]) -> Result<Self> {
        let raw: [u8; 20] = input
            .try_into()
            .map_err(|_| format_err!("invalid keygrip length {}", input.len()))?;
        Ok(Keygrip(raw))
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl AsRef<[u8]> for Keygrip {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 20]> for Keygrip {
    fn from(raw: [u8; 20]) -> Self {
        Keygrip(raw)
    }
}

impl fmt::Display for Keygrip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for Keygrip {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let raw = hex::decode(s.trim()).map_err(|e| format_err!("invalid keygrip {:?}: {}", s, e))?;
        Keygrip::from_slice(&raw)
    }
}
