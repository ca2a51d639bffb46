use std::fmt;

use crate::errors::Result;
use crate::types::KeyId;

/// Represents a V4 Fingerprint.
///
/// Ref: <https://www.rfc-editor.org/rfc/rfc4880.html#section-12.2>
#[derive(Clone, Copy, Eq, PartialEq, Hash, derive_more::Debug)]
#[debug("Fingerprint({})", hex::encode(_0))]
pub struct Fingerprint([u8; 20]);

impl Fingerprint {
    pub fn new(fp: &[u8]) -> Result<Self> {
        let fp: [u8; 20] = fp
            .try_into()
            .map_err(|_| format_err!("invalid v4 fingerprint length {}", fp.len()))?;
        Ok(Fingerprint(fp))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The low 64 bits.
    pub fn key_id(&self) -> KeyId {
        let mut id = [0u8; 8];
        id.copy_from_slice(&self.0[12..]);
        KeyId::from(id)
    }
}

impl From<[u8; 20]> for Fingerprint {
    fn from(value: [u8; 20]) -> Self {
        Fingerprint(value)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    #[test]
    fn test_key_id() {
        let fp = Fingerprint::new(&hex!("9c84842add94fd32377b8e0e5754a8acedd7ba4c")).unwrap();
        assert_eq!(fp.key_id().to_string(), "5754a8acedd7ba4c");
        assert!(Fingerprint::new(&[0u8; 16]).is_err());
    }
}
