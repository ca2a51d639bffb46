use std::{fmt, io};

use num_bigint::BigUint;
use smallvec::{smallvec, SmallVec};

use super::{CurveName, DeviceError};
use crate::errors::Result;
use crate::packet::SignatureBytes;
use crate::ser::Serialize;
use crate::types::Mpi;

/// The hash hint an RSA device needs before it signs a digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RsaSignatureHash {
    Sha256,
    Sha512,
}

impl RsaSignatureHash {
    /// Picks the hint from the digest length, 32 and 64 bytes are supported.
    pub fn for_digest_len(len: usize) -> Option<Self> {
        match len {
            32 => Some(RsaSignatureHash::Sha256),
            64 => Some(RsaSignatureHash::Sha512),
            _ => None,
        }
    }

    /// The name the device protocol uses.
    pub fn as_str(self) -> &'static str {
        match self {
            RsaSignatureHash::Sha256 => "rsa-sha2-256",
            RsaSignatureHash::Sha512 => "rsa-sha2-512",
        }
    }
}

impl fmt::Display for RsaSignatureHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A signature as it goes into an OpenPGP signature packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureValue {
    Rsa(Mpi),
    Ecc { r: Mpi, s: Mpi },
}

impl SignatureValue {
    /// Shapes the raw device output for `curve`.
    ///
    /// RSA signatures are a single big endian integer. EC signatures are
    /// `r || s` with both halves the same size.
    pub fn from_device(curve: CurveName, raw: &[u8]) -> Result<Self, DeviceError> {
        if curve.is_rsa() {
            return Ok(SignatureValue::Rsa(Mpi::from_slice(raw)));
        }
        if raw.is_empty() || raw.len() % 2 != 0 {
            return Err(DeviceError::MalformedResponse {
                message: format!("{} signature of {} bytes", curve, raw.len()),
            });
        }
        let (r, s) = raw.split_at(raw.len() / 2);
        Ok(SignatureValue::Ecc {
            r: Mpi::from_slice(r),
            s: Mpi::from_slice(s),
        })
    }

    pub fn mpis(&self) -> SmallVec<[Mpi; 2]> {
        match self {
            SignatureValue::Rsa(sig) => smallvec![sig.clone()],
            SignatureValue::Ecc { r, s } => smallvec![r.clone(), s.clone()],
        }
    }

    /// The integers of the signature.
    pub fn to_biguints(&self) -> Vec<BigUint> {
        self.mpis().iter().map(BigUint::from).collect()
    }
}

impl From<SignatureValue> for SignatureBytes {
    fn from(value: SignatureValue) -> Self {
        SignatureBytes::Mpis(value.mpis())
    }
}

impl Serialize for SignatureValue {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        match self {
            SignatureValue::Rsa(sig) => sig.to_writer(writer),
            SignatureValue::Ecc { r, s } => {
                r.to_writer(writer)?;
                s.to_writer(writer)
            }
        }
    }

    fn write_len(&self) -> usize {
        match self {
            SignatureValue::Rsa(sig) => sig.write_len(),
            SignatureValue::Ecc { r, s } => r.write_len() + s.write_len(),
        }
    }
}
