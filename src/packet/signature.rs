use std::io;

use byteorder::WriteBytesExt;
use bytes::{Buf, Bytes};
use chrono::{DateTime, Utc};
use log::debug;
use num_enum::{FromPrimitive, IntoPrimitive};
use smallvec::SmallVec;

use crate::crypto::{hash::HashAlgorithm, public_key::PublicKeyAlgorithm};
use crate::errors::Result;
use crate::packet::subpacket::{EMBEDDED_SIGNATURE, ISSUER, SIGNATURE_CREATION_TIME};
use crate::packet::{PacketHeader, PacketTrait, SubpacketArea};
use crate::parsing::{ensure_consumed, BufParsing};
use crate::ser::Serialize;
use crate::types::{KeyId, Mpi, Tag};

/// Signature Packet, version 4 only.
///
/// Ref: <https://www.rfc-editor.org/rfc/rfc4880.html#section-5.2.3>
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Signature {
    packet_header: PacketHeader,
    typ: SignatureType,
    pub_alg: PublicKeyAlgorithm,
    hash_alg: HashAlgorithm,
    hashed_subpackets: SubpacketArea,
    unhashed_subpackets: SubpacketArea,
    signed_hash_value: [u8; 2],
    signature: SignatureBytes,
}

/// The signature material following the hash prefix.
#[derive(Clone, PartialEq, Eq, derive_more::Debug)]
pub enum SignatureBytes {
    /// One MPI for RSA, two for DSA and the EC algorithms.
    Mpis(SmallVec<[Mpi; 2]>),
    /// Algorithms we do not know the layout of.
    Native(#[debug("{}", hex::encode(_0))] Bytes),
}

impl Serialize for SignatureBytes {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        match self {
            SignatureBytes::Mpis(mpis) => mpis.as_slice().to_writer(writer),
            SignatureBytes::Native(raw) => {
                writer.write_all(raw)?;
                Ok(())
            }
        }
    }

    fn write_len(&self) -> usize {
        match self {
            SignatureBytes::Mpis(mpis) => mpis.as_slice().write_len(),
            SignatureBytes::Native(raw) => raw.len(),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, FromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum SignatureType {
    /// Signature of a binary document.
    Binary = 0x00,
    /// Signature of a canonical text document.
    Text = 0x01,
    /// Standalone signature.
    Standalone = 0x02,
    /// Generic certification of a User ID and Public-Key packet.
    CertGeneric = 0x10,
    /// Persona certification of a User ID and Public-Key packet.
    CertPersona = 0x11,
    /// Casual certification of a User ID and Public-Key packet.
    CertCasual = 0x12,
    /// Positive certification of a User ID and Public-Key packet.
    CertPositive = 0x13,
    /// Subkey Binding Signature
    SubkeyBinding = 0x18,
    /// Primary Key Binding Signature
    KeyBinding = 0x19,
    /// Signature directly on a key
    Key = 0x1F,
    /// Key revocation signature
    KeyRevocation = 0x20,
    /// Subkey revocation signature
    SubkeyRevocation = 0x28,
    /// Certification revocation signature
    CertRevocation = 0x30,
    /// Timestamp signature.
    Timestamp = 0x40,
    /// Third-Party Confirmation signature.
    ThirdParty = 0x50,

    #[num_enum(catch_all)]
    Other(u8),
}

impl Signature {
    /// Parses a signature packet body. The body must be consumed completely.
    pub fn from_buf<B: Buf>(packet_header: PacketHeader, mut i: B) -> Result<Self> {
        let version = i.read_u8()?;
        if version != 4 {
            unsupported_err!("signature version {}", version);
        }

        let typ = SignatureType::from(i.read_u8()?);
        let pub_alg = PublicKeyAlgorithm::from(i.read_u8()?);
        let hash_alg = HashAlgorithm::from(i.read_u8()?);
        let hashed_subpackets = SubpacketArea::from_buf(&mut i)?;
        let unhashed_subpackets = SubpacketArea::from_buf(&mut i)?;
        let signed_hash_value = i.read_array::<2>()?;

        let signature = match pub_alg.signature_mpi_count() {
            Some(n) => {
                let mut mpis = SmallVec::new();
                for _ in 0..n {
                    mpis.push(Mpi::from_buf(&mut i)?);
                }
                SignatureBytes::Mpis(mpis)
            }
            None => SignatureBytes::Native(i.rest()),
        };
        ensure_consumed(&i, "signature")?;

        debug!(
            "signature {:?} by {:?}/{:?}, {} hashed, {} unhashed subpackets",
            typ,
            pub_alg,
            hash_alg,
            hashed_subpackets.len(),
            unhashed_subpackets.len()
        );

        Ok(Signature {
            packet_header,
            typ,
            pub_alg,
            hash_alg,
            hashed_subpackets,
            unhashed_subpackets,
            signed_hash_value,
            signature,
        })
    }

    pub fn typ(&self) -> SignatureType {
        self.typ
    }

    pub fn pub_alg(&self) -> PublicKeyAlgorithm {
        self.pub_alg
    }

    pub fn hash_alg(&self) -> HashAlgorithm {
        self.hash_alg
    }

    pub fn hashed_subpackets(&self) -> &SubpacketArea {
        &self.hashed_subpackets
    }

    pub fn unhashed_subpackets(&self) -> &SubpacketArea {
        &self.unhashed_subpackets
    }

    /// The left 16 bits of the signed hash value.
    pub fn signed_hash_value(&self) -> [u8; 2] {
        self.signed_hash_value
    }

    pub fn signature(&self) -> &SignatureBytes {
        &self.signature
    }

    /// Whether the unhashed area carries a device marker.
    ///
    /// The hashed area is never consulted.
    pub fn has_custom_subpacket(&self) -> bool {
        self.unhashed_subpackets.iter().any(|s| s.is_device_marker())
    }

    /// The signature creation time, from the hashed area.
    pub fn created(&self) -> Option<DateTime<Utc>> {
        let sp = self.hashed_subpackets.find(SIGNATURE_CREATION_TIME)?;
        let raw: [u8; 4] = sp.body().try_into().ok()?;
        DateTime::from_timestamp(i64::from(u32::from_be_bytes(raw)), 0)
    }

    /// The issuer key id, from either area.
    pub fn issuer(&self) -> Option<KeyId> {
        self.hashed_subpackets
            .find(ISSUER)
            .or_else(|| self.unhashed_subpackets.find(ISSUER))
            .and_then(|sp| KeyId::from_slice(sp.body()).ok())
    }

    /// Decodes the embedded signature subpackets of both areas.
    pub fn embedded_signatures(&self) -> Result<Vec<Signature>> {
        self.hashed_subpackets
            .iter()
            .chain(self.unhashed_subpackets.iter())
            .filter(|sp| sp.typ() == Some(EMBEDDED_SIGNATURE))
            .map(|sp| {
                let body = sp.body();
                let header = PacketHeader::new_fixed(Tag::Signature, body.len().try_into()?);
                Signature::from_buf(header, body)
            })
            .collect()
    }
}

impl Serialize for Signature {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u8(4)?;
        writer.write_u8(self.typ.into())?;
        writer.write_u8(self.pub_alg.into())?;
        writer.write_u8(self.hash_alg.into())?;
        self.hashed_subpackets.to_writer(writer)?;
        self.unhashed_subpackets.to_writer(writer)?;
        writer.write_all(&self.signed_hash_value)?;
        self.signature.to_writer(writer)?;

        Ok(())
    }

    fn write_len(&self) -> usize {
        4 + self.hashed_subpackets.write_len()
            + self.unhashed_subpackets.write_len()
            + 2
            + self.signature.write_len()
    }
}

impl PacketTrait for Signature {
    fn packet_header(&self) -> &PacketHeader {
        &self.packet_header
    }
}
