use std::io;

use byteorder::{BigEndian, WriteBytesExt};
use bytes::Buf;
use chrono::{DateTime, Utc};
use log::debug;
use sha1_checked::{Digest, Sha1};

use crate::crypto::{keygrip::keygrip, public_key::PublicKeyAlgorithm};
use crate::errors::Result;
use crate::packet::{PacketHeader, PacketTrait};
use crate::parsing::BufParsing;
use crate::ser::Serialize;
use crate::types::{Fingerprint, KeyId, KeyVersion, Keygrip, PublicParams, Tag};

/// Public-Key and Public-Subkey packets, which share one body layout.
///
/// Only version 4 keys are supported.
///
/// Ref: <https://www.rfc-editor.org/rfc/rfc4880.html#section-5.5.2>
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PublicKey {
    packet_header: PacketHeader,
    version: KeyVersion,
    algorithm: PublicKeyAlgorithm,
    created_at: DateTime<Utc>,
    public_params: PublicParams,
}

impl PublicKey {
    /// Parses a key packet body. The body must be consumed completely.
    pub fn from_buf<B: Buf>(packet_header: PacketHeader, mut i: B) -> Result<Self> {
        let version = KeyVersion::from(i.read_u8()?);
        if version != KeyVersion::V4 {
            unsupported_err!("key version {:?}", version);
        }

        let created = i.read_be_u32()?;
        let created_at = DateTime::from_timestamp(i64::from(created), 0)
            .ok_or_else(|| format_err!("invalid key creation time {}", created))?;
        let algorithm = PublicKeyAlgorithm::from(i.read_u8()?);
        let public_params = PublicParams::from_buf(algorithm, &mut i)?;
        crate::parsing::ensure_consumed(&i, "public key")?;

        debug!("{:?} key {:?} created {}", packet_header.tag(), algorithm, created_at);

        Ok(PublicKey {
            packet_header,
            version,
            algorithm,
            created_at,
            public_params,
        })
    }

    /// Creates a new key packet with a new style header.
    ///
    /// `tag` must be [`Tag::PublicKey`] or [`Tag::PublicSubkey`].
    pub fn new(
        tag: Tag,
        algorithm: PublicKeyAlgorithm,
        created_at: DateTime<Utc>,
        public_params: PublicParams,
    ) -> Result<Self> {
        ensure!(
            matches!(tag, Tag::PublicKey | Tag::PublicSubkey),
            "invalid key packet tag {:?}",
            tag
        );
        let mut key = PublicKey {
            packet_header: PacketHeader::new_fixed(tag, 0),
            version: KeyVersion::V4,
            algorithm,
            created_at,
            public_params,
        };
        key.packet_header = PacketHeader::new_fixed(tag, key.write_len().try_into()?);
        Ok(key)
    }

    pub fn version(&self) -> KeyVersion {
        self.version
    }

    pub fn algorithm(&self) -> PublicKeyAlgorithm {
        self.algorithm
    }

    pub fn created_at(&self) -> &DateTime<Utc> {
        &self.created_at
    }

    pub fn public_params(&self) -> &PublicParams {
        &self.public_params
    }

    pub fn is_subkey(&self) -> bool {
        self.packet_header.tag() == Tag::PublicSubkey
    }

    /// GnuPG's keygrip of the key material.
    pub fn keygrip(&self) -> Result<Keygrip> {
        keygrip(&self.public_params)
    }

    /// SHA-1 over `0x99 || u16 length || body`.
    pub fn fingerprint(&self) -> Result<Fingerprint> {
        let body = self.to_bytes()?;

        let mut h = Sha1::new();
        h.update([0x99]);
        h.update(u16::try_from(body.len())?.to_be_bytes());
        h.update(&body);

        Ok(Fingerprint::from(<[u8; 20]>::from(h.finalize())))
    }

    pub fn key_id(&self) -> Result<KeyId> {
        Ok(self.fingerprint()?.key_id())
    }
}

impl Serialize for PublicKey {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u8(self.version.into())?;
        writer.write_u32::<BigEndian>(self.created_at.timestamp().try_into()?)?;
        writer.write_u8(self.algorithm.into())?;
        self.public_params.to_writer(writer)?;

        Ok(())
    }

    fn write_len(&self) -> usize {
        1 + 4 + 1 + self.public_params.write_len()
    }
}

impl PacketTrait for PublicKey {
    fn packet_header(&self) -> &PacketHeader {
        &self.packet_header
    }
}
