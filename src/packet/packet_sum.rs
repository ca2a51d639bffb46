use std::io;

use bytes::Bytes;
use log::warn;

use crate::errors::Result;
use crate::packet::{PacketHeader, PublicKey, Signature, UserId};
use crate::ser::Serialize;
use crate::types::{PacketHeaderVersion, PacketLength, Tag};

/// Represents a Packet. A packet is the record structure used to encode a chunk of data in OpenPGP.
///
/// Only the packets needed to walk a key export are decoded, the rest are
/// carried as [`Packet::Other`].
///
/// Ref: <https://www.rfc-editor.org/rfc/rfc4880.html#section-4>
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Packet {
    PublicKey(PublicKey),
    PublicSubkey(PublicKey),
    UserId(UserId),
    Signature(Signature),
    Other {
        header: PacketHeader,
        #[doc(hidden)]
        body: Bytes,
    },
}

impl Packet {
    /// Decodes a packet body according to the tag in its header.
    pub fn from_bytes(header: PacketHeader, body: Bytes) -> Result<Self> {
        let packet = match header.tag() {
            Tag::PublicKey => Packet::PublicKey(PublicKey::from_buf(header, body)?),
            Tag::PublicSubkey => Packet::PublicSubkey(PublicKey::from_buf(header, body)?),
            Tag::UserId => Packet::UserId(UserId::from_bytes(header, body)),
            Tag::Signature => Packet::Signature(Signature::from_buf(header, body)?),
            _ => Packet::Other { header, body },
        };
        Ok(packet)
    }

    /// The key material of a Public-Key or Public-Subkey packet.
    pub fn as_key(&self) -> Option<&PublicKey> {
        match self {
            Packet::PublicKey(k) | Packet::PublicSubkey(k) => Some(k),
            _ => None,
        }
    }
}

impl From<UserId> for Packet {
    fn from(other: UserId) -> Packet {
        Packet::UserId(other)
    }
}

impl From<Signature> for Packet {
    fn from(other: Signature) -> Packet {
        Packet::Signature(other)
    }
}

impl From<PublicKey> for Packet {
    fn from(other: PublicKey) -> Packet {
        if other.is_subkey() {
            Packet::PublicSubkey(other)
        } else {
            Packet::PublicKey(other)
        }
    }
}

impl Serialize for Packet {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        match self {
            Self::PublicKey(p) | Self::PublicSubkey(p) => p.to_writer_with_header(writer),
            Self::UserId(p) => p.to_writer_with_header(writer),
            Self::Signature(p) => p.to_writer_with_header(writer),
            Self::Other { header, body } => {
                header.to_writer(writer)?;
                writer.write_all(body)?;
                Ok(())
            }
        }
    }

    fn write_len(&self) -> usize {
        match self {
            Self::PublicKey(p) | Self::PublicSubkey(p) => p.write_len_with_header(),
            Self::UserId(p) => p.write_len_with_header(),
            Self::Signature(p) => p.write_len_with_header(),
            Self::Other { header, body } => header.write_len() + body.len(),
        }
    }
}

pub trait PacketTrait: Serialize {
    fn packet_header(&self) -> &PacketHeader;

    fn packet_header_version(&self) -> PacketHeaderVersion {
        self.packet_header().version()
    }

    fn tag(&self) -> Tag {
        self.packet_header().tag()
    }

    /// The header to write: the original version and tag with the length of
    /// the body as this crate serializes it.
    fn normalized_header(&self) -> Result<PacketHeader> {
        let original_header = self.packet_header();
        match original_header.packet_length() {
            PacketLength::Indeterminate => Ok(*original_header),
            original => {
                let write_len = self.write_len().try_into()?;
                let header = PacketHeader::from_parts(
                    original_header.version(),
                    original_header.tag(),
                    PacketLength::Fixed(write_len),
                )?;
                if original.maybe_len() != Some(write_len) {
                    warn!(
                        "packet header mismatch between reading and writing: original: {:?}, generated: {:?}",
                        original_header, header
                    );
                }
                Ok(header)
            }
        }
    }

    /// Write this packet including the packet header.
    fn to_writer_with_header<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        self.normalized_header()?.to_writer(writer)?;
        self.to_writer(writer)
    }

    /// Length in bytes used when calling `to_writer_with_header`.
    fn write_len_with_header(&self) -> usize {
        let header_len = self
            .normalized_header()
            .map(|h| h.write_len())
            .unwrap_or_else(|_| self.packet_header().write_len());
        header_len + self.write_len()
    }

    fn to_bytes_with_header(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.write_len_with_header());
        self.to_writer_with_header(&mut buf)?;
        Ok(buf)
    }
}

impl<'a, T: 'a + PacketTrait> PacketTrait for &'a T {
    fn packet_header(&self) -> &PacketHeader {
        (*self).packet_header()
    }
}
