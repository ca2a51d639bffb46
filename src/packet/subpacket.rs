//! Signature subpackets, framed but not interpreted.
//!
//! A subpacket is kept as its raw bytes, type octet included. Only the few
//! accessors on [`Signature`](crate::packet::Signature) look inside them.

use std::io;

use byteorder::{BigEndian, WriteBytesExt};
use bytes::{Buf, Bytes};
use log::debug;
use smallvec::SmallVec;

use crate::errors::Result;
use crate::parsing::BufParsing;
use crate::ser::Serialize;

/// Label carried by the marker subpacket on keys created by a hardware device.
pub const CUSTOM_KEY_LABEL: &[u8] = b"TREZOR-GPG";

/// Policy URI, the type of the canonical device marker.
pub const CUSTOM_SUBPACKET_TYPE: u8 = 26;

/// Type of the marker written by older releases.
pub const LEGACY_SUBPACKET_TYPE: u8 = 10;

pub const SIGNATURE_CREATION_TIME: u8 = 2;
pub const ISSUER: u8 = 16;
pub const EMBEDDED_SIGNATURE: u8 = 32;

/// Represents a subpacket length.
///
/// The length counts the type octet plus the data.
///
/// Ref <https://www.rfc-editor.org/rfc/rfc4880.html#section-5.2.3.1>
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum SubpacketLength {
    /// 1 byte encoding, must be less than `192`.
    One(#[cfg_attr(test, proptest(strategy = "0u8..=191"))] u8),
    /// 2 byte encoding
    Two(#[cfg_attr(test, proptest(strategy = "192u16..=8383"))] u16),
    /// 5 byte encoding
    Five(#[cfg_attr(test, proptest(strategy = "8384u32.."))] u32),
}

impl SubpacketLength {
    /// Parses a subpacket length from the given buffer.
    pub fn from_buf<B: Buf>(mut i: B) -> Result<Self> {
        let olen = i.read_u8()?;
        let len = match olen {
            // One-Octet Lengths
            0..=191 => Self::One(olen),
            // Two-Octet Lengths
            192..=254 => {
                let a = i.read_u8()?;
                let l = ((olen as u16 - 192) << 8) + 192 + a as u16;
                Self::Two(l)
            }
            // Five-Octet Lengths
            255 => {
                let len = i.read_be_u32()?;
                Self::Five(len)
            }
        };
        Ok(len)
    }

    /// Encodes the given length into its shortest form.
    pub fn encode(len: u32) -> Self {
        match len {
            0..=191 => Self::One(len as u8),
            192..=8383 => Self::Two(len as u16),
            _ => Self::Five(len),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::One(l) => *l as _,
            Self::Two(l) => *l as _,
            Self::Five(l) => *l as _,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Serialize for SubpacketLength {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        match self {
            Self::One(l) => {
                writer.write_u8(*l)?;
            }
            Self::Two(l) => {
                writer.write_u8((((l - 192) / 256) + 192) as u8)?;
                writer.write_u8(((l - 192) % 256) as u8)?;
            }
            Self::Five(l) => {
                writer.write_u8(0xFF)?;
                writer.write_u32::<BigEndian>(*l)?
            }
        }
        Ok(())
    }

    fn write_len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Two(_) => 2,
            Self::Five(_) => 5,
        }
    }
}

/// A single subpacket: the type octet followed by its data.
#[derive(Clone, PartialEq, Eq, Hash, derive_more::Debug)]
#[debug("Subpacket({})", hex::encode(_0))]
pub struct Subpacket(Bytes);

impl Subpacket {
    /// Builds a subpacket of the given type.
    pub fn new(typ: u8, body: &[u8]) -> Self {
        let mut raw = Vec::with_capacity(1 + body.len());
        raw.push(typ);
        raw.extend_from_slice(body);
        Subpacket(raw.into())
    }

    /// The canonical marker for keys that live on a device.
    pub fn device_marker() -> Self {
        Self::new(CUSTOM_SUBPACKET_TYPE, CUSTOM_KEY_LABEL)
    }

    /// The marker as written by older releases.
    pub fn legacy_device_marker() -> Self {
        Self::new(LEGACY_SUBPACKET_TYPE, CUSTOM_KEY_LABEL)
    }

    pub fn is_device_marker(&self) -> bool {
        let raw = self.as_bytes();
        raw == Self::device_marker().as_bytes() || raw == Self::legacy_device_marker().as_bytes()
    }

    /// The subpacket type, without the critical bit. `None` for an empty subpacket.
    pub fn typ(&self) -> Option<u8> {
        self.0.first().map(|t| t & 0x7F)
    }

    pub fn is_critical(&self) -> bool {
        self.0.first().is_some_and(|t| t & 0x80 != 0)
    }

    /// The data following the type octet.
    pub fn body(&self) -> &[u8] {
        self.0.get(1..).unwrap_or_default()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    fn len(&self) -> SubpacketLength {
        SubpacketLength::encode(self.0.len() as u32)
    }
}

impl From<Bytes> for Subpacket {
    fn from(raw: Bytes) -> Self {
        Subpacket(raw)
    }
}

impl From<&[u8]> for Subpacket {
    fn from(raw: &[u8]) -> Self {
        Subpacket(Bytes::copy_from_slice(raw))
    }
}

impl AsRef<[u8]> for Subpacket {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Subpacket {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        self.len().to_writer(writer)?;
        writer.write_all(&self.0)?;
        Ok(())
    }

    fn write_len(&self) -> usize {
        self.len().write_len() + self.0.len()
    }
}

/// An ordered run of subpackets behind a 2-octet total length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubpacketArea(SmallVec<[Subpacket; 4]>);

impl SubpacketArea {
    pub fn new(subpackets: impl IntoIterator<Item = Subpacket>) -> Self {
        SubpacketArea(subpackets.into_iter().collect())
    }

    /// Reads the 2-octet length and exactly that many bytes of subpackets.
    pub fn from_buf<B: Buf>(mut i: B) -> Result<Self> {
        let total = usize::from(i.read_be_u16()?);
        if i.remaining() < total {
            malformed_err!(
                "area declares {} bytes, only {} remain",
                total,
                i.remaining()
            );
        }
        let mut area = i.read_take(total)?;

        let mut subpackets = SmallVec::new();
        while area.has_remaining() {
            let len = SubpacketLength::from_buf(&mut area);
            let len = match len {
                Ok(len) => len.len(),
                Err(err) if err.is_incomplete() => {
                    malformed_err!("subpacket length overruns the area of {} bytes", total)
                }
                Err(err) => return Err(err),
            };
            if len > area.remaining() {
                malformed_err!(
                    "subpacket of {} bytes overruns the area, {} bytes left",
                    len,
                    area.remaining()
                );
            }
            let raw = area.read_take(len)?;
            debug!("subpacket {}", hex::encode(&raw));
            subpackets.push(Subpacket(raw));
        }

        Ok(SubpacketArea(subpackets))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Subpacket> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The first subpacket of the given type.
    pub fn find(&self, typ: u8) -> Option<&Subpacket> {
        self.iter().find(|s| s.typ() == Some(typ))
    }

    pub fn push(&mut self, subpacket: Subpacket) {
        self.0.push(subpacket);
    }

    fn body_len(&self) -> usize {
        self.0.as_slice().write_len()
    }
}

impl std::ops::Index<usize> for SubpacketArea {
    type Output = Subpacket;

    fn index(&self, index: usize) -> &Subpacket {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a SubpacketArea {
    type Item = &'a Subpacket;
    type IntoIter = std::slice::Iter<'a, Subpacket>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Subpacket> for SubpacketArea {
    fn from_iter<T: IntoIterator<Item = Subpacket>>(iter: T) -> Self {
        SubpacketArea::new(iter)
    }
}

impl Serialize for SubpacketArea {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u16::<BigEndian>(self.body_len().try_into()?)?;
        self.0.as_slice().to_writer(writer)
    }

    fn write_len(&self) -> usize {
        2 + self.body_len()
    }
}
