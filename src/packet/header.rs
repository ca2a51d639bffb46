use byteorder::WriteBytesExt;
use bytes::Buf;
use log::debug;

use crate::errors::Result;
use crate::parsing::BufParsing;
use crate::ser::Serialize;
use crate::types::{PacketHeaderVersion, PacketLength, Tag};

/// Represents a packet header.
///
/// Ref: <https://www.rfc-editor.org/rfc/rfc4880.html#section-4.2>
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PacketHeader {
    version: PacketHeaderVersion,
    tag: Tag,
    length: PacketLength,
}

impl PacketHeader {
    /// Parse a single packet header from the given buffer.
    pub fn from_buf<B: Buf>(mut i: B) -> Result<Self> {
        let header = i.read_u8()?;

        let first_two_bits = header & 0b1100_0000;
        let parsed = match first_two_bits {
            0b1100_0000 => {
                // new starts with 0b11
                let tag = Tag::from(header & 0b0011_1111);
                let olen = i.read_u8()?;
                let length = match olen {
                    // One-Octet Lengths
                    0..=191 => PacketLength::Fixed(olen.into()),
                    // Two-Octet Lengths
                    192..=223 => {
                        let a = i.read_u8()?;
                        let l = ((u32::from(olen) - 192) << 8) + 192 + u32::from(a);
                        PacketLength::Fixed(l)
                    }
                    // Partial Body Lengths
                    224..=254 => {
                        unsupported_err!("partial body length in {:?} packet", tag)
                    }
                    // Five-Octet Lengths
                    255 => PacketLength::Fixed(i.read_be_u32()?),
                };
                PacketHeader {
                    version: PacketHeaderVersion::New,
                    tag,
                    length,
                }
            }
            0b1000_0000 => {
                // old starts with 0b10
                let tag = Tag::from((header >> 2) & 0b0000_1111);
                let length = match header & 0b0000_0011 {
                    // One-Octet Lengths
                    0 => PacketLength::Fixed(i.read_u8()?.into()),
                    // Two-Octet Lengths
                    1 => PacketLength::Fixed(i.read_be_u16()?.into()),
                    // Four-Octet Lengths
                    2 => PacketLength::Fixed(i.read_be_u32()?),
                    _ => PacketLength::Indeterminate,
                };
                PacketHeader {
                    version: PacketHeaderVersion::Old,
                    tag,
                    length,
                }
            }
            _ => {
                bail!("invalid packet header {:#010b}", header);
            }
        };

        debug!("packet header {:?}", parsed);
        Ok(parsed)
    }

    pub fn from_parts(version: PacketHeaderVersion, tag: Tag, length: PacketLength) -> Result<Self> {
        let t: u8 = tag.into();
        match (version, length) {
            (_, PacketLength::Partial(_)) => {
                unsupported_err!("writing partial body lengths")
            }
            (PacketHeaderVersion::New, PacketLength::Indeterminate) => {
                bail!("indeterminate packet length is only supported in old style headers")
            }
            (PacketHeaderVersion::Old, _) => {
                ensure!(t < 16, "tag {} is not compatible with old packet headers", t);
            }
            (PacketHeaderVersion::New, _) => {
                ensure!(t < 64, "tag {} is not compatible with new packet headers", t);
            }
        }

        Ok(PacketHeader {
            version,
            tag,
            length,
        })
    }

    /// Creates a `New` style packet header.
    pub fn new_fixed(tag: Tag, length: u32) -> Self {
        PacketHeader {
            version: PacketHeaderVersion::New,
            tag,
            length: PacketLength::Fixed(length),
        }
    }

    pub const fn version(&self) -> PacketHeaderVersion {
        self.version
    }

    pub fn packet_length(&self) -> PacketLength {
        self.length
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }
}

impl Serialize for PacketHeader {
    fn to_writer<W: std::io::Write>(&self, writer: &mut W) -> Result<()> {
        match self.length {
            PacketLength::Fixed(len) => {
                self.version
                    .write_header(writer, self.tag, len.try_into()?)?;
            }
            PacketLength::Indeterminate => {
                let tag: u8 = self.tag.into();
                writer.write_u8(0b1000_0011 | (tag << 2))?;
            }
            PacketLength::Partial(_) => {
                unsupported_err!("writing partial body lengths")
            }
        }
        Ok(())
    }

    fn write_len(&self) -> usize {
        match self.length {
            PacketLength::Fixed(len) => self.version.header_len(len as usize),
            PacketLength::Indeterminate => 1,
            PacketLength::Partial(_) => 2,
        }
    }
}
