use std::{fmt, io, str};

use bytes::Bytes;

use crate::errors::Result;
use crate::packet::{PacketHeader, PacketTrait};
use crate::ser::Serialize;
use crate::types::Tag;

/// User ID Packet
///
/// The content is kept as raw bytes, GnuPG does not enforce UTF-8 on import.
///
/// Ref: <https://www.rfc-editor.org/rfc/rfc4880.html#section-5.11>
#[derive(Clone, PartialEq, Eq, derive_more::Debug)]
pub struct UserId {
    packet_header: PacketHeader,
    #[debug("{:?}", String::from_utf8_lossy(id))]
    id: Bytes,
}

impl UserId {
    /// Parses a `UserId` packet from the given body.
    pub fn from_bytes(packet_header: PacketHeader, id: Bytes) -> Self {
        UserId { packet_header, id }
    }

    /// Creates a new user id packet with a new style header.
    pub fn from_str(id: &str) -> Result<Self> {
        let len = id.len().try_into()?;
        Ok(UserId {
            packet_header: PacketHeader::new_fixed(Tag::UserId, len),
            id: Bytes::copy_from_slice(id.as_bytes()),
        })
    }

    pub fn id(&self) -> &[u8] {
        &self.id
    }

    /// The user id as text, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        str::from_utf8(&self.id).ok()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.id))
    }
}

impl Serialize for UserId {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.id)?;
        Ok(())
    }

    fn write_len(&self) -> usize {
        self.id.len()
    }
}

impl PacketTrait for UserId {
    fn packet_header(&self) -> &PacketHeader {
        &self.packet_header
    }
}
