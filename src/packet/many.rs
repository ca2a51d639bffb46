use bytes::{Buf, Bytes};
use log::{debug, warn};

use crate::armor;
use crate::errors::{Error, Result};
use crate::packet::{Packet, PacketHeader};
use crate::parsing::BufParsing;
use crate::types::PacketLength;

/// Parses packets, one at a time, from an in-memory binary export.
///
/// Iteration stops after the first error.
#[derive(Debug)]
pub struct PacketParser {
    input: Bytes,
    started: bool,
    done: bool,
}

impl PacketParser {
    pub fn new(input: impl Into<Bytes>) -> Self {
        PacketParser {
            input: input.into(),
            started: false,
            done: false,
        }
    }

    fn next_packet(&mut self) -> Result<Packet> {
        let header = PacketHeader::from_buf(&mut self.input)?;
        let body = match header.packet_length() {
            PacketLength::Fixed(len) => self.input.read_take(len.try_into()?)?,
            PacketLength::Indeterminate => self.input.rest(),
            PacketLength::Partial(_) => {
                unsupported_err!("partial body length in {:?} packet", header.tag())
            }
        };

        let packet = Packet::from_bytes(header, body)?;
        debug!("parsed packet {:?}", header.tag());
        Ok(packet)
    }
}

impl Iterator for PacketParser {
    type Item = Result<Packet>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            if armor::is_armored(&self.input) {
                self.done = true;
                return Some(Err(Error::ArmoredInput));
            }
        }
        if !self.input.has_remaining() {
            self.done = true;
            return None;
        }

        let res = self.next_packet();
        if let Err(ref err) = res {
            warn!("stopping packet parsing: {}", err);
            self.done = true;
        }
        Some(res)
    }
}
