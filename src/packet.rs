//! # Packet module
//!
//! Handles everything in relationship to packets.

mod header;
mod many;
mod packet_sum;

mod public_key;
mod signature;
pub mod subpacket;
mod user_id;

pub use self::{
    header::PacketHeader,
    many::PacketParser,
    packet_sum::{Packet, PacketTrait},
    public_key::PublicKey,
    signature::{Signature, SignatureBytes, SignatureType},
    subpacket::{Subpacket, SubpacketArea, SubpacketLength, CUSTOM_KEY_LABEL},
    user_id::UserId,
};
