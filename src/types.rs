mod fingerprint;
mod key_id;
mod keygrip;
mod mpi;
mod packet;
mod params;

pub use self::{
    fingerprint::Fingerprint,
    key_id::KeyId,
    keygrip::Keygrip,
    mpi::{parse_mpis, Mpi},
    packet::*,
    params::PublicParams,
};
