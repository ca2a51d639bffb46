use std::io;

use byteorder::WriteBytesExt;
use bytes::{Buf, Bytes};

use crate::crypto::{ecc_curve::ECCCurve, public_key::PublicKeyAlgorithm};
use crate::errors::Result;
use crate::parsing::{read_len_prefixed, BufParsing};
use crate::ser::Serialize;
use crate::types::Mpi;

/// Represent the public parameters for the different algorithms.
///
/// EC points are kept in their OpenPGP MPI form (`0x04 || x || y` for the
/// NIST and Koblitz curves, `0x40 || native` for the 25519 curves).
#[derive(PartialEq, Eq, Clone, derive_more::Debug)]
pub enum PublicParams {
    RSA {
        n: Mpi,
        e: Mpi,
    },
    DSA {
        p: Mpi,
        q: Mpi,
        g: Mpi,
        y: Mpi,
    },
    Elgamal {
        p: Mpi,
        g: Mpi,
        y: Mpi,
    },
    ECDSA {
        curve: ECCCurve,
        p: Mpi,
    },
    EdDSALegacy {
        curve: ECCCurve,
        q: Mpi,
    },
    ECDH {
        curve: ECCCurve,
        p: Mpi,
        /// KDF parameters without their length octet: reserved, hash, cipher.
        #[debug("{}", hex::encode(kdf))]
        kdf: Bytes,
    },
    Unknown {
        #[debug("{}", hex::encode(data))]
        data: Bytes,
    },
}

impl PublicParams {
    /// Parses the public parameters of a key, consuming `i` to its end.
    pub fn from_buf<B: Buf>(typ: PublicKeyAlgorithm, mut i: B) -> Result<PublicParams> {
        let params = match typ {
            PublicKeyAlgorithm::RSA
            | PublicKeyAlgorithm::RSAEncrypt
            | PublicKeyAlgorithm::RSASign => {
                let n = Mpi::from_buf(&mut i)?;
                let e = Mpi::from_buf(&mut i)?;
                PublicParams::RSA { n, e }
            }
            PublicKeyAlgorithm::DSA => {
                let p = Mpi::from_buf(&mut i)?;
                let q = Mpi::from_buf(&mut i)?;
                let g = Mpi::from_buf(&mut i)?;
                let y = Mpi::from_buf(&mut i)?;
                PublicParams::DSA { p, q, g, y }
            }
            PublicKeyAlgorithm::Elgamal | PublicKeyAlgorithm::ElgamalSign => {
                let p = Mpi::from_buf(&mut i)?;
                let g = Mpi::from_buf(&mut i)?;
                let y = Mpi::from_buf(&mut i)?;
                PublicParams::Elgamal { p, g, y }
            }
            PublicKeyAlgorithm::ECDSA => {
                let curve = read_curve(&mut i)?;
                let p = Mpi::from_buf(&mut i)?;
                PublicParams::ECDSA { curve, p }
            }
            PublicKeyAlgorithm::EdDSALegacy => {
                let curve = read_curve(&mut i)?;
                let q = Mpi::from_buf(&mut i)?;
                PublicParams::EdDSALegacy { curve, q }
            }
            PublicKeyAlgorithm::ECDH => {
                let curve = read_curve(&mut i)?;
                let p = Mpi::from_buf(&mut i)?;
                let kdf = read_len_prefixed(&mut i, "ecdh kdf")?;
                PublicParams::ECDH { curve, p, kdf }
            }
            PublicKeyAlgorithm::DiffieHellman | PublicKeyAlgorithm::Unknown(_) => {
                PublicParams::Unknown { data: i.rest() }
            }
        };

        Ok(params)
    }

    /// The curve of EC keys.
    pub fn curve(&self) -> Option<&ECCCurve> {
        match self {
            Self::ECDSA { curve, .. } | Self::EdDSALegacy { curve, .. } | Self::ECDH { curve, .. } => {
                Some(curve)
            }
            _ => None,
        }
    }
}

fn read_curve<B: Buf>(i: &mut B) -> Result<ECCCurve> {
    let oid = read_len_prefixed(i, "curve oid")?;
    match ECCCurve::from_oid(&oid) {
        Some(curve) => Ok(curve),
        None => bail!("invalid curve oid {}", hex::encode(&oid)),
    }
}

fn write_curve<W: io::Write>(curve: &ECCCurve, writer: &mut W) -> Result<()> {
    let oid = curve.oid();
    let oid = oid.as_bytes();
    writer.write_u8(oid.len().try_into()?)?;
    writer.write_all(oid)?;
    Ok(())
}

impl Serialize for PublicParams {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        match self {
            PublicParams::RSA { n, e } => {
                n.to_writer(writer)?;
                e.to_writer(writer)?;
            }
            PublicParams::DSA { p, q, g, y } => {
                p.to_writer(writer)?;
                q.to_writer(writer)?;
                g.to_writer(writer)?;
                y.to_writer(writer)?;
            }
            PublicParams::Elgamal { p, g, y } => {
                p.to_writer(writer)?;
                g.to_writer(writer)?;
                y.to_writer(writer)?;
            }
            PublicParams::ECDSA { curve, p } => {
                write_curve(curve, writer)?;
                p.to_writer(writer)?;
            }
            PublicParams::EdDSALegacy { curve, q } => {
                write_curve(curve, writer)?;
                q.to_writer(writer)?;
            }
            PublicParams::ECDH { curve, p, kdf } => {
                write_curve(curve, writer)?;
                p.to_writer(writer)?;
                writer.write_u8(kdf.len().try_into()?)?;
                writer.write_all(kdf)?;
            }
            PublicParams::Unknown { data } => {
                writer.write_all(data)?;
            }
        }

        Ok(())
    }

    fn write_len(&self) -> usize {
        let curve_len = |curve: &ECCCurve| 1 + curve.oid().as_bytes().len();
        match self {
            PublicParams::RSA { n, e } => n.write_len() + e.write_len(),
            PublicParams::DSA { p, q, g, y } => {
                p.write_len() + q.write_len() + g.write_len() + y.write_len()
            }
            PublicParams::Elgamal { p, g, y } => p.write_len() + g.write_len() + y.write_len(),
            PublicParams::ECDSA { curve, p } => curve_len(curve) + p.write_len(),
            PublicParams::EdDSALegacy { curve, q } => curve_len(curve) + q.write_len(),
            PublicParams::ECDH { curve, p, kdf } => curve_len(curve) + p.write_len() + 1 + kdf.len(),
            PublicParams::Unknown { data } => data.len(),
        }
    }
}
