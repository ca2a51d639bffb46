//! GnuPG keygrip derivation.
//!
//! A keygrip is SHA-1 over the key parameters as libgcrypt canonicalises
//! them. RSA hashes the bare modulus; every other algorithm hashes a run of
//! `(<len>:<name><len>:<value>)` tuples, with EC keys additionally spelling
//! out the curve's domain parameters.

use hex_literal::hex;
use log::debug;
use sha1_checked::{Digest, Sha1};

use crate::crypto::ecc_curve::ECCCurve;
use crate::errors::{Error, Result};
use crate::types::{Keygrip, PublicParams};

struct CurveParams {
    p: &'static [u8],
    a: &'static [u8],
    b: &'static [u8],
    g: &'static [u8],
    n: &'static [u8],
}

const NIST_P256: CurveParams = CurveParams {
    p: &hex!("ffffffff00000001000000000000000000000000ffffffffffffffffffffffff"),
    a: &hex!("ffffffff00000001000000000000000000000000fffffffffffffffffffffffc"),
    b: &hex!("5ac635d8aa3a93e7b3ebbd55769886bc651d06b0cc53b0f63bce3c3e27d2604b"),
    g: &hex!(
        "04"
        "6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296"
        "4fe342e2fe1a7f9b8ee7eb4a7c0f9e162bce33576b315ececbb6406837bf51f5"
    ),
    n: &hex!("ffffffff00000000ffffffffffffffffbce6faada7179e84f3b9cac2fc632551"),
};

const SECP256K1: CurveParams = CurveParams {
    p: &hex!("fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f"),
    // libgcrypt hashes the zero coefficient as an empty value
    a: &[],
    b: &hex!("07"),
    g: &hex!(
        "04"
        "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        "483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8"
    ),
    n: &hex!("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141"),
};

const ED25519: CurveParams = CurveParams {
    p: &hex!("7fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffed"),
    a: &hex!("01"),
    b: &hex!("2dfc9311d490018c7338bf8688861767ff8ff5b2bebe27548a14b235eca6874a"),
    g: &hex!(
        "04"
        "216936d3cd6e53fec0a4e231fdd6dc5c692cc7609525a7b2c9562d608f25d51a"
        "6666666666666666666666666666666666666666666666666666666666666658"
    ),
    n: &hex!("1000000000000000000000000000000014def9dea2f79cd65812631a5cf5d3ed"),
};

const CURVE25519: CurveParams = CurveParams {
    p: &hex!("7fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffed"),
    a: &hex!("01db41"),
    b: &hex!("01"),
    g: &hex!(
        "04"
        "0000000000000000000000000000000000000000000000000000000000000009"
        "20ae19a1b8a086b4e01edd2c7748d14c923d4d7e6d7c61b229e9c5a27eced3d9"
    ),
    n: &hex!("1000000000000000000000000000000014def9dea2f79cd65812631a5cf5d3ed"),
};

/// Computes the keygrip of the given public parameters.
///
/// Fails with [`Error::Unsupported`] for algorithms and curves that have no
/// derivation here, and with [`Error::InvalidPublicKey`] for points that are
/// not valid on their curve.
pub fn keygrip(params: &PublicParams) -> Result<Keygrip> {
    let mut h = Sha1::new();
    match params {
        PublicParams::RSA { n, .. } => {
            h.update(n.to_signed_safe());
        }
        PublicParams::DSA { p, q, g, y } => {
            write_tuple(&mut h, "p", &p.to_signed_safe());
            write_tuple(&mut h, "q", &q.to_signed_safe());
            write_tuple(&mut h, "g", &g.to_signed_safe());
            write_tuple(&mut h, "y", &y.to_signed_safe());
        }
        PublicParams::Elgamal { p, g, y } => {
            write_tuple(&mut h, "p", &p.to_signed_safe());
            write_tuple(&mut h, "g", &g.to_signed_safe());
            write_tuple(&mut h, "y", &y.to_signed_safe());
        }
        PublicParams::ECDSA { curve, p } | PublicParams::ECDH { curve, p, .. } => {
            match curve {
                ECCCurve::P256 => {
                    let q = nist_p256_point(p.as_bytes())?;
                    write_curve(&mut h, &NIST_P256, &q);
                }
                ECCCurve::Secp256k1 => {
                    let q = secp256k1_point(p.as_bytes())?;
                    write_curve(&mut h, &SECP256K1, &q);
                }
                ECCCurve::Curve25519 => {
                    let q = native_25519_point(curve, p.as_bytes())?;
                    write_curve(&mut h, &CURVE25519, &q);
                }
                _ => unsupported_err!("keygrip for curve {}", curve),
            }
        }
        PublicParams::EdDSALegacy { curve, q } => match curve {
            ECCCurve::Ed25519 => {
                let q = native_25519_point(curve, q.as_bytes())?;
                write_curve(&mut h, &ED25519, &q);
            }
            _ => unsupported_err!("keygrip for curve {}", curve),
        },
        PublicParams::Unknown { .. } => unsupported_err!("keygrip for unknown algorithm"),
    }

    let grip = Keygrip::new(h.finalize().into());
    debug!("keygrip {}", grip);
    Ok(grip)
}

fn write_curve(h: &mut Sha1, curve: &CurveParams, q: &[u8]) {
    write_tuple(h, "p", curve.p);
    write_tuple(h, "a", curve.a);
    write_tuple(h, "b", curve.b);
    write_tuple(h, "g", curve.g);
    write_tuple(h, "n", curve.n);
    write_tuple(h, "q", q);
}

fn write_tuple(h: &mut Sha1, name: &str, value: &[u8]) {
    h.update(format!("({}:{}{}:", name.len(), name, value.len()).as_bytes());
    h.update(value);
    h.update(b")");
}

/// Validates the point and returns it uncompressed.
fn nist_p256_point(raw: &[u8]) -> Result<Vec<u8>> {
    use p256::elliptic_curve::sec1::ToEncodedPoint;

    let key = p256::PublicKey::from_sec1_bytes(raw).map_err(|e| Error::InvalidPublicKey {
        curve: ECCCurve::P256.to_string(),
        message: e.to_string(),
    })?;
    Ok(key.to_encoded_point(false).as_bytes().to_vec())
}

fn secp256k1_point(raw: &[u8]) -> Result<Vec<u8>> {
    use k256::elliptic_curve::sec1::ToEncodedPoint;

    let key = k256::PublicKey::from_sec1_bytes(raw).map_err(|e| Error::InvalidPublicKey {
        curve: ECCCurve::Secp256k1.to_string(),
        message: e.to_string(),
    })?;
    Ok(key.to_encoded_point(false).as_bytes().to_vec())
}

/// Strips the `0x40` native point prefix.
fn native_25519_point(curve: &ECCCurve, raw: &[u8]) -> Result<Vec<u8>> {
    match raw {
        [0x40, rest @ ..] if rest.len() == 32 => Ok(rest.to_vec()),
        _ => Err(Error::InvalidPublicKey {
            curve: curve.to_string(),
            message: format!("expected 0x40 prefixed 32 byte point, got {} bytes", raw.len()),
        }),
    }
}
