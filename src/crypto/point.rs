use crate::device::CurveName;
use crate::errors::{Error, Result};

/// Turns the point encoding most devices return into the form OpenPGP
/// stores in key packets.
///
/// - `nist256p1`, `secp256k1`: SEC1 compressed or uncompressed becomes `0x04 || x || y`.
/// - `ed25519`, `curve25519`: `0x00 || key` (33 bytes) becomes `0x40 || key`.
pub fn decompress_pubkey(pubkey: &[u8], curve: CurveName) -> Result<Vec<u8>> {
    use elliptic_curve::sec1::ToEncodedPoint;

    let invalid = |message: String| Error::InvalidPublicKey {
        curve: curve.to_string(),
        message,
    };

    match curve {
        CurveName::Nist256p1 => {
            let key = p256::PublicKey::from_sec1_bytes(pubkey).map_err(|e| invalid(e.to_string()))?;
            Ok(key.to_encoded_point(false).as_bytes().to_vec())
        }
        CurveName::Secp256k1 => {
            let key = k256::PublicKey::from_sec1_bytes(pubkey).map_err(|e| invalid(e.to_string()))?;
            Ok(key.to_encoded_point(false).as_bytes().to_vec())
        }
        CurveName::Ed25519 | CurveName::Curve25519 => match pubkey {
            [0x00, key @ ..] if key.len() == 32 => {
                let mut out = Vec::with_capacity(33);
                out.push(0x40);
                out.extend_from_slice(key);
                Ok(out)
            }
            _ => Err(invalid(format!(
                "expected 0x00 prefixed 32 byte key, got {} bytes",
                pubkey.len()
            ))),
        },
        CurveName::Rsa2048 | CurveName::Rsa4096 => {
            unsupported_err!("{} keys can not be decompressed", curve)
        }
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    const P256_X: [u8; 32] = hex!("6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296");
    const P256_Y: [u8; 32] = hex!("4fe342e2fe1a7f9b8ee7eb4a7c0f9e162bce33576b315ececbb6406837bf51f5");

    #[test]
    fn test_nist256p1() {
        let mut compressed = vec![0x03];
        compressed.extend_from_slice(&P256_X);

        let point = decompress_pubkey(&compressed, CurveName::Nist256p1).unwrap();
        assert_eq!(point.len(), 65);
        assert_eq!(point[0], 0x04);
        assert_eq!(&point[1..33], &P256_X);
        assert_eq!(&point[33..], &P256_Y);

        // already uncompressed input is passed on unchanged
        assert_eq!(decompress_pubkey(&point, CurveName::Nist256p1).unwrap(), point);

        assert!(decompress_pubkey(&[0x02; 20], CurveName::Nist256p1).is_err());
    }

    #[test]
    fn test_secp256k1() {
        // the secp256k1 generator
        let compressed = hex!("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798");
        let point = decompress_pubkey(&compressed, CurveName::Secp256k1).unwrap();
        assert_eq!(
            point,
            hex!(
                "04"
                "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
                "483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8"
            )
        );
    }

    #[test]
    fn test_25519() {
        let mut raw = vec![0x00];
        raw.extend_from_slice(&[0xAB; 32]);
        let point = decompress_pubkey(&raw, CurveName::Ed25519).unwrap();
        assert_eq!(point[0], 0x40);
        assert_eq!(&point[1..], &[0xAB; 32]);
        assert_eq!(decompress_pubkey(&raw, CurveName::Curve25519).unwrap(), point);

        assert!(matches!(
            decompress_pubkey(&raw[1..], CurveName::Ed25519),
            Err(Error::InvalidPublicKey { .. })
        ));
    }

    #[test]
    fn test_rsa() {
        assert!(matches!(
            decompress_pubkey(&[0x01], CurveName::Rsa2048),
            Err(Error::Unsupported { .. })
        ));
    }
}
