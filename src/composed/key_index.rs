use bytes::Bytes;
use log::{debug, warn};

use crate::errors::{Error, Result};
use crate::packet::{Packet, PacketParser, PacketTrait, PublicKey, UserId};
use crate::types::Keygrip;

/// A key found by [`load_by_keygrip`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMatch {
    /// The matching Public-Key or Public-Subkey packet.
    pub key: PublicKey,
    pub keygrip: Keygrip,
    /// The user ids of the primary key the match belongs to, in stream order.
    pub user_ids: Vec<UserId>,
}

impl KeyMatch {
    /// The user ids as text, invalid UTF-8 is replaced.
    pub fn user_id_strings(&self) -> Vec<String> {
        self.user_ids.iter().map(|u| u.to_string()).collect()
    }
}

/// The keygrip of `key`, or `None` if its algorithm has no keygrip derivation.
fn maybe_keygrip(key: &PublicKey) -> Result<Option<Keygrip>> {
    match key.keygrip() {
        Ok(grip) => Ok(Some(grip)),
        Err(Error::Unsupported { message }) => {
            warn!("skipping {:?} key: {}", key.algorithm(), message);
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Computes the keygrips of all Public-Key and Public-Subkey packets in
/// `pubkey_bytes`, in stream order.
///
/// Keys without a keygrip derivation are skipped. Iteration stops after the
/// first decoding error.
pub fn iter_keygrips(pubkey_bytes: &[u8]) -> impl Iterator<Item = Result<Keygrip>> {
    let mut failed = false;
    PacketParser::new(Bytes::copy_from_slice(pubkey_bytes)).filter_map(move |packet| {
        if failed {
            return None;
        }
        let res = packet.and_then(|packet| match packet.as_key() {
            Some(key) => maybe_keygrip(key),
            None => Ok(None),
        });
        match res {
            Ok(grip) => grip.map(Ok),
            Err(err) => {
                failed = true;
                Some(Err(err))
            }
        }
    })
}

/// Finds the key with the given keygrip in `pubkey_bytes`.
///
/// The returned user ids are those of the primary key the match belongs to,
/// so a subkey match reports its primary key's identities. The whole stream
/// is decoded, a malformed packet after the match is still an error.
pub fn load_by_keygrip(pubkey_bytes: &[u8], keygrip: &[u8]) -> Result<KeyMatch> {
    let mut found: Option<(PublicKey, Keygrip)> = None;
    let mut user_ids = Vec::new();
    // set once the group holding the match has ended
    let mut group_done = false;

    for packet in PacketParser::new(Bytes::copy_from_slice(pubkey_bytes)) {
        match packet? {
            Packet::PublicKey(key) => {
                let grip = maybe_keygrip(&key)?;
                if found.is_some() {
                    group_done = true;
                    continue;
                }
                user_ids.clear();
                if let Some(grip) = grip.filter(|g| g.as_bytes() == keygrip) {
                    found = Some((key, grip));
                }
            }
            Packet::PublicSubkey(key) => {
                let grip = maybe_keygrip(&key)?;
                if found.is_none() {
                    if let Some(grip) = grip.filter(|g| g.as_bytes() == keygrip) {
                        found = Some((key, grip));
                    }
                }
            }
            Packet::UserId(uid) if !group_done => user_ids.push(uid),
            _ => {}
        }
    }

    match found {
        Some((key, keygrip)) => {
            debug!(
                "found {:?} {} with {} user ids",
                key.tag(),
                keygrip,
                user_ids.len()
            );
            Ok(KeyMatch {
                key,
                keygrip,
                user_ids,
            })
        }
        None => Err(Error::KeyNotFound {
            keygrip: hex::encode(keygrip),
        }),
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use hex_literal::hex;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::crypto::{ecc_curve::ECCCurve, public_key::PublicKeyAlgorithm};
    use crate::ser::Serialize;
    use crate::types::{Mpi, PublicParams, Tag};

    fn rsa_key(tag: Tag, n: &[u8]) -> PublicKey {
        PublicKey::new(
            tag,
            PublicKeyAlgorithm::RSA,
            DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            PublicParams::RSA {
                n: Mpi::from_slice(n),
                e: Mpi::from_slice(&[0x01, 0x00, 0x01]),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(iter_keygrips(&[]).count(), 0);
        let err = load_by_keygrip(&[], &[0u8; 20]).unwrap_err();
        match err {
            Error::KeyNotFound { keygrip } => assert_eq!(keygrip, "00".repeat(20)),
            e => panic!("unexpected error {e:?}"),
        }
    }

    #[test]
    fn test_two_primary_keys() {
        let a = rsa_key(Tag::PublicKey, &hex!("c5 55 55 55"));
        let b = rsa_key(Tag::PublicKey, &hex!("d1 23"));
        let sub = rsa_key(Tag::PublicSubkey, &hex!("e4 56"));
        let uid_a = UserId::from_str("a").unwrap();
        let uid_b = UserId::from_str("b").unwrap();

        let data = [
            a.to_bytes_with_header().unwrap(),
            uid_a.to_bytes_with_header().unwrap(),
            b.to_bytes_with_header().unwrap(),
            uid_b.to_bytes_with_header().unwrap(),
            sub.to_bytes_with_header().unwrap(),
        ]
        .concat();

        let grips: Vec<_> = iter_keygrips(&data).collect::<Result<_>>().unwrap();
        assert_eq!(
            grips,
            vec![
                a.keygrip().unwrap(),
                b.keygrip().unwrap(),
                sub.keygrip().unwrap()
            ]
        );

        let m = load_by_keygrip(&data, a.keygrip().unwrap().as_bytes()).unwrap();
        assert_eq!(m.key, a);
        assert_eq!(m.user_id_strings(), vec!["a".to_string()]);

        let m = load_by_keygrip(&data, sub.keygrip().unwrap().as_bytes()).unwrap();
        assert_eq!(m.key, sub);
        assert!(m.key.is_subkey());
        assert_eq!(m.user_id_strings(), vec!["b".to_string()]);
    }

    #[test]
    fn test_skips_keys_without_keygrip() {
        let p384 = PublicKey::new(
            Tag::PublicKey,
            PublicKeyAlgorithm::ECDSA,
            DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            PublicParams::ECDSA {
                curve: ECCCurve::P384,
                p: Mpi::from_slice(&[0x04; 97]),
            },
        )
        .unwrap();
        let rsa = rsa_key(Tag::PublicSubkey, &hex!("c5 55"));

        let mut data = p384.to_bytes_with_header().unwrap();
        data.extend(rsa.to_bytes_with_header().unwrap());

        let grips: Vec<_> = iter_keygrips(&data).collect::<Result<_>>().unwrap();
        assert_eq!(grips, vec![rsa.keygrip().unwrap()]);
    }

    #[test]
    fn test_error_stops_iteration() {
        let rsa = rsa_key(Tag::PublicKey, &hex!("c5 55"));
        let mut data = rsa.to_bytes_with_header().unwrap();
        // not a packet header
        data.push(0x3f);
        // a well formed key after it is never reached
        data.extend(rsa.to_bytes_with_header().unwrap());

        let res: Vec<_> = iter_keygrips(&data).collect();
        assert_eq!(res.len(), 2);
        assert!(res[0].is_ok());
        assert!(matches!(res[1], Err(Error::Message { .. })));

        let mut data = rsa.to_bytes_with_header().unwrap();
        // truncated user id
        data.extend_from_slice(&hex!("cd 05 61"));
        assert!(load_by_keygrip(&data, &[0u8; 20])
            .unwrap_err()
            .is_incomplete());
    }

    #[test]
    fn test_error_after_match() {
        let a = rsa_key(Tag::PublicKey, &hex!("c5 55 55 55"));
        let b = rsa_key(Tag::PublicKey, &hex!("d1 23"));
        let data = [
            a.to_bytes_with_header().unwrap(),
            UserId::from_str("a").unwrap().to_bytes_with_header().unwrap(),
            b.to_bytes_with_header().unwrap(),
            // truncated user id in the next group
            hex!("cd 05 61").to_vec(),
        ]
        .concat();

        let last = iter_keygrips(&data).last().unwrap();
        assert!(last.unwrap_err().is_incomplete());

        let err = load_by_keygrip(&data, a.keygrip().unwrap().as_bytes()).unwrap_err();
        assert!(err.is_incomplete());
    }

    #[test]
    fn test_armored_input_is_rejected() {
        let armored = b"-----BEGIN PGP PUBLIC KEY BLOCK-----\n\n=AAAA\n-----END PGP PUBLIC KEY BLOCK-----\n";
        let res: Vec<_> = iter_keygrips(armored).collect();
        assert!(matches!(res.as_slice(), [Err(Error::ArmoredInput)]));
        assert!(matches!(
            load_by_keygrip(armored, &[0u8; 20]),
            Err(Error::ArmoredInput)
        ));
    }

    #[test]
    fn test_header_roundtrip() {
        let rsa = rsa_key(Tag::PublicKey, &hex!("c5 55"));
        let data = rsa.to_bytes_with_header().unwrap();
        let parsed = PacketParser::new(data.clone()).next().unwrap().unwrap();
        assert_eq!(parsed.to_bytes().unwrap(), data);
    }
}
