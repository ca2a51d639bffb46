use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;

use gpg_hwsign::armor::{self, BlockType};
use gpg_hwsign::crypto::{ecc_curve::ECCCurve, hash::HashAlgorithm, public_key::PublicKeyAlgorithm};
use gpg_hwsign::errors::Error;
use gpg_hwsign::packet::{Packet, PacketParser, SignatureType, Subpacket};
use gpg_hwsign::ser::Serialize;
use gpg_hwsign::types::{Keygrip, PublicParams};
use gpg_hwsign::{iter_keygrips, load_by_keygrip};

const PRIMARY_GRIP: &str = "38f47293cfde71d8478ee954c67b397622b17f3c";
const SUBKEY_GRIP: &str = "ec6720a60f749214f51471b4537fff2831be5268";
const USER_IDS: [&str; 2] = [
    "Alice Example <alice@example.com>",
    "Alice Example <alice@example.org>",
];

/// An export written by `gpg --export`, with the keygrips and primary
/// fingerprint that `gpg --with-keygrip` reports for it.
struct GnupgExport {
    file: &'static str,
    grips: &'static [&'static str],
    fingerprint: &'static str,
    user_ids: &'static [&'static str],
}

const GNUPG_EXPORTS: [GnupgExport; 4] = [
    GnupgExport {
        file: "gnupg-ed25519.gpg",
        grips: &[
            "b07d70322afbddbab9f0a480784efd927f43790c",
            "91e2c7257479ed37e8793b566a8737aea46f4449",
        ],
        fingerprint: "1036d9f90bab7ca469faff9e5374a86902f67306",
        user_ids: &[
            "Carol Curve <carol@example.org>",
            "Carol Curve <carol@example.com>",
        ],
    },
    GnupgExport {
        file: "gnupg-nistp256.gpg",
        grips: &[
            "0033430eea0a1f0ee6acf435e0b209c616d62335",
            "bc89fd2b32962e83a2d5054601632d46e97eed6f",
        ],
        fingerprint: "6f4d79cdf15442b3f74695ed5a6f159101b43235",
        user_ids: &["Nina Nist <nina@example.com>"],
    },
    GnupgExport {
        file: "gnupg-rsa2048.gpg",
        grips: &["3195db471395a73b2fe3eacdf925fa4e9a0b8670"],
        fingerprint: "936b84b64a9efe33e98e04bcd956ab7d30ffcd3f",
        user_ids: &["Rita Rsa <rita@example.com>"],
    },
    GnupgExport {
        file: "gnupg-secp256k1.gpg",
        grips: &["24da825490fde5e2bc7c9e1271abfc6b3c8fd507"],
        fingerprint: "125fd8802eab5e6ce43df0ee92d33c4281602823",
        user_ids: &["Kai Koblitz <kai@example.com>"],
    },
];

fn read_fixture(name: &str) -> Vec<u8> {
    let path = Path::new("./tests/fixtures").join(name);
    match fs::read(&path) {
        Err(why) => panic!("couldn't open {}: {}", path.display(), why),
        Ok(data) => data,
    }
}

fn grip(hex: &str) -> Keygrip {
    hex.parse().unwrap()
}

#[test]
fn test_iter_keygrips() {
    let _ = pretty_env_logger::try_init();

    let data = read_fixture("device-pubkey.gpg");
    let grips: Vec<Keygrip> = iter_keygrips(&data).collect::<Result<_, _>>().unwrap();
    assert_eq!(grips, vec![grip(PRIMARY_GRIP), grip(SUBKEY_GRIP)]);
}

#[test]
fn test_load_by_keygrip() {
    let _ = pretty_env_logger::try_init();

    let data = read_fixture("device-pubkey.gpg");

    let primary = load_by_keygrip(&data, grip(PRIMARY_GRIP).as_bytes()).unwrap();
    assert_eq!(primary.keygrip, grip(PRIMARY_GRIP));
    assert_eq!(primary.key.keygrip().unwrap(), grip(PRIMARY_GRIP));
    assert!(!primary.key.is_subkey());
    assert_eq!(primary.key.algorithm(), PublicKeyAlgorithm::EdDSALegacy);
    assert_eq!(
        primary.key.fingerprint().unwrap().to_string(),
        "9c84842add94fd32377b8e0e5754a8acedd7ba4c"
    );
    assert_eq!(primary.user_id_strings(), USER_IDS);

    let subkey = load_by_keygrip(&data, grip(SUBKEY_GRIP).as_bytes()).unwrap();
    assert_eq!(subkey.keygrip, grip(SUBKEY_GRIP));
    assert!(subkey.key.is_subkey());
    match subkey.key.public_params() {
        PublicParams::ECDH { curve, kdf, .. } => {
            assert_eq!(curve, &ECCCurve::Curve25519);
            assert_eq!(&kdf[..], &[0x01, 0x08, 0x07]);
        }
        p => panic!("unexpected params {p:?}"),
    }
    assert_eq!(subkey.user_id_strings(), USER_IDS);
}

#[test]
fn test_unknown_keygrip() {
    let data = read_fixture("device-pubkey.gpg");
    match load_by_keygrip(&data, &[0xaa; 20]) {
        Err(Error::KeyNotFound { keygrip }) => assert_eq!(keygrip, "aa".repeat(20)),
        res => panic!("unexpected result {res:?}"),
    }
}

#[test]
fn test_packets() {
    let data = read_fixture("device-pubkey.gpg");
    let packets: Vec<Packet> = PacketParser::new(data.clone())
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(packets.len(), 7);

    let sigs: Vec<_> = packets
        .iter()
        .filter_map(|p| match p {
            Packet::Signature(sig) => Some(sig),
            _ => None,
        })
        .collect();
    assert_eq!(sigs.len(), 3);

    assert_eq!(sigs[0].typ(), SignatureType::CertPositive);
    assert_eq!(sigs[0].pub_alg(), PublicKeyAlgorithm::EdDSALegacy);
    assert_eq!(sigs[0].hash_alg(), HashAlgorithm::Sha256);
    assert_eq!(sigs[0].created().unwrap().timestamp(), 1_700_000_000);
    assert_eq!(
        sigs[0].issuer().unwrap().to_string(),
        "5754a8acedd7ba4c"
    );
    assert!(sigs[0].has_custom_subpacket());
    assert_eq!(sigs[0].unhashed_subpackets()[0], Subpacket::device_marker());

    // issuer only
    assert!(!sigs[1].has_custom_subpacket());

    // the legacy marker form
    assert_eq!(sigs[2].typ(), SignatureType::SubkeyBinding);
    assert!(sigs[2].has_custom_subpacket());
    assert!(sigs[2].embedded_signatures().unwrap().is_empty());

    // writing the packets back reproduces the export
    assert_eq!(packets.to_bytes().unwrap(), data);
}

#[test]
fn test_armored_fixture() {
    let armored = read_fixture("device-pubkey.asc");

    let res: Vec<_> = iter_keygrips(&armored).collect();
    assert!(matches!(res.as_slice(), [Err(Error::ArmoredInput)]));

    let dearmored = armor::dearmor(&armored).unwrap();
    assert_eq!(dearmored.typ, BlockType::PublicKey);
    assert_eq!(dearmored.data, read_fixture("device-pubkey.gpg"));

    let grips: Vec<Keygrip> = iter_keygrips(&dearmored.data)
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(grips, vec![grip(PRIMARY_GRIP), grip(SUBKEY_GRIP)]);
}

#[test]
fn test_truncated_export() {
    let data = read_fixture("device-pubkey.gpg");
    // cut inside the subkey packet
    let cut = &data[..data.len() - 120];
    let res: Vec<_> = iter_keygrips(cut).collect();
    assert_eq!(res.len(), 2);
    assert_eq!(res[0].as_ref().unwrap(), &grip(PRIMARY_GRIP));
    assert!(res[1].as_ref().unwrap_err().is_incomplete());
}

#[test]
fn test_gnupg_exports() {
    let _ = pretty_env_logger::try_init();

    for export in &GNUPG_EXPORTS {
        let data = read_fixture(export.file);

        let grips: Vec<Keygrip> = iter_keygrips(&data).collect::<Result<_, _>>().unwrap();
        let expected: Vec<Keygrip> = export.grips.iter().map(|g| grip(g)).collect();
        assert_eq!(grips, expected, "{}", export.file);

        for (i, expected) in expected.iter().enumerate() {
            let found = load_by_keygrip(&data, expected.as_bytes()).unwrap();
            assert_eq!(&found.keygrip, expected, "{}", export.file);
            assert_eq!(found.key.is_subkey(), i > 0, "{}", export.file);
            assert_eq!(found.user_id_strings(), export.user_ids, "{}", export.file);
            if i == 0 {
                assert_eq!(
                    found.key.fingerprint().unwrap().to_string(),
                    export.fingerprint
                );
            }
        }

        let packets: Vec<Packet> = PacketParser::new(data.clone())
            .collect::<Result<_, _>>()
            .unwrap();
        for packet in &packets {
            if let Packet::Signature(sig) = packet {
                assert!(!sig.has_custom_subpacket(), "{}", export.file);
                assert_eq!(
                    sig.created().unwrap().timestamp(),
                    1_792_309_599,
                    "{}",
                    export.file
                );
            }
        }
        assert_eq!(packets.to_bytes().unwrap(), data, "{}", export.file);
    }
}
