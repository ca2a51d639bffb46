use std::sync::{Arc, Mutex};

use chrono::DateTime;
use hex_literal::hex;
use pretty_assertions::assert_eq;

use gpg_hwsign::crypto::{ecc_curve::ECCCurve, public_key::PublicKeyAlgorithm};
use gpg_hwsign::device::{
    Client, ClientConfigBuilder, CurveName, Device, DeviceError, Identity, RsaSignatureHash,
    SignatureValue,
};
use gpg_hwsign::errors::Error;
use gpg_hwsign::packet::{PublicKey, SignatureBytes};
use gpg_hwsign::types::{Mpi, PublicParams, Tag};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Open,
    Close,
    Pubkey(CurveName, bool),
    Sign(CurveName, Vec<u8>),
    Ecdh(CurveName, Vec<u8>),
    Hash(RsaSignatureHash),
}

/// A device that signs with fixed bytes and records what it was asked.
#[derive(Debug, Clone)]
struct MockDevice {
    family: String,
    calls: Arc<Mutex<Vec<Call>>>,
    /// `None` makes the device reject the request.
    pubkey: Option<Vec<u8>>,
    signature: Option<Vec<u8>>,
}

impl MockDevice {
    fn new(family: &str) -> Self {
        MockDevice {
            family: family.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
            pubkey: None,
            signature: None,
        }
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl Device for MockDevice {
    fn open(&mut self) -> Result<(), DeviceError> {
        self.record(Call::Open);
        Ok(())
    }

    fn close(&mut self) -> Result<(), DeviceError> {
        self.record(Call::Close);
        Ok(())
    }

    fn family_id(&self) -> &str {
        &self.family
    }

    fn pubkey(
        &mut self,
        _identity: &Identity,
        curve: CurveName,
        ecdh: bool,
    ) -> Result<Vec<u8>, DeviceError> {
        self.record(Call::Pubkey(curve, ecdh));
        self.pubkey.clone().ok_or_else(|| DeviceError::Rejected {
            message: "unknown identity".to_string(),
        })
    }

    fn sign_digest(
        &mut self,
        _identity: &Identity,
        curve: CurveName,
        digest: &[u8],
    ) -> Result<Vec<u8>, DeviceError> {
        self.record(Call::Sign(curve, digest.to_vec()));
        self.signature.clone().ok_or(DeviceError::Declined)
    }

    fn derive_ecdh(
        &mut self,
        _identity: &Identity,
        curve: CurveName,
        peer_pubkey: &[u8],
    ) -> Result<Vec<u8>, DeviceError> {
        self.record(Call::Ecdh(curve, peer_pubkey.to_vec()));
        Err(DeviceError::Transport {
            message: "timeout".to_string(),
        })
    }

    fn set_signature_hash(&mut self, hash: RsaSignatureHash) -> Result<(), DeviceError> {
        self.record(Call::Hash(hash));
        Ok(())
    }
}

fn digest(len: usize) -> Vec<u8> {
    (0..len).map(|i| i as u8).collect()
}

#[test]
fn test_rsa_hash_hints() {
    let _ = pretty_env_logger::try_init();

    let mut dev = MockDevice::new("onlykey-agent");
    dev.signature = Some(vec![0x01; 256]);
    let mut client = Client::new(dev.clone());
    let identity = Identity::gpg("Alice <alice@example.com>", CurveName::Rsa2048);

    client.sign(&identity, &digest(32)).unwrap();
    client.sign(&identity, &digest(64)).unwrap();
    let err = client.sign(&identity, &digest(20)).unwrap_err();
    assert!(matches!(
        err,
        Error::UnsupportedDigestLength {
            len: 20,
            curve: CurveName::Rsa2048
        }
    ));

    assert_eq!(
        dev.calls(),
        vec![
            Call::Hash(RsaSignatureHash::Sha256),
            Call::Open,
            Call::Sign(CurveName::Rsa2048, digest(32)),
            Call::Close,
            Call::Hash(RsaSignatureHash::Sha512),
            Call::Open,
            Call::Sign(CurveName::Rsa2048, digest(64)),
            Call::Close,
        ]
    );
}

#[test]
fn test_nist256p1_truncates_digest() {
    let mut dev = MockDevice::new("trezor-agent");
    dev.signature = Some([vec![0x00, 0x11], vec![0x22; 30], vec![0x33; 32]].concat());
    let mut client = Client::new(dev.clone());
    let identity = Identity::gpg("Alice <alice@example.com>", CurveName::Nist256p1);

    let sig = client.sign(&identity, &digest(64)).unwrap();
    assert_eq!(
        dev.calls(),
        vec![
            Call::Open,
            Call::Sign(CurveName::Nist256p1, digest(32)),
            Call::Close,
        ]
    );

    match &sig {
        SignatureValue::Ecc { r, s } => {
            assert_eq!(r.len(), 31);
            assert_eq!(r.as_bytes()[0], 0x11);
            assert_eq!(s.as_bytes(), &[0x33; 32]);
        }
        v => panic!("unexpected signature {v:?}"),
    }
    match SignatureBytes::from(sig) {
        SignatureBytes::Mpis(mpis) => assert_eq!(mpis.len(), 2),
        b => panic!("unexpected signature bytes {b:?}"),
    }
}

#[test]
fn test_session_released_on_failure() {
    let dev = MockDevice::new("ledger-agent");
    let config = ClientConfigBuilder::default()
        .confirm_prompt(false)
        .build()
        .unwrap();
    let mut client = Client::with_config(dev.clone(), config);
    let identity = Identity::gpg("Alice <alice@example.com>", CurveName::Ed25519);

    // no signature configured, the device declines
    let err = client.sign(&identity, &digest(32)).unwrap_err();
    assert!(matches!(
        err,
        Error::Device {
            source: DeviceError::Declined
        }
    ));

    // the device has no key for the identity
    let err = client.pubkey(&identity, false).unwrap_err();
    assert!(matches!(
        err,
        Error::Device {
            source: DeviceError::Rejected { .. }
        }
    ));

    // the ecdh call fails in transport
    let err = client.ecdh(&identity, &hex!("40 0102")).unwrap_err();
    assert!(matches!(
        err,
        Error::Device {
            source: DeviceError::Transport { .. }
        }
    ));

    assert_eq!(
        dev.calls(),
        vec![
            Call::Open,
            Call::Sign(CurveName::Ed25519, digest(32)),
            Call::Close,
            Call::Open,
            Call::Pubkey(CurveName::Ed25519, false),
            Call::Close,
            Call::Open,
            Call::Ecdh(CurveName::Curve25519, hex!("40 0102").to_vec()),
            Call::Close,
        ]
    );
}

#[test]
fn test_pubkey_to_keygrip() {
    let _ = pretty_env_logger::try_init();

    // the device answers with the compressed form of the primary key in the fixture
    let mut dev = MockDevice::new("trezor-agent");
    dev.pubkey = Some(
        [
            &[0x00][..],
            &hex!("986a1b7135f4986150aa5fa0028feeaa66cdaf3ed6a00a355dd86e042f7fb494"),
        ]
        .concat(),
    );
    let mut client = Client::new(dev.clone());
    let identity = Identity::gpg("Alice Example <alice@example.com>", CurveName::Ed25519);

    let point = client.pubkey(&identity, false).unwrap();
    assert_eq!(point[0], 0x40);

    let key = PublicKey::new(
        Tag::PublicKey,
        PublicKeyAlgorithm::EdDSALegacy,
        DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        PublicParams::EdDSALegacy {
            curve: ECCCurve::Ed25519,
            q: Mpi::from_slice(&point),
        },
    )
    .unwrap();
    assert_eq!(
        key.keygrip().unwrap().to_string(),
        "38f47293cfde71d8478ee954c67b397622b17f3c"
    );
    assert_eq!(
        key.fingerprint().unwrap().to_string(),
        "9c84842add94fd32377b8e0e5754a8acedd7ba4c"
    );

    assert_eq!(
        dev.calls(),
        vec![Call::Open, Call::Pubkey(CurveName::Ed25519, false), Call::Close]
    );
}

#[test]
fn test_rsa_pubkey_needs_canonical_device() {
    let mut dev = MockDevice::new("trezor-agent");
    dev.pubkey = Some(vec![0x01; 256]);
    let mut client = Client::new(dev);
    let identity = Identity::gpg("Alice", CurveName::Rsa4096);
    assert!(matches!(
        client.pubkey(&identity, false),
        Err(Error::Unsupported { .. })
    ));

    let mut dev = MockDevice::new("onlykey-agent");
    dev.pubkey = Some(vec![0x01; 256]);
    let mut client = Client::new(dev);
    assert_eq!(client.pubkey(&identity, false).unwrap(), vec![0x01; 256]);
}
