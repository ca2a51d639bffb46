use std::borrow::Cow;

use log::{debug, info};
use zeroize::Zeroizing;

use super::{
    ClientConfig, CurveName, Device, DeviceError, DeviceSession, Identity, RsaSignatureHash,
    SignatureValue,
};
use crate::crypto::point::decompress_pubkey;
use crate::errors::{Error, Result};

/// Turns GnuPG's sign and decrypt requests into device calls.
///
/// Every call opens its own [`DeviceSession`] and closes it again, also when
/// the device call fails. Sharing a client between threads needs a `Mutex`
/// around it.
#[derive(Debug)]
pub struct Client<D: Device> {
    device: D,
    config: ClientConfig,
}

/// The digest to hand to the device for `curve`, and the hash hint RSA
/// devices need before they sign it.
///
/// NIST P-256 signs the first 32 bytes only. RSA supports 32 and 64 byte
/// digests.
pub fn prepare_digest(
    curve: CurveName,
    digest: &[u8],
) -> Result<(Cow<'_, [u8]>, Option<RsaSignatureHash>)> {
    match curve {
        CurveName::Nist256p1 if digest.len() > 32 => Ok((Cow::Borrowed(&digest[..32]), None)),
        CurveName::Rsa2048 | CurveName::Rsa4096 => {
            match RsaSignatureHash::for_digest_len(digest.len()) {
                Some(hash) => Ok((Cow::Borrowed(digest), Some(hash))),
                None => Err(Error::UnsupportedDigestLength {
                    len: digest.len(),
                    curve,
                }),
            }
        }
        _ => Ok((Cow::Borrowed(digest), None)),
    }
}

impl<D: Device> Client<D> {
    pub fn new(device: D) -> Self {
        Self::with_config(device, ClientConfig::default())
    }

    pub fn with_config(device: D, config: ClientConfig) -> Self {
        Client { device, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn into_inner(self) -> D {
        self.device
    }

    /// Runs `f` inside a session. A close failure after `f` succeeded is an
    /// error, after `f` failed it is only logged.
    fn with_session<T>(
        &mut self,
        f: impl FnOnce(&mut DeviceSession<'_, D>) -> Result<T, DeviceError>,
    ) -> Result<T> {
        let mut session = DeviceSession::open(&mut self.device)?;
        let value = f(&mut session)?;
        session.close()?;
        Ok(value)
    }

    /// The public key of `identity` in the encoding OpenPGP key packets use.
    ///
    /// With `ecdh` the key agreement key for the identity is requested.
    pub fn pubkey(&mut self, identity: &Identity, ecdh: bool) -> Result<Vec<u8>> {
        let identity = if ecdh {
            identity.for_ecdh()
        } else {
            identity.clone()
        };
        let curve = identity.curve();

        let (raw, family) = self.with_session(|session| {
            let raw = session.device().pubkey(&identity, curve, ecdh)?;
            Ok((raw, session.family().clone()))
        })?;

        if family.returns_canonical_pubkey() {
            debug!("{} pubkey used as is", family);
            Ok(raw)
        } else {
            decompress_pubkey(&raw, curve)
        }
    }

    /// Signs `digest` with the key of `identity`.
    pub fn sign(&mut self, identity: &Identity, digest: &[u8]) -> Result<SignatureValue> {
        if self.config.confirm_prompt() {
            info!(
                "please confirm GPG signature on {} for \"{}\"...",
                self.device.family_id(),
                identity
            );
        }

        let curve = identity.curve();
        let (digest, hash) = prepare_digest(curve, digest)?;
        if self.config.log_digests() {
            debug!("signing digest: {}", hex::encode(&digest));
        }
        debug!("identity curve: {}", curve);

        if let Some(hash) = hash {
            self.device.set_signature_hash(hash)?;
        }

        let raw =
            self.with_session(|session| session.device().sign_digest(identity, curve, &digest))?;
        let value = SignatureValue::from_device(curve, &raw)?;
        Ok(value)
    }

    /// Derives the shared secret between the key of `identity` and `peer_pubkey`.
    pub fn ecdh(&mut self, identity: &Identity, peer_pubkey: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        if self.config.confirm_prompt() {
            info!(
                "please confirm GPG decryption on {} for \"{}\"...",
                self.device.family_id(),
                identity
            );
        }

        let identity = identity.for_ecdh();
        let curve = identity.curve();
        let secret = self.with_session(|session| {
            session
                .device()
                .derive_ecdh(&identity, curve, peer_pubkey)
                .map(Zeroizing::new)
        })?;
        Ok(secret)
    }
}
