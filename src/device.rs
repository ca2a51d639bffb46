//! # Device module
//!
//! The signing bridge between GnuPG and a hardware device. The device itself
//! is reached through the [`Device`] trait; [`Client`] shapes digests, public
//! keys and signatures the way GnuPG expects them.
//!
//! ```rust
//! use gpg_hwsign::device::{Client, CurveName, Device, DeviceError, Identity};
//!
//! /// A device that has only ever seen the all zero Ed25519 key.
//! struct Dummy;
//!
//! impl Device for Dummy {
//!     fn open(&mut self) -> Result<(), DeviceError> {
//!         Ok(())
//!     }
//!
//!     fn close(&mut self) -> Result<(), DeviceError> {
//!         Ok(())
//!     }
//!
//!     fn family_id(&self) -> &str {
//!         "dummy-agent"
//!     }
//!
//!     fn pubkey(&mut self, _: &Identity, _: CurveName, _: bool) -> Result<Vec<u8>, DeviceError> {
//!         Ok(vec![0u8; 33])
//!     }
//!
//!     fn sign_digest(&mut self, _: &Identity, _: CurveName, _: &[u8]) -> Result<Vec<u8>, DeviceError> {
//!         Err(DeviceError::Declined)
//!     }
//!
//!     fn derive_ecdh(&mut self, _: &Identity, _: CurveName, _: &[u8]) -> Result<Vec<u8>, DeviceError> {
//!         Err(DeviceError::Declined)
//!     }
//! }
//!
//! let mut client = Client::new(Dummy);
//! let identity = Identity::gpg("Alice <alice@example.com>", CurveName::Ed25519);
//! let pubkey = client.pubkey(&identity, false).unwrap();
//! assert_eq!(pubkey[0], 0x40);
//! assert!(client.sign(&identity, &[0u8; 32]).is_err());
//! ```

mod client;
mod config;
mod family;
mod identity;
mod session;
mod signature;

use snafu::Snafu;

pub use self::client::{prepare_digest, Client};
pub use self::config::{ClientConfig, ClientConfigBuilder};
pub use self::family::DeviceFamily;
pub use self::identity::{CurveName, Identity};
pub use self::session::DeviceSession;
pub use self::signature::{RsaSignatureHash, SignatureValue};

/// Failures reported by a [`Device`].
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DeviceError {
    #[snafu(display("the operation was declined on the device"))]
    Declined,
    #[snafu(display("device transport failure: {message}"))]
    Transport { message: String },
    #[snafu(display("the device rejected the request: {message}"))]
    Rejected { message: String },
    #[snafu(display("the device does not support {operation}"))]
    Unsupported { operation: String },
    #[snafu(display("malformed device response: {message}"))]
    MalformedResponse { message: String },
}

/// A hardware device holding private keys.
///
/// The key operations are only called between [`Device::open`] and
/// [`Device::close`].
pub trait Device {
    /// Opens a session.
    fn open(&mut self) -> Result<(), DeviceError>;

    /// Closes the session opened by [`Device::open`].
    fn close(&mut self) -> Result<(), DeviceError>;

    /// Names the device family, e.g. `trezor-agent`.
    fn family_id(&self) -> &str;

    /// Returns the public key of `identity` on `curve`, for key agreement if
    /// `ecdh` is set.
    fn pubkey(
        &mut self,
        identity: &Identity,
        curve: CurveName,
        ecdh: bool,
    ) -> Result<Vec<u8>, DeviceError>;

    /// Signs `digest` as is.
    fn sign_digest(
        &mut self,
        identity: &Identity,
        curve: CurveName,
        digest: &[u8],
    ) -> Result<Vec<u8>, DeviceError>;

    /// Derives the shared secret with `peer_pubkey`.
    fn derive_ecdh(
        &mut self,
        identity: &Identity,
        curve: CurveName,
        peer_pubkey: &[u8],
    ) -> Result<Vec<u8>, DeviceError>;

    /// Tells an RSA device which hash produced the next digest.
    fn set_signature_hash(&mut self, hash: RsaSignatureHash) -> Result<(), DeviceError> {
        let _ = hash;
        Err(DeviceError::Unsupported {
            operation: "signature hash selection".to_string(),
        })
    }
}

impl<D: Device + ?Sized> Device for Box<D> {
    fn open(&mut self) -> Result<(), DeviceError> {
        (**self).open()
    }

    fn close(&mut self) -> Result<(), DeviceError> {
        (**self).close()
    }

    fn family_id(&self) -> &str {
        (**self).family_id()
    }

    fn pubkey(
        &mut self,
        identity: &Identity,
        curve: CurveName,
        ecdh: bool,
    ) -> Result<Vec<u8>, DeviceError> {
        (**self).pubkey(identity, curve, ecdh)
    }

    fn sign_digest(
        &mut self,
        identity: &Identity,
        curve: CurveName,
        digest: &[u8],
    ) -> Result<Vec<u8>, DeviceError> {
        (**self).sign_digest(identity, curve, digest)
    }

    fn derive_ecdh(
        &mut self,
        identity: &Identity,
        curve: CurveName,
        peer_pubkey: &[u8],
    ) -> Result<Vec<u8>, DeviceError> {
        (**self).derive_ecdh(identity, curve, peer_pubkey)
    }

    fn set_signature_hash(&mut self, hash: RsaSignatureHash) -> Result<(), DeviceError> {
        (**self).set_signature_hash(hash)
    }
}
