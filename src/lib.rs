//! # gpg-hwsign
//!
//! Lets a hardware signing device stand in for a locally held private key
//! inside the GnuPG ecosystem.
//!
//! The crate has two halves:
//!
//! - A decoder for the binary OpenPGP packets GnuPG exports (public keys,
//!   user ids, signatures and their subpackets), enough to compute GnuPG
//!   keygrips and find a key by one. See [`composed::iter_keygrips`] and
//!   [`composed::load_by_keygrip`].
//! - A signing bridge that turns GnuPG sign/decrypt requests into calls on an
//!   abstract [`device::Device`], shaping digests and signatures the way
//!   GnuPG expects. See [`device::Client`].
//!
//! ```rust
//! use gpg_hwsign::composed::iter_keygrips;
//!
//! // an empty key ring has no keygrips
//! assert_eq!(iter_keygrips(&[][..]).count(), 0);
//! ```

#![forbid(unsafe_code)]

#[macro_use]
pub mod errors;

pub mod armor;
pub mod composed;
pub mod crypto;
pub mod device;
pub mod packet;
pub mod parsing;
pub mod ser;
pub mod types;

pub use self::composed::{iter_keygrips, load_by_keygrip, KeyMatch};
pub use self::device::{Client, Device, Identity};
pub use self::errors::{Error, Result};
pub use self::types::Keygrip;
