//! Handle OpenPGP objects that are composed of multiple packets.
//!
//! A GnuPG key export is a sequence of primary keys, each followed by its
//! user ids, subkeys and their signatures. This module finds keys in such an
//! export by their [`Keygrip`](crate::types::Keygrip).
//!
//! ```rust
//! use gpg_hwsign::composed::load_by_keygrip;
//! use gpg_hwsign::errors::Error;
//!
//! let res = load_by_keygrip(&[][..], &[0u8; 20]);
//! assert!(matches!(res, Err(Error::KeyNotFound { .. })));
//! ```

mod key_index;

pub use self::key_index::{iter_keygrips, load_by_keygrip, KeyMatch};
