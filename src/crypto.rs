//! # Cryptography module
//!
//! Algorithm identifiers, curve metadata and the two derivations this crate
//! needs without holding any secret: GnuPG keygrips and point decompression.

pub mod ecc_curve;
pub mod hash;
pub mod keygrip;
pub mod point;
pub mod public_key;
