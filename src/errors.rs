use std::num::TryFromIntError;

use snafu::{Backtrace, Snafu};

use crate::device::{CurveName, DeviceError};
pub use crate::parsing::Typ;

pub type Result<T, E = Error> = ::std::result::Result<T, E>;

/// Error types
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("truncated input: reading {typ:?}, needed {needed}, remaining {remaining}"))]
    TruncatedInput {
        typ: Typ,
        needed: usize,
        remaining: usize,
        backtrace: Option<Backtrace>,
    },
    #[snafu(display("malformed subpacket area: {message}"))]
    MalformedArea { message: String },
    #[snafu(display("no key with keygrip {keygrip} found"))]
    KeyNotFound { keygrip: String },
    #[snafu(display("{curve} can not sign a digest of {len} bytes"))]
    UnsupportedDigestLength { len: usize, curve: CurveName },
    #[snafu(transparent)]
    Device { source: DeviceError },
    #[snafu(display("input is ASCII armored, expected binary OpenPGP data"))]
    ArmoredInput,
    #[snafu(display("invalid armor wrappers"))]
    InvalidArmorWrappers,
    #[snafu(display("invalid crc24 checksum"))]
    InvalidChecksum,
    #[snafu(display("invalid {curve} public key: {message}"))]
    InvalidPublicKey { curve: String, message: String },
    /// Signals packet versions and parameters we don't support
    #[snafu(display("Unsupported: {message}"))]
    Unsupported { message: String },
    #[snafu(display("{message}"))]
    Message { message: String },
    #[snafu(transparent)]
    Base64Decode { source: base64::DecodeError },
    #[snafu(transparent)]
    IO {
        source: std::io::Error,
        backtrace: Backtrace,
    },
    #[snafu(transparent)]
    TryFromInt { source: TryFromIntError },
}

impl Error {
    /// Returns true if the input ended before a complete value could be read.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Self::TruncatedInput { .. })
    }
}

impl From<String> for Error {
    fn from(err: String) -> Error {
        Error::Message { message: err }
    }
}

impl From<derive_builder::UninitializedFieldError> for Error {
    fn from(err: derive_builder::UninitializedFieldError) -> Error {
        Error::Message {
            message: err.to_string(),
        }
    }
}

#[macro_export]
macro_rules! unsupported_err {
    ($e:expr) => {
        return Err($crate::errors::Error::Unsupported { message: $e.to_string()})
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::errors::Error::Unsupported { message: format!($fmt, $($arg)+) })
    };
}

#[macro_export]
macro_rules! malformed_err {
    ($e:expr) => {
        return Err($crate::errors::Error::MalformedArea { message: $e.to_string() })
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::errors::Error::MalformedArea { message: format!($fmt, $($arg)+) })
    };
}

#[macro_export]
macro_rules! bail {
    ($e:expr) => {
        return Err($crate::errors::Error::Message { message: $e.to_string() })
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::errors::Error::Message { message: format!($fmt, $($arg)+) })
    };
}

#[macro_export]
macro_rules! format_err {
    ($e:expr) => {
        $crate::errors::Error::Message { message: $e.to_string() }
    };
    ($fmt:expr, $($arg:tt)+) => {
        $crate::errors::Error::Message { message: format!($fmt, $($arg)+) }
    };
}

#[macro_export(local_inner_macros)]
macro_rules! ensure {
    ($cond:expr, $e:expr) => {
        if !($cond) {
            bail!($e);
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)+) => {
        if !($cond) {
            bail!($fmt, $($arg)+);
        }
    };
}
