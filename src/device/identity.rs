use std::{fmt, str};

use crate::crypto::ecc_curve::ECCCurve;
use crate::errors::{Error, Result};

/// Curves and key types a device can hold keys for.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, derive_more::Display)]
pub enum CurveName {
    #[display("nist256p1")]
    Nist256p1,
    #[display("secp256k1")]
    Secp256k1,
    #[display("ed25519")]
    Ed25519,
    #[display("curve25519")]
    Curve25519,
    #[display("rsa2048")]
    Rsa2048,
    #[display("rsa4096")]
    Rsa4096,
}

impl CurveName {
    pub fn is_rsa(self) -> bool {
        matches!(self, CurveName::Rsa2048 | CurveName::Rsa4096)
    }

    /// The curve used for key agreement by a key on `self`.
    pub fn for_ecdh(self) -> Self {
        match self {
            CurveName::Ed25519 => CurveName::Curve25519,
            other => other,
        }
    }

    /// The OpenPGP curve, `None` for RSA.
    pub fn ecc_curve(self) -> Option<ECCCurve> {
        match self {
            CurveName::Nist256p1 => Some(ECCCurve::P256),
            CurveName::Secp256k1 => Some(ECCCurve::Secp256k1),
            CurveName::Ed25519 => Some(ECCCurve::Ed25519),
            CurveName::Curve25519 => Some(ECCCurve::Curve25519),
            CurveName::Rsa2048 | CurveName::Rsa4096 => None,
        }
    }
}

impl str::FromStr for CurveName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "nist256p1" => Ok(CurveName::Nist256p1),
            "secp256k1" => Ok(CurveName::Secp256k1),
            "ed25519" => Ok(CurveName::Ed25519),
            "curve25519" => Ok(CurveName::Curve25519),
            "rsa2048" => Ok(CurveName::Rsa2048),
            "rsa4096" => Ok(CurveName::Rsa4096),
            _ => unsupported_err!("curve {:?}", s),
        }
    }
}

/// Which device key an operation targets.
///
/// The address has the shape `proto://[user@]host[:port][/path]`. GPG
/// identities use the `gpg` protocol with the user id as host, see
/// [`Identity::gpg`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    proto: Option<String>,
    user: Option<String>,
    host: String,
    port: Option<String>,
    path: Option<String>,
    curve: CurveName,
}

impl Identity {
    /// The identity of the GPG key bound to `user_id`.
    pub fn gpg(user_id: &str, curve: CurveName) -> Self {
        Identity {
            proto: Some("gpg".to_string()),
            user: None,
            host: user_id.to_string(),
            port: None,
            path: None,
            curve,
        }
    }

    /// Parses an identity address.
    ///
    /// The user part extends to the last `@`, so user ids containing an
    /// email address must go through [`Identity::gpg`] instead.
    pub fn parse(address: &str, curve: CurveName) -> Result<Self> {
        let (proto, rest) = match address.split_once("://") {
            Some((proto, rest)) => (Some(proto.to_string()), rest),
            None => (None, address),
        };
        let (user, rest) = match rest.rsplit_once('@') {
            Some((user, rest)) => (Some(user.to_string()), rest),
            None => (None, rest),
        };
        let (rest, path) = match rest.find('/') {
            Some(idx) => (&rest[..idx], Some(rest[idx..].to_string())),
            None => (rest, None),
        };
        let (host, port) = match rest.rsplit_once(':') {
            Some((host, port))
                if !port.is_empty()
                    && port.chars().all(|c| c.is_alphanumeric() || c == '_') =>
            {
                (host, Some(port.to_string()))
            }
            _ => (rest, None),
        };
        ensure!(!host.is_empty(), "identity {:?} has no host", address);

        Ok(Identity {
            proto,
            user,
            host: host.to_string(),
            port,
            path,
            curve,
        })
    }

    pub fn proto(&self) -> Option<&str> {
        self.proto.as_deref()
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<&str> {
        self.port.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn curve(&self) -> CurveName {
        self.curve
    }

    /// The same key address on a different curve.
    pub fn with_curve(&self, curve: CurveName) -> Self {
        Identity {
            curve,
            ..self.clone()
        }
    }

    /// The identity used for key agreement with this key.
    pub fn for_ecdh(&self) -> Self {
        self.with_curve(self.curve.for_ecdh())
    }

    /// The address without the surrounding angle brackets.
    pub fn uri(&self) -> String {
        let mut out = String::new();
        if let Some(ref proto) = self.proto {
            out.push_str(proto);
            out.push_str("://");
        }
        if let Some(ref user) = self.user {
            out.push_str(user);
            out.push('@');
        }
        out.push_str(&self.host);
        if let Some(ref port) = self.port {
            out.push(':');
            out.push_str(port);
        }
        if let Some(ref path) = self.path {
            out.push_str(path);
        }
        out
    }
}

/// Renders as `<uri>`, the form shown in confirmation prompts.
impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.uri())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_curve_names() {
        for curve in [
            CurveName::Nist256p1,
            CurveName::Secp256k1,
            CurveName::Ed25519,
            CurveName::Curve25519,
            CurveName::Rsa2048,
            CurveName::Rsa4096,
        ] {
            assert_eq!(curve.to_string().parse::<CurveName>().unwrap(), curve);
        }
        assert!("nist384p1".parse::<CurveName>().is_err());

        assert!(CurveName::Rsa4096.is_rsa());
        assert!(!CurveName::Ed25519.is_rsa());
        assert_eq!(CurveName::Ed25519.for_ecdh(), CurveName::Curve25519);
        assert_eq!(CurveName::Nist256p1.for_ecdh(), CurveName::Nist256p1);
        assert_eq!(CurveName::Ed25519.ecc_curve(), Some(ECCCurve::Ed25519));
        assert_eq!(CurveName::Rsa2048.ecc_curve(), None);
    }

    #[test]
    fn test_gpg_identity() {
        let id = Identity::gpg("Alice <alice@example.com>", CurveName::Ed25519);
        assert_eq!(id.proto(), Some("gpg"));
        assert_eq!(id.host(), "Alice <alice@example.com>");
        assert_eq!(id.user(), None);
        assert_eq!(id.to_string(), "<gpg://Alice <alice@example.com>>");

        let ecdh = id.for_ecdh();
        assert_eq!(ecdh.curve(), CurveName::Curve25519);
        assert_eq!(ecdh.uri(), id.uri());
    }

    #[test]
    fn test_parse() {
        let id = Identity::parse("ssh://git@github.com:22/path", CurveName::Nist256p1).unwrap();
        assert_eq!(id.proto(), Some("ssh"));
        assert_eq!(id.user(), Some("git"));
        assert_eq!(id.host(), "github.com");
        assert_eq!(id.port(), Some("22"));
        assert_eq!(id.path(), Some("/path"));
        assert_eq!(id.uri(), "ssh://git@github.com:22/path");

        let id = Identity::parse("example.com", CurveName::Nist256p1).unwrap();
        assert_eq!(id.proto(), None);
        assert_eq!(id.host(), "example.com");
        assert_eq!(id.port(), None);
        assert_eq!(id.to_string(), "<example.com>");

        assert!(Identity::parse("ssh://user@", CurveName::Ed25519).is_err());
    }
}
