use const_oid::ObjectIdentifier;

const OID_CURVE25519: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.4.1.3029.1.5.1");
const OID_ED25519: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.4.1.11591.15.1");
const OID_P256: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");
const OID_P384: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.34");
const OID_P521: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.35");
const OID_SECP256K1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.10");

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum ECCCurve {
    Curve25519,
    Ed25519,
    P256,
    P384,
    P521,
    Secp256k1,
    Unknown(ObjectIdentifier),
}

impl ECCCurve {
    /// Standard name
    pub fn name(&self) -> &str {
        match self {
            ECCCurve::Curve25519 => "Curve25519",
            ECCCurve::Ed25519 => "Ed25519",
            ECCCurve::P256 => "NIST P-256",
            ECCCurve::P384 => "NIST P-384",
            ECCCurve::P521 => "NIST P-521",
            ECCCurve::Secp256k1 => "secp256k1",
            ECCCurve::Unknown(_) => "unknown",
        }
    }

    pub fn oid(&self) -> ObjectIdentifier {
        match self {
            ECCCurve::Curve25519 => OID_CURVE25519,
            ECCCurve::Ed25519 => OID_ED25519,
            ECCCurve::P256 => OID_P256,
            ECCCurve::P384 => OID_P384,
            ECCCurve::P521 => OID_P521,
            ECCCurve::Secp256k1 => OID_SECP256K1,
            ECCCurve::Unknown(oid) => *oid,
        }
    }

    /// IETF formatted OID
    pub fn oid_str(&self) -> String {
        self.oid().to_string()
    }

    /// Resolves the DER encoded OID body found in key packets.
    ///
    /// Returns `None` if the bytes are not a valid OID at all.
    pub fn from_oid(oid: &[u8]) -> Option<Self> {
        let known = [
            ECCCurve::Curve25519,
            ECCCurve::Ed25519,
            ECCCurve::P256,
            ECCCurve::P384,
            ECCCurve::P521,
            ECCCurve::Secp256k1,
        ];
        if let Some(curve) = known.into_iter().find(|c| c.oid().as_bytes() == oid) {
            return Some(curve);
        }

        ObjectIdentifier::from_bytes(oid).ok().map(ECCCurve::Unknown)
    }
}

impl std::fmt::Display for ECCCurve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
