use std::fmt;

/// The kind of device behind a [`Device`](super::Device), resolved from its
/// family id when a session opens.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeviceFamily {
    OnlyKey,
    Trezor,
    KeepKey,
    Ledger,
    Jade,
    Other(String),
}

impl DeviceFamily {
    pub fn from_id(id: &str) -> Self {
        match id {
            "onlykey-agent" => DeviceFamily::OnlyKey,
            "trezor-agent" => DeviceFamily::Trezor,
            "keepkey-agent" => DeviceFamily::KeepKey,
            "ledger-agent" => DeviceFamily::Ledger,
            "jade-agent" => DeviceFamily::Jade,
            other => DeviceFamily::Other(other.to_string()),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            DeviceFamily::OnlyKey => "onlykey-agent",
            DeviceFamily::Trezor => "trezor-agent",
            DeviceFamily::KeepKey => "keepkey-agent",
            DeviceFamily::Ledger => "ledger-agent",
            DeviceFamily::Jade => "jade-agent",
            DeviceFamily::Other(id) => id,
        }
    }

    /// Whether public keys come back in the encoding OpenPGP stores, rather
    /// than as compressed points.
    pub fn returns_canonical_pubkey(&self) -> bool {
        match self {
            DeviceFamily::OnlyKey => true,
            DeviceFamily::Trezor
            | DeviceFamily::KeepKey
            | DeviceFamily::Ledger
            | DeviceFamily::Jade
            | DeviceFamily::Other(_) => false,
        }
    }
}

impl fmt::Display for DeviceFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
