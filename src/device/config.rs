use derive_builder::Builder;

use crate::errors::Error;

/// Settings for a [`Client`](super::Client).
///
/// ```rust
/// use gpg_hwsign::device::ClientConfigBuilder;
///
/// let config = ClientConfigBuilder::default()
///     .log_digests(true)
///     .build()
///     .unwrap();
/// assert!(config.confirm_prompt());
/// assert!(config.log_digests());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(build_fn(error = "Error"))]
pub struct ClientConfig {
    /// Log a prompt asking the user to confirm on the device before
    /// signing or decrypting.
    #[builder(default = "true")]
    confirm_prompt: bool,
    /// Log the digest handed to the device.
    #[builder(default)]
    log_digests: bool,
}

impl ClientConfig {
    pub fn confirm_prompt(&self) -> bool {
        self.confirm_prompt
    }

    pub fn log_digests(&self) -> bool {
        self.log_digests
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            confirm_prompt: true,
            log_digests: false,
        }
    }
}
