use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration of the `user_addresses` module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserAddressesConfig {
    /// Window used when locating the row being edited by its original
    /// `valid_from`. Absorbs timestamp precision lost between client and storage.
    #[serde(default = "default_key_match_tolerance_ms")]
    pub key_match_tolerance_ms: u64,
}

impl Default for UserAddressesConfig {
    fn default() -> Self {
        Self {
            key_match_tolerance_ms: default_key_match_tolerance_ms(),
        }
    }
}

impl UserAddressesConfig {
    #[must_use]
    pub fn key_match_tolerance(&self) -> Duration {
        Duration::from_millis(self.key_match_tolerance_ms)
    }
}

fn default_key_match_tolerance_ms() -> u64 {
    1000
}
