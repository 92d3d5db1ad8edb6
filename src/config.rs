use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Connection policy of a `DeviceClient`. Fixed once the client exists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Leave the TCP session open between operations. When false the
    /// session is closed after every send and reopened for the next one.
    pub keep_alive: bool,

    /// Applied to connect, send and receive.
    #[serde(rename = "timeout_ms", with = "millis")]
    pub timeout: Duration,

    /// Idle time after which the session is reopened before the next send.
    /// The controller drops sessions on its side after about 300s.
    #[serde(rename = "stale_after_ms", with = "millis")]
    pub stale_after: Duration,

    /// Pause between the two level updates of the initialization sequence.
    #[serde(rename = "init_pause_ms", with = "millis")]
    pub init_pause: Duration,

    /// Run the initialization sequence after the first connect.
    pub initialize: bool,
}

impl Default for ClientConfig {
    fn default() -> ClientConfig {
        return ClientConfig {
            keep_alive: true,
            timeout: Duration::from_secs(3),
            stale_after: Duration::from_secs(290),
            init_pause: Duration::from_millis(200),
            initialize: true,
        };
    }
}

impl ClientConfig {
    pub fn from_json(json: &str) -> serde_json::Result<ClientConfig> {
        serde_json::from_str(json)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<ClientConfig> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = ClientConfig::from_json(&contents)
            .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))?;
        return Ok(config);
    }

    pub fn with_keep_alive(mut self, keep_alive: bool) -> ClientConfig {
        self.keep_alive = keep_alive;
        self
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}
