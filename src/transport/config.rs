use serde::{Deserialize, Serialize};

/// Broker connection used to forward button events.
///
/// `url` is `host` or `host:port`; the port defaults to 1883.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct TransportConfig {
    pub enabled: bool,
    pub url: String,
    pub user: String,
    pub pw: String,
    /// First topic level, the connection code follows it
    pub topic_prefix: String,
    pub keep_alive_secs: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: "localhost:1883".to_string(),
            user: String::new(),
            pw: String::new(),
            topic_prefix: "virtualpad".to_string(),
            keep_alive_secs: 5,
        }
    }
}
