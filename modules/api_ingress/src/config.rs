use serde::{Deserialize, Serialize};

/// HTTP host configuration, read from `modules.api_ingress`.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ApiIngressConfig {
    /// `host:port`; empty means "use server.host:server.port".
    #[serde(default)]
    pub bind_addr: String,
    #[serde(default)]
    pub enable_docs: bool,
    #[serde(default)]
    pub cors_enabled: bool,
    /// Per-request handler timeout; 0 means the 30 second default.
    #[serde(default)]
    pub timeout_sec: u64,
}

impl ApiIngressConfig {
    /// Fill `bind_addr` from the server section when it was left empty.
    pub fn with_default_bind(mut self, host: &str, port: u16) -> Self {
        if self.bind_addr.trim().is_empty() {
            self.bind_addr = format!("{host}:{port}");
        }
        self
    }
}
