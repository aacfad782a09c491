//! Application configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Committed tree versions retained for queries and withdrawal
    /// proofs. Zero keeps every version.
    pub keep_versions: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig { keep_versions: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_to_partial_config() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.keep_versions, 0);

        let config: AppConfig = serde_json::from_str(r#"{"keep_versions": 100}"#).unwrap();
        assert_eq!(config.keep_versions, 100);
    }
}
