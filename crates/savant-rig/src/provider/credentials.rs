//! Provider credentials.

use serde::{Deserialize, Serialize};

/// API credentials for the hosted embedding provider.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// OpenAI API key.
    pub api_key: String,
}

impl Credentials {
    /// Creates credentials from an API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }
}

// Keys never appear in logs or debug output.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_key() {
        let credentials = Credentials::new("sk-sensitive");
        let output = format!("{credentials:?}");
        assert!(!output.contains("sk-sensitive"));
        assert!(output.contains("***"));
    }
}
