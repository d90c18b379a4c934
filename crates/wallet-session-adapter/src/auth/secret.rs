/*
[INPUT]:  Credential and token strings
[OUTPUT]: Wrapper that never prints its contents
[POS]:    Auth layer - secret handling for tokens and org credentials
[UPDATE]: When changing how secrets are exposed or serialized
*/

use serde::{Deserialize, Serialize};

/// String secret with a redacted `Debug`.
///
/// Serializes transparently so token records and wire payloads keep their shape.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the raw value. Call only where it goes on the wire or to secure storage.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret([redacted])")
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let secret = Secret::new("org-secret-123");
        assert_eq!(format!("{secret:?}"), "Secret([redacted])");
        assert_eq!(secret.expose(), "org-secret-123");
    }

    #[test]
    fn test_serializes_transparently() {
        let secret = Secret::from("tok");
        assert_eq!(serde_json::to_string(&secret).unwrap(), r#""tok""#);
        let back: Secret = serde_json::from_str(r#""tok""#).unwrap();
        assert_eq!(back, secret);
    }
}
