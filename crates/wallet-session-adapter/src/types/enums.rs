/*
[INPUT]:  Gateway schema definitions and serde requirements
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - type definitions for backend communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};

/// Identity provider fronted by the OAuth broker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Apple,
    Google,
}

impl Provider {
    /// Authorization endpoint relative to the gateway base
    pub fn auth_endpoint(self) -> &'static str {
        match self {
            Provider::Apple => "auth/apple",
            Provider::Google => "auth/google",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Apple => "apple",
            Provider::Google => "google",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "apple" => Ok(Provider::Apple),
            "google" => Ok(Provider::Google),
            other => Err(format!("unknown provider: {other}")),
        }
    }
}
