use serde_json::{Map, Value};

/// Caller identity as asserted by the upstream authorizer.
///
/// Only used for diagnostics; the relay never makes access decisions on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub email: Option<String>,
    pub username: Option<String>,
}

impl Identity {
    /// Build an identity from an authorizer claim set.
    ///
    /// Reads `email`, then `cognito:username` (ID tokens) or `username`
    /// (access tokens). Returns `None` when neither is present.
    pub fn from_claims(claims: &Map<String, Value>) -> Option<Self> {
        let claim = |key: &str| {
            claims
                .get(key)
                .and_then(Value::as_str)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let email = claim("email");
        let username = claim("cognito:username").or_else(|| claim("username"));

        if email.is_none() && username.is_none() {
            return None;
        }
        Some(Self { email, username })
    }

    pub fn display_name(&self) -> &str {
        self.email
            .as_deref()
            .or(self.username.as_deref())
            .unwrap_or_default()
    }
}
