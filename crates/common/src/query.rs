//! Query-string secret gate

use std::fmt;

/// Optional shared secret that must appear as a query parameter *name*.
///
/// A configured secret `S` admits `/file?S`, `/file?S=` and `/file?a=1&S=x`;
/// the value of the parameter is ignored.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SecretGate {
    secret: Option<String>,
}

impl SecretGate {
    /// An empty secret is the same as no secret.
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
        }
    }

    pub fn is_required(&self) -> bool {
        self.secret.is_some()
    }

    /// The configured secret, for the startup banner only
    pub fn expose(&self) -> Option<&str> {
        self.secret.as_deref()
    }

    /// Secrets with characters outside `[A-Za-z0-9]` may not survive
    /// URL encoding on the client side unchanged.
    pub fn is_alphanumeric(&self) -> bool {
        self.secret
            .as_deref()
            .map_or(true, |s| s.chars().all(|c| c.is_ascii_alphanumeric()))
    }

    /// Check a raw query string (without the leading `?`).
    pub fn admits(&self, query: &str) -> bool {
        match &self.secret {
            None => true,
            Some(secret) => query_has_param(query, secret),
        }
    }
}

impl fmt::Debug for SecretGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_required() {
            "<redacted>"
        } else {
            "<none>"
        };
        f.debug_struct("SecretGate").field("secret", &state).finish()
    }
}

/// Whether the form-urlencoded query contains a parameter named `name`.
/// Blank values count as present; an unparseable query contains nothing.
pub fn query_has_param(query: &str, name: &str) -> bool {
    serde_urlencoded::from_str::<Vec<(String, String)>>(query)
        .map(|pairs| pairs.iter().any(|(key, _)| key == name))
        .unwrap_or(false)
}
