use fd_core::TOKEN_LENGTH;
use serde::Deserialize;
use serde::Serialize;

/// Opaque bearer token: 32 lowercase hex characters minted from two 64-bit
/// random draws. The only client-side credential in the game.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token(String);

impl Token {
    pub fn generate() -> Self {
        Self(format!(
            "{:016x}{:016x}",
            rand::random::<u64>(),
            rand::random::<u64>()
        ))
    }
    /// Extracts a token from an `Authorization` header value. Accepts
    /// exactly the `Bearer ` prefix followed by 32 characters.
    pub fn parse_bearer(header: &str) -> Option<Self> {
        let tail = header.strip_prefix("Bearer ")?;
        (tail.len() == TOKEN_LENGTH).then(|| Self(tail.to_string()))
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
