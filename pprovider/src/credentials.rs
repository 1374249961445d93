//! Secret values that must not leak through logs or debug output.

use serde::{Deserialize, Deserializer};

#[derive(Clone, PartialEq, Eq)]
pub struct SecretString {
    value: String,
}

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn expose(&self) -> &str {
        self.value.as_str()
    }

    /// Treats whitespace-only secrets as empty.
    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::new)
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        // SAFETY: zero bytes are valid UTF-8.
        unsafe {
            self.value.as_mut_vec().fill(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SecretString;

    #[test]
    fn debug_output_is_redacted() {
        let secret = SecretString::new("xai-very-secret");
        assert_eq!(format!("{secret:?}"), "[REDACTED]");
        assert_eq!(secret.expose(), "xai-very-secret");
    }

    #[test]
    fn whitespace_only_secret_counts_as_empty() {
        assert!(SecretString::new("   ").is_empty());
        assert!(SecretString::new("").is_empty());
        assert!(!SecretString::new("k").is_empty());
    }

    #[test]
    fn deserializes_from_plain_string() {
        let secret: SecretString =
            serde_json::from_str("\"xai-123\"").expect("secret should deserialize");
        assert_eq!(secret.expose(), "xai-123");
    }
}
