//! Core types used throughout the SAM client library.

use std::fmt;

/// An asymmetric destination key pair generated by the router.
///
/// The public key is a publishable addressing credential; the private key
/// must be treated as a secret by the surrounding application. `Debug`
/// redacts the private half so key material does not leak into logs.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyPair {
    /// Public destination key.
    pub public: String,
    /// Private destination key.
    pub private: String,
}

impl KeyPair {
    /// Create a new key pair from its public and private halves.
    pub fn new(public: impl Into<String>, private: impl Into<String>) -> Self {
        KeyPair {
            public: public.into(),
            private: private.into(),
        }
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public)
            .field("private", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypair_debug_redacts_private_key() {
        let pair = KeyPair::new("pubkey", "privkey");
        let rendered = format!("{:?}", pair);
        assert!(rendered.contains("pubkey"));
        assert!(!rendered.contains("privkey"));
    }
}
