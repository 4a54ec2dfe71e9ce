//! Parser for federated account addresses
//!
//! Parses identifiers of the form `user@host` into their component parts.
//! The user part may itself contain `@`; only the first `@` splits the
//! identifier, so `a@b@c` parses as user `a` on host `b@c`.

use std::fmt;

/// Parsed components of a federated account identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    pub user: String,
    pub host: String,
}

/// Error returned when an identifier cannot be split into user and host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAddressError;

impl fmt::Display for ParseAddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "address must be of the form user@host")
    }
}

impl std::error::Error for ParseAddressError {}

impl Address {
    /// Parse an identifier like "user@example.com"
    ///
    /// Splits on the first `@`. Both sides must be non-empty; no further
    /// character-set validation is performed, so an invalid host surfaces
    /// later as a network or parse failure rather than being rejected here.
    pub fn parse(identifier: &str) -> Result<Self, ParseAddressError> {
        let (user, host) = identifier.split_once('@').ok_or(ParseAddressError)?;
        if user.is_empty() || host.is_empty() {
            return Err(ParseAddressError);
        }
        Ok(Self {
            user: user.to_string(),
            host: host.to_string(),
        })
    }

    /// The host in canonical ASCII (punycode) form
    ///
    /// Internationalized hostnames are converted via IDNA and lowercased.
    /// If the host is not a valid domain the raw text is returned unchanged.
    pub fn canonical_host(&self) -> String {
        match url::Host::parse(&self.host) {
            Ok(host) => host.to_string(),
            Err(_) => self.host.clone(),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.user, self.canonical_host())
    }
}
