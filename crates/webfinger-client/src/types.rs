//! Data types for WebFinger lookups and resource descriptors

use std::collections::HashMap;

use acct_address::Address;
use serde::Deserialize;

/// Cache key for one account lookup
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LookupKey {
    pub address: Address,
    /// Requested activity type, lowercased; `None` when absent or empty
    pub requested_type: Option<String>,
}

impl LookupKey {
    pub fn new(address: Address, requested_type: Option<&str>) -> Self {
        let requested_type = requested_type
            .filter(|t| !t.is_empty())
            .map(|t| t.to_lowercase());
        Self {
            address,
            requested_type,
        }
    }
}

/// Resolved subject and redirect target for one account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupResult {
    /// JRD subject field, typically `acct:user@host`
    pub subject: String,
    /// Resolved profile URL
    pub href: String,
}

/// A parsed JSON Resource Descriptor (JRD)
///
/// Decoded tolerantly: unknown fields are ignored and missing fields
/// default. Link order is preserved because selection depends on it.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceDescriptor {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub links: Vec<Link>,
}

/// One JRD link entry
#[derive(Debug, Clone, Deserialize)]
pub struct Link {
    #[serde(default)]
    pub rel: String,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(rename = "type", default)]
    pub media_type: Option<String>,
    /// Property values may be JSON null per the JRD format
    #[serde(default)]
    pub properties: HashMap<String, Option<String>>,
}
