//! WebFinger host discovery and account resolution
//!
//! Two-tier resolution: a host is resolved to its WebFinger URL template
//! (host-meta discovery with a well-known fallback), then the account is
//! looked up against that template and a link is selected from the JRD.
//! Each tier is memoized for the lifetime of the resolver.

use std::time::Duration;

use acct_address::Address;
use reqwest::{header, Client, Response, StatusCode};
use tracing::debug;

use crate::cache::KeyedCache;
use crate::error::{Result, WebFingerError};
use crate::jrd;
use crate::types::{LookupKey, LookupResult, ResourceDescriptor};
use crate::xrd;

/// User-Agent sent with every discovery and lookup request
const USER_AGENT: &str = concat!("fedirect/", env!("CARGO_PKG_VERSION"));
/// Media type required of host-meta responses
const XRD_MEDIA_TYPE: &str = "application/xrd+xml";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Resolves `user@host` addresses to profile URLs via WebFinger
///
/// Holds the shared HTTP client and both caches (host → template and
/// lookup key → result). Cached entries live until the process exits, so a
/// host that changes its template or an account that moves its profile
/// returns stale data until restart. Failures are never cached. Safe to
/// share across tasks behind an `Arc`.
pub struct WebFingerResolver {
    client: Client,
    scheme: String,
    host_cache: KeyedCache<String, String>,
    account_cache: KeyedCache<LookupKey, LookupResult>,
}

impl WebFingerResolver {
    /// Create a resolver that queries hosts over https
    pub fn new() -> Self {
        Self::with_scheme("https")
    }

    /// Create a resolver with a custom URL scheme
    ///
    /// Useful for pointing the resolver at plain-HTTP test servers.
    pub fn with_scheme(scheme: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            scheme: scheme.to_string(),
            host_cache: KeyedCache::new(),
            account_cache: KeyedCache::new(),
        }
    }

    /// Determine the WebFinger URL template for a hostname
    ///
    /// Fetches `/.well-known/host-meta` and extracts the `lrdd` template.
    /// A missing host-meta (404, empty body, or wrong media type) and a
    /// well-formed document without an `lrdd` link both fall back to the
    /// default `/.well-known/webfinger?resource={uri}` template; most
    /// deployments skip host-meta, so absence is a normal branch and not an
    /// error. Safe to call concurrently.
    pub async fn resolve_host(&self, host: &str) -> Result<String> {
        if let Some(cached) = self.host_cache.get(&host.to_string()).await {
            debug!(host, "host cache hit");
            return Ok(cached);
        }

        let url = format!("{}://{}/.well-known/host-meta", self.scheme, host);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let media_type = media_type_of(&response);

        let template = if status == StatusCode::NOT_FOUND
            || response.content_length() == Some(0)
            || media_type.as_deref() != Some(XRD_MEDIA_TYPE)
        {
            debug!(host, "no usable host-meta, using default template");
            self.default_template(host)
        } else if status != StatusCode::OK {
            return Err(WebFingerError::Status { status, url });
        } else {
            let body = response.bytes().await?;
            if body.is_empty() {
                debug!(host, "empty host-meta body, using default template");
                self.default_template(host)
            } else {
                match xrd::parse_host_meta(&body) {
                    Ok(template) => template,
                    Err(WebFingerError::NotFound) => {
                        debug!(host, "host-meta has no lrdd link, using default template");
                        self.default_template(host)
                    }
                    Err(err) => return Err(err),
                }
            }
        };

        self.host_cache
            .insert(host.to_string(), template.clone())
            .await;
        Ok(template)
    }

    /// Resolve an account to its subject and profile URL
    ///
    /// The sole entry point for the HTTP layer. An optional requested type
    /// restricts selection to links whose activity-type property matches it
    /// case-insensitively; without one the profile-page link is preferred,
    /// then `self`. Safe to call concurrently.
    pub async fn resolve_account(
        &self,
        address: &Address,
        requested_type: Option<&str>,
    ) -> Result<LookupResult> {
        let key = LookupKey::new(address.clone(), requested_type);
        if let Some(cached) = self.account_cache.get(&key).await {
            debug!(address = %address, "account cache hit");
            return Ok(cached);
        }

        let template = self.resolve_host(&address.host).await?;
        let acct = format!("acct:{}", address);
        let resource = urlencoding::encode(&acct);
        let url = template.replacen("{uri}", &resource, 1);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(WebFingerError::Status { status, url });
        }
        let body = response.bytes().await?;
        let descriptor: ResourceDescriptor = serde_json::from_slice(&body)
            .map_err(|err| WebFingerError::Parse(err.to_string()))?;

        let result = jrd::select_link(&descriptor, key.requested_type.as_deref())?;
        debug!(address = %address, href = %result.href, "resolved account");
        self.account_cache.insert(key, result.clone()).await;
        Ok(result)
    }

    fn default_template(&self, host: &str) -> String {
        format!(
            "{}://{}/.well-known/webfinger?resource={{uri}}",
            self.scheme, host
        )
    }
}

impl Default for WebFingerResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// The media type of a response, lowercased, without parameters
fn media_type_of(response: &Response) -> Option<String> {
    let value = response.headers().get(header::CONTENT_TYPE)?;
    let value = value.to_str().ok()?;
    let media_type = value.split(';').next().unwrap_or(value).trim();
    Some(media_type.to_ascii_lowercase())
}
