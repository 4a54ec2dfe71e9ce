//! WebFinger Resolving Client
//!
//! Resolves federated `user@host` identifiers to canonical profile URLs
//! using WebFinger discovery: per-host template discovery via host-meta
//! (with a well-known fallback) and account lookup against that template.
//! Both tiers are memoized in process-lifetime caches.
//!
//! This crate is a resolving client only; it never answers discovery
//! queries about itself.

pub mod cache;
pub mod error;
pub mod jrd;
pub mod types;
pub mod xrd;

mod resolver;

pub use error::{Result, WebFingerError};
pub use resolver::WebFingerResolver;
pub use types::{Link, LookupKey, LookupResult, ResourceDescriptor};
