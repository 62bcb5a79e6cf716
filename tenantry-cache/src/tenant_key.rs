//! Composite cache key pairing a tenant with the caller's key.
//!
//! The tenant is part of the key's identity, so entries written under one
//! tenant can never be read back under another, and entries written with no
//! tenant live in their own partition.

use std::fmt;

/// A caller key qualified by the tenant it was used under.
///
/// Two keys are equal iff both the tenants and the caller keys are equal.
/// `None` equals `None`; an empty-string tenant is *not* the same as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TenantKey<K> {
    /// Private: only constructible through `new`
    tenant: Option<String>,
    key: K,
}

impl<K> TenantKey<K> {
    pub fn new(tenant: Option<String>, key: K) -> Self {
        Self { tenant, key }
    }

    /// The tenant this key is scoped to, if any.
    pub fn tenant(&self) -> Option<&str> {
        self.tenant.as_deref()
    }

    /// The caller-supplied key.
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn into_parts(self) -> (Option<String>, K) {
        (self.tenant, self.key)
    }
}

impl<K: fmt::Display> fmt::Display for TenantKey<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.tenant {
            Some(tenant) => write!(f, "[{tenant:?}] {}", self.key),
            None => write!(f, "[-] {}", self.key),
        }
    }
}
