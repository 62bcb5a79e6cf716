//! Fuzz test for per-tenant cache name resolution
//!
//! Run with: cargo +nightly fuzz run cache_name_fuzz -- -max_total_time=60

#![no_main]

use libfuzzer_sys::fuzz_target;
use tenantry_cache::{translate_cache_name, CACHE_NAME_SEPARATOR};
use tenantry_core::is_blank;

fuzz_target!(|data: (&str, Option<&str>)| {
    let (name, tenant) = data;
    let resolved = translate_cache_name(name, tenant);

    match tenant {
        Some(t) if !is_blank(Some(t)) => {
            assert!(resolved.starts_with(name));
            assert_eq!(&resolved[name.len()..name.len() + 1], CACHE_NAME_SEPARATOR.to_string());
            assert!(resolved.ends_with(t));
            assert_eq!(resolved.len(), name.len() + 1 + t.len());
        }
        _ => assert_eq!(resolved, name),
    }
});
