//! Fuzz test for TENANTRY configuration parsing
//!
//! Feeds arbitrary text to `TenantryConfig::from_toml_str`. Parsing must
//! return `Ok` or a `Parse` config error, never panic.
//!
//! Run with: cargo +nightly fuzz run config_fuzz -- -max_total_time=60

#![no_main]

use libfuzzer_sys::fuzz_target;
use tenantry_core::{ConfigError, TenantryConfig, TenantryError};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        match TenantryConfig::from_toml_str(input) {
            Ok(config) => {
                // Re-parsing the same input is deterministic
                assert_eq!(TenantryConfig::from_toml_str(input).ok(), Some(config));
            }
            Err(TenantryError::Config(ConfigError::Parse { reason })) => {
                assert!(!reason.is_empty(), "Parse errors should carry a reason");
            }
            Err(other) => panic!("Unexpected error kind: {other}"),
        }
    }
});
