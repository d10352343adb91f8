//! Property tests for lessdeps.
//!
//! Properties use randomized input generation to explore edge cases and
//! protect invariants like "never panics" and "same file, same key".
//!
//! Run with: `cargo test --test properties`

#[path = "properties/cache_keys.rs"]
mod cache_keys;

#[path = "properties/reference_scanner.rs"]
mod reference_scanner;
