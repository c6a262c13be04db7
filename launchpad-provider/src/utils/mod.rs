//! Utility modules.

/// Timestamp parsing shared by provider payloads.
pub(crate) mod datetime;

/// Log sanitization utilities to prevent sensitive data exposure.
pub mod log_sanitizer;
