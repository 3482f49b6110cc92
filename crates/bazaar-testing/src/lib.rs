//! Test utilities for Bazaar services.
//!
//! Provides listing fixtures, signed provider tokens, and browser-session
//! cookie headers. Import from tests only.

pub mod auth;
pub mod fixture;
