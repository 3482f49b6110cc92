//! Auth types shared across Bazaar services.
//!
//! Provides BaaS access-token validation, session cookie builders, and the
//! `BrowserSession` extractor.

pub mod cookie;
pub mod identity;
pub mod token;
