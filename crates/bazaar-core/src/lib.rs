//! Service plumbing shared by the Bazaar HTTP services.

pub mod baas;
pub mod config;
pub mod error;
pub mod health;
pub mod middleware;
pub mod tracing;
