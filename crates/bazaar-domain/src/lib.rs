//! Domain types shared across all Bazaar services.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/` or `handlers/`.

pub mod assignment;
pub mod entity;
pub mod id;
pub mod pagination;
pub mod role;
