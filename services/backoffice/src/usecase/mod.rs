pub mod admin;
pub mod guard;
pub mod mfa;
pub mod role;
pub mod session;
