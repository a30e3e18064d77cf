// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.
pub mod password;
mod service;
mod service_impl;

pub use password::CredentialHasher;
pub use service::{Account, AuthService};
pub use service_impl::CredentialService;
