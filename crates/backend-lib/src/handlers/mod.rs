// ============================
// crates/backend-lib/src/handlers/mod.rs
// ============================
//! HTTP handlers.
pub mod credentials;

pub use credentials::{health, login, signup};
