// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const SIGNUP_SUCCESS: &str = "signup.success";
pub const SIGNUP_DUPLICATE: &str = "signup.duplicate";
pub const SIGNUP_REJECTED: &str = "signup.rejected";
pub const LOGIN_SUCCESS: &str = "login.success";
pub const LOGIN_FAILURE: &str = "login.failure";
pub const STORE_CORRUPTION: &str = "store.corruption_recovered";
pub const HASH_DURATION: &str = "password.hash_seconds";
