//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Matched non-public route
//!     → access_control.rs (roles declared? is_user_in_any_role : is_user_logged_in)
//!     → granted: continue to presenter resolution
//!     → denied / failed: redirect to default route with `next=<encoded token>`
//! ```

pub mod access_control;

pub use access_control::{AccessDecision, AccessGate, AuthorizationProvider};
