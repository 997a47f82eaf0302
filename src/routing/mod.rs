//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Registration (at startup):
//!     RouteConfig[] / Route builders
//!     → table.rs (validate: one default, unique ids, container rules)
//!     → Freeze as immutable RouteTable
//!
//! Incoming Token (id + parameters)
//!     → table.rs (exact id lookup)
//!     → Return: matched Route or explicit no-match
//!     → table.rs (container resolution for the matched route)
//! ```
//!
//! # Design Decisions
//! - Routes registered at startup, immutable at runtime
//! - Deterministic: same id always matches same route
//! - No match is reported, the engine decides on not-found/default fallback

pub mod route;
pub mod table;

pub use route::{CachePolicy, Container, InterceptorBinding, Route};
pub use table::{RouteTable, RouteTableBuilder, RouteTableError};
