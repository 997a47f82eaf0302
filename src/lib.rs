//! Place Navigator Library
//!
//! Maps URL-history tokens to views owned by lazily created presenters, with
//! pluggable access control, presenter caching and navigation interception.

pub mod config;
pub mod error;
pub mod interception;
pub mod navigation;
pub mod observability;
pub mod presenter;
pub mod routing;
pub mod security;
pub mod token;

pub use config::schema::NavigatorConfig;
pub use error::{BoxError, EngineError, NavigationError};
pub use navigation::{NavigationEngine, NavigationEngineBuilder};
pub use routing::RouteTable;
pub use token::Token;
