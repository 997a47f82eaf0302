//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, route table rules)
//!     → NavigatorConfig (validated, immutable)
//!     → RouteTable::from_config at engine startup
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; the route table is static afterwards
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::ContainerConfig;
pub use schema::NavigationConfig;
pub use schema::NavigatorConfig;
pub use schema::ObservabilityConfig;
pub use schema::RouteConfig;
pub use validation::ValidationError;
