//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (routes reference existing containers)
//! - Validate value ranges (redirect limit > 0, known log level)
//! - Detect conflicting routes (duplicate ids, several defaults)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: NavigatorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::NavigatorConfig;
use crate::routing::route::{Container, Route};
use crate::routing::table::validate_table;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem found in a configuration or route table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no default route registered")]
    NoDefaultRoute,

    #[error("more than one default route registered: {0:?}")]
    MultipleDefaultRoutes(Vec<String>),

    #[error("more than one not-found route registered: {0:?}")]
    MultipleNotFoundRoutes(Vec<String>),

    #[error("duplicate route id '{0}'")]
    DuplicateRoute(String),

    #[error("route id must not be empty")]
    EmptyRouteId,

    #[error("route id '{0}' contains '&' and can never be matched")]
    InvalidRouteId(String),

    #[error("container id must not be empty")]
    EmptyContainerId,

    #[error("duplicate container id '{0}'")]
    DuplicateContainer(String),

    #[error("more than one default container registered: {0:?}")]
    MultipleDefaultContainers(Vec<String>),

    #[error("{0} containers registered but none is marked default")]
    AmbiguousDefaultContainer(usize),

    #[error("route '{route}' references unknown container '{container}'")]
    UnknownContainer { route: String, container: String },

    #[error("navigation.max_redirects must be greater than zero")]
    InvalidMaxRedirects,

    #[error("navigation.next_parameter must be a non-empty name without '&', '=' or quotes")]
    InvalidNextParameter(String),

    #[error("unknown log level '{0}'")]
    InvalidLogLevel(String),
}

/// Validate a loaded configuration, including the route table rules.
pub fn validate_config(config: &NavigatorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.navigation.max_redirects == 0 {
        errors.push(ValidationError::InvalidMaxRedirects);
    }

    let next = &config.navigation.next_parameter;
    if next.is_empty() || next.contains(['&', '=', '\'']) {
        errors.push(ValidationError::InvalidNextParameter(next.clone()));
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    let routes: Vec<Route> = config.routes.iter().map(Route::from).collect();
    let containers: Vec<Container> = config.containers.iter().map(Container::from).collect();
    errors.extend(validate_table(&routes, &containers));

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
