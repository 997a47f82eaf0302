//! Route table lookup.
//!
//! # Responsibilities
//! - Store registered routes and containers
//! - Look up a route by exact token id
//! - Resolve the container a route renders into
//!
//! # Design Decisions
//! - Immutable after construction (no locks on the lookup path)
//! - O(1) id lookup via HashMap
//! - Exact match only: no patterns, wildcards or trailing-slash folding
//! - Construction fails on any structural problem; the engine never sees a half-valid table

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use thiserror::Error;

use crate::config::schema::NavigatorConfig;
use crate::config::validation::ValidationError;
use crate::routing::route::{Container, Route};

/// Route table construction failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid route table: {}", join_errors(.0))]
pub struct RouteTableError(pub Vec<ValidationError>);

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Static mapping from token id to route metadata.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: HashMap<String, Arc<Route>>,
    /// Registration order, for listing.
    order: Vec<String>,
    default_route: Arc<Route>,
    not_found_route: Option<Arc<Route>>,
    containers: HashMap<String, Container>,
    default_container: Option<String>,
}

impl RouteTable {
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    /// Build the table from a loaded configuration.
    pub fn from_config(config: &NavigatorConfig) -> Result<Self, RouteTableError> {
        let builder = config
            .containers
            .iter()
            .fold(Self::builder(), |builder, c| builder.register_container(c.into()));
        config
            .routes
            .iter()
            .fold(builder, |builder, r| builder.register_route(r.into()))
            .build()
    }

    /// The unique route marked default.
    pub fn default_route(&self) -> &Arc<Route> {
        &self.default_route
    }

    pub fn not_found_route(&self) -> Option<&Arc<Route>> {
        self.not_found_route.as_ref()
    }

    /// Exact id lookup.
    pub fn resolve(&self, id: &str) -> Option<&Arc<Route>> {
        self.routes.get(id)
    }

    pub fn container(&self, id: &str) -> Option<&Container> {
        self.containers.get(id)
    }

    /// The container a route renders into, or `None` to render into the root.
    pub fn container_for(&self, route: &Route) -> Option<&Container> {
        if !route.uses_container() {
            return None;
        }
        match route.container_id() {
            Some(id) => self.containers.get(id),
            None => self
                .default_container
                .as_deref()
                .and_then(|id| self.containers.get(id)),
        }
    }

    /// Routes in registration order.
    pub fn routes(&self) -> impl Iterator<Item = &Arc<Route>> {
        self.order.iter().filter_map(|id| self.routes.get(id))
    }

    pub fn containers(&self) -> impl Iterator<Item = &Container> {
        self.containers.values()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Startup registration of routes and containers.
#[derive(Debug, Default)]
pub struct RouteTableBuilder {
    routes: Vec<Route>,
    containers: Vec<Container>,
}

impl RouteTableBuilder {
    pub fn register_route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    pub fn register_container(mut self, container: Container) -> Self {
        self.containers.push(container);
        self
    }

    /// Validate and freeze the table.
    pub fn build(self) -> Result<RouteTable, RouteTableError> {
        let errors = validate_table(&self.routes, &self.containers);
        if !errors.is_empty() {
            return Err(RouteTableError(errors));
        }

        let default_container = match self.containers.as_slice() {
            [only] => Some(only.id().to_string()),
            many => many
                .iter()
                .find(|c| c.is_default())
                .map(|c| c.id().to_string()),
        };

        let order: Vec<String> = self.routes.iter().map(|r| r.id().to_string()).collect();
        let routes: HashMap<String, Arc<Route>> = self
            .routes
            .into_iter()
            .map(|route| (route.id().to_string(), Arc::new(route)))
            .collect();

        let default_route = routes
            .values()
            .find(|r| r.is_default())
            .cloned()
            .ok_or_else(|| RouteTableError(vec![ValidationError::NoDefaultRoute]))?;
        let not_found_route = routes.values().find(|r| r.is_not_found()).cloned();

        let containers = self
            .containers
            .into_iter()
            .map(|c| (c.id().to_string(), c))
            .collect();

        Ok(RouteTable {
            routes,
            order,
            default_route,
            not_found_route,
            containers,
            default_container,
        })
    }
}

/// Structural rules shared by the builder and the config validator.
pub fn validate_table(routes: &[Route], containers: &[Container]) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let mut seen = HashSet::new();
    for route in routes {
        if route.id().is_empty() {
            errors.push(ValidationError::EmptyRouteId);
        } else if route.id().contains('&') {
            errors.push(ValidationError::InvalidRouteId(route.id().to_string()));
        }
        if !seen.insert(route.id()) && !route.id().is_empty() {
            errors.push(ValidationError::DuplicateRoute(route.id().to_string()));
        }
    }

    let defaults: Vec<String> = routes
        .iter()
        .filter(|r| r.is_default())
        .map(|r| r.id().to_string())
        .collect();
    match defaults.len() {
        0 => errors.push(ValidationError::NoDefaultRoute),
        1 => {}
        _ => errors.push(ValidationError::MultipleDefaultRoutes(defaults)),
    }

    let not_found: Vec<String> = routes
        .iter()
        .filter(|r| r.is_not_found())
        .map(|r| r.id().to_string())
        .collect();
    if not_found.len() > 1 {
        errors.push(ValidationError::MultipleNotFoundRoutes(not_found));
    }

    let mut container_ids = HashSet::new();
    for container in containers {
        if container.id().is_empty() {
            errors.push(ValidationError::EmptyContainerId);
        } else if !container_ids.insert(container.id()) {
            errors.push(ValidationError::DuplicateContainer(container.id().to_string()));
        }
    }

    let default_containers: Vec<String> = containers
        .iter()
        .filter(|c| c.is_default())
        .map(|c| c.id().to_string())
        .collect();
    if default_containers.len() > 1 {
        errors.push(ValidationError::MultipleDefaultContainers(default_containers));
    } else if default_containers.is_empty() && containers.len() > 1 {
        errors.push(ValidationError::AmbiguousDefaultContainer(containers.len()));
    }

    for route in routes.iter().filter(|r| r.uses_container()) {
        if let Some(container) = route.container_id() {
            if !container_ids.contains(container) {
                errors.push(ValidationError::UnknownContainer {
                    route: route.id().to_string(),
                    container: container.to_string(),
                });
            }
        }
    }

    errors
}
