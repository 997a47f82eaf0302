//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the navigator.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::routing::route::{CachePolicy, InterceptorBinding};

/// Root configuration for the navigator.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct NavigatorConfig {
    /// Dispatch settings.
    pub navigation: NavigationConfig,

    /// Route definitions mapping token ids to views.
    pub routes: Vec<RouteConfig>,

    /// Container definitions hosting route views.
    pub containers: Vec<ContainerConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Dispatch settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Maximum number of access redirects followed within one dispatch chain.
    pub max_redirects: u32,

    /// Name of the recovery parameter appended on access redirects.
    pub next_parameter: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            max_redirects: 8,
            next_parameter: "next".to_string(),
        }
    }
}

/// Route registration entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Token id this route answers to (exact match).
    pub id: String,

    /// The route shown on startup and after access redirects.
    #[serde(default)]
    pub default: bool,

    /// The route shown when no other route matches.
    #[serde(default)]
    pub not_found: bool,

    /// Public routes skip the access check.
    #[serde(default)]
    pub public: bool,

    /// Roles allowed to see the route. Empty means any logged-in user.
    #[serde(default)]
    pub roles: Vec<String>,

    /// View caching policy.
    #[serde(default)]
    pub cache: CachePolicy,

    /// Render inside a container (default: true).
    #[serde(default = "default_uses_container")]
    pub uses_container: bool,

    /// Explicit container id. Falls back to the default container.
    #[serde(default)]
    pub container: Option<String>,

    /// Interceptor attached while this route is displayed.
    #[serde(default)]
    pub interceptor: Option<InterceptorBinding>,
}

fn default_uses_container() -> bool {
    true
}

/// Container registration entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContainerConfig {
    /// Unique container identifier.
    pub id: String,

    /// Used by routes that name no container.
    #[serde(default)]
    pub default: bool,

    /// Caching policy of the container view (default: always).
    #[serde(default = "default_container_cache")]
    pub cache: CachePolicy,
}

fn default_container_cache() -> CachePolicy {
    CachePolicy::Always
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
