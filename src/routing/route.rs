//! Route and container metadata.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::schema::{ContainerConfig, RouteConfig};

/// How a resolved view is memoized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CachePolicy {
    /// A fresh view for every dispatch.
    Never,
    /// A fresh view only when the serialized token changes.
    #[default]
    SameUrl,
    /// One view for the lifetime of the cache entry.
    Always,
}

impl fmt::Display for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CachePolicy::Never => "never",
            CachePolicy::SameUrl => "same_url",
            CachePolicy::Always => "always",
        })
    }
}

/// Which instance intercepts navigation away from a displayed route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InterceptorBinding {
    /// The resolved view itself.
    View,
    /// The route's presenter.
    Presenter,
    /// A fresh instance from the registered factory, created on every display.
    Named { id: String },
}

/// Static registration entry for one token id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    id: String,
    is_default: bool,
    is_not_found: bool,
    is_public: bool,
    allowed_roles: BTreeSet<String>,
    cache_policy: CachePolicy,
    uses_container: bool,
    container_id: Option<String>,
    interceptor: Option<InterceptorBinding>,
}

impl Route {
    /// A private, container-hosted, `SameUrl`-cached route.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_default: false,
            is_not_found: false,
            is_public: false,
            allowed_roles: BTreeSet::new(),
            cache_policy: CachePolicy::default(),
            uses_container: true,
            container_id: None,
            interceptor: None,
        }
    }

    pub fn default_route(mut self) -> Self {
        self.is_default = true;
        self
    }

    pub fn not_found_route(mut self) -> Self {
        self.is_not_found = true;
        self
    }

    pub fn public(mut self) -> Self {
        self.is_public = true;
        self
    }

    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_roles.extend(roles.into_iter().map(Into::into));
        self
    }

    pub fn with_cache(mut self, policy: CachePolicy) -> Self {
        self.cache_policy = policy;
        self
    }

    pub fn in_container(mut self, container_id: impl Into<String>) -> Self {
        self.uses_container = true;
        self.container_id = Some(container_id.into());
        self
    }

    pub fn without_container(mut self) -> Self {
        self.uses_container = false;
        self.container_id = None;
        self
    }

    pub fn with_interceptor(mut self, binding: InterceptorBinding) -> Self {
        self.interceptor = Some(binding);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_default(&self) -> bool {
        self.is_default
    }

    pub fn is_not_found(&self) -> bool {
        self.is_not_found
    }

    pub fn is_public(&self) -> bool {
        self.is_public
    }

    /// Roles passed to the authorization provider, in sorted order.
    pub fn allowed_roles(&self) -> Vec<String> {
        self.allowed_roles.iter().cloned().collect()
    }

    pub fn cache_policy(&self) -> CachePolicy {
        self.cache_policy
    }

    pub fn uses_container(&self) -> bool {
        self.uses_container
    }

    pub fn container_id(&self) -> Option<&str> {
        self.container_id.as_deref()
    }

    pub fn interceptor(&self) -> Option<&InterceptorBinding> {
        self.interceptor.as_ref()
    }
}

impl From<&RouteConfig> for Route {
    fn from(config: &RouteConfig) -> Self {
        Self {
            id: config.id.clone(),
            is_default: config.default,
            is_not_found: config.not_found,
            is_public: config.public,
            allowed_roles: config.roles.iter().cloned().collect(),
            cache_policy: config.cache,
            uses_container: config.uses_container,
            container_id: config.container.clone().filter(|_| config.uses_container),
            interceptor: config.interceptor.clone(),
        }
    }
}

/// A layout that hosts route views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    id: String,
    is_default: bool,
    cache_policy: CachePolicy,
}

impl Container {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_default: false,
            cache_policy: CachePolicy::Always,
        }
    }

    pub fn default_container(mut self) -> Self {
        self.is_default = true;
        self
    }

    pub fn with_cache(mut self, policy: CachePolicy) -> Self {
        self.cache_policy = policy;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_default(&self) -> bool {
        self.is_default
    }

    pub fn cache_policy(&self) -> CachePolicy {
        self.cache_policy
    }
}

impl From<&ContainerConfig> for Container {
    fn from(config: &ContainerConfig) -> Self {
        Self {
            id: config.id.clone(),
            is_default: config.default,
            cache_policy: config.cache,
        }
    }
}
