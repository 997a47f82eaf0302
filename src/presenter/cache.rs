//! Presenter view cache.
//!
//! # Responsibilities
//! - Memoize resolved views per route id and per container id
//! - Apply the route's cache policy on every resolution
//! - Invalidate wholesale or per route
//!
//! # Design Decisions
//! - Route and container entries live in separate key namespaces
//! - The presenter is called at most once per cache miss, outside any map lock
//! - `SameUrl` compares canonical token strings

use std::fmt;

use dashmap::DashMap;
use thiserror::Error;

use crate::error::BoxError;
use crate::observability::metrics;
use crate::presenter::view::{Presenter, ViewHandle};
use crate::routing::route::CachePolicy;
use crate::token::Token;

/// Cache key; containers never collide with routes of the same spelling.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Route(String),
    Container(String),
}

impl CacheKey {
    pub fn route(id: impl Into<String>) -> Self {
        CacheKey::Route(id.into())
    }

    pub fn container(id: impl Into<String>) -> Self {
        CacheKey::Container(id.into())
    }

    fn namespace(&self) -> &'static str {
        match self {
            CacheKey::Route(_) => "route",
            CacheKey::Container(_) => "container",
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Route(id) => f.write_str(id),
            CacheKey::Container(id) => write!(f, "@{id}"),
        }
    }
}

/// The presenter failed to create a view.
#[derive(Debug, Error)]
#[error("presenter for '{key}' failed to create a view: {source}")]
pub struct PresenterError {
    pub key: CacheKey,
    #[source]
    pub source: BoxError,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    view: ViewHandle,
    /// Canonical token the view was created for (`SameUrl` only).
    last_token: Option<String>,
}

/// Store of previously resolved view handles.
#[derive(Debug, Default)]
pub struct PresenterCache {
    entries: DashMap<CacheKey, CacheEntry>,
}

impl PresenterCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a view for `token`, creating one only when the policy requires it.
    pub fn resolve(
        &self,
        key: &CacheKey,
        policy: CachePolicy,
        token: &Token,
        presenter: &dyn Presenter,
    ) -> Result<ViewHandle, PresenterError> {
        let serialized = match policy {
            CachePolicy::Never => {
                metrics::record_cache_lookup(key.namespace(), false);
                return self.create(key, token, presenter);
            }
            CachePolicy::Always => None,
            CachePolicy::SameUrl => Some(token.to_string()),
        };

        let cached = self.entries.get(key).and_then(|entry| {
            let fresh = serialized.is_none() || entry.last_token == serialized;
            fresh.then(|| entry.view.clone())
        });
        if let Some(view) = cached {
            tracing::debug!(key = %key, policy = %policy, "Presenter cache hit");
            metrics::record_cache_lookup(key.namespace(), true);
            return Ok(view);
        }

        tracing::debug!(key = %key, policy = %policy, "Presenter cache miss");
        metrics::record_cache_lookup(key.namespace(), false);
        let view = self.create(key, token, presenter)?;
        self.entries.insert(
            key.clone(),
            CacheEntry {
                view: view.clone(),
                last_token: serialized,
            },
        );
        Ok(view)
    }

    fn create(
        &self,
        key: &CacheKey,
        token: &Token,
        presenter: &dyn Presenter,
    ) -> Result<ViewHandle, PresenterError> {
        presenter
            .create_view(token)
            .map_err(|source| PresenterError {
                key: key.clone(),
                source,
            })
    }

    /// Drop every route and container entry.
    pub fn clear_all(&self) {
        self.entries.clear();
    }

    /// Drop the entry of one route. Container entries are untouched.
    pub fn clear(&self, route_id: &str) {
        self.entries.remove(&CacheKey::route(route_id));
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
