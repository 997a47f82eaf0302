//! Navigation dispatch engine.
//!
//! # Responsibilities
//! - Turn each history change into a placed view, a redirect or a no-op
//! - Consult the interception gate before anything else
//! - Gate non-public routes through the access gate
//! - Resolve route and container views through the presenter cache
//! - Place views into containers or the root panel
//!
//! # Data Flow
//! ```text
//! raw history string ─▶ TokenFactory ─▶ dispatch
//!     INTERCEPT_CHECK  gate ACTIVE? ─▶ roll back history, hand over to interceptor
//!     ROUTE_MATCH      exact id, else not-found, else default (history rewritten)
//!                      commit token to the session
//!     ACCESS_CHECK     non-public? ─▶ AccessGate ─▶ redirect re-enters dispatch
//!     RESOLVE          route view, container view (PresenterCache)
//!     BIND             interception gate ACTIVE / NONE
//!     PLACE            container.show_view + attach, or root replace
//! ```
//!
//! # Design Decisions
//! - Per-dispatch failures are logged and counted, never returned to the caller
//! - Redirect chains are bounded by `max_redirects`
//! - Access decisions that resolve after a newer commit are discarded
//! - A resumed interception bypasses the gate once and keeps the original `dispatch_id`

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use futures_util::future::{BoxFuture, FutureExt};
use tracing::Instrument;
use uuid::Uuid;

use crate::config::NavigationConfig;
use crate::error::{EngineError, NavigationError};
use crate::interception::{ActiveInterceptor, InterceptorCallback, InterceptorRegistry, Interceptor};
use crate::navigation::history::{History, MemoryHistory};
use crate::navigation::session::NavigationSession;
use crate::observability::metrics::{self, DispatchOutcome, RedirectReason};
use crate::presenter::{CacheKey, Presenter, PresenterCache, RootPanel, ViewHandle};
use crate::routing::{Container, InterceptorBinding, Route, RouteTable};
use crate::security::{AccessDecision, AccessGate, AuthorizationProvider};
use crate::token::{DefaultTokenFactory, Token, TokenFactory};

/// Runtime knobs of the engine.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Redirect hops allowed per dispatch chain.
    pub max_redirects: u32,
    /// Recovery parameter appended on access redirects.
    pub next_parameter: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        NavigationConfig::default().into()
    }
}

impl From<NavigationConfig> for EngineSettings {
    fn from(config: NavigationConfig) -> Self {
        Self {
            max_redirects: config.max_redirects,
            next_parameter: config.next_parameter,
        }
    }
}

impl From<&NavigationConfig> for EngineSettings {
    fn from(config: &NavigationConfig) -> Self {
        config.clone().into()
    }
}

#[derive(Debug, Clone, Copy)]
struct DispatchContext {
    id: Uuid,
    hops: u32,
    bypass_gate: bool,
}

impl DispatchContext {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            hops: 0,
            bypass_gate: false,
        }
    }

    fn redirected(self) -> Self {
        Self {
            hops: self.hops + 1,
            ..self
        }
    }

    fn resumed(self) -> Self {
        Self {
            bypass_gate: true,
            ..self
        }
    }
}

struct EngineInner {
    table: RouteTable,
    presenters: HashMap<String, Arc<dyn Presenter>>,
    container_presenters: HashMap<String, Arc<dyn Presenter>>,
    interceptors: InterceptorRegistry,
    history: Arc<dyn History>,
    token_factory: Arc<dyn TokenFactory>,
    access: AccessGate,
    cache: PresenterCache,
    session: NavigationSession,
    root: OnceLock<Arc<dyn RootPanel>>,
    settings: EngineSettings,
}

/// Top-level navigation state machine. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct NavigationEngine {
    inner: Arc<EngineInner>,
}

impl NavigationEngine {
    pub fn builder(table: RouteTable) -> NavigationEngineBuilder {
        NavigationEngineBuilder::new(table)
    }

    /// Attach the root panel and dispatch the token currently in history.
    pub async fn start(&self, root: Arc<dyn RootPanel>) -> Result<(), EngineError> {
        self.inner
            .root
            .set(root)
            .map_err(|_| EngineError::AlreadyStarted)?;

        let initial = self.inner.history.current();
        tracing::info!(
            routes = self.inner.table.len(),
            initial = %initial,
            "Navigation engine started"
        );
        self.on_history_changed(Some(initial.as_str())).await;
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.inner.root.get().is_some()
    }

    /// Install (or replace) the authorization provider.
    pub fn set_access_gate(&self, provider: Arc<dyn AuthorizationProvider>) {
        self.inner.access.set_provider(provider);
    }

    /// Remove the authorization provider; every route becomes accessible.
    pub fn clear_access_gate(&self) {
        self.inner.access.clear_provider();
    }

    pub fn clear_cache(&self) {
        self.inner.cache.clear_all();
    }

    pub fn clear_cache_for(&self, route_id: &str) {
        self.inner.cache.clear(route_id);
    }

    /// Push `token` to history and dispatch it. Ignored before `start`.
    pub async fn navigate_to(&self, token: Token) {
        if !self.is_started() {
            tracing::error!(token = %token, error = %NavigationError::NotStarted, "Navigation rejected");
            metrics::record_dispatch(DispatchOutcome::Failed);
            return;
        }
        self.inner.history.new_item(&token.to_string());
        self.dispatch_root(token).await;
    }

    /// Entry point for history change events raised by the host.
    pub async fn on_history_changed(&self, raw: Option<&str>) {
        let token = self.inner.token_factory.create_token(raw);
        self.dispatch_root(token).await;
    }

    /// Last committed token.
    pub fn current_token(&self) -> Token {
        self.inner.session.current_token()
    }

    pub fn is_intercepting(&self) -> bool {
        self.inner.session.interception().is_active()
    }

    pub fn route_table(&self) -> &RouteTable {
        &self.inner.table
    }

    pub fn history(&self) -> &Arc<dyn History> {
        &self.inner.history
    }

    pub fn cache(&self) -> &PresenterCache {
        &self.inner.cache
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.inner.settings
    }

    async fn dispatch_root(&self, token: Token) {
        let ctx = DispatchContext::new();
        let span = tracing::info_span!("dispatch", dispatch_id = %ctx.id);
        self.dispatch(token, ctx).instrument(span).await
    }

    fn dispatch(&self, token: Token, ctx: DispatchContext) -> BoxFuture<'static, ()> {
        let engine = self.clone();
        async move { engine.run(token, ctx).await }.boxed()
    }

    async fn run(&self, token: Token, ctx: DispatchContext) {
        if !self.is_started() {
            tracing::error!(token = %token, error = %NavigationError::NotStarted, "Dispatch rejected");
            metrics::record_dispatch(DispatchOutcome::Failed);
            return;
        }

        if !ctx.bypass_gate {
            if let Some(active) = self.inner.session.interception().active() {
                self.intercept(active, token, ctx).await;
                return;
            }
        }

        self.proceed(token, ctx).await;
    }

    async fn intercept(&self, active: Arc<ActiveInterceptor>, destination: Token, ctx: DispatchContext) {
        let current = self.inner.session.current_token();
        tracing::debug!(
            route = %active.route_id,
            current = %current,
            destination = %destination,
            "Navigation intercepted"
        );
        self.inner.history.replace_item(&current.to_string());
        metrics::record_dispatch(DispatchOutcome::Intercepted);

        let engine = self.clone();
        let resumed = ctx.resumed();
        let callback = InterceptorCallback::new(move |target: Token| async move {
            let span = tracing::info_span!("dispatch", dispatch_id = %resumed.id, resumed = true);
            engine.inner.history.replace_item(&target.to_string());
            engine.dispatch(target, resumed).instrument(span).await;
        });

        active
            .interceptor
            .on_url_changed(&current, &destination, callback)
            .await;
    }

    async fn proceed(&self, token: Token, ctx: DispatchContext) {
        let (route, token) = self.match_route(token);
        let generation = self.inner.session.commit(token.clone());

        if !route.is_public() {
            let decision = self
                .inner
                .access
                .check_access(&token, &route.allowed_roles())
                .await;

            if !self.inner.session.is_current(generation) {
                tracing::warn!(token = %token, "Access decision superseded by a newer navigation");
                metrics::record_dispatch(DispatchOutcome::Superseded);
                return;
            }

            if let AccessDecision::Redirect { target, reason } = decision {
                self.redirect(target, reason, ctx).await;
                return;
            }
        }

        match self.show(&route, &token) {
            Ok(()) => metrics::record_dispatch(DispatchOutcome::Placed),
            Err(e) => {
                tracing::error!(token = %token, route = %route.id(), error = %e, "Navigation failed");
                metrics::record_dispatch(DispatchOutcome::Failed);
            }
        }
    }

    /// Exact lookup; unmatched ids fall back to not-found, then default.
    fn match_route(&self, token: Token) -> (Arc<Route>, Token) {
        let table = &self.inner.table;
        if token.id().is_empty() {
            return (table.default_route().clone(), token);
        }
        if let Some(route) = table.resolve(token.id()) {
            return (route.clone(), token);
        }

        let (fallback, reason) = match table.not_found_route() {
            Some(route) => (route.clone(), RedirectReason::NotFound),
            None => (table.default_route().clone(), RedirectReason::DefaultFallback),
        };
        tracing::warn!(token = %token, fallback = %fallback.id(), "No route matches token");
        metrics::record_redirect(reason);
        self.inner.history.replace_item(fallback.id());
        let rewritten = Token::new(fallback.id());
        (fallback, rewritten)
    }

    async fn redirect(&self, target: Token, reason: RedirectReason, ctx: DispatchContext) {
        if ctx.hops >= self.inner.settings.max_redirects {
            tracing::error!(
                redirect_to = %target,
                hops = ctx.hops,
                max_redirects = self.inner.settings.max_redirects,
                "Redirect limit reached, navigation aborted"
            );
            metrics::record_dispatch(DispatchOutcome::RedirectLimit);
            return;
        }

        tracing::debug!(redirect_to = %target, reason = %reason, "Redirecting");
        metrics::record_redirect(reason);
        metrics::record_dispatch(DispatchOutcome::Redirected);
        self.inner.history.replace_item(&target.to_string());
        self.dispatch(target, ctx.redirected()).await;
    }

    fn show(&self, route: &Arc<Route>, token: &Token) -> Result<(), NavigationError> {
        let root = self.inner.root.get().ok_or(NavigationError::NotStarted)?;
        let cache = &self.inner.cache;

        let presenter = self
            .inner
            .presenters
            .get(route.id())
            .ok_or_else(|| NavigationError::NoPresenter(route.id().to_string()))?;
        let view = cache.resolve(
            &CacheKey::route(route.id()),
            route.cache_policy(),
            token,
            presenter.as_ref(),
        )?;

        let container = match self.inner.table.container_for(route) {
            Some(container) => Some((container, self.container_view(container, token)?)),
            None => None,
        };

        let interceptor = self.route_interceptor(route, &view, presenter);

        match container {
            Some((container, container_view)) => {
                let host = container_view
                    .as_container()
                    .ok_or_else(|| NavigationError::NotAContainer(container.id().to_string()))?;
                host.show_view(token, view)
                    .map_err(|source| NavigationError::Placement {
                        route: route.id().to_string(),
                        container: container.id().to_string(),
                        source,
                    })?;
                if !root.is_attached(&container_view) {
                    root.clear();
                    root.add(container_view.clone());
                }
                tracing::info!(token = %token, route = %route.id(), container = %container.id(), "View placed");
            }
            None => {
                root.clear();
                root.add(view);
                tracing::info!(token = %token, route = %route.id(), "View placed in root");
            }
        }

        // Only a displayed route may change the gate.
        let gate = self.inner.session.interception();
        match interceptor {
            Some(interceptor) => gate.activate(route.id(), interceptor),
            None => gate.deactivate(),
        }
        Ok(())
    }

    fn container_view(&self, container: &Container, token: &Token) -> Result<ViewHandle, NavigationError> {
        let key = CacheKey::container(container.id());
        let presenter = self
            .inner
            .container_presenters
            .get(container.id())
            .ok_or_else(|| NavigationError::NoPresenter(key.to_string()))?;
        Ok(self
            .inner
            .cache
            .resolve(&key, container.cache_policy(), token, presenter.as_ref())?)
    }

    fn route_interceptor(
        &self,
        route: &Route,
        view: &ViewHandle,
        presenter: &Arc<dyn Presenter>,
    ) -> Option<Arc<dyn Interceptor>> {
        let binding = route.interceptor()?;
        let interceptor = match binding {
            InterceptorBinding::View => view.clone().as_interceptor(),
            InterceptorBinding::Presenter => presenter.clone().as_interceptor(),
            InterceptorBinding::Named { id } => self.inner.interceptors.create(id),
        };
        if interceptor.is_none() {
            tracing::warn!(route = %route.id(), binding = ?binding, "Route interceptor is not available");
        }
        interceptor
    }
}

impl fmt::Debug for NavigationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationEngine")
            .field("routes", &self.inner.table.len())
            .field("started", &self.is_started())
            .field("current", &self.current_token().to_string())
            .field("access", &self.inner.access)
            .finish()
    }
}

/// Collects collaborators and validates them against the route table.
pub struct NavigationEngineBuilder {
    table: RouteTable,
    presenters: HashMap<String, Arc<dyn Presenter>>,
    container_presenters: HashMap<String, Arc<dyn Presenter>>,
    interceptors: InterceptorRegistry,
    history: Option<Arc<dyn History>>,
    token_factory: Option<Arc<dyn TokenFactory>>,
    provider: Option<Arc<dyn AuthorizationProvider>>,
    settings: EngineSettings,
}

impl NavigationEngineBuilder {
    pub fn new(table: RouteTable) -> Self {
        Self {
            table,
            presenters: HashMap::new(),
            container_presenters: HashMap::new(),
            interceptors: InterceptorRegistry::new(),
            history: None,
            token_factory: None,
            provider: None,
            settings: EngineSettings::default(),
        }
    }

    pub fn presenter(mut self, route_id: impl Into<String>, presenter: Arc<dyn Presenter>) -> Self {
        self.presenters.insert(route_id.into(), presenter);
        self
    }

    pub fn container_presenter(
        mut self,
        container_id: impl Into<String>,
        presenter: Arc<dyn Presenter>,
    ) -> Self {
        self.container_presenters.insert(container_id.into(), presenter);
        self
    }

    /// Register a factory for routes bound to a named interceptor.
    pub fn interceptor<F>(mut self, id: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Arc<dyn Interceptor> + Send + Sync + 'static,
    {
        self.interceptors.register(id, factory);
        self
    }

    pub fn history(mut self, history: Arc<dyn History>) -> Self {
        self.history = Some(history);
        self
    }

    pub fn token_factory(mut self, factory: Arc<dyn TokenFactory>) -> Self {
        self.token_factory = Some(factory);
        self
    }

    pub fn access_gate(mut self, provider: Arc<dyn AuthorizationProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Check that every route, container and named interceptor has a collaborator.
    pub fn build(self) -> Result<NavigationEngine, EngineError> {
        for route in self.table.routes() {
            if !self.presenters.contains_key(route.id()) {
                return Err(EngineError::MissingPresenter(route.id().to_string()));
            }
            if let Some(InterceptorBinding::Named { id }) = route.interceptor() {
                if !self.interceptors.contains(id) {
                    return Err(EngineError::UnknownInterceptor {
                        route: route.id().to_string(),
                        interceptor: id.clone(),
                    });
                }
            }
        }
        for container in self.table.containers() {
            if !self.container_presenters.contains_key(container.id()) {
                return Err(EngineError::MissingContainerPresenter(container.id().to_string()));
            }
        }

        let access = AccessGate::new(
            self.table.default_route().id(),
            self.settings.next_parameter.as_str(),
        );
        if let Some(provider) = self.provider {
            access.set_provider(provider);
        }

        Ok(NavigationEngine {
            inner: Arc::new(EngineInner {
                table: self.table,
                presenters: self.presenters,
                container_presenters: self.container_presenters,
                interceptors: self.interceptors,
                history: self
                    .history
                    .unwrap_or_else(|| Arc::new(MemoryHistory::new()) as Arc<dyn History>),
                token_factory: self
                    .token_factory
                    .unwrap_or_else(|| Arc::new(DefaultTokenFactory) as Arc<dyn TokenFactory>),
                access,
                cache: PresenterCache::new(),
                session: NavigationSession::new(),
                root: OnceLock::new(),
                settings: self.settings,
            }),
        })
    }
}
