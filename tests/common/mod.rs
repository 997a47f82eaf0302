//! Shared collaborators for navigation integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use place_navigator::interception::{Interceptor, InterceptorCallback};
use place_navigator::navigation::{MemoryHistory, NavigationEngine, NavigationEngineBuilder};
use place_navigator::presenter::{HasViews, Presenter, RootPanel, View, ViewHandle};
use place_navigator::routing::{Container, InterceptorBinding, Route, RouteTable};
use place_navigator::security::AuthorizationProvider;
use place_navigator::{BoxError, Token};

/// Debug output of the views created by the test presenters is their label.
pub fn label(view: &ViewHandle) -> String {
    format!("{view:?}")
}

/// Route view labelled `<presenter>#<creation number>`.
pub struct TestView {
    label: String,
    interceptor: Option<Arc<dyn Interceptor>>,
}

impl fmt::Debug for TestView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl View for TestView {
    fn as_interceptor(self: Arc<Self>) -> Option<Arc<dyn Interceptor>> {
        self.interceptor.clone()
    }
}

/// Creates `TestView`s and counts how often it was asked to.
pub struct CountingPresenter {
    name: String,
    created: AtomicUsize,
    fail: bool,
    /// Handed to every created view (view binding).
    view_interceptor: Option<Arc<dyn Interceptor>>,
    /// Exposed by the presenter itself (presenter binding).
    own_interceptor: Option<Arc<dyn Interceptor>>,
}

impl CountingPresenter {
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self::plain(name))
    }

    pub fn failing(name: &str) -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::plain(name)
        })
    }

    pub fn with_view_interceptor(name: &str, interceptor: Arc<dyn Interceptor>) -> Arc<Self> {
        Arc::new(Self {
            view_interceptor: Some(interceptor),
            ..Self::plain(name)
        })
    }

    pub fn with_own_interceptor(name: &str, interceptor: Arc<dyn Interceptor>) -> Arc<Self> {
        Arc::new(Self {
            own_interceptor: Some(interceptor),
            ..Self::plain(name)
        })
    }

    fn plain(name: &str) -> Self {
        Self {
            name: name.to_string(),
            created: AtomicUsize::new(0),
            fail: false,
            view_interceptor: None,
            own_interceptor: None,
        }
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl Presenter for CountingPresenter {
    fn create_view(&self, _token: &Token) -> Result<ViewHandle, BoxError> {
        if self.fail {
            return Err(format!("{} presenter unavailable", self.name).into());
        }
        let n = self.created.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Arc::new(TestView {
            label: format!("{}#{n}", self.name),
            interceptor: self.view_interceptor.clone(),
        }))
    }

    fn as_interceptor(self: Arc<Self>) -> Option<Arc<dyn Interceptor>> {
        self.own_interceptor.clone()
    }
}

/// Container view that records every route view it is asked to show.
pub struct TestContainer {
    name: String,
    shown: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl TestContainer {
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            shown: Mutex::new(Vec::new()),
            fail: false,
        })
    }

    pub fn failing(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            shown: Mutex::new(Vec::new()),
            fail: true,
        })
    }

    /// `(token, view label)` pairs, oldest first.
    pub fn shown(&self) -> Vec<(String, String)> {
        self.shown.lock().unwrap().clone()
    }

    pub fn last_label(&self) -> Option<String> {
        self.shown.lock().unwrap().last().map(|(_, label)| label.clone())
    }
}

impl fmt::Debug for TestContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)
    }
}

impl View for TestContainer {
    fn as_container(&self) -> Option<&dyn HasViews> {
        Some(self)
    }
}

impl HasViews for TestContainer {
    fn show_view(&self, token: &Token, view: ViewHandle) -> Result<(), BoxError> {
        if self.fail {
            return Err("container refused the view".into());
        }
        self.shown.lock().unwrap().push((token.to_string(), label(&view)));
        Ok(())
    }
}

/// Hands out clones of one shared container so tests can inspect it.
pub struct ContainerPresenter {
    container: Mutex<Arc<TestContainer>>,
    created: AtomicUsize,
}

impl ContainerPresenter {
    pub fn new(container: Arc<TestContainer>) -> Arc<Self> {
        Arc::new(Self {
            container: Mutex::new(container),
            created: AtomicUsize::new(0),
        })
    }

    /// Subsequent creations return `container`.
    pub fn replace(&self, container: Arc<TestContainer>) {
        *self.container.lock().unwrap() = container;
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl Presenter for ContainerPresenter {
    fn create_view(&self, _token: &Token) -> Result<ViewHandle, BoxError> {
        self.created.fetch_add(1, Ordering::SeqCst);
        let container: ViewHandle = self.container.lock().unwrap().clone();
        Ok(container)
    }
}

/// Root panel recording what is attached.
#[derive(Default)]
pub struct RecordingRoot {
    attached: Mutex<Vec<ViewHandle>>,
    adds: AtomicUsize,
}

impl RecordingRoot {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn labels(&self) -> Vec<String> {
        self.attached.lock().unwrap().iter().map(label).collect()
    }

    pub fn adds(&self) -> usize {
        self.adds.load(Ordering::SeqCst)
    }
}

impl RootPanel for RecordingRoot {
    fn clear(&self) {
        self.attached.lock().unwrap().clear();
    }

    fn add(&self, view: ViewHandle) {
        self.adds.fetch_add(1, Ordering::SeqCst);
        self.attached.lock().unwrap().push(view);
    }

    fn is_attached(&self, view: &ViewHandle) -> bool {
        self.attached.lock().unwrap().iter().any(|v| Arc::ptr_eq(v, view))
    }
}

/// Authorization answering from a fixed role set.
pub struct StaticAuthorization {
    roles: Vec<String>,
    logged_in: bool,
    fail: bool,
    calls: AtomicUsize,
}

impl StaticAuthorization {
    pub fn with_roles(roles: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            roles: roles.iter().map(|r| r.to_string()).collect(),
            logged_in: true,
            fail: false,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn anonymous() -> Arc<Self> {
        Arc::new(Self {
            roles: Vec::new(),
            logged_in: false,
            fail: false,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            roles: Vec::new(),
            logged_in: false,
            fail: true,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthorizationProvider for StaticAuthorization {
    async fn is_user_in_any_role(&self, _token: &Token, roles: &[String]) -> Result<bool, BoxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err("authorization backend unreachable".into());
        }
        Ok(self.logged_in && roles.iter().any(|r| self.roles.contains(r)))
    }

    async fn is_user_logged_in(&self, _token: &Token) -> Result<bool, BoxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err("authorization backend unreachable".into());
        }
        Ok(self.logged_in)
    }
}

/// Authorization that waits for `release` before answering.
pub struct PendingAuthorization {
    pub release: Notify,
    allow: bool,
    calls: AtomicUsize,
}

impl PendingAuthorization {
    pub fn new(allow: bool) -> Arc<Self> {
        Arc::new(Self {
            release: Notify::new(),
            allow,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthorizationProvider for PendingAuthorization {
    async fn is_user_in_any_role(&self, _token: &Token, _roles: &[String]) -> Result<bool, BoxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.release.notified().await;
        Ok(self.allow)
    }
}

/// Records transitions and proceeds, optionally to a different target.
#[derive(Default)]
pub struct ConfirmingInterceptor {
    seen: Mutex<Vec<(String, String)>>,
    redirect: Option<Token>,
}

impl ConfirmingInterceptor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn redirecting_to(target: &str) -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(Vec::new()),
            redirect: Some(Token::parse(target)),
        })
    }

    /// `(current, destination)` pairs, oldest first.
    pub fn seen(&self) -> Vec<(String, String)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Interceptor for ConfirmingInterceptor {
    async fn on_url_changed(&self, current: &Token, destination: &Token, callback: InterceptorCallback) {
        self.seen
            .lock()
            .unwrap()
            .push((current.to_string(), destination.to_string()));
        let target = self.redirect.clone().unwrap_or_else(|| destination.clone());
        callback.proceed_to(target).await;
    }
}

/// Keeps the callback until the test decides (user confirmation).
#[derive(Default)]
pub struct DeferringInterceptor {
    pending: Mutex<Option<(Token, InterceptorCallback)>>,
}

impl DeferringInterceptor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// The pending destination and its callback, if a navigation is waiting.
    pub fn take(&self) -> Option<(Token, InterceptorCallback)> {
        self.pending.lock().unwrap().take()
    }
}

#[async_trait]
impl Interceptor for DeferringInterceptor {
    async fn on_url_changed(&self, _current: &Token, destination: &Token, callback: InterceptorCallback) {
        *self.pending.lock().unwrap() = Some((destination.clone(), callback));
    }
}

/// Route table shared by most scenarios.
///
/// `home` (default), `missing` (not found), `about` (never cached),
/// `item` (same url), `admin` (role admin), `profile` (logged-in),
/// `settings` (renders into the root), `editor` (view interceptor).
pub fn standard_table() -> RouteTable {
    RouteTable::builder()
        .register_container(Container::new("main").default_container())
        .register_route(Route::new("home").default_route().public())
        .register_route(Route::new("missing").not_found_route().public())
        .register_route(
            Route::new("about")
                .public()
                .with_cache(place_navigator::routing::CachePolicy::Never),
        )
        .register_route(Route::new("item").public())
        .register_route(Route::new("admin").with_roles(["admin"]))
        .register_route(Route::new("profile"))
        .register_route(Route::new("settings").public().without_container())
        .register_route(
            Route::new("editor")
                .public()
                .with_interceptor(InterceptorBinding::View),
        )
        .build()
        .unwrap()
}

/// An engine with counting presenters for every route of the table.
pub struct Harness {
    pub engine: NavigationEngine,
    pub history: Arc<MemoryHistory>,
    pub root: Arc<RecordingRoot>,
    pub container: Arc<TestContainer>,
    pub container_presenter: Arc<ContainerPresenter>,
    pub presenters: HashMap<String, Arc<CountingPresenter>>,
}

impl Harness {
    pub fn new(table: RouteTable) -> Self {
        Self::with(table, |builder| builder)
    }

    /// Register defaults, then let `customize` override collaborators.
    pub fn with<F>(table: RouteTable, customize: F) -> Self
    where
        F: FnOnce(NavigationEngineBuilder) -> NavigationEngineBuilder,
    {
        let history = Arc::new(MemoryHistory::new());
        let container = TestContainer::new("main");
        let container_presenter = ContainerPresenter::new(container.clone());

        let mut presenters = HashMap::new();
        let mut builder = NavigationEngine::builder(table.clone()).history(history.clone());
        for route in table.routes() {
            let presenter = CountingPresenter::new(route.id());
            presenters.insert(route.id().to_string(), presenter.clone());
            builder = builder.presenter(route.id(), presenter);
        }
        for c in table.containers() {
            builder = builder.container_presenter(c.id(), container_presenter.clone());
        }

        let engine = customize(builder).build().unwrap();
        Self {
            engine,
            history,
            root: RecordingRoot::new(),
            container,
            container_presenter,
            presenters,
        }
    }

    pub async fn start(&self) {
        self.engine.start(self.root.clone()).await.unwrap();
    }

    pub async fn go(&self, raw: &str) {
        self.engine.navigate_to(Token::parse(raw)).await;
    }

    pub fn presenter(&self, route_id: &str) -> &Arc<CountingPresenter> {
        &self.presenters[route_id]
    }

    pub fn current(&self) -> String {
        self.engine.current_token().to_string()
    }
}
