//! Interception gate.
//!
//! # Responsibilities
//! - Hold the interceptor attached to the currently displayed route
//! - Expose the NONE / ACTIVE state to the dispatch pipeline
//! - Carry the continuation an interceptor uses to resume navigation
//!
//! # Design Decisions
//! - The gate never owns the view or presenter behind an interceptor beyond
//!   sharing its `Arc`; replacing the active entry releases it
//! - A continuation is single-use (`FnOnce`); dropping it cancels the navigation

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use futures_util::future::{BoxFuture, FutureExt};

use crate::token::Token;

/// A collaborator allowed to veto or redirect an outgoing navigation.
#[async_trait]
pub trait Interceptor: Send + Sync {
    /// Called instead of dispatching `destination`. Call `callback.proceed_to`
    /// now or later to continue; drop it to stay on `current`.
    async fn on_url_changed(
        &self,
        current: &Token,
        destination: &Token,
        callback: InterceptorCallback,
    );
}

type ProceedFn = Box<dyn FnOnce(Token) -> BoxFuture<'static, ()> + Send>;

/// Single-use continuation handed to an interceptor.
pub struct InterceptorCallback {
    proceed: ProceedFn,
}

impl InterceptorCallback {
    pub fn new<F, Fut>(proceed: F) -> Self
    where
        F: FnOnce(Token) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            proceed: Box::new(move |target| proceed(target).boxed()),
        }
    }

    /// Resume navigation to `target`, which may differ from the requested destination.
    pub async fn proceed_to(self, target: Token) {
        (self.proceed)(target).await
    }
}

impl fmt::Debug for InterceptorCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorCallback").finish_non_exhaustive()
    }
}

/// Interceptor bound to the route that is currently displayed.
#[derive(Clone)]
pub struct ActiveInterceptor {
    pub route_id: String,
    pub interceptor: Arc<dyn Interceptor>,
}

impl fmt::Debug for ActiveInterceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveInterceptor")
            .field("route_id", &self.route_id)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    None,
    Active,
}

/// Holds the active interceptor, if any.
#[derive(Default)]
pub struct InterceptionGate {
    active: ArcSwapOption<ActiveInterceptor>,
}

impl InterceptionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activate(&self, route_id: impl Into<String>, interceptor: Arc<dyn Interceptor>) {
        let route_id = route_id.into();
        tracing::debug!(route = %route_id, "Interception gate active");
        self.active.store(Some(Arc::new(ActiveInterceptor {
            route_id,
            interceptor,
        })));
    }

    pub fn deactivate(&self) {
        if self.active.swap(None).is_some() {
            tracing::debug!("Interception gate cleared");
        }
    }

    pub fn active(&self) -> Option<Arc<ActiveInterceptor>> {
        self.active.load_full()
    }

    pub fn is_active(&self) -> bool {
        self.active.load().is_some()
    }

    pub fn state(&self) -> GateState {
        if self.is_active() {
            GateState::Active
        } else {
            GateState::None
        }
    }
}

impl fmt::Debug for InterceptionGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptionGate")
            .field("active", &self.active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Forwarding;

    #[async_trait]
    impl Interceptor for Forwarding {
        async fn on_url_changed(
            &self,
            _current: &Token,
            destination: &Token,
            callback: InterceptorCallback,
        ) {
            callback.proceed_to(destination.clone()).await;
        }
    }

    #[test]
    fn test_gate_transitions() {
        let gate = InterceptionGate::new();
        assert_eq!(gate.state(), GateState::None);

        gate.activate("editor", Arc::new(Forwarding));
        assert_eq!(gate.state(), GateState::Active);
        assert_eq!(gate.active().unwrap().route_id, "editor");

        gate.deactivate();
        assert!(!gate.is_active());
        assert!(gate.active().is_none());
    }

    #[tokio::test]
    async fn test_callback_resumes_with_target() {
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        let callback = InterceptorCallback::new(move |target: Token| async move {
            *sink.lock().unwrap() = Some(target.to_string());
        });

        Forwarding
            .on_url_changed(&Token::new("editor"), &Token::parse("home&tab=2"), callback)
            .await;

        assert_eq!(seen.lock().unwrap().as_deref(), Some("home&tab=2"));
    }

    #[tokio::test]
    async fn test_dropped_callback_never_runs() {
        let seen = Arc::new(Mutex::new(false));
        let sink = seen.clone();
        let callback = InterceptorCallback::new(move |_target: Token| async move {
            *sink.lock().unwrap() = true;
        });

        drop(callback);
        assert!(!*seen.lock().unwrap());
    }
}
