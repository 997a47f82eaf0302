//! Collaborator contracts for views, containers, presenters and the root panel.
//!
//! The engine never renders anything. It hands opaque view handles to these
//! traits, which the host implements on top of its UI toolkit.

use std::fmt;
use std::sync::Arc;

use crate::error::BoxError;
use crate::interception::gate::Interceptor;
use crate::token::Token;

/// Opaque, shareable view handle. Identity is `Arc::ptr_eq`.
pub type ViewHandle = Arc<dyn View>;

/// A toolkit view produced by a presenter.
pub trait View: Send + Sync + fmt::Debug {
    /// Views that host other views (containers) expose themselves here.
    fn as_container(&self) -> Option<&dyn HasViews> {
        None
    }

    /// Views bound with [`InterceptorBinding::View`](crate::routing::InterceptorBinding::View)
    /// expose themselves here.
    fn as_interceptor(self: Arc<Self>) -> Option<Arc<dyn Interceptor>> {
        None
    }
}

/// A container able to lay out a route view (tab switch, panel swap).
pub trait HasViews: Send + Sync {
    fn show_view(&self, token: &Token, view: ViewHandle) -> Result<(), BoxError>;
}

/// The top-level panel the engine places containers or views into.
pub trait RootPanel: Send + Sync {
    fn clear(&self);

    fn add(&self, view: ViewHandle);

    /// Whether the view is currently attached to this root.
    fn is_attached(&self, view: &ViewHandle) -> bool;
}

/// Creates views for one route or container.
pub trait Presenter: Send + Sync {
    fn create_view(&self, token: &Token) -> Result<ViewHandle, BoxError>;

    /// Presenters bound with [`InterceptorBinding::Presenter`](crate::routing::InterceptorBinding::Presenter)
    /// expose themselves here.
    fn as_interceptor(self: Arc<Self>) -> Option<Arc<dyn Interceptor>> {
        None
    }
}

/// Presenter backed by a closure.
pub struct FnPresenter<F> {
    name: String,
    func: F,
}

impl<F> FnPresenter<F>
where
    F: Fn(&Token) -> Result<ViewHandle, BoxError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<F> Presenter for FnPresenter<F>
where
    F: Fn(&Token) -> Result<ViewHandle, BoxError> + Send + Sync,
{
    fn create_view(&self, token: &Token) -> Result<ViewHandle, BoxError> {
        (self.func)(token)
    }
}

impl<F> fmt::Debug for FnPresenter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPresenter").field("name", &self.name).finish()
    }
}
