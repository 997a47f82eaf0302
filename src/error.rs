//! Error types shared across subsystems.

use thiserror::Error;

use crate::presenter::cache::PresenterError;

/// Failure reported by an external collaborator (presenter, container, authorization provider).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Per-dispatch failure. Logged and swallowed by the engine; the UI keeps its prior state.
#[derive(Debug, Error)]
pub enum NavigationError {
    /// Dispatch arrived before `start` supplied a root panel.
    #[error("navigation engine has not been started")]
    NotStarted,

    #[error("no presenter registered for '{0}'")]
    NoPresenter(String),

    #[error(transparent)]
    Presenter(#[from] PresenterError),

    /// A container presenter produced a view that cannot host other views.
    #[error("view produced for container '{0}' does not host views")]
    NotAContainer(String),

    /// The container refused to show the view.
    #[error("container '{container}' failed to show route '{route}': {source}")]
    Placement {
        route: String,
        container: String,
        #[source]
        source: BoxError,
    },
}

/// Startup failure. The engine refuses to start.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("route '{0}' has no registered presenter")]
    MissingPresenter(String),

    #[error("container '{0}' has no registered presenter")]
    MissingContainerPresenter(String),

    #[error("route '{route}' uses unknown interceptor '{interceptor}'")]
    UnknownInterceptor { route: String, interceptor: String },

    #[error("navigation engine already started")]
    AlreadyStarted,
}
