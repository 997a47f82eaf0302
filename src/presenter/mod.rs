//! Presenter subsystem.
//!
//! # Data Flow
//! ```text
//! (route or container id, cache policy, token)
//!     → cache.rs (policy check against the memoized entry)
//!     → hit: memoized ViewHandle
//!     → miss: Presenter::create_view(token) → store → ViewHandle
//! ```
//!
//! # Design Decisions
//! - Views are opaque `Arc<dyn View>` handles; identity is pointer identity
//! - Presenters are registered explicitly per route/container by the host
//! - Containers and interceptors are discovered through capability methods on `View`

pub mod cache;
pub mod view;

pub use cache::{CacheKey, PresenterCache, PresenterError};
pub use view::{FnPresenter, HasViews, Presenter, RootPanel, View, ViewHandle};
