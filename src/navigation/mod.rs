//! Navigation subsystem.
//!
//! # Data Flow
//! ```text
//! History change / navigate_to
//!     → engine.rs (dispatch pipeline, one tracing span per dispatch)
//!     → session.rs (committed token, commit generation, interception gate)
//!     → history.rs (non-triggering rewrites and rollbacks)
//! ```
//!
//! # Design Decisions
//! - One session per engine; independent engines share nothing
//! - History writes never trigger a dispatch; only the host's change events do

pub mod engine;
pub mod history;
pub mod session;

pub use engine::{EngineSettings, NavigationEngine, NavigationEngineBuilder};
pub use history::{History, MemoryHistory};
pub use session::NavigationSession;
