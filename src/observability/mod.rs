//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (structured fields: token, route, container)
//!     → metrics.rs (dispatch, redirect and cache counters)
//!
//! Each dispatch runs in a `dispatch` span carrying a UUID v4 `dispatch_id`,
//! so redirects and resumed interceptions share one correlation id.
//!
//! Consumers:
//!     → logging.rs (subscriber installed by the host binary)
//!     → any `metrics` recorder the host installs
//! ```

pub mod logging;
pub mod metrics;
