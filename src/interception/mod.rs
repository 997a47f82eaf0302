//! Interception subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatch while gate ACTIVE:
//!     → history rolled back to the current token (no dispatch)
//!     → Interceptor::on_url_changed(current, destination, callback)
//!     → callback.proceed_to(target): history replace + dispatch that skips the gate
//!     → callback dropped: navigation cancelled, current token unchanged
//!
//! Placement of a route:
//!     → route declares an interceptor: gate ACTIVE with that instance
//!     → otherwise: gate NONE
//! ```

pub mod gate;
pub mod registry;

pub use gate::{ActiveInterceptor, GateState, InterceptionGate, Interceptor, InterceptorCallback};
pub use registry::{InterceptorFactory, InterceptorRegistry};
