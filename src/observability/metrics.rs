//! Navigation metrics.
//!
//! # Metrics
//! - `navigator_dispatch_total` (counter): dispatch outcomes by `outcome`
//! - `navigator_redirect_total` (counter): engine-issued redirects by `reason`
//! - `navigator_presenter_cache_total` (counter): cache lookups by `namespace`, `result`
//!
//! # Design Decisions
//! - Facade only: the host installs an exporter if it wants one
//! - Label values are closed enums so cardinality stays fixed

use std::fmt;

/// Terminal state of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Placed,
    Intercepted,
    Redirected,
    Failed,
    Superseded,
    RedirectLimit,
}

impl DispatchOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchOutcome::Placed => "placed",
            DispatchOutcome::Intercepted => "intercepted",
            DispatchOutcome::Redirected => "redirected",
            DispatchOutcome::Failed => "failed",
            DispatchOutcome::Superseded => "superseded",
            DispatchOutcome::RedirectLimit => "redirect_limit",
        }
    }
}

impl fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the engine rewrote the requested token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    NotFound,
    DefaultFallback,
    AccessDenied,
    AccessFailed,
}

impl RedirectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedirectReason::NotFound => "not_found",
            RedirectReason::DefaultFallback => "default_fallback",
            RedirectReason::AccessDenied => "access_denied",
            RedirectReason::AccessFailed => "access_failed",
        }
    }
}

impl fmt::Display for RedirectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn record_dispatch(outcome: DispatchOutcome) {
    metrics::counter!("navigator_dispatch_total", "outcome" => outcome.as_str()).increment(1);
}

pub fn record_redirect(reason: RedirectReason) {
    metrics::counter!("navigator_redirect_total", "reason" => reason.as_str()).increment(1);
}

pub fn record_cache_lookup(namespace: &'static str, hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    metrics::counter!(
        "navigator_presenter_cache_total",
        "namespace" => namespace,
        "result" => result
    )
    .increment(1);
}
