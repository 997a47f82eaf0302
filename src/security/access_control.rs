//! Access gate.
//!
//! # Responsibilities
//! - Ask the authorization provider whether the user may see a route
//! - Turn a denial or a provider failure into a redirect to the default route
//!
//! # Design Decisions
//! - No provider configured: every route is granted (offline / local mode)
//! - Denial and failure share `redirect_target`; only the log level differs
//! - The provider can be swapped at runtime without locking dispatches

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;

use crate::error::BoxError;
use crate::observability::metrics::RedirectReason;
use crate::token::Token;

/// External authorization collaborator.
#[async_trait]
pub trait AuthorizationProvider: Send + Sync {
    async fn is_user_in_any_role(&self, token: &Token, roles: &[String]) -> Result<bool, BoxError>;

    /// Consulted for non-public routes that declare no roles.
    async fn is_user_logged_in(&self, token: &Token) -> Result<bool, BoxError> {
        self.is_user_in_any_role(token, &[]).await
    }
}

/// Outcome of an access check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Granted,
    Redirect { target: Token, reason: RedirectReason },
}

struct ProviderSlot(Arc<dyn AuthorizationProvider>);

/// Gate in front of non-public routes.
pub struct AccessGate {
    provider: ArcSwapOption<ProviderSlot>,
    default_route: String,
    next_parameter: String,
}

impl AccessGate {
    pub fn new(default_route: impl Into<String>, next_parameter: impl Into<String>) -> Self {
        Self {
            provider: ArcSwapOption::empty(),
            default_route: default_route.into(),
            next_parameter: next_parameter.into(),
        }
    }

    pub fn set_provider(&self, provider: Arc<dyn AuthorizationProvider>) {
        self.provider.store(Some(Arc::new(ProviderSlot(provider))));
    }

    pub fn clear_provider(&self) {
        self.provider.store(None);
    }

    pub fn is_configured(&self) -> bool {
        self.provider.load().is_some()
    }

    /// Check access for `token`. Empty `allowed_roles` means "any logged-in user".
    pub async fn check_access(&self, token: &Token, allowed_roles: &[String]) -> AccessDecision {
        let Some(slot) = self.provider.load_full() else {
            return AccessDecision::Granted;
        };

        let answer = if allowed_roles.is_empty() {
            slot.0.is_user_logged_in(token).await
        } else {
            slot.0.is_user_in_any_role(token, allowed_roles).await
        };

        match answer {
            Ok(true) => {
                tracing::debug!(token = %token, "Access granted");
                AccessDecision::Granted
            }
            Ok(false) => {
                tracing::warn!(token = %token, roles = ?allowed_roles, "Access denied");
                AccessDecision::Redirect {
                    target: self.redirect_target(token),
                    reason: RedirectReason::AccessDenied,
                }
            }
            Err(e) => {
                tracing::error!(token = %token, error = %e, "Authorization check failed");
                AccessDecision::Redirect {
                    target: self.redirect_target(token),
                    reason: RedirectReason::AccessFailed,
                }
            }
        }
    }

    /// Default route with the URL-encoded requested token as recovery parameter.
    pub fn redirect_target(&self, requested: &Token) -> Token {
        let serialized = requested.to_string();
        let encoded: String = url::form_urlencoded::byte_serialize(serialized.as_bytes()).collect();
        Token::new(self.default_route.as_str()).with_parameter(self.next_parameter.as_str(), encoded)
    }
}

impl fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessGate")
            .field("configured", &self.is_configured())
            .field("default_route", &self.default_route)
            .field("next_parameter", &self.next_parameter)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct RoleSet {
        roles: Vec<String>,
        logged_in: bool,
        role_calls: AtomicUsize,
    }

    impl RoleSet {
        fn new(roles: &[&str], logged_in: bool) -> Self {
            Self {
                roles: roles.iter().map(|r| r.to_string()).collect(),
                logged_in,
                role_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl AuthorizationProvider for RoleSet {
        async fn is_user_in_any_role(&self, _token: &Token, roles: &[String]) -> Result<bool, BoxError> {
            self.role_calls.fetch_add(1, Ordering::SeqCst);
            Ok(roles.iter().any(|r| self.roles.contains(r)))
        }

        async fn is_user_logged_in(&self, _token: &Token) -> Result<bool, BoxError> {
            Ok(self.logged_in)
        }
    }

    struct Unreachable;

    #[async_trait]
    impl AuthorizationProvider for Unreachable {
        async fn is_user_in_any_role(&self, _token: &Token, _roles: &[String]) -> Result<bool, BoxError> {
            Err("session service unreachable".into())
        }
    }

    fn roles(list: &[&str]) -> Vec<String> {
        list.iter().map(|r| r.to_string()).collect()
    }

    #[tokio::test]
    async fn test_no_provider_grants() {
        let gate = AccessGate::new("home", "next");
        assert!(!gate.is_configured());
        let decision = gate.check_access(&Token::new("admin"), &roles(&["admin"])).await;
        assert_eq!(decision, AccessDecision::Granted);
    }

    #[tokio::test]
    async fn test_role_match_grants() {
        let gate = AccessGate::new("home", "next");
        gate.set_provider(Arc::new(RoleSet::new(&["admin"], true)));
        let decision = gate
            .check_access(&Token::new("admin"), &roles(&["editor", "admin"]))
            .await;
        assert_eq!(decision, AccessDecision::Granted);
    }

    #[tokio::test]
    async fn test_denial_redirects_with_next() {
        let gate = AccessGate::new("home", "next");
        gate.set_provider(Arc::new(RoleSet::new(&["viewer"], true)));

        let requested = Token::parse("admin&tab=users");
        let decision = gate.check_access(&requested, &roles(&["admin"])).await;

        let AccessDecision::Redirect { target, reason } = decision else {
            panic!("expected redirect");
        };
        assert_eq!(reason, RedirectReason::AccessDenied);
        assert_eq!(target.id(), "home");
        assert_eq!(target.parameter("next"), Some("admin%26tab%3Dusers"));
        assert_eq!(target.to_string(), "home&next=admin%26tab%3Dusers");
    }

    #[tokio::test]
    async fn test_failure_uses_same_target() {
        let gate = AccessGate::new("home", "next");
        gate.set_provider(Arc::new(Unreachable));

        let requested = Token::parse("admin&tab=users");
        let decision = gate.check_access(&requested, &roles(&["admin"])).await;

        assert_eq!(
            decision,
            AccessDecision::Redirect {
                target: gate.redirect_target(&requested),
                reason: RedirectReason::AccessFailed,
            }
        );
    }

    #[tokio::test]
    async fn test_empty_roles_check_logged_in() {
        let gate = AccessGate::new("home", "next");
        let provider = Arc::new(RoleSet::new(&[], false));
        gate.set_provider(provider.clone());

        let decision = gate.check_access(&Token::new("profile"), &[]).await;

        assert!(matches!(decision, AccessDecision::Redirect { .. }));
        assert_eq!(provider.role_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_default_logged_in_delegates_to_roles() {
        let gate = AccessGate::new("home", "next");
        gate.set_provider(Arc::new(Unreachable));
        let decision = gate.check_access(&Token::new("profile"), &[]).await;
        assert!(matches!(
            decision,
            AccessDecision::Redirect { reason: RedirectReason::AccessFailed, .. }
        ));

        gate.clear_provider();
        assert_eq!(gate.check_access(&Token::new("profile"), &[]).await, AccessDecision::Granted);
    }

    #[test]
    fn test_custom_next_parameter() {
        let gate = AccessGate::new("login", "return_to");
        let target = gate.redirect_target(&Token::parse("reports&from=2024 01"));
        // The requested token serializes as `reports&from='2024 01'`.
        assert_eq!(target.parameter("return_to"), Some("reports%26from%3D%272024+01%27"));
    }
}
