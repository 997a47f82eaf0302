//! Per-engine navigation state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::interception::InterceptionGate;
use crate::token::Token;

/// Committed token, commit generation and interception gate of one engine.
#[derive(Debug, Default)]
pub struct NavigationSession {
    current: ArcSwap<Token>,
    generation: AtomicU64,
    interception: InterceptionGate,
}

impl NavigationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit `token` as current and return the new generation.
    pub fn commit(&self, token: Token) -> u64 {
        self.current.store(Arc::new(token));
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current_token(&self) -> Token {
        self.current.load().as_ref().clone()
    }

    /// Number of commits so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Whether `generation` is still the latest commit.
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation() == generation
    }

    pub fn interception(&self) -> &InterceptionGate {
        &self.interception
    }
}
