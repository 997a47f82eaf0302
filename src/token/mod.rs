//! URL-history token subsystem.
//!
//! # Data Flow
//! ```text
//! raw history fragment ("orders&page=2&filter='a&b'")
//!     → codec.rs (single-pass state machine)
//!     → Token { id, ordered parameters }
//!     → codec.rs serialize (canonical string, quoting where needed)
//! ```
//!
//! # Design Decisions
//! - Parsing is total: every input, including an absent one, yields a Token
//! - Equality and hashing use the canonical serialized form
//! - Parameter order is insertion order; overwriting keeps the original slot
//! - No escape syntax for `'` inside quoted values (grammar limitation)

pub mod codec;
pub mod types;

pub use codec::{parse, parse_opt, serialize, DefaultTokenFactory, TokenFactory};
pub use types::Token;
