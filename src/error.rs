//! Error taxonomy for lookup operations.
//!
//! Transport-level failures are not errors here: operations absorb them and
//! report `Ok(None)`, so callers check result presence after every call.
//! Only conditions the caller caused (`InvalidInput`, `InvalidCredentials`)
//! or can act on (`NotFound`) are raised.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// Malformed caller-supplied arguments.  Never absorbed.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// The service answered but nothing matched the query, or the single
    /// candidate failed the fuzzy match gate.
    #[error("track or artist cannot be found")]
    NotFound,

    /// The credential exchange completed with an explicit error payload.
    #[error("catalog credentials were rejected")]
    InvalidCredentials,
}
