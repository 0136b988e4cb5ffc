//! Crate-wide error type.
//!
//! The inversion math in this crate is meant to be total: every public
//! function either returns a definite answer or a definite "no solution
//! in this search space" result. [`CoreError`] exists for the one
//! remaining failure mode — an internal invariant caught by a debug
//! assertion or a sanity check — which is always a bug in this crate,
//! never a property of the caller's input.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, CoreError>;

/// Errors surfaced by this crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An internal bijection or invariant did not hold. This indicates a
    /// bug in this crate, not a property of the caller's input — treat it
    /// as fatal rather than retrying.
    #[error("internal invariant violated: {0}")]
    InvariantViolation(&'static str),
}
