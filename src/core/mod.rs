//! Core types and error handling for flatlock.
//!
//! - [`error`] - [`FlatlockError`] and the user-facing [`ErrorContext`] reporting layer

pub mod error;

pub use error::{ErrorContext, FlatlockError, user_friendly_error};
