//! Unit test suite for flatlock
//!
//! Exercises individual public components through the crate API.
//!
//! ```bash
//! cargo test --test unit
//! ```

mod integrity_tests;
mod tree_tests;
