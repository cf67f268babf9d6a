//! Shared helpers: test logging bootstrap.

pub mod testing;
