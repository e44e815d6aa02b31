//! strata-middleware
//!
//! Decorators layered over a [`LocalStore`](strata_core::LocalStore).
//!
//! - [`ConcurrentStore`]: fire-and-forget batch persistence with an observable
//!   pending count, drain helpers, and a channel of failed batches.
#![warn(missing_docs)]

mod concurrent;

pub use crate::concurrent::{ConcurrentStore, FailureReceiver};
