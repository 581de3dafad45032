//! Common utilities shared across Calendar Copilot crates.
//!
//! Currently this is the clock abstraction that lets token caches and
//! prompt builders run against a deterministic time source in tests.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod time;

pub use time::{Clock, MockClock, SystemClock};
