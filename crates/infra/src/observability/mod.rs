//! Tracing subscriber setup

mod tracing_init;

pub use tracing_init::{build_filter, init_tracing};
