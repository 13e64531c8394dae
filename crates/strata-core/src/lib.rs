//! Strata Core
//!
//! Shared utilities for the Strata UI toolkit: generational storage,
//! hash collections, geometry, logging, profiling and configuration.

pub mod alloc;
pub mod config;
pub mod geometry;
pub mod logging;
pub mod math;
pub mod profiling;
