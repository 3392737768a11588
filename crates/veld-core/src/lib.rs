//! Veld Core
//!
//! This crate contains the shared, engine-agnostic utilities for the Veld
//! engine: math types, geometry primitives, optimized collections, logging
//! and profiling setup.

pub mod alloc;
pub mod geometry;
pub mod logging;
pub mod math;
pub mod profiling;
