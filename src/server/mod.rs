//! Server module for building the relay HTTP server
//!
//! This module provides a `ServerBuilder` that registers:
//! - The upload and save relay routes
//! - Health check routes

pub mod builder;
pub mod router;

pub use builder::ServerBuilder;
