//! Pluggable extension contracts kept outside the core verification protocol.
//!
//! The introspection client itself is deliberately cache-agnostic; the gate
//! consults these extensions around the exchange so downstream services can
//! bring their own backends without expanding the core surface.

pub mod cache;

pub use cache::*;
