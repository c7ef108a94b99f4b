//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Data Model
//! - `Envelope`: one versioned unit of routed binary data (route + opaque payload)
//! - `RouteFilter`: a sink's configured route set (wildcard or exact names)
//! - `StreamSink`: the capability interface every sink variant implements

mod config;
mod envelope;
mod error;
mod route;
mod sink;

pub use config::*;
pub use envelope::*;
pub use error::*;
pub use route::RouteFilter;
pub use sink::StreamSink;
