//! Observability infrastructure for TurboFeed.
//!
//! This crate provides:
//! - `RequestId` - Unique identifier correlating the log lines of one feed request
//! - `StructuredLogger` - Structured logging with request context
//! - `TimingContext` - Named timing marks for pipeline stages

mod logging;
mod request;
mod timing;

pub use logging::*;
pub use request::*;
pub use timing::*;
