//! Request middleware.
//!
//! Purpose: wrap every request with correlation and failure containment.
//! Register [`RecoverPanic`] before [`Trace`] so the trace layer sits
//! outermost and tags recovered responses too.

pub mod recover;
pub mod trace;

pub use recover::{Fault, RecoverPanic, RecoverPanicMiddleware};
pub use trace::{Trace, TraceMiddleware};
