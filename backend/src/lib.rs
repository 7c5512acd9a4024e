//! Greenlight backend library.
//!
//! The crate is laid out hexagonally: [`domain`] holds entities, ports and
//! the error taxonomy, [`inbound`] adapts HTTP onto the ports, [`outbound`]
//! implements them, and [`middleware`] wraps every request with correlation
//! and panic containment. [`server`] wires it together.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::{RecoverPanic, Trace};
