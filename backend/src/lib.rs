//! ShareIt backend library: domain model, HTTP adapter, and repository
//! adapters for the peer-to-peer item sharing service.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::{TRACE_ID_HEADER, TraceId};
pub use middleware::Trace;
