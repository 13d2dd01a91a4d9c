// Application layer - use cases on top of the repository.
// `service` gates access and validates writes; `reporting` holds the pure
// aggregation functions the dashboard is built from.

pub mod error;
pub mod reporting;
pub mod service;

pub use error::*;
pub use reporting::*;
pub use service::*;
