/// Meridian Connector Core
///
/// Pure domain layer for the Meridian MCP connector:
/// - typed operation inputs for user, tag, order and leads management
/// - the table-driven operation registry (name, upstream path, payload builder)
/// - the error taxonomy and the response envelope every caller receives
///
/// No I/O happens in this crate; the HTTP adapter lives in meridian-client.

pub mod envelope;
pub mod error;
pub mod leads;
pub mod order;
pub mod registry;
pub mod tag;
pub mod user;

pub use envelope::{Envelope, EnvelopeError, Status};
pub use error::AdapterError;
pub use registry::{Method, Operation, Payload, REGISTRY};
