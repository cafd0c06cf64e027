#![deny(missing_docs)]
#![doc = "Core error and provenance types for S2M replicate statistics."]

pub mod errors;
pub mod provenance;

pub use errors::{ErrorInfo, S2mError};
pub use provenance::{RunProvenance, SchemaVersion};
