//! Input/output helpers.
//!
//! - observations CSV export (`export`) and ingest (`ingest`)
//! - summary JSON read/write (`summary`)

pub mod export;
pub mod ingest;
pub mod summary;

pub use export::*;
pub use ingest::*;
pub use summary::*;
