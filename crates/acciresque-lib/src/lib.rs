//! Acciresque library entry points.
//!
//! This crate holds everything the accident proxy does apart from HTTP
//! serving: the accident data model and its canonical transform, the
//! [`AccidentStore`] abstraction with HTTP and in-memory backends, and the
//! five operations built on top of it. The service crates should only
//! depend on what is exported here.

#![deny(warnings)]

pub mod accidents;
pub mod config;
pub mod context;
pub mod error;
pub mod model;
pub mod store;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_helpers;

pub use accidents::{
    create_accident, delete_accident, get_accident, list_accidents, update_accident,
    validate_accident_id, validate_input,
};
pub use config::{Credentials, StoreConfig};
pub use context::{AccessTier, CallContext, Operation};
pub use error::{Error, Result};
pub use model::{
    Accident, AccidentDocument, Ambulance, Contact, CreatedAccident, Hospital, Insurance,
    MedicalRecord, MissingSubRecord, Police, Scalar, Vehicle, WriteOutcome,
};
pub use store::{AccidentStore, HttpAccidentStore, MemoryAccidentStore};
