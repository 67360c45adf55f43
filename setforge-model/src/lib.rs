//! Data model for compiled pokeset databases.
//!
//! This crate defines the types shared across the compile pipeline: the
//! populated record, its identifying key, and the diagnostic type used for
//! anomaly reporting. Consumers can use these types directly for
//! serialization or display without pulling in any I/O dependencies.

pub mod diagnostic;
pub mod types;

pub use diagnostic::{Diagnostic, Severity};
pub use types::{Gender, Pokeset, SetId, Species, gender_label};
