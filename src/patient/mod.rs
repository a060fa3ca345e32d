//! Patient record schema and operator input validation

pub mod record;
pub mod validation;

pub use record::{Feature, FieldKind, PatientRecord, N_FEATURES};
pub use validation::{FieldError, FieldRange, FieldRanges};
