//! Data model types for disorder.
//!
//! - Records (declared field lists and their cached metadata)
//! - Capabilities (enums by name, self-marshaling types)
//! - Timestamps
//! - Generic values (dynamic decode results)

pub mod capability;
pub mod record;
pub mod timestamp;
pub mod value;

pub use capability::{Enum, Marshal};
pub use record::{FieldDescriptor, FieldSet, Record, RecordInfo};
pub use timestamp::Timestamp;
pub use value::Value;
