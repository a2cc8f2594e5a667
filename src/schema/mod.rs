pub mod forms;
pub mod responses;

pub use forms::{Contact, ContactOnlyForm, SubmissionForm};
pub use responses::{FieldSchema, SchemaReport};
