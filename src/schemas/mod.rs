mod schema;
pub mod validation;

pub use schema::{apply_doc_comments, inline_root_schema_for, CompletionSchema, SchemaHandle};
pub use validation::{collect_schema_issues, validate};
