use crate::{
    error::{GenerationError, Result, ValidationIssue},
    schemas::{CompletionSchema, SchemaHandle},
};
use serde_json::Value;
use tracing::debug;

/// Collect every structural problem `document` has against `schema`.
///
/// An empty list means the document conforms. Only a schema that fails to
/// compile is an error.
pub fn collect_schema_issues(
    schema: &SchemaHandle,
    document: &Value,
) -> Result<Vec<ValidationIssue>> {
    let validator = schema.validator()?;

    let issues = match validator.validate(document) {
        Ok(()) => Vec::new(),
        Err(errors) => errors
            .map(|error| ValidationIssue::new(error.instance_path.to_string(), error.to_string()))
            .collect(),
    };

    Ok(issues)
}

/// Validate a repaired document and convert it into `T`.
///
/// JSON Schema validation runs first so callers get the full issue list;
/// typed deserialization then catches anything the schema cannot express.
pub fn validate<T: CompletionSchema>(schema: &SchemaHandle, document: Value) -> Result<T> {
    if !schema.is_for::<T>() {
        return Err(GenerationError::Config(format!(
            "schema `{}` does not match target type `{}`",
            schema.schema_name(),
            std::any::type_name::<T>(),
        )));
    }

    let issues = collect_schema_issues(schema, &document)?;
    if !issues.is_empty() {
        debug!(
            target: "tripgen::schema",
            schema = schema.schema_name(),
            issues = issues.len(),
            payload = %document
        );
        return Err(GenerationError::SchemaValidation {
            schema: schema.schema_name().to_string(),
            issues,
        });
    }

    serde_path_to_error::deserialize(document).map_err(|err| {
        let path = err.path().to_string();
        let path = if path == "." { String::new() } else { path };
        GenerationError::SchemaValidation {
            schema: schema.schema_name().to_string(),
            issues: vec![ValidationIssue::new(path, err.inner().to_string())],
        }
    })
}
