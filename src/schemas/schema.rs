use schemars::{
    gen::SchemaSettings,
    schema::{ObjectValidation, RootSchema, Schema, SchemaObject},
    JsonSchema,
};
use crate::error::{GenerationError, Result};
use jsonschema::{Draft, JSONSchema};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::{
    any::TypeId,
    fmt,
    sync::{Arc, OnceLock},
};

/// Keys some providers reject inside a tool's `parameters` object.
const NON_PORTABLE_KEYS: [&str; 2] = ["$schema", "definitions"];

/// Cached JSON schema handle associated with a completion type.
#[derive(Clone, Debug)]
pub struct SchemaHandle {
    schema_name: &'static str,
    type_name: &'static str,
    description: Option<&'static str>,
    type_id: TypeId,
    schema_json: Arc<Value>,
    validator: CompiledValidator,
}

/// Draft 7 validator compiled on first use and shared by clones of a handle.
#[derive(Clone, Default)]
struct CompiledValidator(Arc<OnceLock<JSONSchema>>);

impl fmt::Debug for CompiledValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledValidator")
            .field("compiled", &self.0.get().is_some())
            .finish()
    }
}

impl SchemaHandle {
    pub fn from_root_schema<T: 'static>(
        schema_name: &'static str,
        type_name: &'static str,
        description: Option<&'static str>,
        root: RootSchema,
    ) -> Self {
        let mut schema_json = serde_json::to_value(root)
            .unwrap_or_else(|err| panic!("failed to serialize schema for {}: {}", type_name, err));

        if let Some(object) = schema_json.as_object_mut() {
            for key in NON_PORTABLE_KEYS {
                object.remove(key);
            }
        }

        Self {
            schema_name,
            type_name,
            description,
            type_id: TypeId::of::<T>(),
            schema_json: Arc::new(schema_json),
            validator: CompiledValidator::default(),
        }
    }

    /// Name of the schema, also used as the forced tool's function name.
    pub fn schema_name(&self) -> &'static str {
        self.schema_name
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn description(&self) -> Option<&'static str> {
        self.description
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn schema_json(&self) -> &Value {
        self.schema_json.as_ref()
    }

    /// Flat JSON Schema suitable for a tool's `parameters`: subschemas are
    /// inlined and there is no `$ref` wrapper or `definitions` table.
    pub fn to_json_schema(&self) -> Value {
        self.schema_json.as_ref().clone()
    }

    pub fn is_for<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Compiled Draft 7 validator for this schema, built once per handle.
    pub fn validator(&self) -> Result<&JSONSchema> {
        if let Some(validator) = self.validator.0.get() {
            return Ok(validator);
        }

        let compiled = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(self.schema_json())
            .map_err(|err| {
                GenerationError::Config(format!(
                    "Failed to prepare `{}` schema for validation: {}",
                    self.schema_name, err
                ))
            })?;

        Ok(self.validator.0.get_or_init(|| compiled))
    }
}

pub trait CompletionSchema: DeserializeOwned + Send + Sync + 'static {
    fn schema() -> &'static SchemaHandle;
}

/// Draft 7 root schema for `T` with every subschema inlined.
pub fn inline_root_schema_for<T: JsonSchema>() -> RootSchema {
    SchemaSettings::draft07()
        .with(|settings| settings.inline_subschemas = true)
        .into_generator()
        .into_root_schema_for::<T>()
}

/// Apply doc comments captured by the procedural macro to the generated schema metadata.
pub fn apply_doc_comments(
    root: &mut RootSchema,
    title: &'static str,
    description: Option<&'static str>,
    field_docs: &[(&'static str, &'static str)],
) {
    let schema_object = &mut root.schema;
    apply_struct_metadata(schema_object, title, description);

    if let Some(object_validation) = schema_object.object.as_mut() {
        apply_field_metadata(object_validation.as_mut(), field_docs);
    }
}

fn apply_struct_metadata(
    schema_object: &mut SchemaObject,
    title: &'static str,
    description: Option<&'static str>,
) {
    let metadata = schema_object.metadata();
    metadata.title = Some(title.to_string());

    if let Some(description) = description {
        if metadata.description.is_none() {
            metadata.description = Some(description.to_string());
        }
    }
}

fn apply_field_metadata(
    object_validation: &mut ObjectValidation,
    field_docs: &[(&'static str, &'static str)],
) {
    for (field, doc) in field_docs {
        if let Some(Schema::Object(field_object)) = object_validation.properties.get_mut(*field) {
            let metadata = field_object.metadata();
            if metadata.description.is_none() {
                metadata.description = Some((*doc).to_string());
            }
        }
    }
}
