//! Bundled type registry describing a Swagger `definitions` section.
//!
//! Used to check a fetched document before it is handed to the model
//! generator. Wire names follow the Swagger spelling (`$ref`,
//! `additionalProperties`, ...); internal names are snake_case.

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::descriptor::FieldDescriptor;
use crate::error::{RegistryError, ShapeMismatch};
use crate::registry::TypeRegistry;
use crate::transform::Transformer;
use crate::value::MappedValue;

pub const DEFINITIONS: &str = "SwaggerDefinitions";
pub const SCHEMA: &str = "Schema";
pub const SCHEMA_TYPE: &str = "SchemaType";

static REGISTRY: Lazy<TypeRegistry> = Lazy::new(|| {
    build_registry().expect("bundled definitions registry should be well-formed")
});

/// The process-wide bundled registry.
pub fn registry() -> &'static TypeRegistry {
    &REGISTRY
}

fn build_registry() -> Result<TypeRegistry, RegistryError> {
    use crate::descriptor::TypeDescriptor as T;

    let schema = || T::reference(SCHEMA);
    let optional_string = || T::optional(T::string());
    let optional_bool = || T::optional(T::boolean());
    let optional_number = || T::optional(T::number());

    TypeRegistry::builder()
        .define(DEFINITIONS, T::map(schema()))
        .define(
            SCHEMA,
            T::object(
                vec![
                    FieldDescriptor::new("$ref", "ref_path", optional_string()),
                    FieldDescriptor::same(
                        "type",
                        T::optional(T::union([
                            T::reference(SCHEMA_TYPE),
                            T::array(T::reference(SCHEMA_TYPE)),
                        ])),
                    ),
                    FieldDescriptor::same("format", optional_string()),
                    FieldDescriptor::same("title", optional_string()),
                    FieldDescriptor::same("description", optional_string()),
                    FieldDescriptor::same("required", T::optional(T::array(T::string()))),
                    FieldDescriptor::same("properties", T::optional(T::map(schema()))),
                    FieldDescriptor::same("items", T::optional(schema())),
                    FieldDescriptor::new(
                        "additionalProperties",
                        "additional_properties",
                        T::optional(T::union([T::boolean(), schema()])),
                    ),
                    FieldDescriptor::new("enum", "enum_values", T::optional(T::array(T::any()))),
                    FieldDescriptor::new("allOf", "all_of", T::optional(T::array(schema()))),
                    FieldDescriptor::new("x-nullable", "x_nullable", optional_bool()),
                    FieldDescriptor::same("nullable", optional_bool()),
                    FieldDescriptor::new("readOnly", "read_only", optional_bool()),
                    FieldDescriptor::new("uniqueItems", "unique_items", optional_bool()),
                    FieldDescriptor::same("pattern", optional_string()),
                    FieldDescriptor::same("minimum", optional_number()),
                    FieldDescriptor::same("maximum", optional_number()),
                    FieldDescriptor::new("minLength", "min_length", optional_number()),
                    FieldDescriptor::new("maxLength", "max_length", optional_number()),
                    FieldDescriptor::same("default", T::any()),
                    FieldDescriptor::same("example", T::any()),
                ],
                T::any(),
            ),
        )
        .define(
            SCHEMA_TYPE,
            T::enumeration([
                "string", "number", "integer", "boolean", "array", "object", "null", "file",
            ]),
        )
        .build()
}

/// Check and decode a `definitions` object.
pub fn to_definitions(json: &Value) -> Result<MappedValue, ShapeMismatch> {
    Transformer::new(registry()).cast(json, DEFINITIONS)
}

/// Encode decoded definitions back to Swagger JSON.
pub fn definitions_to_json(value: &MappedValue) -> Result<Value, ShapeMismatch> {
    Transformer::new(registry()).uncast(value, DEFINITIONS)
}

pub fn to_schema(json: &Value) -> Result<MappedValue, ShapeMismatch> {
    Transformer::new(registry()).cast(json, SCHEMA)
}

pub fn schema_to_json(value: &MappedValue) -> Result<Value, ShapeMismatch> {
    Transformer::new(registry()).uncast(value, SCHEMA)
}
