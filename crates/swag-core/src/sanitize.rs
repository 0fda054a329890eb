use serde_json::{Map, Value};

/// The only top-level section handed to the model generator.
pub const DEFINITIONS_KEY: &str = "definitions";

/// Reduce a Swagger document to the contents of its `definitions` section.
///
/// Every other top-level key (paths, info, security, ...) is dropped. A
/// document without definitions, or one that is not an object at all,
/// yields an empty object.
pub fn sanitize(document: &Value) -> Value {
    document
        .as_object()
        .and_then(|root| root.get(DEFINITIONS_KEY))
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()))
}

/// Like [`sanitize`], but takes ownership to avoid cloning large documents.
pub fn into_definitions(document: Value) -> Value {
    match document {
        Value::Object(mut root) => root
            .remove(DEFINITIONS_KEY)
            .unwrap_or_else(|| Value::Object(Map::new())),
        _ => Value::Object(Map::new()),
    }
}
