//! Compile a Swagger `definitions` section into a [`TypeRegistry`].
//!
//! Each definition becomes one registry entry under its own name, so
//! `$ref: "#/definitions/Pet"` compiles to a reference to `Pet`.
//! Properties listed in `required` compile to bare descriptors; all other
//! properties are wrapped as optional.

use std::collections::HashSet;
use std::str::FromStr;

use heck::{ToLowerCamelCase, ToSnakeCase};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::descriptor::{FieldDescriptor, TypeDescriptor};
use crate::error::CompileError;
use crate::registry::TypeRegistry;

const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// How internal field names are derived from wire names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingStyle {
    #[default]
    Preserve,
    SnakeCase,
    CamelCase,
}

impl NamingStyle {
    pub fn apply(&self, wire: &str) -> String {
        match self {
            NamingStyle::Preserve => wire.to_string(),
            NamingStyle::SnakeCase => wire.to_snake_case(),
            NamingStyle::CamelCase => wire.to_lower_camel_case(),
        }
    }
}

impl FromStr for NamingStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "preserve" => Ok(NamingStyle::Preserve),
            "snake_case" => Ok(NamingStyle::SnakeCase),
            "camel_case" => Ok(NamingStyle::CamelCase),
            other => Err(format!(
                "unknown naming style `{other}` (expected preserve, snake_case or camel_case)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CompileOptions {
    pub naming: NamingStyle,
}

/// Compile the object found under a Swagger document's `definitions` key.
pub fn compile_definitions(
    definitions: &Value,
    options: &CompileOptions,
) -> Result<TypeRegistry, CompileError> {
    let Some(defs) = definitions.as_object() else {
        return Err(CompileError::InvalidDefinition {
            name: "definitions".to_string(),
            reason: "expected an object".to_string(),
        });
    };
    let compiler = Compiler { defs, options };
    let mut builder = TypeRegistry::builder();
    for (name, schema) in defs {
        let ty = compiler.compile(name, schema)?;
        log::debug!("compiled definition {name}: {ty}");
        builder.insert(name.clone(), ty);
    }
    Ok(builder.build()?)
}

struct Compiler<'a> {
    defs: &'a Map<String, Value>,
    options: &'a CompileOptions,
}

impl Compiler<'_> {
    fn compile(&self, owner: &str, schema: &Value) -> Result<TypeDescriptor, CompileError> {
        let obj = match schema {
            Value::Object(obj) => obj,
            Value::Bool(true) => return Ok(TypeDescriptor::any()),
            Value::Bool(false) => return Ok(TypeDescriptor::Invalid),
            _ => return Err(invalid(owner, "schema must be an object")),
        };

        if let Some(reference) = obj.get("$ref") {
            return ref_target(reference).map(TypeDescriptor::reference);
        }

        let base = self.compile_base(owner, obj)?;
        let nullable = ["x-nullable", "nullable"]
            .iter()
            .any(|key| obj.get(*key).and_then(Value::as_bool).unwrap_or(false));
        if nullable {
            Ok(TypeDescriptor::union([TypeDescriptor::Null, base]))
        } else {
            Ok(base)
        }
    }

    fn compile_base(
        &self,
        owner: &str,
        obj: &Map<String, Value>,
    ) -> Result<TypeDescriptor, CompileError> {
        if let Some(cases) = obj.get("enum") {
            let Some(cases) = cases.as_array() else {
                return Err(invalid(owner, "`enum` must be an array"));
            };
            return Ok(TypeDescriptor::Enum(cases.clone()));
        }

        for key in ["oneOf", "anyOf"] {
            if let Some(variants) = obj.get(key) {
                let Some(variants) = variants.as_array() else {
                    return Err(invalid(owner, &format!("`{key}` must be an array")));
                };
                let alternatives = variants
                    .iter()
                    .map(|v| self.compile(owner, v))
                    .collect::<Result<Vec<_>, _>>()?;
                return Ok(TypeDescriptor::Union(alternatives));
            }
        }

        if obj.contains_key("allOf") {
            return self.compile_all_of(owner, obj);
        }

        match obj.get("type") {
            Some(Value::String(t)) => self.compile_type(owner, t, obj),
            Some(Value::Array(types)) => {
                let alternatives = types
                    .iter()
                    .map(|t| match t.as_str() {
                        Some(t) => self.compile_type(owner, t, obj),
                        None => Err(invalid(owner, "`type` entries must be strings")),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(TypeDescriptor::Union(alternatives))
            }
            Some(_) => Err(invalid(owner, "`type` must be a string")),
            None if obj.contains_key("properties") => self.compile_object(owner, obj),
            None if obj.contains_key("items") => self.compile_type(owner, "array", obj),
            None => Ok(TypeDescriptor::any()),
        }
    }

    fn compile_type(
        &self,
        owner: &str,
        schema_type: &str,
        obj: &Map<String, Value>,
    ) -> Result<TypeDescriptor, CompileError> {
        match schema_type {
            "string" => match obj.get("format").and_then(Value::as_str) {
                Some("date-time" | "date") => Ok(TypeDescriptor::Date),
                _ => Ok(TypeDescriptor::string()),
            },
            "integer" | "number" => Ok(TypeDescriptor::number()),
            "boolean" => Ok(TypeDescriptor::boolean()),
            "null" => Ok(TypeDescriptor::Null),
            "file" => Ok(TypeDescriptor::any()),
            "array" => match obj.get("items") {
                Some(items) => Ok(TypeDescriptor::array(self.compile(owner, items)?)),
                None => Ok(TypeDescriptor::array(TypeDescriptor::any())),
            },
            "object" => self.compile_object(owner, obj),
            other => Err(invalid(owner, &format!("unknown type `{other}`"))),
        }
    }

    fn compile_object(
        &self,
        owner: &str,
        obj: &Map<String, Value>,
    ) -> Result<TypeDescriptor, CompileError> {
        let fields = self.compile_fields(owner, obj)?;
        let additional = match obj.get("additionalProperties") {
            None | Some(Value::Bool(true)) => TypeDescriptor::any(),
            Some(other) => self.compile(owner, other)?,
        };
        Ok(TypeDescriptor::object(fields, additional))
    }

    fn compile_fields(
        &self,
        owner: &str,
        obj: &Map<String, Value>,
    ) -> Result<Vec<FieldDescriptor>, CompileError> {
        let required: HashSet<&str> = obj
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let Some(properties) = obj.get("properties") else {
            return Ok(Vec::new());
        };
        let Some(properties) = properties.as_object() else {
            return Err(invalid(owner, "`properties` must be an object"));
        };

        properties
            .iter()
            .map(|(wire, prop)| {
                let ty = self.compile(owner, prop)?;
                let ty = if required.contains(wire.as_str()) {
                    ty
                } else {
                    TypeDescriptor::optional(ty)
                };
                Ok(FieldDescriptor::new(
                    wire.clone(),
                    self.options.naming.apply(wire),
                    ty,
                ))
            })
            .collect()
    }

    /// Flatten `allOf` parts into one object. Referenced parts contribute
    /// the fields of the definition they point at.
    fn compile_all_of(
        &self,
        owner: &str,
        obj: &Map<String, Value>,
    ) -> Result<TypeDescriptor, CompileError> {
        let mut fields = Vec::new();
        let mut seen = HashSet::new();
        self.collect_all_of(owner, obj, &mut fields, &mut seen)?;
        Ok(TypeDescriptor::object(fields, TypeDescriptor::any()))
    }

    fn collect_all_of(
        &self,
        owner: &str,
        obj: &Map<String, Value>,
        fields: &mut Vec<FieldDescriptor>,
        seen: &mut HashSet<String>,
    ) -> Result<(), CompileError> {
        if let Some(parts) = obj.get("allOf") {
            let Some(parts) = parts.as_array() else {
                return Err(invalid(owner, "`allOf` must be an array"));
            };
            for part in parts {
                let part = match part.get("$ref") {
                    Some(reference) => {
                        let target = ref_target(reference)?;
                        if !seen.insert(target.clone()) {
                            continue;
                        }
                        self.defs.get(&target).ok_or_else(|| {
                            invalid(owner, &format!("`allOf` references unknown `{target}`"))
                        })?
                    }
                    None => part,
                };
                let Some(part) = part.as_object() else {
                    return Err(invalid(owner, "`allOf` entries must be objects"));
                };
                self.collect_all_of(owner, part, fields, seen)?;
            }
        }
        for field in self.compile_fields(owner, obj)? {
            match fields.iter_mut().find(|f| f.wire == field.wire) {
                Some(existing) => *existing = field,
                None => fields.push(field),
            }
        }
        Ok(())
    }
}

fn ref_target(reference: &Value) -> Result<String, CompileError> {
    reference
        .as_str()
        .and_then(|r| r.strip_prefix(DEFINITIONS_PREFIX))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| CompileError::UnsupportedRef(reference.to_string()))
}

fn invalid(name: &str, reason: &str) -> CompileError {
    CompileError::InvalidDefinition {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}
