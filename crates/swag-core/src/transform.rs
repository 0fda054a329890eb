//! Schema-driven validating transformer.
//!
//! Walks a [`MappedValue`] against a [`TypeDescriptor`] and either rejects it
//! with a [`ShapeMismatch`] or returns an equivalent value whose object keys
//! have been renamed for the chosen [`Direction`]. No partial results are
//! ever returned.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use indexmap::IndexMap;
use serde_json::Value;

use crate::descriptor::{Direction, ObjectDescriptor, Primitive, TypeDescriptor};
use crate::error::ShapeMismatch;
use crate::registry::TypeRegistry;
use crate::value::MappedValue;

/// Transformer bound to one registry.
#[derive(Debug, Clone, Copy)]
pub struct Transformer<'r> {
    registry: &'r TypeRegistry,
}

impl<'r> Transformer<'r> {
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self { registry }
    }

    /// Wire names in, internal names out.
    pub fn decode(
        &self,
        value: &MappedValue,
        ty: &TypeDescriptor,
    ) -> Result<MappedValue, ShapeMismatch> {
        self.validate_and_map(value, ty, Direction::Decode)
    }

    /// Internal names in, wire names out.
    pub fn encode(
        &self,
        value: &MappedValue,
        ty: &TypeDescriptor,
    ) -> Result<MappedValue, ShapeMismatch> {
        self.validate_and_map(value, ty, Direction::Encode)
    }

    /// Decode plain JSON against the registry entry `name`.
    pub fn cast(&self, json: &Value, name: &str) -> Result<MappedValue, ShapeMismatch> {
        let ty = TypeDescriptor::reference(name);
        self.decode(&MappedValue::from(json), &ty)
    }

    /// Encode a mapped value against the registry entry `name` and render
    /// it as JSON.
    pub fn uncast(&self, value: &MappedValue, name: &str) -> Result<Value, ShapeMismatch> {
        let ty = TypeDescriptor::reference(name);
        self.encode(value, &ty).map(|mapped| mapped.to_json())
    }

    pub fn validate_and_map(
        &self,
        value: &MappedValue,
        ty: &TypeDescriptor,
        direction: Direction,
    ) -> Result<MappedValue, ShapeMismatch> {
        self.map_present(value, ty, direction)
    }

    /// Map a slot that may be absent (a missing object key).
    fn map_slot(
        &self,
        value: Option<&MappedValue>,
        ty: &TypeDescriptor,
        direction: Direction,
    ) -> Result<Option<MappedValue>, ShapeMismatch> {
        let Some(present) = value else {
            let ty = self.resolve(ty, None)?;
            return match ty {
                TypeDescriptor::Primitive(Primitive::Any) | TypeDescriptor::Undefined => Ok(None),
                TypeDescriptor::Union(alternatives) => {
                    for alt in alternatives {
                        if let Ok(mapped) = self.map_slot(None, alt, direction) {
                            return Ok(mapped);
                        }
                    }
                    Err(ShapeMismatch::new(None, ty))
                }
                _ => Err(ShapeMismatch::new(None, ty)),
            };
        };
        self.map_present(present, ty, direction).map(Some)
    }

    fn map_present(
        &self,
        value: &MappedValue,
        ty: &TypeDescriptor,
        direction: Direction,
    ) -> Result<MappedValue, ShapeMismatch> {
        let ty = self.resolve(ty, Some(value))?;
        match ty {
            TypeDescriptor::Primitive(kind) => map_primitive(*kind, value, ty),
            TypeDescriptor::Null => match value {
                MappedValue::Null => Ok(MappedValue::Null),
                _ => Err(ShapeMismatch::new(Some(value), ty)),
            },
            TypeDescriptor::Invalid | TypeDescriptor::Undefined => {
                Err(ShapeMismatch::new(Some(value), ty))
            }
            TypeDescriptor::Enum(cases) => map_enum(cases, value, ty),
            TypeDescriptor::Array(items) => {
                let MappedValue::Array(elements) = value else {
                    return Err(ShapeMismatch::new(Some(value), ty));
                };
                elements
                    .iter()
                    .map(|el| self.map_present(el, items, direction))
                    .collect::<Result<Vec<_>, _>>()
                    .map(MappedValue::Array)
            }
            TypeDescriptor::Union(alternatives) => {
                for (i, alt) in alternatives.iter().enumerate() {
                    match self.map_present(value, alt, direction) {
                        Ok(mapped) => return Ok(mapped),
                        Err(err) => {
                            log::trace!("union alternative {i} rejected {}: {err}", value.kind())
                        }
                    }
                }
                Err(ShapeMismatch::new(Some(value), ty))
            }
            TypeDescriptor::Object(obj) => self.map_object(obj, value, ty, direction),
            TypeDescriptor::Date => map_date(value, ty),
            // `resolve` never returns a reference.
            TypeDescriptor::Ref(_) => Err(ShapeMismatch::new(Some(value), ty)),
        }
    }

    fn map_object(
        &self,
        obj: &ObjectDescriptor,
        value: &MappedValue,
        ty: &TypeDescriptor,
        direction: Direction,
    ) -> Result<MappedValue, ShapeMismatch> {
        let MappedValue::Object(source) = value else {
            return Err(ShapeMismatch::new(Some(value), ty));
        };
        let lookup = obj.lookup(direction);
        let mut result = IndexMap::with_capacity(source.len());

        for (source_key, target) in lookup {
            let field = &obj.fields[target.index];
            if let Some(mapped) = self.map_slot(source.get(source_key), &field.ty, direction)? {
                result.insert(target.key.clone(), mapped);
            }
        }
        for (key, extra) in source {
            if !lookup.contains_key(key) {
                let mapped = self.map_present(extra, &obj.additional, direction)?;
                result.insert(key.clone(), mapped);
            }
        }
        Ok(MappedValue::Object(result))
    }

    /// Follow references until a concrete descriptor is reached. `value` is
    /// only carried into the error.
    fn resolve<'a>(
        &'a self,
        mut ty: &'a TypeDescriptor,
        value: Option<&MappedValue>,
    ) -> Result<&'a TypeDescriptor, ShapeMismatch>
    where
        'r: 'a,
    {
        let mut hops = 0usize;
        while let TypeDescriptor::Ref(name) = ty {
            match self.registry.get(name) {
                Some(next) if hops <= self.registry.len() => {
                    ty = next;
                    hops += 1;
                }
                Some(_) => {
                    log::error!("reference cycle through `{name}`");
                    return Err(ShapeMismatch::new(value, ty));
                }
                None => {
                    log::error!("dangling reference to `{name}`");
                    return Err(ShapeMismatch::new(value, ty));
                }
            }
        }
        Ok(ty)
    }
}

fn map_primitive(
    kind: Primitive,
    value: &MappedValue,
    ty: &TypeDescriptor,
) -> Result<MappedValue, ShapeMismatch> {
    let matches = match kind {
        Primitive::Any => true,
        Primitive::Boolean => matches!(value, MappedValue::Bool(_)),
        Primitive::Number => matches!(value, MappedValue::Number(_)),
        Primitive::String => matches!(value, MappedValue::String(_)),
    };
    if matches {
        Ok(value.clone())
    } else {
        Err(ShapeMismatch::new(Some(value), ty))
    }
}

fn map_enum(
    cases: &[Value],
    value: &MappedValue,
    ty: &TypeDescriptor,
) -> Result<MappedValue, ShapeMismatch> {
    let found = match value {
        MappedValue::Date(_) | MappedValue::Array(_) | MappedValue::Object(_) => false,
        _ => {
            let json = value.to_json();
            cases.iter().any(|case| literal_eq(case, &json))
        }
    };
    if found {
        Ok(value.clone())
    } else {
        Err(ShapeMismatch::new(Some(value), ty))
    }
}

/// Numbers compare by value, so `1.0` matches the literal `1`.
fn literal_eq(case: &Value, value: &Value) -> bool {
    match (case, value) {
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => a == b,
            _ => match (a.as_u64(), b.as_u64()) {
                (Some(a), Some(b)) => a == b,
                _ => a.as_f64() == b.as_f64(),
            },
        },
        _ => case == value,
    }
}

/// Null passes through, numbers are refused even though they could be read
/// as epoch milliseconds, and strings must parse.
fn map_date(value: &MappedValue, ty: &TypeDescriptor) -> Result<MappedValue, ShapeMismatch> {
    match value {
        MappedValue::Null => Ok(MappedValue::Null),
        MappedValue::Date(date) => Ok(MappedValue::Date(*date)),
        MappedValue::String(s) => parse_date(s)
            .map(MappedValue::Date)
            .ok_or_else(|| ShapeMismatch::new(Some(value), ty)),
        _ => Err(ShapeMismatch::new(Some(value), ty)),
    }
}

/// RFC 3339, an offset-less date-time read as UTC, or a bare date at UTC
/// midnight.
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(input) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
