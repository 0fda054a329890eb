use std::fmt;
use std::sync::OnceLock;

use indexmap::IndexMap;
use serde_json::Value;

/// Primitive runtime kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Boolean,
    Number,
    String,
    /// Accepts any value, including an absent one, unchanged.
    Any,
}

impl Primitive {
    pub fn as_str(&self) -> &'static str {
        match self {
            Primitive::Boolean => "boolean",
            Primitive::Number => "number",
            Primitive::String => "string",
            Primitive::Any => "any",
        }
    }
}

/// A declarative description of an expected JSON shape.
#[derive(Debug, Clone)]
pub enum TypeDescriptor {
    Primitive(Primitive),
    Null,
    /// Always fails. As an object's additional type it closes the object.
    Invalid,
    /// Matches only an absent value.
    Undefined,
    Enum(Vec<Value>),
    Array(Box<TypeDescriptor>),
    Union(Vec<TypeDescriptor>),
    Object(ObjectDescriptor),
    Ref(String),
    Date,
}

impl TypeDescriptor {
    pub fn boolean() -> Self {
        TypeDescriptor::Primitive(Primitive::Boolean)
    }

    pub fn number() -> Self {
        TypeDescriptor::Primitive(Primitive::Number)
    }

    pub fn string() -> Self {
        TypeDescriptor::Primitive(Primitive::String)
    }

    pub fn any() -> Self {
        TypeDescriptor::Primitive(Primitive::Any)
    }

    pub fn array(items: TypeDescriptor) -> Self {
        TypeDescriptor::Array(Box::new(items))
    }

    pub fn union(alternatives: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        TypeDescriptor::Union(alternatives.into_iter().collect())
    }

    /// `Union[Undefined, inner]`: the field may be left out.
    pub fn optional(inner: TypeDescriptor) -> Self {
        TypeDescriptor::Union(vec![TypeDescriptor::Undefined, inner])
    }

    pub fn enumeration(cases: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        TypeDescriptor::Enum(cases.into_iter().map(Into::into).collect())
    }

    pub fn reference(name: impl Into<String>) -> Self {
        TypeDescriptor::Ref(name.into())
    }

    pub fn object(fields: Vec<FieldDescriptor>, additional: TypeDescriptor) -> Self {
        TypeDescriptor::Object(ObjectDescriptor::new(fields, additional))
    }

    /// An object with no declared fields whose values all share one type.
    pub fn map(values: TypeDescriptor) -> Self {
        TypeDescriptor::Object(ObjectDescriptor::new(Vec::new(), values))
    }
}

/// One object member: wire name, internal name, and its type.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub wire: String,
    pub internal: String,
    pub ty: TypeDescriptor,
}

impl FieldDescriptor {
    pub fn new(wire: impl Into<String>, internal: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            wire: wire.into(),
            internal: internal.into(),
            ty,
        }
    }

    /// A field whose wire and internal names are identical.
    pub fn same(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        let name = name.into();
        Self {
            wire: name.clone(),
            internal: name,
            ty,
        }
    }
}

/// Source-key lookup entry: where a field lands and the field's index.
#[derive(Debug, Clone)]
pub struct FieldTarget {
    pub key: String,
    pub index: usize,
}

/// Which side of the name mapping a lookup table is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Wire names in, internal names out.
    Decode,
    /// Internal names in, wire names out.
    Encode,
}

#[derive(Debug, Clone)]
pub struct ObjectDescriptor {
    pub fields: Vec<FieldDescriptor>,
    pub additional: Box<TypeDescriptor>,
    wire_to_internal: OnceLock<IndexMap<String, FieldTarget>>,
    internal_to_wire: OnceLock<IndexMap<String, FieldTarget>>,
}

impl ObjectDescriptor {
    pub fn new(fields: Vec<FieldDescriptor>, additional: TypeDescriptor) -> Self {
        Self {
            fields,
            additional: Box::new(additional),
            wire_to_internal: OnceLock::new(),
            internal_to_wire: OnceLock::new(),
        }
    }

    /// The lookup table keyed by source-direction names, built on first use
    /// and kept for the lifetime of the descriptor.
    pub fn lookup(&self, direction: Direction) -> &IndexMap<String, FieldTarget> {
        match direction {
            Direction::Decode => self
                .wire_to_internal
                .get_or_init(|| self.build_lookup(|f| (&f.wire, &f.internal))),
            Direction::Encode => self
                .internal_to_wire
                .get_or_init(|| self.build_lookup(|f| (&f.internal, &f.wire))),
        }
    }

    fn build_lookup<F>(&self, names: F) -> IndexMap<String, FieldTarget>
    where
        F: Fn(&FieldDescriptor) -> (&String, &String),
    {
        self.fields
            .iter()
            .enumerate()
            .map(|(index, field)| {
                let (source, target) = names(field);
                (
                    source.clone(),
                    FieldTarget {
                        key: target.clone(),
                        index,
                    },
                )
            })
            .collect()
    }

    pub fn is_memoized(&self, direction: Direction) -> bool {
        match direction {
            Direction::Decode => self.wire_to_internal.get().is_some(),
            Direction::Encode => self.internal_to_wire.get().is_some(),
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Primitive(p) => f.write_str(p.as_str()),
            TypeDescriptor::Null => f.write_str("null"),
            TypeDescriptor::Invalid => f.write_str("false"),
            TypeDescriptor::Undefined => f.write_str("undefined"),
            TypeDescriptor::Date => f.write_str("Date"),
            TypeDescriptor::Ref(name) => write!(f, "ref({name})"),
            TypeDescriptor::Enum(cases) => {
                let cases: Vec<String> = cases.iter().map(Value::to_string).collect();
                write!(f, "enum[{}]", cases.join(", "))
            }
            TypeDescriptor::Array(items) => write!(f, "array<{items}>"),
            TypeDescriptor::Union(alternatives) => {
                let alternatives: Vec<String> =
                    alternatives.iter().map(ToString::to_string).collect();
                write!(f, "union[{}]", alternatives.join(" | "))
            }
            TypeDescriptor::Object(obj) => {
                let fields: Vec<String> = obj
                    .fields
                    .iter()
                    .map(|field| format!("{}: {}", field.wire, field.ty))
                    .collect();
                write!(f, "object{{{}; ..{}}}", fields.join(", "), obj.additional)
            }
        }
    }
}
