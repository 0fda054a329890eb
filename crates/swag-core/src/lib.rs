pub mod compile;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod model;
pub mod registry;
pub mod sanitize;
pub mod transform;
pub mod validate;
pub mod value;

pub use descriptor::{Direction, FieldDescriptor, ObjectDescriptor, Primitive, TypeDescriptor};
pub use error::ShapeMismatch;
pub use registry::{TypeRegistry, TypeRegistryBuilder};
pub use transform::Transformer;
pub use value::MappedValue;
