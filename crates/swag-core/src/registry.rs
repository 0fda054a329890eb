use std::collections::HashSet;

use indexmap::IndexMap;

use crate::descriptor::TypeDescriptor;
use crate::error::RegistryError;

/// Read-only mapping from symbolic name to type descriptor.
///
/// References inside descriptors are resolved by lookup at use time, so
/// mutually recursive schemas are fine. A registry can only be obtained
/// through [`TypeRegistryBuilder::build`], which guarantees that every
/// reference resolves.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: IndexMap<String, TypeDescriptor>,
}

impl TypeRegistry {
    pub fn builder() -> TypeRegistryBuilder {
        TypeRegistryBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<&TypeDescriptor> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Entries in the order they were defined.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeDescriptor)> {
        self.types.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[derive(Debug, Default)]
pub struct TypeRegistryBuilder {
    types: IndexMap<String, TypeDescriptor>,
    duplicates: Vec<String>,
}

impl TypeRegistryBuilder {
    pub fn define(mut self, name: impl Into<String>, ty: TypeDescriptor) -> Self {
        self.insert(name, ty);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, ty: TypeDescriptor) {
        let name = name.into();
        if self.types.contains_key(&name) {
            self.duplicates.push(name);
            return;
        }
        self.types.insert(name, ty);
    }

    /// Check every entry and freeze the registry.
    pub fn build(self) -> Result<TypeRegistry, RegistryError> {
        if let Some(name) = self.duplicates.into_iter().next() {
            return Err(RegistryError::DuplicateName(name));
        }
        for (name, ty) in &self.types {
            check_descriptor(name, ty, &self.types)?;
        }
        for name in self.types.keys() {
            check_alias_chain(name, &self.types)?;
        }
        log::debug!("built type registry with {} entries", self.types.len());
        Ok(TypeRegistry { types: self.types })
    }
}

fn check_descriptor(
    owner: &str,
    ty: &TypeDescriptor,
    types: &IndexMap<String, TypeDescriptor>,
) -> Result<(), RegistryError> {
    match ty {
        TypeDescriptor::Ref(target) => {
            if !types.contains_key(target) {
                return Err(RegistryError::DanglingReference {
                    owner: owner.to_string(),
                    target: target.clone(),
                });
            }
        }
        TypeDescriptor::Array(items) => check_descriptor(owner, items, types)?,
        TypeDescriptor::Union(alternatives) => {
            for alt in alternatives {
                check_descriptor(owner, alt, types)?;
            }
        }
        TypeDescriptor::Object(obj) => {
            let mut wire = HashSet::new();
            let mut internal = HashSet::new();
            for field in &obj.fields {
                if !wire.insert(field.wire.as_str()) {
                    return Err(RegistryError::DuplicateField {
                        owner: owner.to_string(),
                        field: field.wire.clone(),
                        kind: "wire",
                    });
                }
                if !internal.insert(field.internal.as_str()) {
                    return Err(RegistryError::DuplicateField {
                        owner: owner.to_string(),
                        field: field.internal.clone(),
                        kind: "internal",
                    });
                }
                check_descriptor(owner, &field.ty, types)?;
            }
            check_descriptor(owner, &obj.additional, types)?;
        }
        TypeDescriptor::Primitive(_)
        | TypeDescriptor::Null
        | TypeDescriptor::Invalid
        | TypeDescriptor::Undefined
        | TypeDescriptor::Enum(_)
        | TypeDescriptor::Date => {}
    }
    Ok(())
}

/// A top-level entry that is itself a reference must eventually reach a
/// concrete descriptor.
fn check_alias_chain(
    start: &str,
    types: &IndexMap<String, TypeDescriptor>,
) -> Result<(), RegistryError> {
    let mut seen = HashSet::new();
    let mut current = start;
    while let Some(TypeDescriptor::Ref(next)) = types.get(current) {
        if !seen.insert(current) {
            return Err(RegistryError::ReferenceCycle(start.to_string()));
        }
        current = next;
    }
    Ok(())
}
