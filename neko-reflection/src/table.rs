use std::any::{Any, TypeId};

use neko_core::{FieldRef, FieldRefMut, Reflect, TagSet};

use crate::error::ReflectionError;

/// Read-only reflection table (§4.7): traversing a record through it
/// collects `name -> (type_id, &value)`. Supports [`ReflectionTable::get_field`]
/// only — mutation needs [`ReflectionTableMut`], built from `&mut T` instead.
pub struct ReflectionTable<'a> {
    fields: Vec<FieldRef<'a>>,
}

impl<'a> ReflectionTable<'a> {
    /// Traverse `record`'s fields once and capture the table.
    pub fn capture<T: Reflect>(record: &'a T) -> Self {
        let mut fields = Vec::with_capacity(T::FIELD_COUNT);
        record.for_each_field(&mut |f| fields.push(f));
        Self { fields }
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    pub fn tags_of(&self, name: &str) -> Option<TagSet> {
        self.fields.iter().find(|f| f.name == name).map(|f| f.tags)
    }

    fn find(&self, name: &str) -> Result<&FieldRef<'a>, ReflectionError> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| ReflectionError::NoSuchField(name.to_string()))
    }

    /// Return a copy of the field named `name` if its recorded static type
    /// matches `T`; else an error (§4.7: "returns a copy if the requested
    /// static type matches the stored type_id; else fails").
    pub fn get_field<T: Any + Clone>(&self, name: &str) -> Result<T, ReflectionError> {
        let entry = self.find(name)?;
        entry
            .value
            .downcast_ref::<T>()
            .cloned()
            .ok_or_else(|| ReflectionError::TypeMismatch(name.to_string()))
    }

    pub fn type_id_of(&self, name: &str) -> Result<TypeId, ReflectionError> {
        Ok((*self.find(name)?).value.type_id())
    }
}

/// Mutable reflection table: adds [`ReflectionTableMut::set_field`] (write
/// through the stored field) and [`ReflectionTableMut::bind_field`] (expose
/// non-member data as if it were a field) on top of everything
/// [`ReflectionTable`] offers.
pub struct ReflectionTableMut<'a> {
    fields: Vec<FieldRefMut<'a>>,
}

impl<'a> ReflectionTableMut<'a> {
    pub fn capture<T: Reflect>(record: &'a mut T) -> Self {
        let mut fields = Vec::with_capacity(T::FIELD_COUNT);
        record.for_each_field_mut(&mut |f| fields.push(f));
        Self { fields }
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    fn find(&self, name: &str) -> Result<&FieldRefMut<'a>, ReflectionError> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| ReflectionError::NoSuchField(name.to_string()))
    }

    fn find_mut(&mut self, name: &str) -> Result<&mut FieldRefMut<'a>, ReflectionError> {
        self.fields
            .iter_mut()
            .find(|f| f.name == name)
            .ok_or_else(|| ReflectionError::NoSuchField(name.to_string()))
    }

    pub fn get_field<T: Any + Clone>(&self, name: &str) -> Result<T, ReflectionError> {
        let entry = self.find(name)?;
        entry
            .value
            .downcast_ref::<T>()
            .cloned()
            .ok_or_else(|| ReflectionError::TypeMismatch(name.to_string()))
    }

    /// Write `value` through the stored pointer if `T` matches the
    /// field's recorded static type (§4.7: "writes through the stored
    /// pointer if types match").
    pub fn set_field<T: Any>(&mut self, name: &str, value: T) -> Result<(), ReflectionError> {
        let entry = self.find_mut(name)?;
        match entry.value.downcast_mut::<T>() {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(ReflectionError::TypeMismatch(name.to_string())),
        }
    }

    /// Add or replace a binding, exposing `ptr` under `name` as if it were
    /// a field of the captured record, even though it points at unrelated
    /// storage (§4.7: "used to expose non-member data as if it were a
    /// field").
    pub fn bind_field<T: Any>(&mut self, name: &'static str, ptr: &'a mut T) {
        self.fields.retain(|f| f.name != name);
        self.fields.push(FieldRefMut {
            name,
            tags: TagSet::none(),
            value: ptr,
        });
    }
}
