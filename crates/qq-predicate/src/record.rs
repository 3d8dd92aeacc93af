//! Read access to record fields.

use serde_json::{Map, Value};

/// Anything a compiled predicate can read fields from.
///
/// The predicate only reads the fields named by its rules and never mutates
/// the record.
pub trait FieldSource {
    /// Returns the value stored under `name`, or `None` if the record has no
    /// such field.
    fn field(&self, name: &str) -> Option<&Value>;
}

impl FieldSource for Map<String, Value> {
    fn field(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl FieldSource for Value {
    fn field(&self, name: &str) -> Option<&Value> {
        self.as_object().and_then(|object| object.get(name))
    }
}

impl<T: FieldSource + ?Sized> FieldSource for &T {
    fn field(&self, name: &str) -> Option<&Value> {
        (**self).field(name)
    }
}
