//! Instances and method receivers.

use serde_json::{Map, Value};

use crate::class::ClassId;

/// An instance: its class plus the attribute values it has written itself.
///
/// Attributes without an own value are translucent and read through to the
/// class-level value.
#[derive(Clone, Debug, PartialEq)]
pub struct Object {
    class: ClassId,
    storage: Map<String, Value>,
}

impl Object {
    pub(crate) fn new(class: ClassId) -> Self {
        Self {
            class,
            storage: Map::new(),
        }
    }

    /// Class the object was constructed as.
    #[must_use]
    pub const fn class(&self) -> ClassId {
        self.class
    }

    /// Returns `true` when the object holds its own value for `attribute`.
    #[must_use]
    pub fn has_own(&self, attribute: &str) -> bool {
        self.storage.contains_key(attribute)
    }

    /// Returns `true` while `attribute` still reads through to its class.
    #[must_use]
    pub fn is_translucent(&self, attribute: &str) -> bool {
        !self.has_own(attribute)
    }

    /// The object's own value for `attribute`, if it has written one.
    #[must_use]
    pub fn own_value(&self, attribute: &str) -> Option<&Value> {
        self.storage.get(attribute)
    }

    /// Drop the object's own value so `attribute` becomes translucent again.
    pub fn forget(&mut self, attribute: &str) -> Option<Value> {
        self.storage.remove(attribute)
    }

    pub(crate) fn store(&mut self, attribute: &str, value: Value) {
        self.storage.insert(attribute.to_owned(), value);
    }

    pub(crate) fn own_slot_mut(&mut self, attribute: &str) -> Option<&mut Value> {
        self.storage.get_mut(attribute)
    }
}

/// The receiver of a method call.
#[derive(Debug)]
pub enum Receiver<'a> {
    /// The call was made on a class.
    Class(ClassId),
    /// The call was made on an instance.
    Instance(&'a mut Object),
}

impl Receiver<'_> {
    /// Class of the receiver: the class itself, or the instance's class.
    #[must_use]
    pub fn class_id(&self) -> ClassId {
        match self {
            Self::Class(id) => *id,
            Self::Instance(object) => object.class,
        }
    }

    /// Borrow the receiver again for a nested call.
    pub fn reborrow(&mut self) -> Receiver<'_> {
        match self {
            Self::Class(id) => Receiver::Class(*id),
            Self::Instance(object) => Receiver::Instance(object),
        }
    }
}

impl<'a> From<&'a mut Object> for Receiver<'a> {
    fn from(object: &'a mut Object) -> Self {
        Self::Instance(object)
    }
}

impl From<ClassId> for Receiver<'_> {
    fn from(class: ClassId) -> Self {
        Self::Class(class)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for own-value bookkeeping.

    use serde_json::json;

    use super::{Object, Receiver};
    use crate::class::ClassId;

    #[test]
    fn objects_start_translucent() {
        let mut object = Object::new(ClassId::new(2));
        assert!(object.is_translucent("name"));
        object.store("name", json!("Ada"));
        assert!(object.has_own("name"));
        assert_eq!(object.own_value("name"), Some(&json!("Ada")));
        assert_eq!(object.forget("name"), Some(json!("Ada")));
        assert!(object.is_translucent("name"));
    }

    #[test]
    fn receivers_report_their_class() {
        let mut object = Object::new(ClassId::new(4));
        let mut receiver = Receiver::from(&mut object);
        assert_eq!(receiver.reborrow().class_id(), ClassId::new(4));
        assert_eq!(Receiver::from(ClassId::new(1)).class_id(), ClassId::new(1));
    }
}
