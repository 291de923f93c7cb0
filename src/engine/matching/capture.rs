use std::fmt;
use std::marker::PhantomData;
use uuid::Uuid;

/// A typed slot a pattern can bind a value to.
///
/// Identity comes from a fresh id, not the name, so two captures called "child" are
/// still distinct slots. Clones share the identity of the original.
pub struct Capture<V> {
    id: Uuid,
    name: &'static str,
    value: PhantomData<fn() -> V>,
}

impl<V> Capture<V> {
    pub fn new(name: &'static str) -> Capture<V> {
        Capture {
            id: Uuid::new_v4(),
            name,
            value: PhantomData,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<V> Clone for Capture<V> {
    fn clone(&self) -> Self {
        Capture {
            id: self.id,
            name: self.name,
            value: PhantomData,
        }
    }
}

impl<V> fmt::Debug for Capture<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Capture({}, {})", self.name, self.id)
    }
}
