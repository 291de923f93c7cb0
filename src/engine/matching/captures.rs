use super::Capture;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Values bound by a successful match, keyed by capture identity.
///
/// Immutable once handed out, a new instance is made for every match attempt.
#[derive(Clone, Default)]
pub struct Captures {
    values: HashMap<Uuid, CapturedValue>,
}

#[derive(Clone)]
struct CapturedValue {
    name: &'static str,
    value: Arc<dyn Any + Send + Sync>,
}

impl Captures {
    pub fn empty() -> Captures {
        Captures::default()
    }

    pub fn get<V: 'static>(&self, capture: &Capture<V>) -> Option<&V> {
        let captured = self.values.get(&capture.id())?;
        let value: &(dyn Any + Send + Sync) = &*captured.value;
        value.downcast_ref::<V>()
    }

    pub fn contains<V>(&self, capture: &Capture<V>) -> bool {
        self.values.contains_key(&capture.id())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Names of the bound slots, sorted. Only meant for diagnostics.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.values.values().map(|c| c.name).collect();
        names.sort_unstable();
        names
    }

    pub(super) fn bind(
        mut self,
        id: Uuid,
        name: &'static str,
        value: Arc<dyn Any + Send + Sync>,
    ) -> Captures {
        self.values.insert(id, CapturedValue { name, value });
        self
    }

    //Patterns reject duplicate slots when built, so the two sides never share a key
    pub(super) fn merge(mut self, other: Captures) -> Captures {
        self.values.extend(other.values);
        self
    }
}

impl fmt::Debug for Captures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}
