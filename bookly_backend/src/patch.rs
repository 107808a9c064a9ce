//! Tri-state field updates: a field can be left alone, cleared, or set.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A field in a partial update. Deserialize with `#[serde(default)]` so a
/// missing key becomes `Undefined` while an explicit JSON `null` becomes
/// `Null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Undefined,
    Null,
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Undefined
    }
}

impl<T> Patch<T> {
    pub fn is_undefined(&self) -> bool {
        matches!(self, Patch::Undefined)
    }

    /// Resolves the patch against the current value of the field.
    pub fn apply(self, current: Option<T>) -> Option<T> {
        match self {
            Patch::Undefined => current,
            Patch::Null => None,
            Patch::Value(value) => Some(value),
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Patch::Value(value),
            None => Patch::Null,
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<T>::deserialize(deserializer)?.into())
    }
}

impl<T> Serialize for Patch<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Patch::Value(value) => serializer.serialize_some(value),
            Patch::Undefined | Patch::Null => serializer.serialize_none(),
        }
    }
}
