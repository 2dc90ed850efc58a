//! Tri-state field wrapper for partial updates.
//!
//! A PATCH body must tell apart "leave this field alone" from "clear this
//! field". [`Patch::Unset`] is skipped during serialization,
//! [`Patch::Null`] is sent as JSON `null` and [`Patch::Set`] sends the value.
//! Fields using it are declared as
//!
//! ```ignore
//! #[serde(default, skip_serializing_if = "Patch::is_unset")]
//! pub name: Patch<String>,
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A field of a partial-update payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    /// Not touched by the caller; omitted from the payload.
    Unset,
    /// Explicitly cleared; sent as `null`.
    Null,
    /// Set to a value.
    Set(T),
}

impl<T> Patch<T> {
    /// Returns true when the field will be omitted.
    #[must_use]
    pub const fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// Returns true when a value will be sent.
    #[must_use]
    pub const fn is_set(&self) -> bool {
        matches!(self, Self::Set(_))
    }

    /// Borrow the value, if one is set.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Set(value) => Some(value),
            Self::Unset | Self::Null => None,
        }
    }
}

impl<T: Default> Patch<T> {
    /// Return the value, setting it to `T::default()` first if it was not set.
    pub fn get_or_insert_default(&mut self) -> &mut T {
        if !self.is_set() {
            *self = Self::Set(T::default());
        }
        match self {
            Self::Set(value) => value,
            Self::Unset | Self::Null => unreachable!("patch field was just set"),
        }
    }
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Self::Unset
    }
}

impl<T> From<T> for Patch<T> {
    fn from(value: T) -> Self {
        Self::Set(value)
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Set(value) => serializer.serialize_some(value),
            Self::Unset | Self::Null => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<T>::deserialize(deserializer)?.map_or(Self::Null, Self::Set))
    }
}
