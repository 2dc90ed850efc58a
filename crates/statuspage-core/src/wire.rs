//! Wire-format helpers shared by the model crates.
//!
//! Statuspage sends enum values as lowercase snake_case strings and grows the
//! set over time. [`wire_enum!`](crate::wire_enum) generates enums that keep
//! any unknown value as `Unrecognized(raw)` instead of failing the whole
//! response, while still letting callers reject unknown values on write.

use crate::{Error, Result};
use serde::{Deserialize, Deserializer};

/// Generate an open string enum with fixed wire values.
///
/// Every generated type gets `as_str`, `from_wire`, `is_known`, a strict
/// `FromStr` (unknown strings are an [`Error::InvalidRequest`]), `Display`,
/// and lenient serde impls.
#[macro_export]
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// Value outside the known set, kept verbatim.
            Unrecognized(::std::string::String),
        }

        impl $name {
            /// Returns the wire string for this value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $wire, )+
                    Self::Unrecognized(raw) => raw.as_str(),
                }
            }

            /// Map a wire string, keeping unknown values as `Unrecognized`.
            #[must_use]
            pub fn from_wire(raw: &str) -> Self {
                match raw {
                    $( $wire => Self::$variant, )+
                    other => Self::Unrecognized(other.to_string()),
                }
            }

            /// Returns false for `Unrecognized` values.
            #[must_use]
            pub const fn is_known(&self) -> bool {
                !matches!(self, Self::Unrecognized(_))
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::Error;

            fn from_str(s: &str) -> $crate::Result<Self> {
                match Self::from_wire(s) {
                    Self::Unrecognized(raw) => Err($crate::Error::InvalidRequest(format!(
                        concat!("Unknown ", stringify!($name), " `{}`"),
                        raw
                    ))),
                    known => Ok(known),
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $crate::__serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: $crate::__serde::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> $crate::__serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: $crate::__serde::Deserializer<'de>,
            {
                let raw = <::std::string::String as $crate::__serde::Deserialize>::deserialize(
                    deserializer,
                )?;
                Ok(Self::from_wire(&raw))
            }
        }
    };
}

/// Deserialize JSON `null` as `T::default()`.
///
/// Use together with `#[serde(default)]` so a missing field behaves the same.
///
/// # Errors
///
/// Propagates errors from deserializing a non-null value.
pub fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Check that `id` can be used as a single path segment.
///
/// # Errors
///
/// Returns [`Error::InvalidRequest`] for empty ids and ids containing
/// separators, whitespace or control characters.
pub fn path_segment<'a>(kind: &str, id: &'a str) -> Result<&'a str> {
    let unsafe_char = |c: char| {
        matches!(c, '/' | '?' | '#' | '%' | '\\') || c.is_whitespace() || c.is_control()
    };

    if id.is_empty() || id.chars().any(unsafe_char) || id == "." || id == ".." {
        return Err(Error::InvalidRequest(format!("Invalid {kind} id `{id}`")));
    }

    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    crate::wire_enum! {
        /// Test enum.
        pub enum Color {
            /// Red.
            Red => "red",
            /// Dark blue.
            DarkBlue => "dark_blue",
            /// Unset.
            Empty => "",
        }
    }

    impl Default for Color {
        fn default() -> Self {
            Self::Empty
        }
    }

    #[derive(Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "null_as_default")]
        color: Color,
    }

    #[test]
    fn known_values_round_trip() {
        let json = serde_json::to_string(&Color::DarkBlue).unwrap();
        assert_eq!(json, r#""dark_blue""#);
        let parsed: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Color::DarkBlue);
    }

    #[test]
    fn empty_string_is_a_known_value() {
        let parsed: Color = serde_json::from_str(r#""""#).unwrap();
        assert_eq!(parsed, Color::Empty);
        assert_eq!(serde_json::to_string(&Color::Empty).unwrap(), r#""""#);
    }

    #[test]
    fn unknown_values_are_kept_verbatim() {
        let parsed: Color = serde_json::from_str(r#""ultraviolet""#).unwrap();
        assert_eq!(parsed, Color::Unrecognized("ultraviolet".to_string()));
        assert!(!parsed.is_known());
        assert_eq!(serde_json::to_string(&parsed).unwrap(), r#""ultraviolet""#);
    }

    #[test]
    fn from_str_is_strict() {
        assert_eq!("red".parse::<Color>().unwrap(), Color::Red);
        let err = "Red".parse::<Color>().unwrap_err();
        assert_eq!(err, Error::InvalidRequest("Unknown Color `Red`".to_string()));
    }

    #[test]
    fn display_uses_wire_string() {
        assert_eq!(Color::DarkBlue.to_string(), "dark_blue");
    }

    #[test]
    fn null_and_missing_fall_back_to_default() {
        let holder: Holder = serde_json::from_str(r#"{"color": null}"#).unwrap();
        assert_eq!(holder.color, Color::Empty);
        let holder: Holder = serde_json::from_str("{}").unwrap();
        assert_eq!(holder.color, Color::Empty);
    }

    #[test]
    fn path_segment_rules() {
        assert_eq!(path_segment("incident", "p31zjtct2jer").unwrap(), "p31zjtct2jer");
        assert!(path_segment("incident", "").is_err());
        assert!(path_segment("incident", "a/b").is_err());
        assert!(path_segment("incident", "a?b=1").is_err());
        assert!(path_segment("incident", "a b").is_err());
        assert!(path_segment("incident", "..").is_err());
    }
}
