//! Macros for closed vocabularies
//!
//! `impl_domain_status_conversions!` provides `Display` and case-insensitive
//! `FromStr` for a plain status enum. `impl_vocabulary!` builds on it and adds
//! the stored key, display label and badge color for every variant.
//!
//! # Example
//!
//! ```rust
//! use tripdesk_domain::{impl_vocabulary, BadgeColor, Vocabulary};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Urgency {
//!     Routine,
//!     Urgent,
//! }
//!
//! impl_vocabulary!(Urgency {
//!     Routine => ("routine", "Routine", Gray),
//!     Urgent => ("urgent", "Urgent", Danger),
//! });
//!
//! assert_eq!(Urgency::Urgent.label(), "Urgent");
//! assert_eq!(Urgency::Routine.color(), BadgeColor::Gray);
//! assert_eq!("URGENT".parse::<Urgency>(), Ok(Urgency::Urgent));
//! assert_eq!(Urgency::ALL.len(), 2);
//! ```

/// Implements Display and FromStr traits for status enums
///
/// - Display writes the stored lowercase key
/// - FromStr accepts the key case-insensitively
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}

/// Implements the [`Vocabulary`](crate::Vocabulary) trait plus inherent
/// `as_str`, `label`, `color` and `ALL` for a closed enum, together with
/// serde support through the stored key.
#[macro_export]
macro_rules! impl_vocabulary {
    ($enum_name:ident { $($variant:ident => ($str:literal, $label:literal, $color:ident)),+ $(,)? }) => {
        impl $enum_name {
            /// Every member of the vocabulary, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Stored key.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }

            /// Human-readable label.
            pub fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }

            /// Badge color tag.
            pub fn color(&self) -> $crate::BadgeColor {
                match self {
                    $(Self::$variant => $crate::BadgeColor::$color,)+
                }
            }
        }

        impl $crate::Vocabulary for $enum_name {
            fn all() -> &'static [Self] {
                Self::ALL
            }

            fn as_str(&self) -> &'static str {
                $enum_name::as_str(self)
            }

            fn label(&self) -> &'static str {
                $enum_name::label(self)
            }

            fn color(&self) -> $crate::BadgeColor {
                $enum_name::color(self)
            }
        }

        impl $crate::__serde::Serialize for $enum_name {
            fn serialize<S: $crate::__serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> $crate::__serde::Deserialize<'de> for $enum_name {
            fn deserialize<D: $crate::__serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = <String as $crate::__serde::Deserialize>::deserialize(deserializer)?;
                raw.parse().map_err($crate::__serde::de::Error::custom)
            }
        }

        $crate::impl_domain_status_conversions!($enum_name { $($variant => $str),+ });
    };
}
