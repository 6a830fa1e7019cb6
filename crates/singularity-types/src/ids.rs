//! Type-safe string identifiers for authored content.
//!
//! Every piece of authored content (regions, actions, events, flags, global
//! markets) is addressed by a stable string key taken from the scenario
//! file. Wrapping each key in its own newtype prevents accidentally looking
//! up a region with a flag name at compile time.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Generates a newtype wrapper around [`String`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[serde(transparent)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub String);

        impl $name {
            /// Create a new identifier from any string-like key.
            pub fn new(key: impl Into<String>) -> Self {
                Self(key.into())
            }

            /// Borrow the underlying key.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(key: &str) -> Self {
                Self(String::from(key))
            }
        }

        impl From<String> for $name {
            fn from(key: String) -> Self {
                Self(key)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id! {
    /// Stable key of a world region (e.g. `north_america`).
    RegionId
}

define_id! {
    /// Stable key of an authored action.
    ActionId
}

define_id! {
    /// Stable key of an authored random event.
    EventId
}

define_id! {
    /// Opaque world flag used to gate actions and events.
    FlagId
}

define_id! {
    /// Stable key of a global market index (e.g. `compute_price`).
    MarketId
}
