//! Store selectors: registry roots (hives) and access views
//!
//! Both enums map one-to-one onto the string tokens used in the
//! authority and scheme of an [`Address`](crate::Address):
//!
//! ```text
//! registry32://HKEY_LOCAL_MACHINE/Software/Vendor/
//! ^^^^^^^^^^   ^^^^^^^^^^^^^^^^^^
//!   View           Hive
//! ```
//!
//! Decoding is ASCII case-insensitive; anything outside the closed set is
//! rejected with [`Error::UnknownSelector`].

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Top-level namespace partition of the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Hive {
    ClassesRoot,
    CurrentUser,
    LocalMachine,
    Users,
    PerformanceData,
    CurrentConfig,
    DynData,
}

impl Hive {
    /// Every hive, in declaration order
    pub const ALL: [Hive; 7] = [
        Hive::ClassesRoot,
        Hive::CurrentUser,
        Hive::LocalMachine,
        Hive::Users,
        Hive::PerformanceData,
        Hive::CurrentConfig,
        Hive::DynData,
    ];

    /// The authority token for this hive
    #[must_use]
    pub fn as_token(self) -> &'static str {
        match self {
            Hive::ClassesRoot => "HKEY_CLASSES_ROOT",
            Hive::CurrentUser => "HKEY_CURRENT_USER",
            Hive::LocalMachine => "HKEY_LOCAL_MACHINE",
            Hive::Users => "HKEY_USERS",
            Hive::PerformanceData => "HKEY_PERFORMANCE_DATA",
            Hive::CurrentConfig => "HKEY_CURRENT_CONFIG",
            Hive::DynData => "HKEY_DYN_DATA",
        }
    }
}

impl FromStr for Hive {
    type Err = Error;

    fn from_str(token: &str) -> Result<Self> {
        Hive::ALL
            .into_iter()
            .find(|hive| hive.as_token().eq_ignore_ascii_case(token))
            .ok_or_else(|| Error::UnknownSelector {
                kind: "hive",
                token: token.to_string(),
            })
    }
}

/// Store-access variant selecting a physical namespace view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum View {
    #[default]
    Default,
    Registry32,
    Registry64,
}

impl View {
    /// Every view, in declaration order
    pub const ALL: [View; 3] = [View::Default, View::Registry32, View::Registry64];

    /// The scheme token for this view
    #[must_use]
    pub fn as_token(self) -> &'static str {
        match self {
            View::Default => "registry",
            View::Registry32 => "registry32",
            View::Registry64 => "registry64",
        }
    }
}

impl FromStr for View {
    type Err = Error;

    fn from_str(token: &str) -> Result<Self> {
        View::ALL
            .into_iter()
            .find(|view| view.as_token().eq_ignore_ascii_case(token))
            .ok_or_else(|| Error::UnknownSelector {
                kind: "view",
                token: token.to_string(),
            })
    }
}

macro_rules! token_impls {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_token())
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_token())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                let token = String::deserialize(deserializer)?;
                token.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

token_impls!(Hive);
token_impls!(View);
