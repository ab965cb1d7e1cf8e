//! Strongly-typed identifiers for domain entities
//!
//! The remote stores assign 64-bit integer ids. Newtype wrappers prevent
//! accidental mixing of identifier types, while construction stays unchecked:
//! ids arrive from task variables and remote payloads, and the services reject
//! non-positive values at their entry points so the violation surfaces as a
//! validation failure rather than a parse error.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw identifier value
            pub fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw identifier value
            pub fn value(&self) -> i64 {
                self.0
            }

            /// Returns true when the identifier is usable (positive)
            pub fn is_valid(&self) -> bool {
                self.0 > 0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> i64 {
                id.0
            }
        }
    };
}

define_id!(ClaimId);
define_id!(CustomerId);
define_id!(AdjusterId);

/// Business key of a policy
///
/// Policies are addressed by their policy number everywhere in this system;
/// the policy directory exposes no numeric id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyNumber(String);

impl PolicyNumber {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when the key is usable (non-blank)
    pub fn is_valid(&self) -> bool {
        !self.0.trim().is_empty()
    }
}

impl fmt::Display for PolicyNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PolicyNumber {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for PolicyNumber {
    fn from(value: String) -> Self {
        Self(value)
    }
}
