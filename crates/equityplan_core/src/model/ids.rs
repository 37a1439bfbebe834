//! Unique identifiers for advisor-managed records
//!
//! Records are created by the persistence layer, which hands out opaque
//! string ids. Each entity gets its own newtype so a grant id can never be
//! passed where a client id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a Client
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub String);

/// Unique identifier for a Grant
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrantId(pub String);

/// Unique identifier for a PlannedExercise
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExerciseId(pub String);

macro_rules! impl_id {
    ($($name:ident),*) => {
        $(
            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.0)
                }
            }

            impl From<&str> for $name {
                fn from(s: &str) -> Self {
                    Self(s.to_string())
                }
            }

            impl $name {
                pub fn as_str(&self) -> &str {
                    &self.0
                }
            }
        )*
    };
}

impl_id!(ClientId, GrantId, ExerciseId);
