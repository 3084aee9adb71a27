//! Gender attribute and the default "counterpart" directory filter.
//!
//! Gender is stored as an open, lower-cased string rather than a closed
//! enum so new values can be introduced without a migration. Which gender a
//! requester sees by default is decided by a [`CounterpartPolicy`].

use std::fmt;

use serde::{Deserialize, Serialize};

pub const MALE: &str = "male";
pub const FEMALE: &str = "female";

/// Normalized gender value (trimmed, lower-case, never empty).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Gender(String);

impl Gender {
    /// Normalize a raw value. Returns `None` for empty or whitespace input.
    pub fn parse(raw: &str) -> Option<Self> {
        let value = raw.trim().to_lowercase();
        if value.is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn male() -> Self {
        Self(MALE.to_string())
    }

    pub fn female() -> Self {
        Self(FEMALE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Decides the default gender filter for a requester who did not pick one.
pub trait CounterpartPolicy: Send + Sync {
    /// Return the gender to filter on, or `None` to leave the listing
    /// unfiltered by gender.
    fn default_filter(&self, requester: &Gender) -> Option<Gender>;
}

/// Maps `male` to `female` and vice versa. Any other value gets no default.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryCounterpart;

impl CounterpartPolicy for BinaryCounterpart {
    fn default_filter(&self, requester: &Gender) -> Option<Gender> {
        match requester.as_str() {
            MALE => Some(Gender::female()),
            FEMALE => Some(Gender::male()),
            _ => None,
        }
    }
}
