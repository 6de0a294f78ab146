//! Wildcard-free identifiers and wildcard-bearing patterns.
//!
//! Both are thin wrappers over [`Furi`]. An [`Id`] names exactly one resource and is rejected at
//! construction if it contains `+` or `#`; a [`Pattern`] may name many.

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use serde::de::Error as _;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

use crate::error::FuriError;
use crate::furi::Furi;

/// A fURI guaranteed to contain no wildcard.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(Furi);

impl Id {
    pub fn parse(text: &str) -> Result<Id, FuriError> {
        Id::try_from(Furi::parse(text)?)
    }

    pub fn as_furi(&self) -> &Furi {
        &self.0
    }

    pub fn into_furi(self) -> Furi {
        self.0
    }
}

impl TryFrom<Furi> for Id {
    type Error = FuriError;

    fn try_from(furi: Furi) -> Result<Self, Self::Error> {
        if furi.is_pattern() {
            Err(FuriError::InvalidIdentifier {
                furi: furi.to_string(),
            })
        } else {
            Ok(Id(furi))
        }
    }
}

impl TryFrom<&str> for Id {
    type Error = FuriError;

    fn try_from(text: &str) -> Result<Self, Self::Error> {
        Id::parse(text)
    }
}

impl From<Id> for Furi {
    fn from(id: Id) -> Self {
        id.0
    }
}

impl Deref for Id {
    type Target = Furi;

    fn deref(&self) -> &Furi {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Id {
    type Err = FuriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Id::parse(s)
    }
}

impl Serialize for Id {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Id::parse(&s).map_err(D::Error::custom)
    }
}

/// A fURI that may contain `+` and `#` wildcards.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pattern(Furi);

impl Pattern {
    pub fn parse(text: &str) -> Result<Pattern, FuriError> {
        Ok(Pattern(Furi::parse(text)?))
    }

    /// True if `furi` falls under this pattern.
    pub fn matches_against(&self, furi: &Furi) -> bool {
        furi.matches(&self.0)
    }

    pub fn as_furi(&self) -> &Furi {
        &self.0
    }
}

impl From<Furi> for Pattern {
    fn from(furi: Furi) -> Self {
        Pattern(furi)
    }
}

impl From<Id> for Pattern {
    fn from(id: Id) -> Self {
        Pattern(id.0)
    }
}

impl Deref for Pattern {
    type Target = Furi;

    fn deref(&self) -> &Furi {
        &self.0
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Pattern {
    type Err = FuriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pattern::parse(s)
    }
}

impl Serialize for Pattern {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Pattern::parse(&s).map_err(D::Error::custom)
    }
}
