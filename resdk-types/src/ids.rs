//! Resource identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Server-assigned numeric identifier of a remote resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(u64);

impl ResourceId {
    /// Wraps a raw numeric id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw numeric id.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ResourceId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ResourceId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// A caller supplied reference to a resource: numeric id or slug.
///
/// Strings made only of ASCII digits are treated as ids, everything else
/// as a slug. Slugs are not validated on construction; use
/// [`Identifier::validate`] before issuing a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    Id(ResourceId),
    Slug(String),
}

impl Identifier {
    /// Classifies a raw string as id or slug.
    pub fn parse(raw: &str) -> crate::Result<Self> {
        let identifier = Self::from(raw);
        identifier.validate()?;
        Ok(identifier)
    }

    /// Rejects empty slugs and slugs containing whitespace or path separators.
    pub fn validate(&self) -> crate::Result<()> {
        match self {
            Identifier::Id(_) => Ok(()),
            Identifier::Slug(slug) => {
                if slug.is_empty()
                    || slug.chars().any(|c| c.is_whitespace() || c == '/')
                {
                    Err(Error::MalformedIdentifier(slug.clone()))
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Returns the numeric id, if this identifier is one.
    #[must_use]
    pub fn as_id(&self) -> Option<ResourceId> {
        match self {
            Identifier::Id(id) => Some(*id),
            Identifier::Slug(_) => None,
        }
    }

    /// Returns the slug, if this identifier is one.
    #[must_use]
    pub fn as_slug(&self) -> Option<&str> {
        match self {
            Identifier::Id(_) => None,
            Identifier::Slug(slug) => Some(slug),
        }
    }
}

impl From<ResourceId> for Identifier {
    fn from(id: ResourceId) -> Self {
        Identifier::Id(id)
    }
}

impl From<u64> for Identifier {
    fn from(id: u64) -> Self {
        Identifier::Id(ResourceId(id))
    }
}

impl From<&str> for Identifier {
    fn from(raw: &str) -> Self {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(id) = raw.parse::<u64>() {
                return Identifier::Id(ResourceId(id));
            }
        }
        Identifier::Slug(raw.to_string())
    }
}

impl From<String> for Identifier {
    fn from(raw: String) -> Self {
        Identifier::from(raw.as_str())
    }
}

impl From<&String> for Identifier {
    fn from(raw: &String) -> Self {
        Identifier::from(raw.as_str())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Id(id) => write!(f, "{id}"),
            Identifier::Slug(slug) => write!(f, "{slug}"),
        }
    }
}
