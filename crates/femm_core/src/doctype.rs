//! Problem domains and their command prefixes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FemmError;

/// One of the four problem domains the engine supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Doctype {
    Magnetics,
    Electrostatics,
    Heat,
    Current,
}

impl Doctype {
    pub const ALL: [Doctype; 4] = [
        Doctype::Magnetics,
        Doctype::Electrostatics,
        Doctype::Heat,
        Doctype::Current,
    ];

    /// Code passed to `newdocument`
    pub const fn code(self) -> u8 {
        match self {
            Doctype::Magnetics => 0,
            Doctype::Electrostatics => 1,
            Doctype::Heat => 2,
            Doctype::Current => 3,
        }
    }

    /// Letter prepended to domain-scoped commands
    pub const fn prefix(self) -> char {
        match self {
            Doctype::Magnetics => 'm',
            Doctype::Electrostatics => 'e',
            Doctype::Heat => 'h',
            Doctype::Current => 'c',
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Doctype::Magnetics => "magnetics",
            Doctype::Electrostatics => "electrostatics",
            Doctype::Heat => "heat",
            Doctype::Current => "current",
        }
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Doctype::Magnetics),
            1 => Some(Doctype::Electrostatics),
            2 => Some(Doctype::Heat),
            3 => Some(Doctype::Current),
            _ => None,
        }
    }

    /// Inverse of [`Doctype::prefix`]
    pub const fn from_prefix(prefix: char) -> Option<Self> {
        match prefix {
            'm' => Some(Doctype::Magnetics),
            'e' => Some(Doctype::Electrostatics),
            'h' => Some(Doctype::Heat),
            'c' => Some(Doctype::Current),
            _ => None,
        }
    }
}

impl fmt::Display for Doctype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Doctype {
    type Err = FemmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Doctype::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FemmError::UnknownDoctype(s.to_string()))
    }
}

/// Anything `newdocument` accepts: a domain, its name, or its numeric code
pub trait IntoDoctype {
    fn into_doctype(self) -> Result<Doctype, FemmError>;
}

impl IntoDoctype for Doctype {
    fn into_doctype(self) -> Result<Doctype, FemmError> {
        Ok(self)
    }
}

impl IntoDoctype for &str {
    fn into_doctype(self) -> Result<Doctype, FemmError> {
        self.parse()
    }
}

impl IntoDoctype for u8 {
    fn into_doctype(self) -> Result<Doctype, FemmError> {
        Doctype::from_code(self).ok_or_else(|| FemmError::UnknownDoctype(self.to_string()))
    }
}
