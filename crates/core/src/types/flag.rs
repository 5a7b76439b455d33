//! Tri-state amenity filter flag.

use serde::{Deserialize, Serialize};

/// Form value that selects the `true` branch of an amenity filter.
pub const CANONICAL_TRUE: &str = "True";

/// A listing filter input with three states: no opinion, require true,
/// require false.
///
/// Parsing is permissive: any value other than [`CANONICAL_TRUE`] selects the
/// `false` branch, so `"true"` or `"yes"` filter for cafes *without* the
/// amenity. Only an absent or empty value leaves the amenity unconstrained.
///
/// ```
/// use cafe_catalog_core::AmenityFlag;
///
/// assert_eq!(AmenityFlag::parse(None), AmenityFlag::Unspecified);
/// assert_eq!(AmenityFlag::parse(Some("")), AmenityFlag::Unspecified);
/// assert_eq!(AmenityFlag::parse(Some("True")), AmenityFlag::Require(true));
/// assert_eq!(AmenityFlag::parse(Some("yes")), AmenityFlag::Require(false));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AmenityFlag {
    #[default]
    Unspecified,
    Require(bool),
}

impl AmenityFlag {
    /// Parse a flag from an optional form value.
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            None | Some("") => Self::Unspecified,
            Some(v) => Self::Require(v == CANONICAL_TRUE),
        }
    }

    /// The required value, if any.
    #[must_use]
    pub const fn required(self) -> Option<bool> {
        match self {
            Self::Unspecified => None,
            Self::Require(value) => Some(value),
        }
    }

    /// Form value that reproduces this flag when submitted again.
    #[must_use]
    pub const fn as_form_value(self) -> &'static str {
        match self {
            Self::Unspecified => "",
            Self::Require(true) => CANONICAL_TRUE,
            Self::Require(false) => "False",
        }
    }
}
