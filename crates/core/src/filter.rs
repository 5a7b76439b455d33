//! Listing filter: criteria, predicate and redisplay state.
//!
//! A listing request carries a (possibly empty) list of selected locations and
//! four tri-state amenity flags. [`build_filter`] turns those into a
//! [`CafeFilter`], a conjunction of
//!
//! - a location constraint ([`LocationSelection`]), and
//! - one equality constraint per specified amenity flag,
//!
//! plus a [`FilterSelection`] describing which options were chosen so the page
//! can redisplay them.
//!
//! An empty location list imposes no restriction. The listing page starts with
//! every location checked, so "nothing submitted" and "everything deselected"
//! are indistinguishable and both list every location.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::types::{Amenity, AmenityFlag, Cafe};

/// Form field carrying the (repeatable) location selection.
pub const LOCATION_FIELD: &str = "location";

/// Location constraint of a listing filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LocationSelection {
    /// Every location passes.
    #[default]
    NoRestriction,
    /// Only cafes located in one of these locations pass.
    RestrictTo(BTreeSet<String>),
}

impl LocationSelection {
    /// Build a selection from the submitted locations.
    ///
    /// An empty submission yields [`LocationSelection::NoRestriction`].
    pub fn from_selected<I, S>(selected: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = selected.into_iter().map(Into::into).collect();
        if set.is_empty() {
            Self::NoRestriction
        } else {
            Self::RestrictTo(set)
        }
    }

    /// Whether a cafe in `location` passes this constraint.
    #[must_use]
    pub fn admits(&self, location: &str) -> bool {
        match self {
            Self::NoRestriction => true,
            Self::RestrictTo(set) => set.contains(location),
        }
    }
}

/// Filter criteria as decoded from a listing request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    /// Submitted locations, in submission order.
    pub locations: Vec<String>,
    pub has_toilet: AmenityFlag,
    pub has_wifi: AmenityFlag,
    pub has_sockets: AmenityFlag,
    pub can_take_calls: AmenityFlag,
}

impl FilterCriteria {
    /// Decode criteria from `application/x-www-form-urlencoded` pairs.
    ///
    /// `location` may repeat. For the amenity fields the first occurrence
    /// wins. Unknown fields are ignored.
    pub fn from_form_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut criteria = Self::default();
        let mut seen: [bool; 4] = [false; 4];

        for (key, value) in pairs {
            let key = key.as_ref();
            let value = value.as_ref();
            if key == LOCATION_FIELD {
                criteria.locations.push(value.to_owned());
                continue;
            }
            for (slot, amenity) in seen.iter_mut().zip(Amenity::ALL) {
                if !*slot && key == amenity.column() {
                    *slot = true;
                    criteria.set_flag(amenity, AmenityFlag::parse(Some(value)));
                }
            }
        }

        criteria
    }

    /// Flag for the given amenity.
    #[must_use]
    pub const fn flag(&self, amenity: Amenity) -> AmenityFlag {
        match amenity {
            Amenity::Toilet => self.has_toilet,
            Amenity::Wifi => self.has_wifi,
            Amenity::Sockets => self.has_sockets,
            Amenity::Calls => self.can_take_calls,
        }
    }

    /// Replace the flag for the given amenity.
    pub const fn set_flag(&mut self, amenity: Amenity, flag: AmenityFlag) {
        match amenity {
            Amenity::Toilet => self.has_toilet = flag,
            Amenity::Wifi => self.has_wifi = flag,
            Amenity::Sockets => self.has_sockets = flag,
            Amenity::Calls => self.can_take_calls = flag,
        }
    }
}

/// Conjunctive predicate over cafes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CafeFilter {
    locations: LocationSelection,
    amenities: Vec<(Amenity, bool)>,
}

impl CafeFilter {
    /// A filter that matches every cafe.
    #[must_use]
    pub fn match_all() -> Self {
        Self::default()
    }

    /// Build the predicate for a set of criteria.
    #[must_use]
    pub fn from_criteria(criteria: &FilterCriteria) -> Self {
        let amenities = Amenity::ALL
            .into_iter()
            .filter_map(|amenity| {
                criteria
                    .flag(amenity)
                    .required()
                    .map(|value| (amenity, value))
            })
            .collect();

        Self {
            locations: LocationSelection::from_selected(criteria.locations.iter().cloned()),
            amenities,
        }
    }

    /// Location constraint.
    #[must_use]
    pub const fn locations(&self) -> &LocationSelection {
        &self.locations
    }

    /// Amenity equality constraints, in column order.
    #[must_use]
    pub fn amenities(&self) -> &[(Amenity, bool)] {
        &self.amenities
    }

    /// Evaluate the predicate against a cafe.
    #[must_use]
    pub fn matches(&self, cafe: &Cafe) -> bool {
        self.locations.admits(&cafe.location)
            && self
                .amenities
                .iter()
                .all(|&(amenity, value)| cafe.amenity(amenity) == value)
    }
}

/// A location checkbox on the listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationOption {
    pub name: String,
    pub checked: bool,
}

/// Active filter state, for redisplaying the filter form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    /// Every known location, with whether it was selected.
    pub locations: Vec<LocationOption>,
    pub has_toilet: AmenityFlag,
    pub has_wifi: AmenityFlag,
    pub has_sockets: AmenityFlag,
    pub can_take_calls: AmenityFlag,
}

impl FilterSelection {
    /// Initial page state: every location checked, no amenity constraint.
    #[must_use]
    pub fn defaults(known_locations: &[String]) -> Self {
        Self {
            locations: known_locations
                .iter()
                .map(|name| LocationOption {
                    name: name.clone(),
                    checked: true,
                })
                .collect(),
            has_toilet: AmenityFlag::Unspecified,
            has_wifi: AmenityFlag::Unspecified,
            has_sockets: AmenityFlag::Unspecified,
            can_take_calls: AmenityFlag::Unspecified,
        }
    }

    fn from_criteria(known_locations: &[String], criteria: &FilterCriteria) -> Self {
        Self {
            locations: known_locations
                .iter()
                .map(|name| LocationOption {
                    name: name.clone(),
                    checked: criteria.locations.contains(name),
                })
                .collect(),
            has_toilet: criteria.has_toilet,
            has_wifi: criteria.has_wifi,
            has_sockets: criteria.has_sockets,
            can_take_calls: criteria.can_take_calls,
        }
    }
}

/// Build the listing predicate and the matching redisplay state.
///
/// `known_locations` drives the redisplayed checkboxes only; selected
/// locations that are not known still go into the predicate, where they
/// simply match nothing.
#[must_use]
pub fn build_filter(
    known_locations: &[String],
    criteria: &FilterCriteria,
) -> (CafeFilter, FilterSelection) {
    (
        CafeFilter::from_criteria(criteria),
        FilterSelection::from_criteria(known_locations, criteria),
    )
}
