//! Cafe records and creation-form validation.

use serde::{Deserialize, Serialize};

use super::id::CafeId;

/// Maximum length of the short text columns (name, location, seats, price).
pub const MAX_TEXT_LENGTH: usize = 250;

/// Maximum length of the URL columns.
pub const MAX_URL_LENGTH: usize = 500;

/// A persisted cafe.
///
/// Serializes to a flat object whose keys match the column names, which is
/// the shape the JSON endpoints return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlite", derive(sqlx::FromRow))]
pub struct Cafe {
    pub id: CafeId,
    pub name: String,
    pub map_url: String,
    pub img_url: String,
    pub location: String,
    pub seats: String,
    pub has_toilet: bool,
    pub has_wifi: bool,
    pub has_sockets: bool,
    pub can_take_calls: bool,
    pub coffee_price: Option<String>,
}

impl Cafe {
    /// Value of the given amenity for this cafe.
    #[must_use]
    pub const fn amenity(&self, amenity: Amenity) -> bool {
        match amenity {
            Amenity::Toilet => self.has_toilet,
            Amenity::Wifi => self.has_wifi,
            Amenity::Sockets => self.has_sockets,
            Amenity::Calls => self.can_take_calls,
        }
    }
}

/// A cafe that has not been stored yet (no ID assigned).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCafe {
    pub name: String,
    pub map_url: String,
    pub img_url: String,
    pub location: String,
    pub seats: String,
    pub has_toilet: bool,
    pub has_wifi: bool,
    pub has_sockets: bool,
    pub can_take_calls: bool,
    pub coffee_price: Option<String>,
}

impl NewCafe {
    /// Attach a store-assigned ID.
    #[must_use]
    pub fn with_id(self, id: CafeId) -> Cafe {
        Cafe {
            id,
            name: self.name,
            map_url: self.map_url,
            img_url: self.img_url,
            location: self.location,
            seats: self.seats,
            has_toilet: self.has_toilet,
            has_wifi: self.has_wifi,
            has_sockets: self.has_sockets,
            can_take_calls: self.can_take_calls,
            coffee_price: self.coffee_price,
        }
    }
}

/// The four boolean attributes a listing can be filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Amenity {
    Toilet,
    Wifi,
    Sockets,
    Calls,
}

impl Amenity {
    /// All amenities, in column order.
    pub const ALL: [Self; 4] = [Self::Toilet, Self::Wifi, Self::Sockets, Self::Calls];

    /// Column name, which is also the form field name.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Toilet => "has_toilet",
            Self::Wifi => "has_wifi",
            Self::Sockets => "has_sockets",
            Self::Calls => "can_take_calls",
        }
    }
}

/// Errors that can occur when validating a [`CafeForm`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CafeFormError {
    /// A required field was absent or blank.
    #[error("missing required field: {0}")]
    Missing(&'static str),
    /// A field exceeds its column length.
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Offending field.
        field: &'static str,
        /// Maximum allowed length.
        max: usize,
    },
    /// A boolean field holds something that is not a boolean.
    #[error("{field} must be a boolean, got '{value}'")]
    NotBoolean {
        /// Offending field.
        field: &'static str,
        /// Value as received.
        value: String,
    },
}

/// Raw create-cafe submission, every field as received from the form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CafeForm {
    pub name: Option<String>,
    pub map_url: Option<String>,
    pub img_url: Option<String>,
    pub location: Option<String>,
    pub seats: Option<String>,
    pub has_toilet: Option<String>,
    pub has_wifi: Option<String>,
    pub has_sockets: Option<String>,
    pub can_take_calls: Option<String>,
    pub coffee_price: Option<String>,
}

impl CafeForm {
    /// Validate the submission into a [`NewCafe`].
    ///
    /// Text fields are stored exactly as submitted. A value made only of
    /// whitespace counts as missing. A blank `coffee_price` is treated as
    /// absent.
    ///
    /// # Errors
    ///
    /// Returns `CafeFormError` if a required field is missing or blank, a
    /// field exceeds its column length, or a boolean field is not one of
    /// `True/true/1/on` or `False/false/0/off`.
    pub fn validate(self) -> Result<NewCafe, CafeFormError> {
        let coffee_price = non_blank_price(self.coffee_price);
        if let Some(price) = &coffee_price {
            check_length("coffee_price", price, MAX_TEXT_LENGTH)?;
        }

        Ok(NewCafe {
            name: required_text("name", self.name, MAX_TEXT_LENGTH)?,
            map_url: required_text("map_url", self.map_url, MAX_URL_LENGTH)?,
            img_url: required_text("img_url", self.img_url, MAX_URL_LENGTH)?,
            location: required_text("location", self.location, MAX_TEXT_LENGTH)?,
            seats: required_text("seats", self.seats, MAX_TEXT_LENGTH)?,
            has_toilet: required_bool("has_toilet", self.has_toilet)?,
            has_wifi: required_bool("has_wifi", self.has_wifi)?,
            has_sockets: required_bool("has_sockets", self.has_sockets)?,
            can_take_calls: required_bool("can_take_calls", self.can_take_calls)?,
            coffee_price,
        })
    }
}

/// Check a value against a column length (in characters).
///
/// # Errors
///
/// Returns `CafeFormError::TooLong` if the value is longer than `max`.
pub fn check_length(field: &'static str, value: &str, max: usize) -> Result<(), CafeFormError> {
    if value.chars().count() > max {
        return Err(CafeFormError::TooLong { field, max });
    }
    Ok(())
}

/// A submitted coffee price, with blank input read as no price.
///
/// Non-blank prices are kept verbatim.
#[must_use]
pub fn non_blank_price(price: Option<String>) -> Option<String> {
    price.filter(|p| !p.trim().is_empty())
}

fn required_text(
    field: &'static str,
    value: Option<String>,
    max: usize,
) -> Result<String, CafeFormError> {
    let value = value
        .filter(|v| !v.trim().is_empty())
        .ok_or(CafeFormError::Missing(field))?;
    check_length(field, &value, max)?;
    Ok(value)
}

fn required_bool(field: &'static str, value: Option<String>) -> Result<bool, CafeFormError> {
    let value = value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .ok_or(CafeFormError::Missing(field))?;

    match value.as_str() {
        "True" | "true" | "1" | "on" => Ok(true),
        "False" | "false" | "0" | "off" => Ok(false),
        _ => Err(CafeFormError::NotBoolean { field, value }),
    }
}
