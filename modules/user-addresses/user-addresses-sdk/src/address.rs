//! Address key and formatting helpers shared by the module and its consumers.

use std::cmp::Reverse;

use time::{OffsetDateTime, UtcOffset};

use crate::errors::{FieldViolation, UserAddressesError};
use crate::models::{Address, AddressFields, AddressKey, AddressType, AddressView};

const NANOS_PER_MILLI: i128 = 1_000_000;

/// Upper-case and trim a country code. Applied on every write path.
#[must_use]
pub fn normalize_country_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// ISO 3166-1 alpha-3 shape: exactly three upper-case ASCII letters.
///
/// Only the format is checked, not membership in the real country list.
#[must_use]
pub fn is_valid_country_code(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase())
}

/// Convert to UTC and drop sub-millisecond precision.
///
/// Stored `valid_from` values are always in this form, so the same instant
/// always encodes to the same key.
#[must_use]
pub fn normalize_valid_from(at: OffsetDateTime) -> OffsetDateTime {
    let utc = at.to_offset(UtcOffset::UTC);
    utc.replace_millisecond(utc.millisecond()).unwrap_or(utc)
}

impl AddressKey {
    /// `valid_from` as milliseconds since the Unix epoch.
    #[must_use]
    pub fn valid_from_millis(&self) -> i64 {
        let millis = self.valid_from.unix_timestamp_nanos() / NANOS_PER_MILLI;
        i64::try_from(millis).unwrap_or(i64::MAX)
    }

    /// Stable display identifier, `"{user_id}-{TYPE}-{epoch_millis}"`.
    ///
    /// Only meant as a list key for presentation; it is not a storage identity.
    #[must_use]
    pub fn display_id(&self) -> String {
        format!(
            "{}-{}-{}",
            self.user_id,
            self.address_type,
            self.valid_from_millis()
        )
    }

    /// Inverse of [`AddressKey::display_id`].
    ///
    /// # Errors
    /// Returns `UserAddressesError::Validation` when the id is malformed.
    pub fn parse_display_id(id: &str) -> Result<Self, UserAddressesError> {
        let invalid = || {
            UserAddressesError::validation(vec![FieldViolation::new(
                "id",
                format!("Invalid address id '{id}'"),
            )])
        };

        let mut parts = id.splitn(3, '-');
        let user_id = parts
            .next()
            .and_then(|p| p.parse::<i32>().ok())
            .filter(|v| *v > 0)
            .ok_or_else(invalid)?;
        let address_type = parts
            .next()
            .and_then(AddressType::parse)
            .ok_or_else(invalid)?;
        let millis = parts
            .next()
            .and_then(|p| p.parse::<i64>().ok())
            .ok_or_else(invalid)?;
        let valid_from =
            OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * NANOS_PER_MILLI)
                .map_err(|_| invalid())?;

        Ok(Self {
            user_id,
            address_type,
            valid_from,
        })
    }
}

/// Possibly incomplete address input, e.g. a form being typed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PartialAddress {
    pub street: Option<String>,
    pub building_number: Option<String>,
    pub post_code: Option<String>,
    pub city: Option<String>,
    pub country_code: Option<String>,
}

impl From<&AddressFields> for PartialAddress {
    fn from(fields: &AddressFields) -> Self {
        Self {
            street: Some(fields.street.clone()),
            building_number: Some(fields.building_number.clone()),
            post_code: Some(fields.post_code.clone()),
            city: Some(fields.city.clone()),
            country_code: Some(fields.country_code.clone()),
        }
    }
}

/// Three display lines plus the joined form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AddressPreview {
    pub line1: String,
    pub line2: String,
    pub line3: String,
    /// Non-empty lines joined with `\n`.
    pub full: String,
}

/// Format an address for display. Missing parts are treated as empty.
#[must_use]
pub fn format_address_preview(address: &PartialAddress) -> AddressPreview {
    let part = |v: &Option<String>| v.as_deref().unwrap_or_default().to_owned();

    let line1 = format!(
        "{} {}",
        part(&address.street),
        part(&address.building_number)
    )
    .trim()
    .to_owned();
    let line2 = format!("{} {}", part(&address.post_code), part(&address.city))
        .trim()
        .to_owned();
    let line3 = part(&address.country_code).trim().to_owned();

    let full = [&line1, &line2, &line3]
        .into_iter()
        .filter(|l| !l.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n");

    AddressPreview {
        line1,
        line2,
        line3,
        full,
    }
}

/// Build the display row for a stored address as of `now`.
#[must_use]
pub fn enrich_address(address: Address, now: OffsetDateTime) -> AddressView {
    let id = address.key.display_id();
    let formatted_address = format_address_preview(&PartialAddress::from(&address.fields)).full;
    let is_active = address.key.valid_from <= now;

    AddressView {
        address,
        id,
        formatted_address,
        is_active,
    }
}

/// Presentation ordering: type priority, then newest `valid_from` first.
pub fn sort_by_priority(views: &mut [AddressView]) {
    views.sort_by_key(|v| {
        (
            v.address.key.address_type.priority(),
            Reverse(v.address.key.valid_from),
        )
    });
}
