//! Field rules for user and address input.
//!
//! Every check runs, so a rejected input reports all of its violations at once.

use std::sync::LazyLock;

use regex::Regex;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};
use user_addresses_sdk::{
    AddressCreateRequest, AddressFields, AddressKey, AddressType, AddressUpdate,
    AddressUpdateRequest, FieldViolation, NewAddress, NewUser, UserForm, UserFormPatch, UserPatch,
    UserStatus, is_valid_country_code, normalize_country_code, normalize_valid_from,
};

use crate::domain::error::DomainError;

pub const FIRST_NAME_MAX: usize = 60;
pub const LAST_NAME_MAX: usize = 100;
pub const INITIALS_MAX: usize = 30;
pub const EMAIL_MAX: usize = 100;
pub const POST_CODE_MAX: usize = 6;
pub const CITY_MAX: usize = 60;
pub const STREET_MAX: usize = 100;
pub const BUILDING_NUMBER_MAX: usize = 60;

#[allow(clippy::expect_used)] // good regex, it doesn't panic
static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[\p{L}&&\p{Latin}]|[\s'-])+$").expect("static regex should not panic")
});
#[allow(clippy::expect_used)] // good regex, it doesn't panic
static INITIALS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[\p{Lu}&&\p{Latin}]|\.)*$").expect("static regex should not panic")
});
#[allow(clippy::expect_used)] // good regex, it doesn't panic
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9_'+\-.]*[A-Z0-9_+\-]@(?:[A-Z0-9][A-Z0-9\-]*\.)+[A-Z]{2,}$")
        .expect("static regex should not panic")
});

#[derive(Default)]
struct Violations(Vec<FieldViolation>);

impl Violations {
    fn check(&mut self, ok: bool, field: &str, message: impl Into<String>) {
        if !ok {
            self.0.push(FieldViolation::new(field, message));
        }
    }

    fn into_error(self) -> DomainError {
        DomainError::validation(self.0)
    }

    fn into_result(self) -> Result<(), DomainError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self.into_error())
        }
    }
}

fn check_length(v: &mut Violations, field: &str, label: &str, value: &str, max: usize) {
    let len = value.chars().count();
    v.check(len > 0, field, format!("{label} is required"));
    v.check(
        len <= max,
        field,
        format!("{label} cannot exceed {max} characters"),
    );
}

fn check_name(v: &mut Violations, field: &str, label: &str, value: &str, max: usize) {
    check_length(v, field, label, value, max);
    if !value.is_empty() {
        v.check(
            NAME_RE.is_match(value),
            field,
            format!("{label} can only contain letters, spaces, hyphens and apostrophes"),
        );
    }
}

/// Empty initials mean "none".
fn check_initials(v: &mut Violations, value: Option<&str>) -> Option<String> {
    let value = value.filter(|s| !s.is_empty())?;
    v.check(
        value.chars().count() <= INITIALS_MAX,
        "initials",
        format!("Initials cannot exceed {INITIALS_MAX} characters"),
    );
    v.check(
        INITIALS_RE.is_match(value),
        "initials",
        "Initials can only contain uppercase letters and dots",
    );
    Some(value.to_owned())
}

/// Shape check only; deliverability is not verified.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    !email.starts_with('.') && !email.contains("..") && EMAIL_RE.is_match(email)
}

fn check_email(v: &mut Violations, value: &str) {
    check_length(v, "email", "Email", value, EMAIL_MAX);
    if !value.is_empty() {
        v.check(
            is_valid_email(value),
            "email",
            "Please enter a valid email address",
        );
    }
}

fn check_status(v: &mut Violations, value: Option<&str>) -> UserStatus {
    match value {
        None => UserStatus::default(),
        Some(raw) => {
            let parsed = UserStatus::parse(raw);
            v.check(
                parsed.is_some(),
                "status",
                "Status must be ACTIVE or INACTIVE",
            );
            parsed.unwrap_or_default()
        }
    }
}

fn check_positive_id(v: &mut Violations, field: &str, id: i32) {
    v.check(id > 0, field, "User ID must be a positive integer");
}

/// Validate a user form into a `NewUser`.
///
/// # Errors
/// `DomainError::Validation` listing every violated rule.
pub fn validate_user_form(form: &UserForm) -> Result<NewUser, DomainError> {
    let mut v = Violations::default();
    check_name(
        &mut v,
        "first_name",
        "First name",
        &form.first_name,
        FIRST_NAME_MAX,
    );
    check_name(
        &mut v,
        "last_name",
        "Last name",
        &form.last_name,
        LAST_NAME_MAX,
    );
    let initials = check_initials(&mut v, form.initials.as_deref());
    check_email(&mut v, &form.email);
    let status = check_status(&mut v, form.status.as_deref());
    v.into_result()?;

    Ok(NewUser {
        first_name: form.first_name.clone(),
        last_name: form.last_name.clone(),
        initials,
        email: form.email.clone(),
        status,
    })
}

/// Validate the fields present in a patch. An empty patch is rejected.
///
/// # Errors
/// `DomainError::Validation` listing every violated rule.
pub fn validate_user_patch(patch: &UserFormPatch) -> Result<UserPatch, DomainError> {
    if patch.is_empty() {
        return Err(DomainError::field(
            "patch",
            "At least one field must be provided for update",
        ));
    }

    let mut v = Violations::default();
    if let Some(first_name) = &patch.first_name {
        check_name(&mut v, "first_name", "First name", first_name, FIRST_NAME_MAX);
    }
    if let Some(last_name) = &patch.last_name {
        check_name(&mut v, "last_name", "Last name", last_name, LAST_NAME_MAX);
    }
    let initials = patch
        .initials
        .as_deref()
        .map(|raw| check_initials(&mut v, Some(raw)));
    if let Some(email) = &patch.email {
        check_email(&mut v, email);
    }
    let status = patch
        .status
        .as_deref()
        .map(|raw| check_status(&mut v, Some(raw)));
    v.into_result()?;

    Ok(UserPatch {
        first_name: patch.first_name.clone(),
        last_name: patch.last_name.clone(),
        initials,
        email: patch.email.clone(),
        status,
    })
}

/// # Errors
/// `DomainError::Validation` on `id` when it is not positive.
pub fn validate_user_id(id: i32) -> Result<i32, DomainError> {
    let mut v = Violations::default();
    check_positive_id(&mut v, "id", id);
    v.into_result().map(|()| id)
}

/// Parse an RFC 3339 timestamp or a `YYYY-MM-DD` date (midnight UTC).
///
/// The result is normalized to UTC with millisecond precision.
#[must_use]
pub fn parse_valid_from(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if let Ok(at) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(normalize_valid_from(at));
    }
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|d| d.midnight().assume_utc())
}

fn check_address_type(v: &mut Violations, field: &str, raw: &str) -> Option<AddressType> {
    if raw.is_empty() {
        v.check(false, field, "Address type is required");
        return None;
    }
    let parsed = AddressType::parse(raw);
    v.check(
        parsed.is_some(),
        field,
        "Address type must be one of HOME, INVOICE, POST, WORK",
    );
    parsed
}

fn check_valid_from(v: &mut Violations, field: &str, raw: &str) -> Option<OffsetDateTime> {
    if raw.trim().is_empty() {
        v.check(false, field, "Valid from date is required");
        return None;
    }
    let parsed = parse_valid_from(raw);
    v.check(
        parsed.is_some(),
        field,
        "Valid from must be an RFC 3339 timestamp or a YYYY-MM-DD date",
    );
    parsed
}

struct RawAddress<'a> {
    post_code: &'a str,
    city: &'a str,
    country_code: &'a str,
    street: &'a str,
    building_number: &'a str,
}

fn check_address_fields(v: &mut Violations, raw: &RawAddress<'_>) -> AddressFields {
    check_length(v, "post_code", "Post code", raw.post_code, POST_CODE_MAX);
    if !raw.post_code.is_empty() {
        v.check(
            raw.post_code
                .chars()
                .all(|c| c.is_ascii_digit() || c == '-'),
            "post_code",
            "Post code must contain only numbers and dashes",
        );
    }
    check_length(v, "city", "City", raw.city, CITY_MAX);

    let country_code = normalize_country_code(raw.country_code);
    if country_code.chars().count() == 3 {
        v.check(
            is_valid_country_code(&country_code),
            "country_code",
            "Country code must be ISO 3166-1 alpha-3 format (e.g., USA, GBR, POL)",
        );
    } else {
        v.check(
            false,
            "country_code",
            "Country code must be exactly 3 characters",
        );
    }

    check_length(v, "street", "Street", raw.street, STREET_MAX);
    check_length(
        v,
        "building_number",
        "Building number",
        raw.building_number,
        BUILDING_NUMBER_MAX,
    );

    AddressFields {
        post_code: raw.post_code.to_owned(),
        city: raw.city.to_owned(),
        country_code,
        street: raw.street.to_owned(),
        building_number: raw.building_number.to_owned(),
    }
}

/// Validate an address creation request. The country code is normalized.
///
/// # Errors
/// `DomainError::Validation` listing every violated rule.
pub fn validate_address_create(req: &AddressCreateRequest) -> Result<NewAddress, DomainError> {
    let mut v = Violations::default();
    check_positive_id(&mut v, "user_id", req.user_id);
    let address_type = check_address_type(&mut v, "address_type", &req.address_type);
    let valid_from = check_valid_from(&mut v, "valid_from", &req.valid_from);
    let fields = check_address_fields(
        &mut v,
        &RawAddress {
            post_code: &req.post_code,
            city: &req.city,
            country_code: &req.country_code,
            street: &req.street,
            building_number: &req.building_number,
        },
    );

    let (Some(address_type), Some(valid_from)) = (address_type, valid_from) else {
        return Err(v.into_error());
    };
    v.into_result()?;

    Ok(NewAddress {
        key: AddressKey {
            user_id: req.user_id,
            address_type,
            valid_from,
        },
        fields,
    })
}

/// Validate an address update: new values plus the original key.
///
/// # Errors
/// `DomainError::Validation` listing every violated rule.
pub fn validate_address_update(req: &AddressUpdateRequest) -> Result<AddressUpdate, DomainError> {
    let mut v = Violations::default();
    check_positive_id(&mut v, "user_id", req.user_id);
    let address_type = check_address_type(&mut v, "address_type", &req.address_type);
    let valid_from = check_valid_from(&mut v, "valid_from", &req.valid_from);
    let fields = check_address_fields(
        &mut v,
        &RawAddress {
            post_code: &req.post_code,
            city: &req.city,
            country_code: &req.country_code,
            street: &req.street,
            building_number: &req.building_number,
        },
    );
    let original_type =
        check_address_type(&mut v, "original_address_type", &req.original_address_type);
    let original_valid_from =
        check_valid_from(&mut v, "original_valid_from", &req.original_valid_from);

    let (Some(address_type), Some(valid_from), Some(original_type), Some(original_valid_from)) =
        (address_type, valid_from, original_type, original_valid_from)
    else {
        return Err(v.into_error());
    };
    v.into_result()?;

    Ok(AddressUpdate {
        original: AddressKey {
            user_id: req.user_id,
            address_type: original_type,
            valid_from: original_valid_from,
        },
        key: AddressKey {
            user_id: req.user_id,
            address_type,
            valid_from,
        },
        fields,
    })
}
