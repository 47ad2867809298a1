//! Public models for the `user_addresses` module.
//!
//! These are transport-agnostic data structures that define the contract
//! between the `user_addresses` module and its consumers. Raw input types
//! (`UserForm`, `AddressCreateRequest`, ...) carry unvalidated strings; the
//! module validates them into the typed payloads (`NewUser`, `NewAddress`, ...).

use std::fmt;

use time::OffsetDateTime;

/// Lifecycle status of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
}

impl UserStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
        }
    }

    /// Parse the wire representation (`ACTIVE` / `INACTIVE`).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ACTIVE" => Some(Self::Active),
            "INACTIVE" => Some(Self::Inactive),
            _ => None,
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub initials: Option<String>,
    pub email: String,
    pub status: UserStatus,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Denormalized user row: the stored user plus its address count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserView {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub initials: Option<String>,
    pub email: String,
    pub status: UserStatus,
    pub address_count: u64,
}

impl UserView {
    #[must_use]
    pub fn new(user: User, address_count: u64) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            initials: user.initials,
            email: user.email,
            status: user.status,
            address_count,
        }
    }
}

/// Raw user form submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserForm {
    pub first_name: String,
    pub last_name: String,
    pub initials: Option<String>,
    pub email: String,
    /// Defaults to `ACTIVE` when absent.
    pub status: Option<String>,
}

/// Raw partial user form submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserFormPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub initials: Option<String>,
    pub email: Option<String>,
    pub status: Option<String>,
}

impl UserFormPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.initials.is_none()
            && self.email.is_none()
            && self.status.is_none()
    }
}

/// Validated data for creating a new user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub initials: Option<String>,
    pub email: String,
    pub status: UserStatus,
}

/// Validated partial update for a user.
///
/// `initials: Some(None)` clears the stored initials.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[allow(clippy::option_option)]
    pub initials: Option<Option<String>>,
    pub email: Option<String>,
    pub status: Option<UserStatus>,
}

/// Kind of address. Several addresses of one kind may exist per user,
/// distinguished by their `valid_from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AddressType {
    Home,
    Invoice,
    Post,
    Work,
}

impl AddressType {
    pub const ALL: [Self; 4] = [Self::Home, Self::Invoice, Self::Post, Self::Work];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "HOME",
            Self::Invoice => "INVOICE",
            Self::Post => "POST",
            Self::Work => "WORK",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Invoice => "Invoice",
            Self::Post => "Post",
            Self::Work => "Work",
        }
    }

    /// Display priority: home first, then work, invoice, post.
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            Self::Home => 1,
            Self::Work => 2,
            Self::Invoice => 3,
            Self::Post => 4,
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Natural key of an address. Equality is exact; tolerant matching is done
/// by the module's key matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressKey {
    pub user_id: i32,
    pub address_type: AddressType,
    pub valid_from: OffsetDateTime,
}

/// Non-key address attributes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AddressFields {
    pub post_code: String,
    pub city: String,
    pub country_code: String,
    pub street: String,
    pub building_number: String,
}

/// A stored address version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub key: AddressKey,
    pub fields: AddressFields,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Denormalized address row for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressView {
    pub address: Address,
    /// Display-only identifier derived from the natural key.
    pub id: String,
    pub formatted_address: String,
    pub is_active: bool,
}

/// Raw address creation request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AddressCreateRequest {
    pub user_id: i32,
    pub address_type: String,
    pub valid_from: String,
    pub post_code: String,
    pub city: String,
    pub country_code: String,
    pub street: String,
    pub building_number: String,
}

/// Raw address update request: new values plus the key of the row being edited.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AddressUpdateRequest {
    pub user_id: i32,
    pub address_type: String,
    pub valid_from: String,
    pub post_code: String,
    pub city: String,
    pub country_code: String,
    pub street: String,
    pub building_number: String,
    pub original_address_type: String,
    pub original_valid_from: String,
}

/// Validated address creation payload (country code already normalized).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAddress {
    pub key: AddressKey,
    pub fields: AddressFields,
}

/// Validated address update payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressUpdate {
    pub original: AddressKey,
    pub key: AddressKey,
    pub fields: AddressFields,
}

#[cfg(test)]
mod tests {
    use super::{AddressType, UserFormPatch, UserStatus};

    #[test]
    fn address_type_round_trips_through_wire_names() {
        for t in AddressType::ALL {
            assert_eq!(AddressType::parse(t.as_str()), Some(t));
        }
        assert_eq!(AddressType::parse("home"), None);
        assert_eq!(AddressType::parse("OFFICE"), None);
    }

    #[test]
    fn address_type_orders_alphabetically() {
        let mut types = vec![
            AddressType::Work,
            AddressType::Post,
            AddressType::Home,
            AddressType::Invoice,
        ];
        types.sort();
        assert_eq!(types, AddressType::ALL.to_vec());
    }

    #[test]
    fn labels_and_priority() {
        assert_eq!(AddressType::Invoice.label(), "Invoice");
        assert!(AddressType::Work.priority() < AddressType::Invoice.priority());
    }

    #[test]
    fn status_defaults_to_active() {
        assert_eq!(UserStatus::default(), UserStatus::Active);
        assert_eq!(UserStatus::parse("INACTIVE"), Some(UserStatus::Inactive));
        assert_eq!(UserStatus::parse("active"), None);
    }

    #[test]
    fn empty_patch_detection() {
        assert!(UserFormPatch::default().is_empty());
        let patch = UserFormPatch {
            status: Some("INACTIVE".to_owned()),
            ..UserFormPatch::default()
        };
        assert!(!patch.is_empty());
    }
}
