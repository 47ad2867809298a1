use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use user_addresses_sdk::{
    AddressCreateRequest, AddressUpdateRequest, AddressView, UserForm, UserFormPatch, UserView,
};
use utoipa::ToSchema;

/// REST DTO for user representation with serde/utoipa
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initials: Option<String>,
    pub email: String,
    /// `ACTIVE` or `INACTIVE`
    pub status: String,
    pub address_count: u64,
}

/// REST DTO for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateUserReq {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub initials: Option<String>,
    pub email: String,
    /// Defaults to `ACTIVE`
    #[serde(default)]
    pub status: Option<String>,
}

/// REST DTO for updating a user (partial)
///
/// An empty `initials` string clears the stored initials.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct UpdateUserReq {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub initials: Option<String>,
    pub email: Option<String>,
    pub status: Option<String>,
}

/// REST DTO for one address version
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AddressDto {
    /// Display identifier, `{user_id}-{TYPE}-{epoch_millis}`
    pub id: String,
    pub user_id: i32,
    pub address_type: String,
    #[serde(with = "time::serde::rfc3339")]
    pub valid_from: OffsetDateTime,
    pub post_code: String,
    pub city: String,
    pub country_code: String,
    pub street: String,
    pub building_number: String,
    pub formatted_address: String,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// REST DTO for creating an address; the user comes from the path
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateAddressReq {
    /// `HOME`, `INVOICE`, `POST` or `WORK`
    pub address_type: String,
    /// RFC 3339 timestamp or `YYYY-MM-DD`
    pub valid_from: String,
    pub post_code: String,
    pub city: String,
    pub country_code: String,
    pub street: String,
    pub building_number: String,
}

/// REST DTO for updating an address, identified by its original key
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateAddressReq {
    pub original_address_type: String,
    pub original_valid_from: String,
    pub address_type: String,
    pub valid_from: String,
    pub post_code: String,
    pub city: String,
    pub country_code: String,
    pub street: String,
    pub building_number: String,
}

// Conversion implementations between REST DTOs and contract models
impl From<UserView> for UserDto {
    fn from(user: UserView) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            initials: user.initials,
            email: user.email,
            status: user.status.as_str().to_owned(),
            address_count: user.address_count,
        }
    }
}

impl From<CreateUserReq> for UserForm {
    fn from(req: CreateUserReq) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            initials: req.initials,
            email: req.email,
            status: req.status,
        }
    }
}

impl From<UpdateUserReq> for UserFormPatch {
    fn from(req: UpdateUserReq) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            initials: req.initials,
            email: req.email,
            status: req.status,
        }
    }
}

impl From<AddressView> for AddressDto {
    fn from(view: AddressView) -> Self {
        let AddressView {
            address,
            id,
            formatted_address,
            is_active,
        } = view;
        Self {
            id,
            user_id: address.key.user_id,
            address_type: address.key.address_type.as_str().to_owned(),
            valid_from: address.key.valid_from,
            post_code: address.fields.post_code,
            city: address.fields.city,
            country_code: address.fields.country_code,
            street: address.fields.street,
            building_number: address.fields.building_number,
            formatted_address,
            is_active,
            created_at: address.created_at,
            updated_at: address.updated_at,
        }
    }
}

impl CreateAddressReq {
    #[must_use]
    pub fn into_request(self, user_id: i32) -> AddressCreateRequest {
        AddressCreateRequest {
            user_id,
            address_type: self.address_type,
            valid_from: self.valid_from,
            post_code: self.post_code,
            city: self.city,
            country_code: self.country_code,
            street: self.street,
            building_number: self.building_number,
        }
    }
}

impl UpdateAddressReq {
    #[must_use]
    pub fn into_request(self, user_id: i32) -> AddressUpdateRequest {
        AddressUpdateRequest {
            user_id,
            address_type: self.address_type,
            valid_from: self.valid_from,
            post_code: self.post_code,
            city: self.city,
            country_code: self.country_code,
            street: self.street,
            building_number: self.building_number,
            original_address_type: self.original_address_type,
            original_valid_from: self.original_valid_from,
        }
    }
}
