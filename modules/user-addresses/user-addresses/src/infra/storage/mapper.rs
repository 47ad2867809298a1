use user_addresses_sdk::{
    Address, AddressFields, AddressKey, AddressType, User, UserStatus, normalize_valid_from,
};

use crate::domain::error::DomainError;
use crate::infra::storage::entity::address::Model as AddressEntity;
use crate::infra::storage::entity::user::Model as UserEntity;

/// Convert a database entity to a contract model.
///
/// Enum columns are stored as text, so an unknown value is a storage fault.
impl TryFrom<UserEntity> for User {
    type Error = DomainError;

    fn try_from(e: UserEntity) -> Result<Self, Self::Error> {
        let status = UserStatus::parse(&e.status).ok_or_else(|| {
            DomainError::persistence(format!("user {} has unknown status '{}'", e.id, e.status))
        })?;
        Ok(Self {
            id: e.id,
            first_name: e.first_name,
            last_name: e.last_name,
            initials: e.initials,
            email: e.email,
            status,
            created_at: e.created_at,
            updated_at: e.updated_at,
        })
    }
}

impl TryFrom<AddressEntity> for Address {
    type Error = DomainError;

    fn try_from(e: AddressEntity) -> Result<Self, Self::Error> {
        let address_type = AddressType::parse(&e.address_type).ok_or_else(|| {
            DomainError::persistence(format!(
                "address of user {} has unknown type '{}'",
                e.user_id, e.address_type
            ))
        })?;
        Ok(Self {
            key: AddressKey {
                user_id: e.user_id,
                address_type,
                valid_from: normalize_valid_from(e.valid_from),
            },
            fields: AddressFields {
                post_code: e.post_code,
                city: e.city,
                country_code: e.country_code,
                street: e.street,
                building_number: e.building_number,
            },
            created_at: e.created_at,
            updated_at: e.updated_at,
        })
    }
}

/// Convert a batch of rows, failing on the first bad one.
pub(crate) fn map_all<M, T>(rows: Vec<M>) -> Result<Vec<T>, DomainError>
where
    T: TryFrom<M, Error = DomainError>,
{
    rows.into_iter().map(T::try_from).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use time::macros::datetime;
    use user_addresses_sdk::{Address, AddressType, User, UserStatus};

    use crate::domain::error::DomainError;
    use crate::infra::storage::entity::{address, user};

    fn user_row(status: &str) -> user::Model {
        user::Model {
            id: 1,
            first_name: "John".to_owned(),
            last_name: "Doe".to_owned(),
            initials: None,
            email: "john@doe.com".to_owned(),
            status: status.to_owned(),
            created_at: datetime!(2024-01-01 0:00 UTC),
            updated_at: datetime!(2024-01-01 0:00 UTC),
        }
    }

    #[test]
    fn user_status_is_parsed() {
        let u = User::try_from(user_row("INACTIVE")).unwrap();
        assert_eq!(u.status, UserStatus::Inactive);
        assert!(matches!(
            User::try_from(user_row("DELETED")),
            Err(DomainError::Persistence { .. })
        ));
    }

    #[test]
    fn address_key_is_normalized_to_utc() {
        let row = address::Model {
            user_id: 2,
            address_type: "INVOICE".to_owned(),
            valid_from: datetime!(2024-01-01 1:00 +01:00),
            post_code: "00-950".to_owned(),
            city: "Warsaw".to_owned(),
            country_code: "POL".to_owned(),
            street: "Nowy Swiat".to_owned(),
            building_number: "5".to_owned(),
            created_at: datetime!(2024-01-01 0:00 UTC),
            updated_at: datetime!(2024-01-01 0:00 UTC),
        };
        let a = Address::try_from(row).unwrap();
        assert_eq!(a.key.address_type, AddressType::Invoice);
        assert_eq!(a.key.valid_from.offset(), time::UtcOffset::UTC);
        assert_eq!(a.key.display_id(), "2-INVOICE-1704067200000");
    }
}
