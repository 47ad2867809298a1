use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, Condition, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect,
};
use time::OffsetDateTime;
use user_addresses_sdk::{Address, AddressFields, AddressKey, AddressType, NewAddress};

use crate::domain::error::DomainError;
use crate::domain::repos::AddressesRepository;
use crate::infra::storage::db::{ConstraintViolation, constraint_violation, db_err};
use crate::infra::storage::entity::address::{
    ActiveModel as AddressAM, Column as AddressColumn, Entity as AddressEntity,
};
use crate::infra::storage::mapper::map_all;

/// ORM-based implementation of the `AddressesRepository` trait.
#[derive(Clone, Default)]
pub struct OrmAddressesRepository;

impl OrmAddressesRepository {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn key_condition(key: &AddressKey) -> Condition {
    Condition::all()
        .add(Expr::col(AddressColumn::UserId).eq(key.user_id))
        .add(Expr::col(AddressColumn::AddressType).eq(key.address_type.as_str()))
        .add(Expr::col(AddressColumn::ValidFrom).eq(key.valid_from))
}

#[async_trait]
impl AddressesRepository for OrmAddressesRepository {
    async fn list_for_user<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i32,
    ) -> Result<Vec<Address>, DomainError> {
        let rows = AddressEntity::find()
            .filter(Condition::all().add(Expr::col(AddressColumn::UserId).eq(user_id)))
            .all(conn)
            .await
            .map_err(db_err)?;
        map_all(rows)
    }

    async fn list_by_type<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i32,
        address_type: AddressType,
    ) -> Result<Vec<Address>, DomainError> {
        let rows = AddressEntity::find()
            .filter(
                Condition::all()
                    .add(Expr::col(AddressColumn::UserId).eq(user_id))
                    .add(Expr::col(AddressColumn::AddressType).eq(address_type.as_str())),
            )
            .all(conn)
            .await
            .map_err(db_err)?;
        map_all(rows)
    }

    async fn create<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        address: NewAddress,
        now: OffsetDateTime,
    ) -> Result<Address, DomainError> {
        let NewAddress { key, fields } = address;
        let m = AddressAM {
            user_id: Set(key.user_id),
            address_type: Set(key.address_type.as_str().to_owned()),
            valid_from: Set(key.valid_from),
            post_code: Set(fields.post_code.clone()),
            city: Set(fields.city.clone()),
            country_code: Set(fields.country_code.clone()),
            street: Set(fields.street.clone()),
            building_number: Set(fields.building_number.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        AddressEntity::insert(m)
            .exec_without_returning(conn)
            .await
            .map_err(|e| match constraint_violation(&e) {
                Some(ConstraintViolation::Unique) => DomainError::address_key_exists(&key),
                Some(ConstraintViolation::ForeignKey) => DomainError::user_not_found(key.user_id),
                None => db_err(e),
            })?;

        Ok(Address {
            key,
            fields,
            created_at: now,
            updated_at: now,
        })
    }

    async fn update_fields<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        key: &AddressKey,
        fields: AddressFields,
        now: OffsetDateTime,
    ) -> Result<Address, DomainError> {
        let m = AddressAM {
            user_id: Unchanged(key.user_id),
            address_type: Unchanged(key.address_type.as_str().to_owned()),
            valid_from: Unchanged(key.valid_from),
            post_code: Set(fields.post_code),
            city: Set(fields.city),
            country_code: Set(fields.country_code),
            street: Set(fields.street),
            building_number: Set(fields.building_number),
            created_at: NotSet,
            updated_at: Set(now),
        };

        let model = m.update(conn).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => DomainError::address_not_found(key),
            other => db_err(other),
        })?;
        Address::try_from(model)
    }

    async fn delete<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        key: &AddressKey,
    ) -> Result<bool, DomainError> {
        let result = AddressEntity::delete_many()
            .filter(key_condition(key))
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn count_by_user<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
    ) -> Result<HashMap<i32, u64>, DomainError> {
        let rows: Vec<(i32, i64)> = AddressEntity::find()
            .select_only()
            .column(AddressColumn::UserId)
            .column_as(Expr::col(AddressColumn::UserId).count(), "address_count")
            .group_by(AddressColumn::UserId)
            .into_tuple()
            .all(conn)
            .await
            .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|(user_id, count)| (user_id, u64::try_from(count).unwrap_or_default()))
            .collect())
    }

    async fn count_for_user<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i32,
    ) -> Result<u64, DomainError> {
        AddressEntity::find()
            .filter(Condition::all().add(Expr::col(AddressColumn::UserId).eq(user_id)))
            .count(conn)
            .await
            .map_err(db_err)
    }
}
