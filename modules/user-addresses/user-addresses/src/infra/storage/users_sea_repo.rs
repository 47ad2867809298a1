use async_trait::async_trait;
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, Condition, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
};
use time::OffsetDateTime;
use user_addresses_sdk::{NewUser, User};

use crate::domain::error::DomainError;
use crate::domain::repos::UsersRepository;
use crate::infra::storage::db::{ConstraintViolation, constraint_violation, db_err};
use crate::infra::storage::entity::user::{
    ActiveModel as UserAM, Column as UserColumn, Entity as UserEntity,
};
use crate::infra::storage::mapper::map_all;

/// ORM-based implementation of the `UsersRepository` trait.
#[derive(Clone, Default)]
pub struct OrmUsersRepository;

impl OrmUsersRepository {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn write_err(e: DbErr, email: &str) -> DomainError {
    match constraint_violation(&e) {
        Some(ConstraintViolation::Unique) => DomainError::email_already_exists(email),
        _ => db_err(e),
    }
}

#[async_trait]
impl UsersRepository for OrmUsersRepository {
    async fn get<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i32,
    ) -> Result<Option<User>, DomainError> {
        let found = UserEntity::find_by_id(id)
            .one(conn)
            .await
            .map_err(db_err)?;
        found.map(User::try_from).transpose()
    }

    async fn list<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
    ) -> Result<Vec<User>, DomainError> {
        let rows = UserEntity::find().all(conn).await.map_err(db_err)?;
        map_all(rows)
    }

    async fn create<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user: NewUser,
        now: OffsetDateTime,
    ) -> Result<User, DomainError> {
        let email = user.email.clone();
        let m = UserAM {
            id: NotSet,
            first_name: Set(user.first_name),
            last_name: Set(user.last_name),
            initials: Set(user.initials),
            email: Set(user.email),
            status: Set(user.status.as_str().to_owned()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = m.insert(conn).await.map_err(|e| write_err(e, &email))?;
        User::try_from(model)
    }

    async fn update<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user: User,
    ) -> Result<User, DomainError> {
        let id = user.id;
        let email = user.email.clone();
        let m = UserAM {
            id: Unchanged(user.id),
            first_name: Set(user.first_name),
            last_name: Set(user.last_name),
            initials: Set(user.initials),
            email: Set(user.email),
            status: Set(user.status.as_str().to_owned()),
            created_at: Unchanged(user.created_at),
            updated_at: Set(user.updated_at),
        };

        let model = m.update(conn).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => DomainError::user_not_found(id),
            other => write_err(other, &email),
        })?;
        User::try_from(model)
    }

    async fn delete<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i32,
    ) -> Result<bool, DomainError> {
        let result = UserEntity::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn count_by_email<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        email: &str,
        excluding: Option<i32>,
    ) -> Result<u64, DomainError> {
        let mut condition = Condition::all().add(Expr::col(UserColumn::Email).eq(email));
        if let Some(id) = excluding {
            condition = condition.add(Expr::col(UserColumn::Id).ne(id));
        }

        UserEntity::find()
            .filter(condition)
            .count(conn)
            .await
            .map_err(db_err)
    }
}
