use async_trait::async_trait;
use sea_orm::ConnectionTrait;
use time::OffsetDateTime;
use user_addresses_sdk::{NewUser, User};

use crate::domain::error::DomainError;

/// Repository trait for User persistence operations.
///
/// All methods accept a generic connection (`DatabaseConnection` or
/// `DatabaseTransaction`), so the service decides the transaction boundary.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Find a user by ID.
    async fn get<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i32,
    ) -> Result<Option<User>, DomainError>;

    /// All users, unordered.
    async fn list<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
    ) -> Result<Vec<User>, DomainError>;

    /// Insert a new user; the id is assigned by storage.
    async fn create<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user: NewUser,
        now: OffsetDateTime,
    ) -> Result<User, DomainError>;

    /// Overwrite the mutable columns of an existing user.
    async fn update<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user: User,
    ) -> Result<User, DomainError>;

    /// Delete a user by ID. Returns `false` when nothing was deleted.
    async fn delete<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i32,
    ) -> Result<bool, DomainError>;

    /// Count users with this email, optionally ignoring one user.
    async fn count_by_email<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        email: &str,
        excluding: Option<i32>,
    ) -> Result<u64, DomainError>;
}
