use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

#[derive(DeriveMigrationName)]
pub struct Migration;

const POSTGRES: &[&str] = &[
    r"
CREATE TABLE IF NOT EXISTS users (
    id SERIAL PRIMARY KEY NOT NULL,
    first_name VARCHAR(60) NOT NULL,
    last_name VARCHAR(100) NOT NULL,
    initials VARCHAR(30) NULL,
    email VARCHAR(100) NOT NULL,
    status VARCHAR(16) NOT NULL DEFAULT 'ACTIVE',
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
)",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_users_email ON users(email)",
    r"
CREATE TABLE IF NOT EXISTS users_addresses (
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    address_type VARCHAR(7) NOT NULL,
    valid_from TIMESTAMPTZ NOT NULL,
    post_code VARCHAR(6) NOT NULL,
    city VARCHAR(60) NOT NULL,
    country_code CHAR(3) NOT NULL,
    street VARCHAR(100) NOT NULL,
    building_number VARCHAR(60) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL,
    PRIMARY KEY (user_id, address_type, valid_from)
)",
];

const MYSQL: &[&str] = &[
    r"
CREATE TABLE IF NOT EXISTS users (
    id INT AUTO_INCREMENT PRIMARY KEY NOT NULL,
    first_name VARCHAR(60) NOT NULL,
    last_name VARCHAR(100) NOT NULL,
    initials VARCHAR(30) NULL,
    email VARCHAR(100) NOT NULL,
    status VARCHAR(16) NOT NULL DEFAULT 'ACTIVE',
    created_at DATETIME(3) NOT NULL,
    updated_at DATETIME(3) NOT NULL,
    UNIQUE KEY idx_users_email (email)
)",
    r"
CREATE TABLE IF NOT EXISTS users_addresses (
    user_id INT NOT NULL,
    address_type VARCHAR(7) NOT NULL,
    valid_from DATETIME(3) NOT NULL,
    post_code VARCHAR(6) NOT NULL,
    city VARCHAR(60) NOT NULL,
    country_code CHAR(3) NOT NULL,
    street VARCHAR(100) NOT NULL,
    building_number VARCHAR(60) NOT NULL,
    created_at DATETIME(3) NOT NULL,
    updated_at DATETIME(3) NOT NULL,
    PRIMARY KEY (user_id, address_type, valid_from),
    CONSTRAINT fk_users_addresses_user FOREIGN KEY (user_id)
        REFERENCES users(id) ON DELETE CASCADE
)",
];

const SQLITE: &[&str] = &[
    r"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    initials TEXT NULL,
    email TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'ACTIVE',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_users_email ON users(email)",
    r"
CREATE TABLE IF NOT EXISTS users_addresses (
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    address_type TEXT NOT NULL,
    valid_from TEXT NOT NULL,
    post_code TEXT NOT NULL,
    city TEXT NOT NULL,
    country_code TEXT NOT NULL,
    street TEXT NOT NULL,
    building_number TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (user_id, address_type, valid_from)
)",
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let conn = manager.get_connection();

        let statements = match backend {
            sea_orm::DatabaseBackend::Postgres => POSTGRES,
            sea_orm::DatabaseBackend::MySql => MYSQL,
            sea_orm::DatabaseBackend::Sqlite => SQLITE,
        };

        for sql in statements {
            conn.execute_unprepared(sql).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();
        conn.execute_unprepared("DROP TABLE IF EXISTS users_addresses")
            .await?;
        conn.execute_unprepared("DROP TABLE IF EXISTS users").await?;
        Ok(())
    }
}
