use std::sync::Arc;

use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};
use user_addresses_sdk::UserAddressesClientV1;

use crate::api::rest::routes;
use crate::config::UserAddressesConfig;
use crate::domain::service::{AppServices, ServiceConfig};
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::{OrmAddressesRepository, OrmUsersRepository};
use crate::local_client::UserAddressesLocalClient;

/// Type alias for the concrete `AppServices` type used with ORM repositories.
/// This lives in the composition root to keep infra types out of the domain.
pub type ConcreteAppServices = AppServices<OrmUsersRepository, OrmAddressesRepository>;

/// The wired module: migrated storage, services, REST router and local client.
#[derive(Clone)]
pub struct UserAddresses {
    services: Arc<ConcreteAppServices>,
}

impl UserAddresses {
    /// Connect to `dsn`, run migrations and wire the services.
    ///
    /// # Errors
    /// Fails if the database cannot be reached or a migration fails.
    pub async fn connect(dsn: &str, cfg: &UserAddressesConfig) -> anyhow::Result<Self> {
        info!("Connecting user_addresses storage");
        let db = Database::connect(dsn).await?;
        Self::migrate(&db).await?;
        Ok(Self::init(db, cfg))
    }

    /// Run the module's database migrations.
    ///
    /// # Errors
    /// Fails if a migration fails.
    pub async fn migrate(db: &DatabaseConnection) -> anyhow::Result<()> {
        info!("Running user_addresses database migrations");
        Migrator::up(db, None).await?;
        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Wire services over an already migrated connection.
    #[must_use]
    pub fn init(db: DatabaseConnection, cfg: &UserAddressesConfig) -> Self {
        debug!(
            "Loaded user_addresses config: key_match_tolerance_ms={}",
            cfg.key_match_tolerance_ms
        );

        let service_config = ServiceConfig {
            key_match_tolerance: cfg.key_match_tolerance(),
        };
        let services = Arc::new(AppServices::new(
            OrmUsersRepository::new(),
            OrmAddressesRepository::new(),
            db,
            &service_config,
        ));

        Self { services }
    }

    #[must_use]
    pub fn services(&self) -> Arc<ConcreteAppServices> {
        Arc::clone(&self.services)
    }

    /// REST routes of the module.
    pub fn router(&self) -> axum::Router {
        info!("Registering user_addresses REST routes");
        routes::router(self.services())
    }

    /// Object-safe client for in-process consumers.
    #[must_use]
    pub fn client(&self) -> Arc<dyn UserAddressesClientV1> {
        Arc::new(UserAddressesLocalClient::new(self.services()))
    }
}
