use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

use crate::domain::{PageRequest, ShowId};
use crate::models::show::{Page, ShowDetail, TagRef, YearRange};
use crate::services::show_filter::ShowPredicate;

pub mod migrator;
pub mod repositories;

pub use repositories::show::{CatalogImport, ImportSummary, ShowRecord};
pub use repositories::user::{NewUser, User};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");

        if !in_memory && let Some(path_str) = db_url.strip_prefix("sqlite:") {
            let path_str = path_str.trim_start_matches("//");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        // Every pooled connection to `:memory:` would be its own empty database.
        let (max_connections, min_connections) = if in_memory {
            (1, 1)
        } else {
            (max_connections, min_connections)
        };

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        if !in_memory {
            opt.idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600));
        }

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    /// Connects with a bounded number of attempts and a fixed delay between them.
    ///
    /// Only the batch ingestion job uses this; request handling never retries.
    pub async fn connect_with_retry(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
        attempts: u32,
        delay: Duration,
    ) -> Result<Self> {
        let attempts = attempts.max(1);
        let mut attempt = 1;

        loop {
            match Self::with_pool_options(db_url, max_connections, min_connections).await {
                Ok(store) => match store.ping().await {
                    Ok(()) => {
                        info!("Database is ready");
                        return Ok(store);
                    }
                    Err(e) if attempt < attempts => {
                        warn!("Database not answering ({attempt}/{attempts}): {e}");
                    }
                    Err(e) => return Err(e),
                },
                Err(e) if attempt < attempts => {
                    warn!("Waiting for database ({attempt}/{attempts}): {e}");
                }
                Err(e) => {
                    return Err(e.context(format!(
                        "Database not available after {attempts} attempts"
                    )));
                }
            }

            attempt += 1;
            tokio::time::sleep(delay).await;
        }
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn show_repo(&self) -> repositories::show::ShowRepository {
        repositories::show::ShowRepository::new(self.conn.clone())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    // Catalog

    pub async fn search_shows(
        &self,
        predicates: &[ShowPredicate],
        page: PageRequest,
    ) -> Result<Page<ShowDetail>> {
        self.show_repo().search(predicates, page).await
    }

    pub async fn get_show(&self, id: ShowId) -> Result<Option<ShowDetail>> {
        self.show_repo().get(id).await
    }

    pub async fn list_categories(&self) -> Result<Vec<TagRef>> {
        self.show_repo().list_categories().await
    }

    pub async fn list_ratings(&self) -> Result<Vec<TagRef>> {
        self.show_repo().list_ratings().await
    }

    pub async fn distinct_show_types(&self) -> Result<Vec<String>> {
        self.show_repo().distinct_types().await
    }

    pub async fn distinct_country_fields(&self) -> Result<Vec<String>> {
        self.show_repo().distinct_country_fields().await
    }

    pub async fn release_year_range(&self) -> Result<YearRange> {
        self.show_repo().year_range().await
    }

    pub async fn show_count(&self) -> Result<u64> {
        self.show_repo().count().await
    }

    pub async fn import_catalog(&self, import: &CatalogImport) -> Result<ImportSummary> {
        self.show_repo().import(import).await
    }

    // Users

    pub async fn create_user(&self, user: NewUser) -> Result<User> {
        self.user_repo().create(user).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn username_or_email_taken(&self, username: &str, email: &str) -> Result<bool> {
        self.user_repo().username_or_email_taken(username, email).await
    }

    pub async fn get_password_hash(&self, username: &str) -> Result<Option<(User, String)>> {
        self.user_repo().get_by_username_with_password(username).await
    }
}
