//! Application state - shared across all handlers.

use std::sync::Arc;

use scribe_core::ports::{PasswordService, PostRepository, TokenService, UserRepository};
use scribe_core::service::{PostService, UserService};
use scribe_infra::{
    Argon2PasswordService, InMemoryPostRepository, InMemoryUserRepository, JwtTokenService,
};

#[cfg(feature = "postgres")]
use migration::{Migrator, MigratorTrait};
#[cfg(feature = "postgres")]
use scribe_infra::database::{
    DatabaseConfig, DatabaseConnections, PostgresPostRepository, PostgresUserRepository,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub users: UserService,
    pub user_repo: Arc<dyn UserRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub page_size: u64,
    #[cfg(feature = "postgres")]
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state, falling back to in-memory stores when no
    /// database is configured or reachable.
    pub async fn new(config: &AppConfig) -> Self {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        #[cfg(feature = "postgres")]
        {
            if let Some(db_config) = &config.database {
                match Self::connect(db_config, config.run_migrations).await {
                    Ok(conn) => {
                        let conn = Arc::new(conn);
                        let user_repo = Arc::new(PostgresUserRepository::new(conn.main.clone()));
                        let post_repo = Arc::new(PostgresPostRepository::new(conn.main.clone()));

                        tracing::info!("Application state initialized (postgres)");

                        let mut state =
                            Self::assemble(user_repo, post_repo, tokens, passwords, config.page_size);
                        state.db = Some(conn);
                        return state;
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory fallback.",
                            e
                        );
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            }
        }

        tracing::info!("Application state initialized (in-memory)");
        Self::in_memory(tokens, passwords, config.page_size)
    }

    /// State backed by in-memory repositories.
    pub fn in_memory(
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
        page_size: u64,
    ) -> Self {
        Self::assemble(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryPostRepository::new()),
            tokens,
            passwords,
            page_size,
        )
    }

    fn assemble(
        user_repo: Arc<dyn UserRepository>,
        post_repo: Arc<dyn PostRepository>,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
        page_size: u64,
    ) -> Self {
        Self {
            posts: PostService::new(post_repo.clone(), user_repo.clone()),
            users: UserService::new(user_repo.clone(), post_repo),
            user_repo,
            tokens,
            passwords,
            page_size: page_size.max(1),
            #[cfg(feature = "postgres")]
            db: None,
        }
    }

    #[cfg(feature = "postgres")]
    async fn connect(
        db_config: &DatabaseConfig,
        run_migrations: bool,
    ) -> Result<DatabaseConnections, migration::DbErr> {
        let conn = DatabaseConnections::init(db_config).await?;

        if run_migrations {
            Migrator::up(&conn.main, None).await?;
            tracing::info!("Database migrations applied");
        }

        Ok(conn)
    }
}
