use std::sync::Arc;

use crate::auth::{JwtKeys, PasswordHasher};
use crate::config::{AppConfig, StoreKind};
use crate::db;
use crate::users::{InMemoryUserStore, PgUserStore, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub config: Arc<AppConfig>,
    pub jwt: JwtKeys,
    pub passwords: PasswordHasher,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        let store = match config.store {
            StoreKind::Postgres => {
                let pool = db::connect(&config).await?;
                Arc::new(PgUserStore::new(pool)) as Arc<dyn UserStore>
            }
            StoreKind::Memory => {
                tracing::warn!("using in-memory user store; data is lost on exit");
                Arc::new(InMemoryUserStore::new()) as Arc<dyn UserStore>
            }
        };

        Self::from_parts(store, Arc::new(config))
    }

    pub fn from_parts(store: Arc<dyn UserStore>, config: Arc<AppConfig>) -> anyhow::Result<Self> {
        let jwt = JwtKeys::new(&config.jwt);
        let passwords = PasswordHasher::new(&config.password)?;
        Ok(Self {
            store,
            config,
            jwt,
            passwords,
        })
    }

    /// Closes the store; call once the server has drained.
    pub async fn shutdown(&self) {
        self.store.close().await;
        tracing::info!("user store closed");
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        Self::with_store(Arc::new(InMemoryUserStore::new()))
    }

    #[cfg(test)]
    pub fn with_store(store: Arc<dyn UserStore>) -> Self {
        use crate::config::{JwtConfig, PasswordConfig};

        let config = Arc::new(AppConfig {
            store: StoreKind::Memory,
            database_url: None,
            db_max_connections: 1,
            host: "127.0.0.1".into(),
            port: 0,
            jwt: JwtConfig {
                secret: "test-secret".into(),
                issuer: "test-issuer".into(),
                ttl_minutes: 60,
            },
            password: PasswordConfig {
                memory_kib: 1024,
                iterations: 1,
                parallelism: 1,
            },
        });
        Self::from_parts(store, config).expect("test state")
    }
}
