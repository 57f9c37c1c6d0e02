use std::sync::Arc;

use openhouse_config::{CorsConfig, EventConfig, JwtConfig};
use sqlx::PgPool;

use crate::modules::dashboard::repository::{DashboardRepository, PgDashboardRepository};
use crate::modules::evaluations::repository::{
    PgStudentEvaluationRepository, StudentEvaluationRepository,
};
use crate::modules::users::repository::{PgUserRepository, UserRepository};
use crate::modules::users::transaction_repository::{
    PgStudentTransactionRepository, StudentTransactionRepository,
};
use crate::utils::clock::{Clock, SystemClock};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub transactions: Arc<dyn StudentTransactionRepository>,
    pub evaluations: Arc<dyn StudentEvaluationRepository>,
    pub dashboard: Arc<dyn DashboardRepository>,
    pub jwt_config: JwtConfig,
    pub event_config: EventConfig,
    pub cors_config: CorsConfig,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Wires the Postgres repositories and the environment configuration.
    pub fn from_pool(db: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(db.clone())),
            transactions: Arc::new(PgStudentTransactionRepository::new(db.clone())),
            evaluations: Arc::new(PgStudentEvaluationRepository::new(db.clone())),
            dashboard: Arc::new(PgDashboardRepository::new(db)),
            jwt_config: JwtConfig::from_env(),
            event_config: EventConfig::from_env(),
            cors_config: CorsConfig::from_env(),
            clock: Arc::new(SystemClock),
        }
    }
}

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let db = openhouse_db::init_db_pool().await?;
    openhouse_db::run_migrations(&db).await?;
    Ok(AppState::from_pool(db))
}
