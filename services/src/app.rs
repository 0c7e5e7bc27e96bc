//! Application wiring: storage, API client, notifications and session, built
//! once from configuration and handed to every flow.

use client::{ApiClient, ApiError, ClientConfig};
use common::{config::AppConfig, logger::init_logging};
use std::sync::Arc;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use util::{
    notify::NotificationCenter,
    paths::{LOCAL_STORAGE_FILE, ensure_dir, resolve_dir},
    storage::{FileStorage, SharedStorage, StorageError},
};

use crate::admin::AdminDashboard;
use crate::guard::{Navigation, Route, guard};
use crate::hotels::HotelService;
use crate::payment::PaymentVerifier;
use crate::redeem::TicketRedemption;
use crate::session::SessionManager;
use crate::visa::VisaService;
use crate::worldcup::WorldCupService;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("storage unavailable: {0}")]
    Storage(#[from] StorageError),

    #[error("storage directory unavailable: {0}")]
    Io(#[from] std::io::Error),

    #[error("API client misconfigured: {0}")]
    Api(#[from] ApiError),
}

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub api: ApiClient,
    pub notifications: NotificationCenter,
    pub session: SessionManager,
}

impl AppContext {
    /// Opens the file store under `storage_dir` and restores the session.
    pub fn from_config(config: &AppConfig) -> Result<Self, BootstrapError> {
        let dir = ensure_dir(resolve_dir(&config.storage_dir))?;
        let storage: SharedStorage = Arc::new(FileStorage::open(dir.join(LOCAL_STORAGE_FILE))?);
        Self::with_storage(config, storage)
    }

    pub fn with_storage(config: &AppConfig, storage: SharedStorage) -> Result<Self, BootstrapError> {
        let api = ApiClient::new(ClientConfig::from_app_config(config), storage)?;
        let notifications = NotificationCenter::new();
        let session = SessionManager::new(api.clone(), notifications.clone(), config.user_storage_key.clone());

        tracing::info!(
            env = %config.env,
            api = %config.api_base_url,
            authenticated = session.is_authenticated(),
            "application context ready"
        );

        Ok(Self {
            config: config.clone(),
            api,
            notifications,
            session,
        })
    }

    /// Initializes logging from the global configuration, then builds the context.
    ///
    /// Keep the guard alive for the life of the process.
    pub fn bootstrap() -> Result<(Self, WorkerGuard), BootstrapError> {
        let config = AppConfig::global();
        let guard = init_logging(
            &config.log_dir,
            &config.log_file,
            &config.log_level,
            config.log_to_stdout,
        );
        let ctx = Self::from_config(&config)?;
        Ok((ctx, guard))
    }

    /// Guard decision for a location path under the current session.
    pub fn navigate(&self, path: &str) -> Navigation {
        guard(Route::from_path(path), self.session.session().as_ref())
    }

    pub async fn is_online(&self) -> bool {
        self.api.is_reachable().await
    }

    pub fn redemption(&self) -> TicketRedemption {
        TicketRedemption::new(self.session.clone(), self.notifications.clone())
    }

    pub fn visa(&self) -> VisaService {
        VisaService::new(self.session.clone(), self.notifications.clone())
    }

    pub fn world_cup(&self) -> WorldCupService {
        WorldCupService::new(self.session.clone(), self.notifications.clone())
    }

    pub fn hotels(&self) -> HotelService {
        HotelService::new(self.session.clone(), self.notifications.clone())
    }

    pub fn payments(&self) -> PaymentVerifier {
        PaymentVerifier::new(self.session.clone(), self.notifications.clone())
    }

    pub fn admin_dashboard(&self) -> AdminDashboard {
        AdminDashboard::new(self.api.clone(), self.notifications.clone(), self.config.page_limit)
    }
}
