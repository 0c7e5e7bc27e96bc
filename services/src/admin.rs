//! Admin back office: dashboard stats, one tab per resource, and the hotel and
//! match create/update forms.

use client::{
    ApiClient, ResourceKind,
    api::admin::AdminStats,
    api::hotels::HotelForm,
    api::worldcup::MatchForm,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use util::notify::NotificationCenter;

use crate::error::FlowError;
use crate::list::ListError;
use crate::tab::ResourceTab;

#[derive(Clone)]
pub struct AdminDashboard {
    api: ApiClient,
    notifications: NotificationCenter,
    tabs: Arc<Vec<ResourceTab>>,
    stats: Arc<Mutex<Option<AdminStats>>>,
}

impl AdminDashboard {
    pub fn new(api: ApiClient, notifications: NotificationCenter, limit: u32) -> Self {
        let tabs = ResourceKind::ALL
            .iter()
            .map(|kind| ResourceTab::new(api.clone(), *kind, notifications.clone(), limit))
            .collect();
        Self {
            api,
            notifications,
            tabs: Arc::new(tabs),
            stats: Arc::new(Mutex::new(None)),
        }
    }

    pub fn tabs(&self) -> &[ResourceTab] {
        &self.tabs
    }

    pub fn tab(&self, kind: ResourceKind) -> Option<&ResourceTab> {
        self.tabs.iter().find(|t| t.descriptor().kind == kind)
    }

    pub async fn stats(&self) -> Option<AdminStats> {
        self.stats.lock().await.clone()
    }

    pub async fn load_stats(&self) -> Result<AdminStats, FlowError> {
        match self.api.admin_stats().await {
            Ok(stats) => {
                *self.stats.lock().await = Some(stats.clone());
                Ok(stats)
            }
            Err(e) => {
                let err = FlowError::from_api(&e, "Failed to load dashboard stats");
                tracing::warn!(error = %e, "admin stats failed");
                self.notifications
                    .error_with("Failed to load dashboard stats", err.message())
                    .await;
                Err(err)
            }
        }
    }

    /// Loads the stats and the first page of every tab concurrently.
    ///
    /// Each tab keeps its own loading state; one failing does not stop the others.
    pub async fn load_all(&self) -> Vec<(ResourceKind, Result<(), ListError>)> {
        let (_, tabs) = tokio::join!(self.load_stats(), self.load_tabs());
        tabs
    }

    async fn load_tabs(&self) -> Vec<(ResourceKind, Result<(), ListError>)> {
        let mut set = JoinSet::new();
        for tab in self.tabs.iter() {
            let list = tab.list().clone();
            set.spawn(async move { (list.descriptor().kind, list.load(1).await) });
        }

        let mut results = Vec::with_capacity(self.tabs.len());
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => tracing::error!(error = %e, "tab load task failed"),
            }
        }
        results
    }

    pub async fn save_hotel(&self, id: Option<&str>, form: HotelForm) -> Result<(), FlowError> {
        let result = match id {
            Some(id) => self.api.update_hotel(id, form).await,
            None => self.api.create_hotel(form).await,
        };
        let verb = if id.is_some() { "updated" } else { "created" };
        self.finish_save(
            result.map(|_| ()),
            ResourceKind::Hotels,
            &format!("Hotel {verb} successfully"),
            "Failed to save hotel",
        )
        .await
    }

    pub async fn save_match(&self, id: Option<&str>, form: MatchForm) -> Result<(), FlowError> {
        let result = match id {
            Some(id) => self.api.update_match(id, form).await,
            None => self.api.create_match(form).await,
        };
        let verb = if id.is_some() { "updated" } else { "created" };
        self.finish_save(
            result.map(|_| ()),
            ResourceKind::Matches,
            &format!("Match {verb} successfully"),
            "Failed to save match",
        )
        .await
    }

    async fn finish_save(
        &self,
        result: Result<(), client::ApiError>,
        kind: ResourceKind,
        success: &str,
        failure: &str,
    ) -> Result<(), FlowError> {
        match result {
            Ok(()) => {
                self.notifications.success(success).await;
                if let Some(tab) = self.tab(kind) {
                    let _ = tab.list().refresh().await;
                }
                Ok(())
            }
            Err(e) => {
                let err = FlowError::from_api(&e, failure);
                tracing::warn!(error = %e, "{failure}");
                self.notifications.error_with(failure, err.message()).await;
                Err(err)
            }
        }
    }
}
