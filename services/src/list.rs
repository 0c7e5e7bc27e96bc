//! Generic paginated list controller.
//!
//! One controller per resource tab. It fetches exactly one page at a time,
//! replaces the items wholesale, and refetches the current page after every
//! successful edit or delete. State sits behind a `tokio::sync::Mutex` that is
//! released before every request; a generation counter discards responses of
//! superseded fetches.

use client::{ApiClient, ApiError, Record, ResourceDescriptor};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use util::notify::NotificationCenter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Loaded,
    Mutating,
    Error(String),
}

/// Search and status filters sent with every page request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub search: Option<String>,
    pub status: Option<String>,
}

impl ListFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query.push(("search".to_string(), search.to_string()));
        }
        if let Some(status) = self.status.as_deref().filter(|s| !s.is_empty() && *s != "all") {
            query.push(("status".to_string(), status.to_string()));
        }
        query
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListState {
    pub items: Vec<Record>,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
    pub phase: Phase,
    pub filter: ListFilter,
    generation: u64,
}

impl ListState {
    fn new(limit: u32) -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            limit: limit.max(1),
            total_pages: 1,
            phase: Phase::Idle,
            filter: ListFilter::default(),
            generation: 0,
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Loading | Phase::Mutating)
    }

    pub fn last_page(&self) -> u32 {
        self.total_pages.max(1)
    }

    pub fn can_go_previous(&self) -> bool {
        !self.is_busy() && self.page > 1
    }

    pub fn can_go_next(&self) -> bool {
        !self.is_busy() && self.page < self.last_page()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    /// The backend has no endpoint for this mutation.
    #[error("{action} {resource} is not yet supported")]
    Unsupported {
        action: &'static str,
        resource: &'static str,
    },

    #[error("record has no id")]
    MissingId,

    #[error("{0}")]
    Api(String),
}

struct Inner {
    api: ApiClient,
    desc: &'static ResourceDescriptor,
    notifications: NotificationCenter,
    state: Mutex<ListState>,
}

#[derive(Clone)]
pub struct ListController {
    inner: Arc<Inner>,
}

impl ListController {
    pub fn new(
        api: ApiClient,
        desc: &'static ResourceDescriptor,
        notifications: NotificationCenter,
        limit: u32,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                desc,
                notifications,
                state: Mutex::new(ListState::new(limit)),
            }),
        }
    }

    pub fn descriptor(&self) -> &'static ResourceDescriptor {
        self.inner.desc
    }

    pub async fn state(&self) -> ListState {
        self.inner.state.lock().await.clone()
    }

    pub async fn items(&self) -> Vec<Record> {
        self.inner.state.lock().await.items.clone()
    }

    /// Fetches `page` and replaces the items with it.
    ///
    /// On failure the previous items stay and an error toast is shown. A
    /// response that arrives after a newer fetch started is dropped.
    pub async fn load(&self, page: u32) -> Result<(), ListError> {
        let page = page.max(1);
        let (generation, limit, query) = {
            let mut st = self.inner.state.lock().await;
            st.generation += 1;
            st.phase = Phase::Loading;
            (st.generation, st.limit, st.filter.to_query())
        };

        let desc = self.inner.desc;
        let result = self.inner.api.list_resource(desc, page, limit, &query).await;

        let mut st = self.inner.state.lock().await;
        if st.generation != generation {
            tracing::debug!(resource = desc.title, page, "dropping stale page response");
            return Ok(());
        }

        match result {
            Ok(fetched) => {
                st.items = fetched.docs;
                st.page = if fetched.page == 0 { page } else { fetched.page };
                st.total_pages = fetched.total_pages.max(1);
                st.phase = Phase::Loaded;
                Ok(())
            }
            Err(e) => {
                let message = e.user_message(&format!("Failed to load {}", desc.title.to_lowercase()));
                st.phase = Phase::Error(message.clone());
                drop(st);
                tracing::warn!(resource = desc.title, page, error = %e, "page load failed");
                self.inner
                    .notifications
                    .error_with(format!("Failed to load {}", desc.title.to_lowercase()), message.clone())
                    .await;
                Err(ListError::Api(message))
            }
        }
    }

    pub async fn refresh(&self) -> Result<(), ListError> {
        let page = self.inner.state.lock().await.page;
        self.load(page).await
    }

    /// Loads `page` when it lies within `1..=total_pages`; otherwise does nothing.
    ///
    /// Returns whether a fetch was made.
    pub async fn on_page_change(&self, page: u32) -> Result<bool, ListError> {
        let last = self.inner.state.lock().await.last_page();
        if page < 1 || page > last {
            return Ok(false);
        }
        self.load(page).await.map(|_| true)
    }

    /// Replaces the filters and reloads from the first page.
    pub async fn apply_filter(&self, filter: ListFilter) -> Result<(), ListError> {
        self.inner.state.lock().await.filter = filter;
        self.load(1).await
    }

    /// PUTs the edited record, then refetches the current page.
    pub async fn save_edit(&self, record: &Record) -> Result<(), ListError> {
        let desc = self.inner.desc;
        if !desc.supports_update() {
            return self.unsupported("Editing").await;
        }
        if record.id().is_none() {
            self.inner
                .notifications
                .error(format!("Failed to update {}", desc.noun.to_lowercase()))
                .await;
            return Err(ListError::MissingId);
        }

        self.begin_mutation().await;
        let result = self.inner.api.update_resource(desc, record).await;
        self.finish_mutation(result.map(|_| ()), "update", "updated").await?;
        let _ = self.refresh().await;
        Ok(())
    }

    /// DELETEs `id`, then refetches. When the refetch shows the current page
    /// no longer exists the controller steps back to the new last page.
    pub async fn delete(&self, id: &str) -> Result<(), ListError> {
        let desc = self.inner.desc;
        if !desc.supports_delete() {
            return self.unsupported("Deleting").await;
        }

        self.begin_mutation().await;
        let result = self.inner.api.delete_resource(desc, id).await;
        self.finish_mutation(result, "delete", "deleted").await?;

        if self.refresh().await.is_ok() {
            let (page, last) = {
                let st = self.inner.state.lock().await;
                (st.page, st.last_page())
            };
            if page > last {
                let _ = self.load(last).await;
            }
        }
        Ok(())
    }

    async fn unsupported(&self, action: &'static str) -> Result<(), ListError> {
        let err = ListError::Unsupported {
            action,
            resource: self.inner.desc.title,
        };
        tracing::warn!(resource = self.inner.desc.title, action, "mutation has no endpoint");
        self.inner.notifications.error(err.to_string()).await;
        Err(err)
    }

    async fn begin_mutation(&self) {
        self.inner.state.lock().await.phase = Phase::Mutating;
    }

    async fn finish_mutation(
        &self,
        result: Result<(), ApiError>,
        verb: &str,
        past: &str,
    ) -> Result<(), ListError> {
        let noun = self.inner.desc.noun;
        match result {
            Ok(()) => {
                tracing::info!(resource = self.inner.desc.title, verb, "mutation succeeded");
                self.inner
                    .notifications
                    .success(format!("{noun} {past} successfully"))
                    .await;
                Ok(())
            }
            Err(e) => {
                {
                    let mut st = self.inner.state.lock().await;
                    if st.phase == Phase::Mutating {
                        st.phase = Phase::Loaded;
                    }
                }
                let title = format!("Failed to {verb} {}", noun.to_lowercase());
                let message = e.user_message(&title);
                tracing::warn!(resource = self.inner.desc.title, verb, error = %e, "mutation failed");
                self.inner.notifications.error_with(title, message.clone()).await;
                Err(ListError::Api(message))
            }
        }
    }
}
