//! Transient user notifications ("toasts").
//!
//! Every state-changing action reports its outcome here. Views subscribe to a
//! Tokio broadcast channel for live delivery; the center also keeps a bounded
//! history so headless callers and tests can inspect what was shown.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

/// Maximum number of toasts retained in the history.
const HISTORY_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub title: String,
    pub description: Option<String>,
}

impl Toast {
    pub fn is_error(&self) -> bool {
        self.kind == ToastKind::Error
    }
}

#[derive(Clone)]
pub struct NotificationCenter {
    sender: broadcast::Sender<Toast>,
    history: Arc<RwLock<VecDeque<Toast>>>,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self {
            sender: broadcast::channel(HISTORY_LIMIT).0,
            history: Arc::new(RwLock::new(VecDeque::new())),
        }
    }
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Toast> {
        self.sender.subscribe()
    }

    /// Records the toast and delivers it to live subscribers, if any.
    pub async fn push(&self, toast: Toast) {
        match toast.kind {
            ToastKind::Error => tracing::warn!(title = %toast.title, description = ?toast.description, "toast"),
            _ => tracing::info!(title = %toast.title, description = ?toast.description, "toast"),
        }

        let mut history = self.history.write().await;
        if history.len() == HISTORY_LIMIT {
            history.pop_front();
        }
        history.push_back(toast.clone());
        drop(history);

        // No receivers is fine: the toast is still in the history.
        let _ = self.sender.send(toast);
    }

    pub async fn success(&self, title: impl Into<String>) {
        self.push(Toast {
            kind: ToastKind::Success,
            title: title.into(),
            description: None,
        })
        .await;
    }

    pub async fn error(&self, title: impl Into<String>) {
        self.push(Toast {
            kind: ToastKind::Error,
            title: title.into(),
            description: None,
        })
        .await;
    }

    pub async fn error_with(&self, title: impl Into<String>, description: impl Into<String>) {
        self.push(Toast {
            kind: ToastKind::Error,
            title: title.into(),
            description: Some(description.into()),
        })
        .await;
    }

    pub async fn info(&self, title: impl Into<String>) {
        self.push(Toast {
            kind: ToastKind::Info,
            title: title.into(),
            description: None,
        })
        .await;
    }

    pub async fn history(&self) -> Vec<Toast> {
        self.history.read().await.iter().cloned().collect()
    }

    pub async fn last(&self) -> Option<Toast> {
        self.history.read().await.back().cloned()
    }

    /// Returns and clears the history.
    pub async fn drain(&self) -> Vec<Toast> {
        self.history.write().await.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{Duration, timeout};

    #[tokio::test]
    async fn delivers_to_all_subscribers() {
        let center = NotificationCenter::new();
        let mut r1 = center.subscribe();
        let mut r2 = center.subscribe();

        center.success("Saved").await;

        let t1 = timeout(Duration::from_millis(50), r1.recv()).await.unwrap().unwrap();
        let t2 = timeout(Duration::from_millis(50), r2.recv()).await.unwrap().unwrap();
        assert_eq!(t1.title, "Saved");
        assert_eq!(t2.kind, ToastKind::Success);
    }

    #[tokio::test]
    async fn push_without_subscribers_keeps_history() {
        let center = NotificationCenter::new();
        center.error_with("Failed to load users", "HTTP 500").await;

        let last = center.last().await.unwrap();
        assert!(last.is_error());
        assert_eq!(last.description.as_deref(), Some("HTTP 500"));
    }

    #[tokio::test]
    async fn history_is_bounded_and_drainable() {
        let center = NotificationCenter::new();
        for i in 0..(HISTORY_LIMIT + 5) {
            center.info(format!("toast {i}")).await;
        }

        let history = center.history().await;
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history[0].title, "toast 5");

        assert_eq!(center.drain().await.len(), HISTORY_LIMIT);
        assert!(center.history().await.is_empty());
    }
}
