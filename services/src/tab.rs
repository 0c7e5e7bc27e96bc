//! One admin tab: a list controller plus its view/edit/delete modals.

use client::{ApiClient, Record, ResourceDescriptor, ResourceKind};
use std::sync::Arc;
use tokio::sync::Mutex;
use util::notify::NotificationCenter;

use crate::edit_form::{EditForm, FieldOptions};
use crate::list::{ListController, ListError};
use crate::modal::{DeleteModal, ModalState};

#[derive(Debug, Clone, PartialEq)]
pub struct Modals {
    pub view: ModalState,
    pub edit: ModalState,
    pub delete: DeleteModal,
}

#[derive(Clone)]
pub struct ResourceTab {
    list: ListController,
    modals: Arc<Mutex<Modals>>,
}

impl ResourceTab {
    pub fn new(api: ApiClient, kind: ResourceKind, notifications: NotificationCenter, limit: u32) -> Self {
        Self {
            list: ListController::new(api, kind.descriptor(), notifications, limit),
            modals: Arc::new(Mutex::new(Modals {
                view: ModalState::closed(kind),
                edit: ModalState::closed(kind),
                delete: DeleteModal::closed(kind),
            })),
        }
    }

    pub fn list(&self) -> &ListController {
        &self.list
    }

    pub fn descriptor(&self) -> &'static ResourceDescriptor {
        self.list.descriptor()
    }

    pub fn field_options(&self) -> FieldOptions {
        let desc = self.descriptor();
        FieldOptions::new(desc.status_options, desc.role_options)
    }

    pub async fn modals(&self) -> Modals {
        self.modals.lock().await.clone()
    }

    pub async fn open_view(&self, record: Option<&Record>) -> bool {
        let title = format!("View {}", self.descriptor().noun);
        self.modals.lock().await.view.open_with(title, record)
    }

    pub async fn close_view(&self) {
        self.modals.lock().await.view.close();
    }

    /// Opens the edit modal and returns its form, or `None` without a record.
    pub async fn open_edit(&self, record: Option<&Record>) -> Option<EditForm> {
        let title = format!("Edit {}", self.descriptor().noun);
        let form = EditForm::open(title.clone(), record, &self.field_options())?;
        self.modals.lock().await.edit.open_with(title, record);
        Some(form)
    }

    pub async fn cancel_edit(&self) {
        self.modals.lock().await.edit.close();
    }

    /// Saves the form; the modal closes only on success.
    pub async fn save_edit(&self, form: &EditForm) -> Result<(), ListError> {
        self.list.save_edit(&form.submit()).await?;
        self.modals.lock().await.edit.close();
        Ok(())
    }

    pub async fn request_delete(&self, id: impl Into<String>) {
        self.modals.lock().await.delete.open_for(id);
    }

    pub async fn cancel_delete(&self) {
        self.modals.lock().await.delete.close();
    }

    /// Deletes the pending target; the modal closes only on success.
    /// Without a pending target nothing happens.
    pub async fn confirm_delete(&self) -> Result<bool, ListError> {
        let target = self.modals.lock().await.delete.target.clone();
        let Some(id) = target else {
            return Ok(false);
        };
        self.list.delete(&id).await?;
        self.modals.lock().await.delete.close();
        Ok(true)
    }
}
