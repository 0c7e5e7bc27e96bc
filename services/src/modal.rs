use client::{Record, ResourceKind};

/// View or edit modal. `data` is present whenever `open` is true.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalState {
    pub open: bool,
    pub title: String,
    pub data: Option<Record>,
    pub resource: ResourceKind,
}

impl ModalState {
    pub fn closed(resource: ResourceKind) -> Self {
        Self {
            open: false,
            title: String::new(),
            data: None,
            resource,
        }
    }

    /// Opens on `record`; without one the modal stays closed.
    pub fn open_with(&mut self, title: impl Into<String>, record: Option<&Record>) -> bool {
        match record {
            Some(record) => {
                self.open = true;
                self.title = title.into();
                self.data = Some(record.clone());
                true
            }
            None => false,
        }
    }

    pub fn close(&mut self) {
        self.open = false;
        self.data = None;
    }
}

/// Delete confirmation; holds the target id rather than the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteModal {
    pub open: bool,
    pub target: Option<String>,
    pub resource: ResourceKind,
}

impl DeleteModal {
    pub fn closed(resource: ResourceKind) -> Self {
        Self {
            open: false,
            target: None,
            resource,
        }
    }

    pub fn open_for(&mut self, id: impl Into<String>) {
        self.open = true;
        self.target = Some(id.into());
    }

    pub fn close(&mut self) {
        self.open = false;
        self.target = None;
    }
}
